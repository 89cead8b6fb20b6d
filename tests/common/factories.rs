//! # Fixture Factories
//!
//! Factories stage entities through the [`UnitOfWork`] contract and flush, so
//! tests start from persisted rows with server-generated ids.

use async_trait::async_trait;
use pansen_sqla::models::{NewChild, NewParent};
use pansen_sqla::session::UnitOfWork;
use pansen_sqla::PansenError;
use uuid::Uuid;

pub type FactoryResult<T> = Result<T, PansenError>;

#[async_trait]
pub trait SessionFixture<T> {
    async fn create(&self, uow: &mut dyn UnitOfWork) -> FactoryResult<T>;
}

/// A flushed parent and its children in insertion order (oldest first)
#[derive(Debug, Clone)]
pub struct CreatedParent {
    pub id: Uuid,
    pub child_ids: Vec<Uuid>,
}

impl CreatedParent {
    pub fn newest_child(&self) -> Option<Uuid> {
        self.child_ids.last().copied()
    }
}

/// Parent with `children` children whose `txt` is their insertion index
#[derive(Debug, Clone, Default)]
pub struct ParentFactory {
    children: usize,
}

impl ParentFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_children(mut self, children: usize) -> Self {
        self.children = children;
        self
    }
}

#[async_trait]
impl SessionFixture<CreatedParent> for ParentFactory {
    async fn create(&self, uow: &mut dyn UnitOfWork) -> FactoryResult<CreatedParent> {
        let new_parent = NewParent::new()
            .with_children((0..self.children).map(|i| NewChild::new().with_txt(i.to_string())));

        let staged = uow.add(new_parent);
        uow.flush().await?;

        let id = staged.id().ok_or(PansenError::UnflushedReference)?;
        let child_ids = staged
            .children
            .iter()
            .map(|child| child.get().map(|c| c.id).ok_or(PansenError::UnflushedReference))
            .collect::<FactoryResult<Vec<_>>>()?;

        Ok(CreatedParent { id, child_ids })
    }
}
