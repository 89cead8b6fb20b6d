//! # Child Model
//!
//! Rows of the `child` table plus the two read paths over them: the full
//! collection of a parent and the capped (top-K) view.
//!
//! ## Database Schema
//!
//! ```sql
//! CREATE TABLE child (
//!   id UUID NOT NULL UNIQUE DEFAULT uuid_generate_v1(),
//!   parent_id UUID NOT NULL REFERENCES parent (id) ON DELETE CASCADE ON UPDATE CASCADE,
//!   txt TEXT,
//!   created_at TIMESTAMPTZ NOT NULL DEFAULT clock_timestamp(),
//!   PRIMARY KEY (id, parent_id)
//! );
//! ```
//!
//! `clock_timestamp()` rather than `now()` keeps timestamps distinct for rows
//! inserted inside one transaction, which the capped view ranks on.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use std::collections::HashMap;
use uuid::Uuid;

use super::parent::Parent;
use crate::session::Staged;

/// A single child row
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Child {
    pub id: Uuid,
    pub parent_id: Uuid,
    pub txt: Option<String>,
    pub created_at: DateTime<Utc>,
}

/// Reference from a staged child to its owning parent
///
/// A parent added to the same session can be referenced before it has an id;
/// the reference resolves once the parent has been flushed.
#[derive(Debug, Clone)]
pub enum ParentRef {
    Id(Uuid),
    Staged(Staged<Parent>),
}

impl ParentRef {
    pub fn resolve(&self) -> Option<Uuid> {
        match self {
            ParentRef::Id(id) => Some(*id),
            ParentRef::Staged(staged) => staged.get().map(|parent| parent.id),
        }
    }
}

impl From<Uuid> for ParentRef {
    fn from(id: Uuid) -> Self {
        ParentRef::Id(id)
    }
}

impl From<&Parent> for ParentRef {
    fn from(parent: &Parent) -> Self {
        ParentRef::Id(parent.id)
    }
}

impl From<&Staged<Parent>> for ParentRef {
    fn from(staged: &Staged<Parent>) -> Self {
        ParentRef::Staged(staged.clone())
    }
}

/// New Child for staging (without server-generated fields)
#[derive(Debug, Clone, Default)]
pub struct NewChild {
    pub parent: Option<ParentRef>,
    pub txt: Option<String>,
    /// Overrides the server default when set
    pub created_at: Option<DateTime<Utc>>,
}

impl NewChild {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_txt(mut self, txt: impl Into<String>) -> Self {
        self.txt = Some(txt.into());
        self
    }

    pub fn with_created_at(mut self, created_at: DateTime<Utc>) -> Self {
        self.created_at = Some(created_at);
        self
    }

    pub fn with_parent(mut self, parent: impl Into<ParentRef>) -> Self {
        self.parent = Some(parent.into());
        self
    }
}

impl Child {
    /// Insert a child row for `parent_id` and read back the server defaults
    pub async fn insert<'e, E: PgExecutor<'e>>(
        executor: E,
        parent_id: Uuid,
        new_child: &NewChild,
    ) -> Result<Child, sqlx::Error> {
        sqlx::query_as::<_, Child>(
            r#"
            INSERT INTO child (parent_id, txt, created_at)
            VALUES ($1, $2, COALESCE($3, clock_timestamp()))
            RETURNING id, parent_id, txt, created_at
            "#,
        )
        .bind(parent_id)
        .bind(new_child.txt.as_deref())
        .bind(new_child.created_at)
        .fetch_one(executor)
        .await
    }

    /// Find a child by ID
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<Child>, sqlx::Error> {
        sqlx::query_as::<_, Child>(
            r#"
            SELECT id, parent_id, txt, created_at
            FROM child
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// All children of the given parents, newest first within each parent
    pub async fn find_by_parents<'e, E: PgExecutor<'e>>(
        executor: E,
        parent_ids: &[Uuid],
    ) -> Result<Vec<Child>, sqlx::Error> {
        sqlx::query_as::<_, Child>(
            r#"
            SELECT id, parent_id, txt, created_at
            FROM child
            WHERE parent_id = ANY($1)
            ORDER BY parent_id, created_at DESC
            "#,
        )
        .bind(parent_ids)
        .fetch_all(executor)
        .await
    }

    /// The `limit` newest children of each given parent
    ///
    /// Rows are ranked per parent with `row_number()` over `created_at DESC` and
    /// filtered on the rank inside PostgreSQL, so the cost does not grow with the
    /// number of children a parent has beyond what the index scan touches.
    /// Children sharing a `created_at` are ordered however `row_number()`
    /// happens to number them; that order is not stable.
    pub async fn find_capped_by_parents<'e, E: PgExecutor<'e>>(
        executor: E,
        parent_ids: &[Uuid],
        limit: i64,
    ) -> Result<Vec<Child>, sqlx::Error> {
        sqlx::query_as::<_, Child>(
            r#"
            SELECT id, parent_id, txt, created_at
            FROM (
                SELECT
                    child.id,
                    child.parent_id,
                    child.txt,
                    child.created_at,
                    row_number() OVER (
                        PARTITION BY child.parent_id
                        ORDER BY child.created_at DESC
                    ) AS row_rank
                FROM child
                WHERE child.parent_id = ANY($1)
            ) AS ranked
            WHERE ranked.row_rank <= $2
            ORDER BY ranked.parent_id, ranked.row_rank
            "#,
        )
        .bind(parent_ids)
        .bind(limit)
        .fetch_all(executor)
        .await
    }

    /// Number of children currently stored for a parent
    pub async fn count_by_parent<'e, E: PgExecutor<'e>>(
        executor: E,
        parent_id: Uuid,
    ) -> Result<i64, sqlx::Error> {
        sqlx::query_scalar::<_, i64>(
            r#"
            SELECT COUNT(*)
            FROM child
            WHERE parent_id = $1
            "#,
        )
        .bind(parent_id)
        .fetch_one(executor)
        .await
    }

    /// The owning parent (back-reference)
    pub async fn parent<'e, E: PgExecutor<'e>>(
        &self,
        executor: E,
    ) -> Result<Option<Parent>, sqlx::Error> {
        Parent::find_by_id(executor, self.parent_id).await
    }
}

/// Split rows ordered by parent into per-parent collections, keeping the row order
pub fn group_by_parent(children: Vec<Child>) -> HashMap<Uuid, Vec<Child>> {
    let mut grouped: HashMap<Uuid, Vec<Child>> = HashMap::new();
    for child in children {
        grouped.entry(child.parent_id).or_default().push(child);
    }
    grouped
}
