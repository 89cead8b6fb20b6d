use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, PgExecutor};
use uuid::Uuid;

use super::child::NewChild;

/// Parent owns an ordered collection of children
/// Maps to the `parent` table; `id` and `created_at` are assigned by the server
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Parent {
    pub id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// New Parent for staging, optionally with children that are persisted alongside it
#[derive(Debug, Clone, Default)]
pub struct NewParent {
    pub children: Vec<NewChild>,
}

impl NewParent {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_child(mut self, child: NewChild) -> Self {
        self.children.push(child);
        self
    }

    pub fn with_children(mut self, children: impl IntoIterator<Item = NewChild>) -> Self {
        self.children.extend(children);
        self
    }
}

impl Parent {
    /// Insert a parent row and read back the server defaults
    pub async fn insert<'e, E: PgExecutor<'e>>(executor: E) -> Result<Parent, sqlx::Error> {
        sqlx::query_as::<_, Parent>(
            r#"
            INSERT INTO parent DEFAULT VALUES
            RETURNING id, created_at
            "#,
        )
        .fetch_one(executor)
        .await
    }

    /// Find a parent by ID
    pub async fn find_by_id<'e, E: PgExecutor<'e>>(
        executor: E,
        id: Uuid,
    ) -> Result<Option<Parent>, sqlx::Error> {
        sqlx::query_as::<_, Parent>(
            r#"
            SELECT id, created_at
            FROM parent
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(executor)
        .await
    }

    /// Find all parents among `ids`, newest first
    pub async fn find_by_ids<'e, E: PgExecutor<'e>>(
        executor: E,
        ids: &[Uuid],
    ) -> Result<Vec<Parent>, sqlx::Error> {
        sqlx::query_as::<_, Parent>(
            r#"
            SELECT id, created_at
            FROM parent
            WHERE id = ANY($1)
            ORDER BY created_at DESC
            "#,
        )
        .bind(ids)
        .fetch_all(executor)
        .await
    }

    /// Delete a parent; its children go with it through `ON DELETE CASCADE`
    pub async fn delete<'e, E: PgExecutor<'e>>(executor: E, id: Uuid) -> Result<bool, sqlx::Error> {
        let result = sqlx::query(
            r#"
            DELETE FROM parent
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(executor)
        .await?;

        Ok(result.rows_affected() > 0)
    }
}
