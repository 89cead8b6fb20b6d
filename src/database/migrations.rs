//! # Schema Management
//!
//! The `parent` and `child` tables are created by the SQL files under
//! `migrations/`, embedded into the binary with `sqlx::migrate!`.
//!
//! ## Test Databases
//!
//! Test runs can rebuild the schema from scratch. The rebuild holds a
//! PostgreSQL advisory lock so parallel test processes never drop tables out
//! from under each other:
//!
//! ```sql
//! SELECT pg_advisory_lock(7305198462012345)
//! DROP TABLE IF EXISTS child, parent, _sqlx_migrations
//! -- re-apply migrations
//! SELECT pg_advisory_unlock(7305198462012345)
//! ```

use sqlx::migrate::Migrator;
use sqlx::PgPool;
use tracing::info;

use crate::constants::tables;
use crate::error::PansenResult;

/// Migrations embedded at compile time
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

const SCHEMA_LOCK_KEY: i64 = 7_305_198_462_012_345;

/// Applies and rebuilds the embedded schema
pub struct DatabaseMigrations;

impl DatabaseMigrations {
    /// Apply all migrations that have not run yet
    pub async fn run_all(pool: &PgPool) -> PansenResult<()> {
        MIGRATOR.run(pool).await?;
        info!(
            migrations = MIGRATOR.iter().count(),
            "Database schema up to date"
        );
        Ok(())
    }

    /// Drop both tables and the migration ledger, then migrate again
    pub async fn reset_schema(pool: &PgPool) -> PansenResult<()> {
        // Session-level advisory locks belong to a connection, so hold one for the whole rebuild
        let mut conn = pool.acquire().await?;

        sqlx::query("SELECT pg_advisory_lock($1)")
            .bind(SCHEMA_LOCK_KEY)
            .execute(&mut *conn)
            .await?;

        let result = Self::rebuild(&mut *conn).await;

        sqlx::query("SELECT pg_advisory_unlock($1)")
            .bind(SCHEMA_LOCK_KEY)
            .execute(&mut *conn)
            .await?;

        result
    }

    async fn rebuild(conn: &mut sqlx::PgConnection) -> PansenResult<()> {
        for table in [tables::CHILD, tables::PARENT, "_sqlx_migrations"] {
            sqlx::query(&format!("DROP TABLE IF EXISTS {table}"))
                .execute(&mut *conn)
                .await?;
        }

        MIGRATOR.run(&mut *conn).await?;
        info!("Database schema rebuilt");
        Ok(())
    }

    /// Whether both tables exist
    pub async fn schema_ready(pool: &PgPool) -> PansenResult<bool> {
        let ready = sqlx::query_scalar::<_, bool>(
            r#"
            SELECT COUNT(*) = 2
            FROM information_schema.tables
            WHERE table_schema = current_schema()
              AND table_name = ANY($1)
            "#,
        )
        .bind(&[tables::PARENT, tables::CHILD][..])
        .fetch_one(pool)
        .await?;

        Ok(ready)
    }
}
