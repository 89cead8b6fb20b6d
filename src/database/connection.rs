use sqlx::postgres::PgPoolOptions;
use sqlx::{PgPool, Row};
use std::time::Duration;
use tracing::info;

use crate::config::AppConfig;
use crate::constants::defaults;
use crate::error::PansenResult;
use crate::session::{SessionFactory, SessionOptions};

/// Connection pool built from [`AppConfig`]
pub struct DatabaseConnection {
    pool: PgPool,
    test_mode: bool,
}

impl DatabaseConnection {
    /// Connect using the derived keyword-style parameters (`jit` disabled per connection)
    pub async fn connect(config: &AppConfig) -> PansenResult<Self> {
        let options = config.connection.connect_options()?;

        let pool = PgPoolOptions::new()
            .max_connections(config.max_connections)
            .acquire_timeout(Duration::from_secs(defaults::ACQUIRE_TIMEOUT_SECS))
            .connect_with(options)
            .await?;

        info!(
            host = %config.connection.host,
            port = config.connection.port,
            database = %config.connection.database,
            max_connections = config.max_connections,
            test_mode = config.test_mode,
            "Connected to PostgreSQL"
        );

        Ok(Self {
            pool,
            test_mode: config.test_mode,
        })
    }

    /// Wrap an existing pool, e.g. the one `#[sqlx::test]` provides
    pub fn from_pool(pool: PgPool, test_mode: bool) -> Self {
        Self { pool, test_mode }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Session factory sharing this pool; test mode carries over
    pub fn session_factory(&self) -> SessionFactory {
        SessionFactory::with_options(
            self.pool.clone(),
            SessionOptions {
                test_mode: self.test_mode,
                ..SessionOptions::default()
            },
        )
    }

    pub async fn health_check(&self) -> PansenResult<bool> {
        let row = sqlx::query("SELECT 1 as health")
            .fetch_one(&self.pool)
            .await?;

        let health: i32 = row.get("health");
        Ok(health == 1)
    }

    pub async fn close(self) {
        self.pool.close().await;
    }
}
