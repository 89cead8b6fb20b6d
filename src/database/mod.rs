//! # Database Operations
//!
//! Pool construction from configuration and management of the embedded schema.
//!
//! ## Key Components
//!
//! - [`connection`] - Connection pool built from [`crate::config::AppConfig`]
//! - [`migrations`] - Embedded migrations plus a locked rebuild for test databases
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use pansen_sqla::config::AppConfig;
//! use pansen_sqla::database::{DatabaseConnection, DatabaseMigrations};
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let db = DatabaseConnection::connect(&config).await?;
//! DatabaseMigrations::run_all(db.pool()).await?;
//!
//! let factory = db.session_factory();
//! let mut session = factory.session();
//! # Ok(())
//! # }
//! ```

pub mod connection;
pub mod migrations;

pub use connection::DatabaseConnection;
pub use migrations::{DatabaseMigrations, MIGRATOR};
