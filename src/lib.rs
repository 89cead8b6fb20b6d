#![allow(clippy::doc_markdown)] // Allow technical terms like PostgreSQL, SQLx in docs
#![allow(clippy::missing_errors_doc)] // Allow public functions without # Errors sections
#![allow(clippy::must_use_candidate)] // Allow methods without must_use when context is clear

//! # Pansen SQLA
//!
//! A thin data-access layer over PostgreSQL for two related entities,
//! `Parent` and `Child`.
//!
//! ## Overview
//!
//! A parent owns an ordered collection of children and exposes three ways to
//! reach them:
//!
//! - **`children`**: every child, newest first, loaded on request
//! - **`children_capped`**: the newest [`CHILDREN_CAPPED_COUNT`] children per
//!   parent, ranked by a `row_number()` window inside PostgreSQL
//! - **`children_writes`**: an append-only handle that stages new children
//!   without loading anything
//!
//! All reads and writes go through a [`session::Session`], a unit of work with
//! staged inserts, flush-time read-back of server defaults, and an identity map
//! that can be refreshed with populate-existing.
//!
//! ## Module Organization
//!
//! - [`config`] - Environment-sourced settings and derived connection parameters
//! - [`database`] - Connection pool and embedded migrations
//! - [`models`] - `Parent`, `Child` and their loaded relations
//! - [`session`] - Unit of work, queries and the write-only child handle
//! - [`logging`] - Plain or JSON structured logging
//! - [`error`] - Structured error handling
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use pansen_sqla::config::AppConfig;
//! use pansen_sqla::database::DatabaseConnection;
//! use pansen_sqla::models::{NewChild, NewParent};
//! use pansen_sqla::session::ParentQuery;
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let config = AppConfig::load()?;
//! let db = DatabaseConnection::connect(&config).await?;
//! let mut session = db.session_factory().session();
//!
//! let staged = session.add(NewParent::new().with_child(NewChild::new().with_txt("first")));
//! session.flush().await?;
//!
//! let parent_id = staged.id().expect("flushed");
//! let parent = session
//!     .get_parent(&ParentQuery::by_id(parent_id).with_children_capped())
//!     .await?;
//! println!("{} newest children", parent.children_capped().map_or(0, |c| c.len()));
//!
//! session.commit().await?;
//! # Ok(())
//! # }
//! ```
//!
//! ## Testing
//!
//! Integration tests use SQLx native testing; each test gets its own database
//! with the embedded migrations applied:
//!
//! ```bash
//! cargo test --lib    # Unit tests
//! cargo test          # All tests (needs DATABASE_URL)
//! ```

pub mod config;
pub mod constants;
pub mod database;
pub mod error;
pub mod logging;
pub mod models;
pub mod session;

pub use config::{AppConfig, ConfigurationError, PostgresConnectionArgs};
pub use constants::CHILDREN_CAPPED_COUNT;
pub use database::{DatabaseConnection, DatabaseMigrations};
pub use error::{ConstraintKind, PansenError, PansenResult};
pub use models::{CappedChildren, Child, LoadedParent, NewChild, NewParent, Parent, ParentRef};
pub use session::{
    ChildrenWrites, ParentQuery, Session, SessionFactory, SessionOptions, Staged, StagedParent,
    UnitOfWork,
};
