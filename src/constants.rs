//! # Schema and System Constants
//!
//! Table names, relation bounds and configuration defaults shared by the model
//! layer, the session and the configuration loader.

/// Upper bound on the number of children exposed through a parent's capped view.
pub const CHILDREN_CAPPED_COUNT: i64 = 2;

/// Table names as created by the embedded migrations
pub mod tables {
    pub const PARENT: &str = "parent";
    pub const CHILD: &str = "child";
}

/// Configuration defaults applied when the environment is silent
pub mod defaults {
    pub const ENVIRONMENT: &str = "dev";
    pub const POSTGRES_PORT: u16 = 5432;
    pub const MAX_CONNECTIONS: u32 = 10;
    pub const ACQUIRE_TIMEOUT_SECS: u64 = 30;

    /// Suffix appended to the database name when running in test mode
    pub const TEST_DATABASE_SUFFIX: &str = "_test";

    /// Name of the dotenv file consulted before reading the process environment
    pub const DOTENV_FILE: &str = ".env";
}

/// Log targets that can be tuned independently
pub mod log_targets {
    pub const CRATE: &str = "pansen_sqla";
    pub const SQLX: &str = "sqlx";
}
