pub mod factories;

pub use factories::*;

use pansen_sqla::session::{SessionFactory, SessionOptions};
use sqlx::PgPool;

/// Session factory over the per-test pool with commits suppressed
pub fn test_session_factory(pool: PgPool) -> SessionFactory {
    SessionFactory::with_options(
        pool,
        SessionOptions {
            test_mode: true,
            ..SessionOptions::default()
        },
    )
}
