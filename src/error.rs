//! Error types for the data-access layer.

use crate::config::ConfigurationError;
use sqlx::error::ErrorKind;
use thiserror::Error;
use uuid::Uuid;

/// Which server-side constraint rejected a write
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConstraintKind {
    ForeignKey,
    Unique,
    NotNull,
    Check,
}

impl std::fmt::Display for ConstraintKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConstraintKind::ForeignKey => write!(f, "foreign key"),
            ConstraintKind::Unique => write!(f, "unique"),
            ConstraintKind::NotNull => write!(f, "not null"),
            ConstraintKind::Check => write!(f, "check"),
        }
    }
}

#[derive(Debug, Error)]
pub enum PansenError {
    #[error("Configuration error: {0}")]
    Configuration(#[from] ConfigurationError),

    #[error("Constraint violation ({kind}) on {constraint}: {message}")]
    ConstraintViolation {
        kind: ConstraintKind,
        constraint: String,
        message: String,
    },

    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: Uuid },

    /// A child was staged against a parent that this session never persisted
    #[error("Child references a parent that was not added to this session")]
    UnflushedReference,

    #[error("Child has no parent reference")]
    MissingParentReference,

    #[error("Child belongs to parent {actual}, cannot append it to parent {expected}")]
    ParentMismatch { expected: Uuid, actual: Uuid },

    #[error("Query selects no ids")]
    EmptyQuery,

    #[error("Database error: {0}")]
    Database(#[source] sqlx::Error),

    #[error("Migration error: {0}")]
    Migration(#[from] sqlx::migrate::MigrateError),
}

impl PansenError {
    pub fn not_found(entity: &'static str, id: Uuid) -> Self {
        Self::NotFound { entity, id }
    }

    /// True for any rejected write, regardless of the constraint kind
    pub fn is_constraint_violation(&self) -> bool {
        matches!(self, Self::ConstraintViolation { .. })
    }

    pub fn constraint_kind(&self) -> Option<ConstraintKind> {
        match self {
            Self::ConstraintViolation { kind, .. } => Some(*kind),
            _ => None,
        }
    }
}

impl From<sqlx::Error> for PansenError {
    fn from(err: sqlx::Error) -> Self {
        let kind = err.as_database_error().and_then(|db| match db.kind() {
            ErrorKind::ForeignKeyViolation => Some(ConstraintKind::ForeignKey),
            ErrorKind::UniqueViolation => Some(ConstraintKind::Unique),
            ErrorKind::NotNullViolation => Some(ConstraintKind::NotNull),
            ErrorKind::CheckViolation => Some(ConstraintKind::Check),
            _ => None,
        });

        match (kind, err.as_database_error()) {
            (Some(kind), Some(db)) => PansenError::ConstraintViolation {
                kind,
                constraint: db.constraint().unwrap_or("<unnamed>").to_string(),
                message: db.message().to_string(),
            },
            _ => PansenError::Database(err),
        }
    }
}

pub type PansenResult<T> = std::result::Result<T, PansenError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_non_database_errors_stay_database_errors() {
        let err: PansenError = sqlx::Error::RowNotFound.into();
        assert!(matches!(err, PansenError::Database(sqlx::Error::RowNotFound)));
        let source = std::error::Error::source(&err).map(|s| s.to_string());
        assert_eq!(source, Some(sqlx::Error::RowNotFound.to_string()));
        assert!(!err.is_constraint_violation());
        assert_eq!(err.constraint_kind(), None);
    }

    #[test]
    fn test_constraint_violation_display() {
        let err = PansenError::ConstraintViolation {
            kind: ConstraintKind::ForeignKey,
            constraint: "child_parent_id_fkey".to_string(),
            message: "insert or update on table \"child\" violates foreign key constraint"
                .to_string(),
        };

        assert!(err.is_constraint_violation());
        assert_eq!(err.constraint_kind(), Some(ConstraintKind::ForeignKey));
        assert!(err
            .to_string()
            .starts_with("Constraint violation (foreign key) on child_parent_id_fkey"));
    }

    #[test]
    fn test_not_found_display() {
        let id = Uuid::nil();
        let err = PansenError::not_found("Parent", id);
        assert_eq!(err.to_string(), format!("Parent {id} not found"));
    }
}
