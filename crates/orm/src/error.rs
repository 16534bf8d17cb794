//! Error types for the query layer
//!
//! Caller contract violations, lookup outcomes and passthrough failures from
//! the session all surface as one [`OrmError`].

use thiserror::Error;

/// ORM result type alias
pub type OrmResult<T> = Result<T, OrmError>;

/// Error types for query, pagination and lookup operations
#[derive(Debug, Clone, PartialEq, Error)]
pub enum OrmError {
    /// Offset or limit was negative; raised before any query runs
    #[error("Invalid argument: {argument} must be non-negative, got {value}")]
    InvalidArgument { argument: &'static str, value: i64 },

    /// Single-row lookup matched nothing
    #[error("{entity} not found: {criteria}")]
    NotFound { entity: String, criteria: String },

    /// Single-row lookup matched more than one row
    #[error("{entity} lookup is ambiguous, more than one row matches: {criteria}")]
    AmbiguousResult { entity: String, criteria: String },

    /// Connection or pool failure
    #[error("Connection error: {0}")]
    Connection(String),

    /// Statement failed to execute or its result could not be read
    #[error("Query error: {0}")]
    Query(String),

    /// Commit or rollback failed, or the session is already finished
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Row could not be turned into a model
    #[error("Serialization error: {0}")]
    Serialization(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl OrmError {
    pub fn not_found(entity: impl Into<String>, criteria: impl Into<String>) -> Self {
        OrmError::NotFound {
            entity: entity.into(),
            criteria: criteria.into(),
        }
    }

    pub fn ambiguous(entity: impl Into<String>, criteria: impl Into<String>) -> Self {
        OrmError::AmbiguousResult {
            entity: entity.into(),
            criteria: criteria.into(),
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, OrmError::NotFound { .. })
    }
}

impl From<sqlx::Error> for OrmError {
    fn from(err: sqlx::Error) -> Self {
        match err {
            sqlx::Error::Io(_)
            | sqlx::Error::Tls(_)
            | sqlx::Error::PoolTimedOut
            | sqlx::Error::PoolClosed
            | sqlx::Error::WorkerCrashed => OrmError::Connection(err.to_string()),
            sqlx::Error::Configuration(_) => OrmError::Configuration(err.to_string()),
            _ => OrmError::Query(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for OrmError {
    fn from(err: serde_json::Error) -> Self {
        OrmError::Serialization(err.to_string())
    }
}
