//! Domain errors for the issue tracker.

use thiserror::Error;

/// Domain-level errors that can occur while handling issue operations.
///
/// The first five variants are application outcomes carried back to the
/// client in the response body; `Database` and `Serialization` are
/// infrastructure faults and surface as HTTP 500.
#[derive(Debug, Error)]
pub enum DomainError {
    #[error("required field(s) missing")]
    MissingRequiredFields,

    #[error("missing _id")]
    MissingId,

    #[error("no update field(s) sent: {id}")]
    NoUpdateFields { id: String },

    #[error("malformed issue id: {id}")]
    InvalidIssueId { id: String },

    #[error("issue not found: {id}")]
    IssueNotFound { id: String },

    #[error("database error: {0}")]
    Database(String),

    #[error("serialization error: {0}")]
    Serialization(String),
}

pub type DomainResult<T> = Result<T, DomainError>;

impl From<sqlx::Error> for DomainError {
    fn from(err: sqlx::Error) -> Self {
        DomainError::Database(err.to_string())
    }
}

impl From<serde_json::Error> for DomainError {
    fn from(err: serde_json::Error) -> Self {
        DomainError::Serialization(err.to_string())
    }
}
