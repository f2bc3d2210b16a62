//! SQLite persistence for projects and issues.

pub mod connection;
pub mod migrations;
pub mod project_store;

pub use connection::{connect, create_test_pool, verify_connection, ConnectionError};
pub use migrations::{embedded_migrations, Migration, MigrationError, Migrator};
pub use project_store::SqliteProjectStore;

use chrono::{DateTime, Utc};
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};

/// Parse a UUID string from a SQLite row field.
pub(crate) fn parse_uuid(s: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(s).map_err(|e| DomainError::Serialization(e.to_string()))
}

/// Parse an RFC3339 datetime string from a SQLite row field.
pub(crate) fn parse_datetime(s: &str) -> DomainResult<DateTime<Utc>> {
    chrono::DateTime::parse_from_rfc3339(s)
        .map_err(|e| DomainError::Serialization(e.to_string()))
        .map(|dt| dt.with_timezone(&Utc))
}
