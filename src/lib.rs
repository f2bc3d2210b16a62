//! Issue Tracker - project-scoped issue tracking API
//!
//! A small HTTP service for creating, listing, updating and deleting
//! issues grouped under named projects. Projects come into existence
//! lazily on first submission; issues live and die inside their project.
//!
//! # Architecture
//!
//! This crate follows Clean Architecture / Hexagonal Architecture principles:
//!
//! - **Domain Layer** (`domain`): Pure business models and the store port
//! - **Service Layer** (`services`): Validation, merging and filtering logic
//! - **Adapters** (`adapters`): The axum HTTP surface and the SQLite store
//! - **Infrastructure** (`infrastructure`): Configuration and logging setup
//!
//! # Example
//!
//! ```ignore
//! use issue_tracker::adapters::http;
//! use issue_tracker::adapters::sqlite::{connect, embedded_migrations, Migrator, SqliteProjectStore};
//! use issue_tracker::services::IssueService;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = issue_tracker::ConfigLoader::load()?;
//!     let pool = connect(&config.database).await?;
//!     Migrator::new(pool.clone()).run(embedded_migrations()).await?;
//!     let service = IssueService::new(Arc::new(SqliteProjectStore::new(pool)));
//!     http::serve(service, &config.server, std::future::pending()).await
//! }
//! ```

pub mod adapters;
pub mod domain;
pub mod infrastructure;
pub mod services;

// Re-export commonly used types for convenience
pub use adapters::http::{build_router, serve};
pub use adapters::sqlite::SqliteProjectStore;
pub use domain::errors::{DomainError, DomainResult};
pub use domain::models::{Config, DatabaseConfig, Issue, IssuePatch, LoggingConfig, NewIssue, Project, ServerConfig};
pub use domain::ports::ProjectStore;
pub use infrastructure::config::{ConfigError, ConfigLoader};
pub use services::IssueService;
