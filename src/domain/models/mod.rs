pub mod config;
pub mod issue;
pub mod project;

pub use config::{Config, DatabaseConfig, LogFormat, LoggingConfig, ServerConfig};
pub use issue::{Issue, IssuePatch, NewIssue};
pub use project::Project;
