use crate::domain::errors::DomainResult;
use crate::domain::models::{Issue, Project};
use async_trait::async_trait;
use uuid::Uuid;

/// Repository port for project and issue persistence.
///
/// Issues are always addressed through their owning project; every
/// operation here is atomic at the single-row level and performs exactly
/// one store round-trip. Anything richer (read-merge-write updates,
/// filtering) is composed above this port, which also means two
/// concurrent updates to the same issue resolve last-write-wins.
#[async_trait]
pub trait ProjectStore: Send + Sync {
    /// Look up a project by name.
    async fn find_project(&self, name: &str) -> DomainResult<Option<Project>>;

    /// Fetch the project named `name`, creating it if absent.
    ///
    /// Projects materialize on first use; repeated calls are idempotent.
    async fn get_or_create_project(&self, name: &str) -> DomainResult<Project>;

    /// All issues of a project in insertion order. Unknown project yields
    /// an empty list, not an error.
    async fn list_issues(&self, project: &str) -> DomainResult<Vec<Issue>>;

    /// Append an issue to a project. The project row must already exist.
    async fn append_issue(&self, project: &str, issue: &Issue) -> DomainResult<()>;

    /// Look up a single issue within a project.
    async fn find_issue(&self, project: &str, id: Uuid) -> DomainResult<Option<Issue>>;

    /// Overwrite the stored issue with `issue`, matched by project and id.
    ///
    /// Returns `false` when no such issue exists. `created_on` is left
    /// untouched by the store regardless of the value passed in.
    async fn replace_issue(&self, project: &str, issue: &Issue) -> DomainResult<bool>;

    /// Permanently remove an issue. Returns `false` when no row matched.
    async fn delete_issue(&self, project: &str, id: Uuid) -> DomainResult<bool>;
}
