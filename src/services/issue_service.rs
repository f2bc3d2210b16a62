//! Issue service implementing the resource-handler business logic:
//! presence validation on create, ordered validation and field merging on
//! update, and case-insensitive query filtering on list.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use uuid::Uuid;

use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Issue, IssuePatch, NewIssue};
use crate::domain::ports::ProjectStore;

/// Retain only the issues whose fields match every `field=value`
/// constraint, compared case-insensitively on the wire rendering of the
/// field. A constraint naming a field issues do not carry matches
/// nothing, so it empties the result.
pub fn apply_filters(issues: Vec<Issue>, filters: &HashMap<String, String>) -> Vec<Issue> {
    issues
        .into_iter()
        .filter(|issue| {
            filters.iter().all(|(field, want)| {
                issue
                    .field_as_str(field)
                    .is_some_and(|have| have.to_lowercase() == want.to_lowercase())
            })
        })
        .collect()
}

pub struct IssueService<S> {
    store: Arc<S>,
}

impl<S> Clone for IssueService<S> {
    fn clone(&self) -> Self {
        Self {
            store: Arc::clone(&self.store),
        }
    }
}

impl<S: ProjectStore> IssueService<S> {
    pub fn new(store: Arc<S>) -> Self {
        Self { store }
    }

    /// List a project's issues in insertion order, narrowed by the query
    /// constraints. An unknown project yields an empty list.
    pub async fn list(
        &self,
        project: &str,
        filters: &HashMap<String, String>,
    ) -> DomainResult<Vec<Issue>> {
        let issues = self.store.list_issues(project).await?;
        Ok(apply_filters(issues, filters))
    }

    /// Submit a new issue, creating the project on first use.
    pub async fn create(&self, project: &str, new: NewIssue) -> DomainResult<Issue> {
        if new.issue_title.is_empty() || new.issue_text.is_empty() || new.created_by.is_empty() {
            return Err(DomainError::MissingRequiredFields);
        }

        let issue = Issue::submit(new);
        self.store.get_or_create_project(project).await?;
        self.store.append_issue(project, &issue).await?;

        tracing::debug!(project, issue_id = %issue.id, "issue created");
        Ok(issue)
    }

    /// Apply a partial update to one issue. Returns the raw id string so
    /// the caller can echo it back verbatim.
    ///
    /// Validation order matters to clients: missing id, malformed id,
    /// empty patch, then lookup failure.
    pub async fn update(
        &self,
        project: &str,
        id: Option<String>,
        patch: IssuePatch,
    ) -> DomainResult<String> {
        let raw_id = require_id(id)?;
        let issue_id = parse_id(&raw_id)?;

        if !patch.has_updates() {
            return Err(DomainError::NoUpdateFields { id: raw_id });
        }

        // Read-merge-write without a compare-and-swap: concurrent updates
        // to the same issue resolve last-write-wins.
        let Some(mut issue) = self.store.find_issue(project, issue_id).await? else {
            return Err(DomainError::IssueNotFound { id: raw_id });
        };

        patch.apply_to(&mut issue, Utc::now());

        if !self.store.replace_issue(project, &issue).await? {
            return Err(DomainError::IssueNotFound { id: raw_id });
        }

        tracing::debug!(project, issue_id = %issue.id, "issue updated");
        Ok(raw_id)
    }

    /// Permanently delete one issue. Returns the raw id string for the
    /// reply.
    pub async fn delete(&self, project: &str, id: Option<String>) -> DomainResult<String> {
        let raw_id = require_id(id)?;
        let issue_id = parse_id(&raw_id)?;

        if !self.store.delete_issue(project, issue_id).await? {
            return Err(DomainError::IssueNotFound { id: raw_id });
        }

        tracing::debug!(project, issue_id = %issue_id, "issue deleted");
        Ok(raw_id)
    }
}

fn require_id(id: Option<String>) -> DomainResult<String> {
    match id {
        Some(id) if !id.is_empty() => Ok(id),
        _ => Err(DomainError::MissingId),
    }
}

/// Syntactic id check; runs before any store round-trip.
fn parse_id(raw: &str) -> DomainResult<Uuid> {
    Uuid::parse_str(raw).map_err(|_| DomainError::InvalidIssueId { id: raw.to_string() })
}
