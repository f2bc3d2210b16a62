//! Issue domain model.
//!
//! Issues are trackable work items owned by a project. They are created
//! through the submission form, partially updated in place, and deleted
//! permanently; an issue never moves between projects.

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Render a timestamp the way it appears on the wire.
///
/// Listing filters compare against this rendering, so it must stay in
/// lockstep with the response serialization.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// A single trackable work item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Issue {
    /// Store-assigned identifier, immutable after creation.
    pub id: Uuid,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    /// Set once at creation, never modified.
    pub created_on: DateTime<Utc>,
    /// Refreshed on every successful update.
    pub updated_on: DateTime<Utc>,
}

impl Issue {
    /// Construct a freshly submitted issue with defaulted optional fields.
    pub fn submit(new: NewIssue) -> Self {
        let now = Utc::now();
        Self {
            id: Uuid::new_v4(),
            issue_title: new.issue_title,
            issue_text: new.issue_text,
            created_by: new.created_by,
            assigned_to: new.assigned_to,
            status_text: new.status_text,
            open: true,
            created_on: now,
            updated_on: now,
        }
    }

    /// Look up a field by its wire name and render it as a string.
    ///
    /// Returns `None` for field names the issue does not carry; listing
    /// treats that as "matches nothing".
    pub fn field_as_str(&self, field: &str) -> Option<String> {
        match field {
            "_id" => Some(self.id.to_string()),
            "issue_title" => Some(self.issue_title.clone()),
            "issue_text" => Some(self.issue_text.clone()),
            "created_by" => Some(self.created_by.clone()),
            "assigned_to" => Some(self.assigned_to.clone()),
            "status_text" => Some(self.status_text.clone()),
            "open" => Some(self.open.to_string()),
            "created_on" => Some(format_timestamp(self.created_on)),
            "updated_on" => Some(format_timestamp(self.updated_on)),
            _ => None,
        }
    }
}

/// Fields accepted when submitting a new issue.
///
/// The three required fields are validated by the service; the optional
/// pair defaults to the empty string.
#[derive(Debug, Clone, Default)]
pub struct NewIssue {
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
}

/// Partial update applied over an existing issue.
///
/// `None` means the field was absent from the request. The merge rules
/// are not uniform across fields and are pinned by regression tests:
///
/// - `issue_title` / `issue_text` / `created_by` keep their prior value
///   when absent or empty,
/// - `assigned_to` / `status_text` are overwritten whenever present,
///   including being cleared to the empty string,
/// - a truthy `open` closes the issue; `open: false` leaves it alone.
///   Clients send `open: true` to close an issue. Kept verbatim for wire
///   compatibility with existing clients.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IssuePatch {
    pub issue_title: Option<String>,
    pub issue_text: Option<String>,
    pub created_by: Option<String>,
    pub assigned_to: Option<String>,
    pub status_text: Option<String>,
    pub open: Option<bool>,
}

impl IssuePatch {
    /// Whether the patch carries any update at all.
    ///
    /// Empty strings and `open: false` count as "nothing sent", matching
    /// the falsiness check existing clients rely on.
    pub fn has_updates(&self) -> bool {
        let supplied = |f: &Option<String>| f.as_deref().is_some_and(|s| !s.is_empty());
        supplied(&self.issue_title)
            || supplied(&self.issue_text)
            || supplied(&self.created_by)
            || supplied(&self.assigned_to)
            || supplied(&self.status_text)
            || self.open == Some(true)
    }

    /// Merge this patch over `issue`, refreshing `updated_on` to `now`.
    ///
    /// `id` and `created_on` are never touched.
    pub fn apply_to(&self, issue: &mut Issue, now: DateTime<Utc>) {
        if let Some(title) = self.issue_title.as_deref().filter(|s| !s.is_empty()) {
            issue.issue_title = title.to_string();
        }
        if let Some(text) = self.issue_text.as_deref().filter(|s| !s.is_empty()) {
            issue.issue_text = text.to_string();
        }
        if let Some(author) = self.created_by.as_deref().filter(|s| !s.is_empty()) {
            issue.created_by = author.to_string();
        }
        if let Some(assignee) = &self.assigned_to {
            issue.assigned_to = assignee.clone();
        }
        if let Some(status) = &self.status_text {
            issue.status_text = status.clone();
        }
        if self.open == Some(true) {
            issue.open = false;
        }
        issue.updated_on = now;
    }
}
