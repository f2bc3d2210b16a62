//! Issue resource handlers.
//!
//! Four verbs under `/api/issues/{project}`. Every application-level
//! outcome (success, validation failure, not-found) is HTTP 200 with
//! the outcome carried in the body; clients branch on the body's `error`
//! field, not the status code. Only unexpected store failures surface as
//! HTTP 500.

use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Json, Response},
};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::sync::Arc;

use crate::domain::errors::DomainError;
use crate::domain::models::issue::format_timestamp;
use crate::domain::models::{Issue, IssuePatch, NewIssue};
use crate::domain::ports::ProjectStore;
use crate::services::IssueService;

/// Shared state for the issue handlers.
pub struct AppState<S: ProjectStore> {
    pub service: IssueService<S>,
}

/// Body of an issue submission.
#[derive(Debug, Default, Deserialize)]
pub struct CreateIssueRequest {
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_text: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
}

impl From<CreateIssueRequest> for NewIssue {
    fn from(req: CreateIssueRequest) -> Self {
        Self {
            issue_title: req.issue_title.unwrap_or_default(),
            issue_text: req.issue_text.unwrap_or_default(),
            created_by: req.created_by.unwrap_or_default(),
            assigned_to: req.assigned_to.unwrap_or_default(),
            status_text: req.status_text.unwrap_or_default(),
        }
    }
}

/// Body of a partial update.
#[derive(Debug, Default, Deserialize)]
pub struct UpdateIssueRequest {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
    #[serde(default)]
    pub issue_title: Option<String>,
    #[serde(default)]
    pub issue_text: Option<String>,
    #[serde(default)]
    pub created_by: Option<String>,
    #[serde(default)]
    pub assigned_to: Option<String>,
    #[serde(default)]
    pub status_text: Option<String>,
    #[serde(default)]
    pub open: Option<bool>,
}

impl UpdateIssueRequest {
    fn into_patch(self) -> (Option<String>, IssuePatch) {
        let patch = IssuePatch {
            issue_title: self.issue_title,
            issue_text: self.issue_text,
            created_by: self.created_by,
            assigned_to: self.assigned_to,
            status_text: self.status_text,
            open: self.open,
        };
        (self.id, patch)
    }
}

/// Body of a delete request.
#[derive(Debug, Default, Deserialize)]
pub struct DeleteIssueRequest {
    #[serde(default, rename = "_id")]
    pub id: Option<String>,
}

/// Wire form of an issue.
#[derive(Debug, Serialize)]
pub struct IssueResponse {
    #[serde(rename = "_id")]
    pub id: String,
    pub issue_title: String,
    pub issue_text: String,
    pub created_by: String,
    pub assigned_to: String,
    pub status_text: String,
    pub open: bool,
    pub created_on: String,
    pub updated_on: String,
}

impl From<Issue> for IssueResponse {
    fn from(issue: Issue) -> Self {
        Self {
            id: issue.id.to_string(),
            issue_title: issue.issue_title,
            issue_text: issue.issue_text,
            created_by: issue.created_by,
            assigned_to: issue.assigned_to,
            status_text: issue.status_text,
            open: issue.open,
            created_on: format_timestamp(issue.created_on),
            updated_on: format_timestamp(issue.updated_on),
        }
    }
}

/// Success reply for update and delete.
#[derive(Debug, Serialize)]
pub struct ActionReply {
    pub result: &'static str,
    #[serde(rename = "_id")]
    pub id: String,
}

/// Error reply; `_id` is echoed back verbatim where the request carried
/// one.
#[derive(Debug, Serialize)]
pub struct ErrorReply {
    pub error: &'static str,
    #[serde(rename = "_id", skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
}

impl ErrorReply {
    fn new(error: &'static str) -> Self {
        Self { error, id: None }
    }

    fn with_id(error: &'static str, id: &str) -> Self {
        Self {
            error,
            id: Some(id.to_string()),
        }
    }
}

/// Parse a request body leniently. An absent or malformed body reads as
/// an empty one, so validation answers in-band instead of the transport
/// rejecting with a 4xx the clients never branch on.
fn parse_body<T: Default + serde::de::DeserializeOwned>(body: &Bytes) -> T {
    serde_json::from_slice(body).unwrap_or_default()
}

// Handler functions

pub async fn health_check() -> &'static str {
    "OK"
}

pub async fn list_issues<S: ProjectStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(project): Path<String>,
    Query(filters): Query<HashMap<String, String>>,
) -> Response {
    match state.service.list(&project, &filters).await {
        Ok(issues) => {
            let issues: Vec<IssueResponse> = issues.into_iter().map(IssueResponse::from).collect();
            Json(issues).into_response()
        }
        Err(err) => server_error(&err),
    }
}

pub async fn create_issue<S: ProjectStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(project): Path<String>,
    body: Bytes,
) -> Response {
    let req: CreateIssueRequest = parse_body(&body);

    match state.service.create(&project, req.into()).await {
        Ok(issue) => Json(IssueResponse::from(issue)).into_response(),
        Err(DomainError::MissingRequiredFields) => {
            Json(ErrorReply::new("required field(s) missing")).into_response()
        }
        Err(err) => server_error(&err),
    }
}

pub async fn update_issue<S: ProjectStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(project): Path<String>,
    body: Bytes,
) -> Response {
    let req: UpdateIssueRequest = parse_body(&body);
    let (id, patch) = req.into_patch();

    match state.service.update(&project, id, patch).await {
        Ok(id) => Json(ActionReply {
            result: "successfully updated",
            id,
        })
        .into_response(),
        Err(DomainError::MissingId) => Json(ErrorReply::new("missing _id")).into_response(),
        Err(DomainError::NoUpdateFields { id }) => {
            Json(ErrorReply::with_id("no update field(s) sent", &id)).into_response()
        }
        Err(DomainError::InvalidIssueId { id }) | Err(DomainError::IssueNotFound { id }) => {
            Json(ErrorReply::with_id("could not update", &id)).into_response()
        }
        Err(err) => server_error(&err),
    }
}

pub async fn delete_issue<S: ProjectStore + 'static>(
    State(state): State<Arc<AppState<S>>>,
    Path(project): Path<String>,
    body: Bytes,
) -> Response {
    let req: DeleteIssueRequest = parse_body(&body);

    match state.service.delete(&project, req.id).await {
        Ok(id) => Json(ActionReply {
            result: "successfully deleted",
            id,
        })
        .into_response(),
        Err(DomainError::MissingId) => Json(ErrorReply::new("missing _id")).into_response(),
        Err(DomainError::InvalidIssueId { id }) | Err(DomainError::IssueNotFound { id }) => {
            Json(ErrorReply::with_id("could not delete", &id)).into_response()
        }
        Err(err) => server_error(&err),
    }
}

/// Infrastructure-tier failure: log it, hide the detail.
fn server_error(err: &DomainError) -> Response {
    tracing::error!(error = %err, "request failed");
    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(ErrorReply::new("Server error")),
    )
        .into_response()
}
