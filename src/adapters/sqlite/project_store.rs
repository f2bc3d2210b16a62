//! SQLite implementation of the ProjectStore.

use async_trait::async_trait;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::adapters::sqlite::{parse_datetime, parse_uuid};
use crate::domain::errors::{DomainError, DomainResult};
use crate::domain::models::{Issue, Project};
use crate::domain::ports::ProjectStore;

#[derive(Clone)]
pub struct SqliteProjectStore {
    pool: SqlitePool,
}

impl SqliteProjectStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl ProjectStore for SqliteProjectStore {
    async fn find_project(&self, name: &str) -> DomainResult<Option<Project>> {
        let row: Option<ProjectRow> =
            sqlx::query_as("SELECT name, created_on FROM projects WHERE name = ?")
                .bind(name)
                .fetch_optional(&self.pool)
                .await?;

        row.map(Project::try_from).transpose()
    }

    async fn get_or_create_project(&self, name: &str) -> DomainResult<Project> {
        sqlx::query("INSERT INTO projects (name, created_on) VALUES (?, ?) ON CONFLICT(name) DO NOTHING")
            .bind(name)
            .bind(chrono::Utc::now().to_rfc3339())
            .execute(&self.pool)
            .await?;

        self.find_project(name).await?.ok_or_else(|| {
            DomainError::Database(format!("project vanished after upsert: {name}"))
        })
    }

    async fn list_issues(&self, project: &str) -> DomainResult<Vec<Issue>> {
        let rows: Vec<IssueRow> = sqlx::query_as(
            "SELECT id, issue_title, issue_text, created_by, assigned_to, status_text,
                    open, created_on, updated_on
             FROM issues WHERE project_name = ? ORDER BY seq",
        )
        .bind(project)
        .fetch_all(&self.pool)
        .await?;

        rows.into_iter().map(Issue::try_from).collect()
    }

    async fn append_issue(&self, project: &str, issue: &Issue) -> DomainResult<()> {
        sqlx::query(
            r#"INSERT INTO issues (id, project_name, issue_title, issue_text, created_by,
               assigned_to, status_text, open, created_on, updated_on)
               VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"#,
        )
        .bind(issue.id.to_string())
        .bind(project)
        .bind(&issue.issue_title)
        .bind(&issue.issue_text)
        .bind(&issue.created_by)
        .bind(&issue.assigned_to)
        .bind(&issue.status_text)
        .bind(issue.open)
        .bind(issue.created_on.to_rfc3339())
        .bind(issue.updated_on.to_rfc3339())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn find_issue(&self, project: &str, id: Uuid) -> DomainResult<Option<Issue>> {
        let row: Option<IssueRow> = sqlx::query_as(
            "SELECT id, issue_title, issue_text, created_by, assigned_to, status_text,
                    open, created_on, updated_on
             FROM issues WHERE project_name = ? AND id = ?",
        )
        .bind(project)
        .bind(id.to_string())
        .fetch_optional(&self.pool)
        .await?;

        row.map(Issue::try_from).transpose()
    }

    async fn replace_issue(&self, project: &str, issue: &Issue) -> DomainResult<bool> {
        // created_on is deliberately absent from the SET list; it is
        // written once at insert and never again.
        let result = sqlx::query(
            r#"UPDATE issues SET issue_title = ?, issue_text = ?, created_by = ?,
               assigned_to = ?, status_text = ?, open = ?, updated_on = ?
               WHERE project_name = ? AND id = ?"#,
        )
        .bind(&issue.issue_title)
        .bind(&issue.issue_text)
        .bind(&issue.created_by)
        .bind(&issue.assigned_to)
        .bind(&issue.status_text)
        .bind(issue.open)
        .bind(issue.updated_on.to_rfc3339())
        .bind(project)
        .bind(issue.id.to_string())
        .execute(&self.pool)
        .await?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_issue(&self, project: &str, id: Uuid) -> DomainResult<bool> {
        let result = sqlx::query("DELETE FROM issues WHERE project_name = ? AND id = ?")
            .bind(project)
            .bind(id.to_string())
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }
}

#[derive(sqlx::FromRow)]
struct ProjectRow {
    name: String,
    created_on: String,
}

impl TryFrom<ProjectRow> for Project {
    type Error = DomainError;

    fn try_from(row: ProjectRow) -> Result<Self, Self::Error> {
        Ok(Project {
            name: row.name,
            created_on: parse_datetime(&row.created_on)?,
        })
    }
}

#[derive(sqlx::FromRow)]
struct IssueRow {
    id: String,
    issue_title: String,
    issue_text: String,
    created_by: String,
    assigned_to: String,
    status_text: String,
    open: bool,
    created_on: String,
    updated_on: String,
}

impl TryFrom<IssueRow> for Issue {
    type Error = DomainError;

    fn try_from(row: IssueRow) -> Result<Self, Self::Error> {
        Ok(Issue {
            id: parse_uuid(&row.id)?,
            issue_title: row.issue_title,
            issue_text: row.issue_text,
            created_by: row.created_by,
            assigned_to: row.assigned_to,
            status_text: row.status_text,
            open: row.open,
            created_on: parse_datetime(&row.created_on)?,
            updated_on: parse_datetime(&row.updated_on)?,
        })
    }
}
