//! Shared helpers for the integration suites: an in-memory store with
//! migrations applied, and a router wired to it.

use axum::Router;
use std::sync::Arc;

use issue_tracker::adapters::http::build_router;
use issue_tracker::adapters::sqlite::{
    create_test_pool, embedded_migrations, Migrator, SqliteProjectStore,
};
use issue_tracker::services::IssueService;

/// Fresh in-memory store, fully migrated. Every call is an isolated
/// database instance.
pub async fn setup_test_store() -> SqliteProjectStore {
    let pool = create_test_pool()
        .await
        .expect("failed to create test database");
    Migrator::new(pool.clone())
        .run(embedded_migrations())
        .await
        .expect("failed to run migrations");
    SqliteProjectStore::new(pool)
}

/// Router over a fresh in-memory store.
pub async fn test_router() -> Router {
    let store = setup_test_store().await;
    build_router(IssueService::new(Arc::new(store)), false)
}
