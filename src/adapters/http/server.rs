//! Router assembly and server startup.

use anyhow::{Context, Result};
use axum::{
    routing::get,
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::adapters::http::issues::{
    create_issue, delete_issue, health_check, list_issues, update_issue, AppState,
};
use crate::domain::models::ServerConfig;
use crate::domain::ports::ProjectStore;
use crate::services::IssueService;

/// Build the router. All four verbs hang off the same project-scoped
/// route.
pub fn build_router<S: ProjectStore + 'static>(
    service: IssueService<S>,
    enable_cors: bool,
) -> Router {
    let state = Arc::new(AppState { service });

    let app = Router::new()
        .route(
            "/api/issues/{project}",
            get(list_issues::<S>)
                .post(create_issue::<S>)
                .put(update_issue::<S>)
                .delete(delete_issue::<S>),
        )
        .route("/health", get(health_check))
        .with_state(state);

    if enable_cors {
        app.layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .layer(TraceLayer::new_for_http())
    } else {
        app.layer(TraceLayer::new_for_http())
    }
}

/// Bind and serve until the shutdown future resolves.
pub async fn serve<S, F>(
    service: IssueService<S>,
    config: &ServerConfig,
    shutdown: F,
) -> Result<()>
where
    S: ProjectStore + 'static,
    F: std::future::Future<Output = ()> + Send + 'static,
{
    let addr: SocketAddr = format!("{}:{}", config.host, config.port)
        .parse()
        .context("invalid server host/port")?;
    let router = build_router(service, config.enable_cors);

    tracing::info!("issue tracker listening on {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .context("failed to bind listener")?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown)
        .await
        .context("server error")?;
    Ok(())
}
