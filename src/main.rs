//! Issue tracker server binary.

use anyhow::{Context, Result};
use clap::Parser;
use std::path::PathBuf;
use std::sync::Arc;

use issue_tracker::adapters::http;
use issue_tracker::adapters::sqlite::{
    connect, embedded_migrations, verify_connection, Migrator, SqliteProjectStore,
};
use issue_tracker::infrastructure::{config::ConfigLoader, logging};
use issue_tracker::services::IssueService;

#[derive(Parser, Debug)]
#[command(name = "issue-tracker")]
#[command(about = "Project-scoped issue tracking HTTP API")]
struct Args {
    /// Path to a YAML config file (otherwise tracker.yaml + env are merged)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Host to bind to, overriding config
    #[arg(long)]
    host: Option<String>,

    /// Port to listen on, overriding config
    #[arg(long)]
    port: Option<u16>,

    /// Path to the SQLite database file, overriding config
    #[arg(long)]
    db_path: Option<String>,
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => ConfigLoader::load_from_file(path)?,
        None => ConfigLoader::load()?,
    };
    if let Some(host) = args.host {
        config.server.host = host;
    }
    if let Some(port) = args.port {
        config.server.port = port;
    }
    if let Some(db_path) = args.db_path {
        config.database.path = db_path;
    }

    logging::init(&config.logging)?;

    let pool = connect(&config.database)
        .await
        .context("failed to open database")?;
    verify_connection(&pool).await.context("database ping failed")?;

    let applied = Migrator::new(pool.clone())
        .run(embedded_migrations())
        .await
        .context("failed to run migrations")?;
    if applied > 0 {
        tracing::info!(applied, "applied database migrations");
    }

    let store = SqliteProjectStore::new(pool);
    let service = IssueService::new(Arc::new(store));

    http::serve(service, &config.server, shutdown_signal()).await
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to install ctrl-c handler");
        return;
    }
    tracing::info!("shutdown signal received");
}
