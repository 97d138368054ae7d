//! Transform Records - CRUD service for text-transformation records
//!
//! Stores reverse / Caesar / Base64 results in SQLite and serves reads through
//! an in-process LRU or map cache.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::Context;
use clap::Parser;
use tokio::signal;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use transform_records::api::create_router;
use transform_records::cli::{Cli, Command};
use transform_records::store::{RecordStore, SqliteStore};
use transform_records::{AppState, Config, RecordService};

/// Main entry point.
///
/// `transform` runs once over stdio or files and exits; anything else
/// starts the records server.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    match cli.command.unwrap_or(Command::Serve) {
        Command::Transform(args) => args.run(),
        Command::Serve => serve().await,
    }
}

/// Runs the records server.
///
/// # Startup Sequence
/// 1. Initialize tracing subscriber for logging
/// 2. Load configuration from environment variables
/// 3. Open the SQLite store and create the schema
/// 4. Build the configured cache and the record service
/// 5. Create Axum router with all endpoints
/// 6. Start HTTP server on configured port
/// 7. Handle graceful shutdown on SIGINT/SIGTERM
async fn serve() -> anyhow::Result<()> {
    // Defaults to "info" level, can be overridden with RUST_LOG env var
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "transform_records=info,tower_http=info".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Transform Records Server");

    let config = Config::from_env();
    info!(
        "Configuration loaded: port={}, database={}, cache={}",
        config.server_port, config.database_path, config.cache
    );

    let store = SqliteStore::open(&config.database_path)
        .await
        .with_context(|| format!("opening database {}", config.database_path))?;
    store
        .init_schema()
        .await
        .context("initializing database schema")?;

    let cache = config.cache.build();
    let service = RecordService::new(Arc::new(store), cache);
    let state = AppState::new(service, config.cache);
    info!("Record service initialized with {} cache", config.cache);

    let app = create_router(state);

    let addr = SocketAddr::from(([0, 0, 0, 0], config.server_port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("binding {}", addr))?;
    info!("Server listening on http://{}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving HTTP")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Waits for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = signal::ctrl_c().await {
            tracing::error!("Failed to listen for Ctrl+C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(err) => {
                tracing::error!("Failed to install SIGTERM handler: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, initiating shutdown...");
        }
        _ = terminate => {
            info!("Received SIGTERM, initiating shutdown...");
        }
    }
}
