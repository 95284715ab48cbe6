//! Yurt Radio - Main entry point
//!
//! `serve` (default) opens the catalog, optionally synchronizes the library and
//! runs the HTTP server until Ctrl+C / SIGTERM. `scan` runs one pass and exits.

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use yurt_common::config::RadioConfig;
use yurt_common::db::init_database;
use yurt_common::human_time::format_duration;
use yurt_common::Catalog;
use yurt_radio::cli::{Args, Command};
use yurt_radio::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    // Log level comes from the config, so it loads before the subscriber
    // is installed; a missing config file is reported again below.
    let config = args
        .resolve_config()
        .context("Failed to load configuration")?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!(
                    "yurt_radio={level},yurt_common={level},tower_http=info",
                    level = config.log_level
                )
                .into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting Yurt Radio v{}", env!("CARGO_PKG_VERSION"));
    if let Some(path) = &args.config {
        if !path.exists() {
            warn!("Config file not found at {}, using built-in defaults", path.display());
        }
    }
    info!("Music directory: {}", config.music_directory.display());
    info!("Database: {}", config.database_path.display());

    let pool = init_database(&config.database_path)
        .await
        .context("Failed to initialize database")?;
    let state = AppState::new(Catalog::new(pool), config);

    match args.effective_command() {
        Command::Scan => scan(&state).await,
        Command::Serve(_) => serve(state).await,
    }
}

async fn scan(state: &AppState) -> Result<()> {
    let report = state
        .synchronizer
        .synchronize(&state.config.music_directory)
        .await
        .context("Synchronization failed")?;

    println!(
        "scanned {}, added {}, updated {}, removed {}, skipped {}, duplicates {}",
        report.scanned,
        report.added,
        report.updated,
        report.removed,
        report.skipped,
        report.duplicates
    );
    Ok(())
}

async fn serve(state: AppState) -> Result<()> {
    let config: &RadioConfig = &state.config;

    if config.rescan_on_startup {
        match state.synchronizer.synchronize(&config.music_directory).await {
            Ok(report) => info!(
                added = report.added,
                removed = report.removed,
                "Startup synchronization finished"
            ),
            Err(e) => warn!("Startup synchronization skipped: {}", e),
        }
    }

    match state.catalog.stats().await {
        Ok(stats) => info!(
            "Catalog holds {} tracks ({})",
            stats.total_tracks,
            format_duration(stats.total_duration_seconds)
        ),
        Err(_) => warn!("Catalog is empty; add music and rescan"),
    }

    let addr = config.bind_addr();
    let app = build_router(state.clone());

    info!("Starting HTTP server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    info!("Server shutdown complete");
    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            warn!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                warn!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            info!("Received Ctrl+C, shutting down");
        },
        _ = terminate => {
            info!("Received terminate signal, shutting down");
        },
    }
}
