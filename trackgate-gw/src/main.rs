//! trackgate-gw - Track gateway entry point
//!
//! Serves track metadata and base64 audio over HTTP, caching Yandex Music
//! lookups in a local SQLite store and `downloads/` directory.

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use tokio::signal;
use tracing::{error, info, warn};

use trackgate_common::logging::init_logging;
use trackgate_gw::config::{Args, GatewayConfig};
use trackgate_gw::db::{self, SqliteTrackStore};
use trackgate_gw::services::{BlobStore, TrackResolver, YandexMusicClient};
use trackgate_gw::{build_router, AppState};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let args = Args::parse();

    let config = GatewayConfig::load(args).context("Failed to load config")?;

    let _log_guard = init_logging(&config.logging).context("Failed to initialize logging")?;

    // Log build identification before any slow startup work
    info!(
        "Starting trackgate-gw v{} [{}] built {} ({})",
        env!("CARGO_PKG_VERSION"),
        env!("GIT_HASH"),
        env!("BUILD_TIMESTAMP"),
        env!("BUILD_PROFILE")
    );

    if config.catalog.token.is_none() {
        warn!("YANDEX_MUSIC_TOKEN not set, using anonymous catalog access");
    }

    let pool = db::init_database_pool(&config.store_url)
        .await
        .context("Failed to open track store")?;
    info!("Track store ready");

    let catalog = YandexMusicClient::new(config.catalog.clone())
        .context("Failed to build Yandex Music client")?;
    let blobs = BlobStore::new(&config.downloads_dir);
    info!("Downloads directory: {}", blobs.root().display());

    let resolver = TrackResolver::new(
        Arc::new(SqliteTrackStore::new(pool)),
        Arc::new(catalog),
        blobs,
    );
    let app = build_router(AppState::new(Arc::new(resolver)));

    let addr = SocketAddr::from(([0, 0, 0, 0], config.port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind to {}", addr))?;
    info!("Listening on http://{}", addr);

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
            error!("Failed to listen for Ctrl+C: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                error!("Failed to install SIGTERM handler: {}", e);
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
