//! trackgate-gw library interface
//!
//! Exposes the router and its collaborators for the binary and for
//! integration testing.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod services;

pub use crate::error::{ApiError, ApiResult};

use axum::Router;
use chrono::{DateTime, Utc};
use std::sync::Arc;
use tower_http::cors::CorsLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;

use crate::services::TrackResolver;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    /// Cache-aside resolver with its store, catalog and blob collaborators
    pub resolver: Arc<TrackResolver>,
    /// Service startup timestamp for uptime tracking
    pub startup_time: DateTime<Utc>,
}

impl AppState {
    pub fn new(resolver: Arc<TrackResolver>) -> Self {
        Self {
            resolver,
            startup_time: Utc::now(),
        }
    }
}

/// Build application router
pub fn build_router(state: AppState) -> Router {
    use axum::routing::get;

    Router::new()
        .route("/", get(api::index))
        .merge(api::song_routes())
        .merge(api::health_routes())
        .layer(
            // One INFO line per request with method, URI, status and latency
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(CorsLayer::permissive())
        .with_state(state)
}
