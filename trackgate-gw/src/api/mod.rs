//! HTTP API handlers for trackgate-gw

pub mod health;
pub mod songs;

pub use health::health_routes;
pub use songs::song_routes;

/// GET /
///
/// Liveness placeholder.
pub async fn index() -> &'static str {
    "Hello, World!"
}
