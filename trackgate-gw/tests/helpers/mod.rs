//! Shared fixtures for trackgate-gw integration tests
#![allow(dead_code)]

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use serde_json::Value;
use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use std::collections::HashMap;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use tempfile::TempDir;
use tower::ServiceExt;

use trackgate_gw::db::{self, SqliteTrackStore};
use trackgate_gw::services::catalog::{AudioFormat, CatalogAlbum, CatalogArtist};
use trackgate_gw::services::{BlobStore, CatalogClient, CatalogError, CatalogTrack, TrackResolver};
use trackgate_gw::{build_router, AppState};

/// Catalog track with the given artists and first-album year
pub fn catalog_track(title: &str, artists: &[&str], year: Option<i64>) -> CatalogTrack {
    CatalogTrack {
        title: title.to_string(),
        artists: artists
            .iter()
            .map(|name| CatalogArtist {
                name: name.to_string(),
            })
            .collect(),
        albums: vec![CatalogAlbum { year }],
    }
}

/// In-memory catalog that counts its calls
#[derive(Default)]
pub struct FakeCatalog {
    tracks: HashMap<String, (CatalogTrack, Vec<u8>)>,
    fetches: AtomicUsize,
    downloads: AtomicUsize,
}

impl FakeCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_track(mut self, track_id: &str, track: CatalogTrack, audio: &[u8]) -> Self {
        self.tracks
            .insert(track_id.to_string(), (track, audio.to_vec()));
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }

    pub fn download_count(&self) -> usize {
        self.downloads.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CatalogClient for FakeCatalog {
    async fn fetch_track(&self, track_id: &str) -> Result<Option<CatalogTrack>, CatalogError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        Ok(self.tracks.get(track_id).map(|(track, _)| track.clone()))
    }

    async fn download(
        &self,
        track_id: &str,
        format: AudioFormat,
        dest: &Path,
    ) -> Result<(), CatalogError> {
        self.downloads.fetch_add(1, Ordering::SeqCst);
        let (_, audio) = self
            .tracks
            .get(track_id)
            .ok_or_else(|| CatalogError::NoMatchingVariant {
                track_id: track_id.to_string(),
                codec: format.codec.to_string(),
                bitrate_kbps: format.bitrate_kbps,
            })?;
        tokio::fs::write(dest, audio).await?;
        Ok(())
    }
}

/// Catalog whose every call fails upstream
pub struct FailingCatalog;

#[async_trait]
impl CatalogClient for FailingCatalog {
    async fn fetch_track(&self, _track_id: &str) -> Result<Option<CatalogTrack>, CatalogError> {
        Err(CatalogError::ApiError(503, "upstream unavailable".to_string()))
    }

    async fn download(
        &self,
        _track_id: &str,
        _format: AudioFormat,
        _dest: &Path,
    ) -> Result<(), CatalogError> {
        Err(CatalogError::ApiError(503, "upstream unavailable".to_string()))
    }
}

/// Resolver wired to an in-memory store and a temporary downloads dir
pub struct TestEnv {
    pub pool: SqlitePool,
    pub resolver: Arc<TrackResolver>,
    pub downloads: TempDir,
}

impl TestEnv {
    pub async fn new(catalog: Arc<dyn CatalogClient>) -> Self {
        // One connection so every query sees the same in-memory database
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .connect("sqlite::memory:")
            .await
            .unwrap();
        db::init_tables(&pool).await.unwrap();

        let downloads = TempDir::new().unwrap();
        let resolver = TrackResolver::new(
            Arc::new(SqliteTrackStore::new(pool.clone())),
            catalog,
            BlobStore::new(downloads.path().join("downloads")),
        );

        Self {
            pool,
            resolver: Arc::new(resolver),
            downloads,
        }
    }

    pub fn app(&self) -> Router {
        build_router(AppState::new(self.resolver.clone()))
    }

    pub async fn track_count(&self) -> i64 {
        db::tracks::count_tracks(&self.pool).await.unwrap()
    }
}

/// Send a GET through the router
pub async fn get(app: Router, uri: &str) -> Response<Body> {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

pub async fn body_bytes(response: Response<Body>) -> Vec<u8> {
    axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap()
        .to_vec()
}

pub async fn body_json(response: Response<Body>) -> Value {
    serde_json::from_slice(&body_bytes(response).await).unwrap()
}
