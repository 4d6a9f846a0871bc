//! Cache-aside track resolution
//!
//! Store hit: serve the stored metadata and blob. Store miss: fetch from the
//! catalog, download the audio, then insert the record. The record is only
//! written after the blob is in place, so a crash in between leaves an
//! orphan file and no record; the next request simply downloads again.

use std::path::Path;
use std::sync::Arc;
use thiserror::Error;
use tracing::{debug, info};

use crate::db::TrackStore;
use crate::models::{ResolvedTrack, TrackRecord};
use crate::services::blob_store::{BlobError, BlobStore};
use crate::services::catalog::{CatalogClient, CatalogError, DOWNLOAD_FORMAT};

#[derive(Debug, Error)]
pub enum ResolveError {
    /// The catalog has no track with this identifier
    #[error("Track not found: {0}")]
    NotFound(String),

    #[error("Catalog error: {0}")]
    Catalog(#[from] CatalogError),

    #[error("Blob storage error: {0}")]
    Blob(#[from] BlobError),

    #[error("Store error: {0}")]
    Store(#[from] trackgate_common::Error),
}

pub struct TrackResolver {
    store: Arc<dyn TrackStore>,
    catalog: Arc<dyn CatalogClient>,
    blobs: BlobStore,
}

impl TrackResolver {
    pub fn new(store: Arc<dyn TrackStore>, catalog: Arc<dyn CatalogClient>, blobs: BlobStore) -> Self {
        Self {
            store,
            catalog,
            blobs,
        }
    }

    pub fn blobs(&self) -> &BlobStore {
        &self.blobs
    }

    /// Resolve a track identifier to metadata plus audio bytes
    pub async fn resolve(&self, track_id: &str) -> Result<ResolvedTrack, ResolveError> {
        let record = match self.store.find(track_id).await? {
            Some(record) => {
                info!(track_id = %track_id, "Track found in store");
                record
            }
            None => {
                info!(track_id = %track_id, "Track not in store, fetching from catalog");
                self.fetch_and_store(track_id).await?
            }
        };

        let audio = self.blobs.read(Path::new(&record.file_path)).await?;
        debug!(track_id = %track_id, bytes = audio.len(), "Audio loaded");

        Ok(ResolvedTrack::new(record, audio))
    }

    async fn fetch_and_store(&self, track_id: &str) -> Result<TrackRecord, ResolveError> {
        let file_path = self.blobs.path_for(track_id)?;

        let track = self
            .catalog
            .fetch_track(track_id)
            .await?
            .ok_or_else(|| ResolveError::NotFound(track_id.to_string()))?;

        let staged = self.blobs.stage().await?;
        self.catalog
            .download(track_id, DOWNLOAD_FORMAT, staged.path())
            .await?;
        self.blobs.commit(staged, &file_path).await?;
        info!(
            track_id = %track_id,
            path = %file_path.display(),
            "Track downloaded"
        );

        let record = TrackRecord::from_catalog(track_id, &track, &file_path);
        let stored = self.store.insert(&record).await?;
        info!(track_id = %track_id, "Track metadata stored");

        Ok(stored)
    }
}
