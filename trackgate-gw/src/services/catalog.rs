//! External music catalog seam
//!
//! The resolver only talks to the catalog through [`CatalogClient`], so the
//! Yandex Music client can be swapped for a fake in tests.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::models::DEFAULT_RELEASE_YEAR;

/// Catalog client errors
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Catalog client configuration error: {0}")]
    Config(String),

    #[error("Network error: {0}")]
    NetworkError(String),

    #[error("API error {0}: {1}")]
    ApiError(u16, String),

    #[error("Parse error: {0}")]
    ParseError(String),

    #[error("No {codec} variant at {bitrate_kbps} kbps for track {track_id}")]
    NoMatchingVariant {
        track_id: String,
        codec: String,
        bitrate_kbps: u32,
    },

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Requested audio encoding
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AudioFormat {
    pub codec: &'static str,
    pub bitrate_kbps: u32,
}

/// Format every download is fetched in
pub const DOWNLOAD_FORMAT: AudioFormat = AudioFormat {
    codec: "mp3",
    bitrate_kbps: 192,
};

/// Track metadata as reported by the catalog
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogTrack {
    pub title: String,
    #[serde(default)]
    pub artists: Vec<CatalogArtist>,
    #[serde(default)]
    pub albums: Vec<CatalogAlbum>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogArtist {
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct CatalogAlbum {
    #[serde(default)]
    pub year: Option<i64>,
}

impl CatalogTrack {
    pub fn artist_names(&self) -> Vec<&str> {
        self.artists.iter().map(|a| a.name.as_str()).collect()
    }

    pub fn joined_artists(&self) -> String {
        self.artist_names().join(", ")
    }

    /// Year of the first album, falling back to [`DEFAULT_RELEASE_YEAR`]
    pub fn release_year(&self) -> i64 {
        self.albums
            .first()
            .and_then(|album| album.year)
            .unwrap_or(DEFAULT_RELEASE_YEAR)
    }
}

/// Track lookup and audio download
#[async_trait]
pub trait CatalogClient: Send + Sync {
    /// Fetch track metadata; `Ok(None)` when the catalog has no such track
    async fn fetch_track(&self, track_id: &str) -> Result<Option<CatalogTrack>, CatalogError>;

    /// Download the track's audio into `dest`
    async fn download(
        &self,
        track_id: &str,
        format: AudioFormat,
        dest: &Path,
    ) -> Result<(), CatalogError>;
}
