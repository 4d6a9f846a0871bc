//! Track records and resolution results

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::services::catalog::CatalogTrack;

/// Release year used when the catalog reports no album year
pub const DEFAULT_RELEASE_YEAR: i64 = 2022;

/// Persisted track metadata, one row per track identifier
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackRecord {
    /// Catalog track identifier (unique key)
    pub track_id: String,
    /// Track display name
    pub title: String,
    /// Artist names joined with ", "
    pub artists: String,
    /// Release year of the first album, or [`DEFAULT_RELEASE_YEAR`]
    pub year: i64,
    /// Location of the downloaded audio
    pub file_path: String,
}

impl TrackRecord {
    /// Build the record for a freshly downloaded catalog track
    pub fn from_catalog(track_id: &str, track: &CatalogTrack, file_path: &Path) -> Self {
        Self {
            track_id: track_id.to_string(),
            title: track.title.clone(),
            artists: track.joined_artists(),
            year: track.release_year(),
            file_path: file_path.to_string_lossy().into_owned(),
        }
    }
}

/// Result of resolving a track: metadata plus the raw audio
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedTrack {
    pub title: String,
    pub artists: String,
    pub year: i64,
    pub audio: Vec<u8>,
}

impl ResolvedTrack {
    pub fn new(record: TrackRecord, audio: Vec<u8>) -> Self {
        Self {
            title: record.title,
            artists: record.artists,
            year: record.year,
            audio,
        }
    }
}
