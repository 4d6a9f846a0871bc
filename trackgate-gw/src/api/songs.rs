//! Song endpoints
//!
//! `GET /songs/:track_id` returns track metadata with the audio as base64.

use axum::{
    extract::{Path, State},
    routing::get,
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::error::ApiResult;
use crate::models::ResolvedTrack;
use crate::AppState;

/// Song response body
#[derive(Debug, Serialize, Deserialize)]
pub struct SongResponse {
    pub title: String,
    pub artists: String,
    pub year: i64,
    /// Base64-encoded MP3 audio
    pub mp3: String,
}

impl From<ResolvedTrack> for SongResponse {
    fn from(track: ResolvedTrack) -> Self {
        Self {
            mp3: STANDARD.encode(&track.audio),
            title: track.title,
            artists: track.artists,
            year: track.year,
        }
    }
}

/// GET /songs/:track_id
pub async fn get_song(
    State(state): State<AppState>,
    Path(track_id): Path<String>,
) -> ApiResult<Json<SongResponse>> {
    info!(track_id = %track_id, "Track requested");

    let resolved = state.resolver.resolve(&track_id).await?;
    Ok(Json(SongResponse::from(resolved)))
}

/// Build song routes
pub fn song_routes() -> Router<AppState> {
    Router::new().route("/songs/:track_id", get(get_song))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_encodes_audio() {
        let response = SongResponse::from(ResolvedTrack {
            title: "T".to_string(),
            artists: "A, B".to_string(),
            year: 2022,
            audio: b"hello".to_vec(),
        });

        assert_eq!(response.mp3, "aGVsbG8=");
        assert_eq!(response.artists, "A, B");
    }

    #[test]
    fn test_response_json_shape() {
        let response = SongResponse::from(ResolvedTrack {
            title: "T".to_string(),
            artists: "A".to_string(),
            year: 1987,
            audio: Vec::new(),
        });

        let value = serde_json::to_value(&response).unwrap();
        assert_eq!(value["title"], "T");
        assert_eq!(value["year"], 1987);
        assert_eq!(value["mp3"], "");
        assert_eq!(value.as_object().unwrap().len(), 4);
    }
}
