//! Track metadata persistence
//!
//! Rows are written once and never updated. `track_id` is the primary key,
//! so when two requests race to insert the same track the first row wins
//! and both callers get that row back.

use async_trait::async_trait;
use sqlx::{Row, SqlitePool};
use trackgate_common::{Error, Result};

use crate::models::TrackRecord;

/// Metadata store seam used by the resolver
#[async_trait]
pub trait TrackStore: Send + Sync {
    /// Look up a track by catalog identifier
    async fn find(&self, track_id: &str) -> Result<Option<TrackRecord>>;

    /// Insert a new track, returning the row actually stored
    async fn insert(&self, record: &TrackRecord) -> Result<TrackRecord>;
}

/// SQLite-backed [`TrackStore`]
#[derive(Debug, Clone)]
pub struct SqliteTrackStore {
    pool: SqlitePool,
}

impl SqliteTrackStore {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait]
impl TrackStore for SqliteTrackStore {
    async fn find(&self, track_id: &str) -> Result<Option<TrackRecord>> {
        load_track(&self.pool, track_id).await
    }

    async fn insert(&self, record: &TrackRecord) -> Result<TrackRecord> {
        insert_track(&self.pool, record).await
    }
}

/// Load track by catalog identifier
pub async fn load_track(pool: &SqlitePool, track_id: &str) -> Result<Option<TrackRecord>> {
    let row = sqlx::query(
        r#"
        SELECT track_id, title, artists, year, file_path
        FROM tracks
        WHERE track_id = ?
        "#,
    )
    .bind(track_id)
    .fetch_optional(pool)
    .await?;

    Ok(row.map(|row| TrackRecord {
        track_id: row.get("track_id"),
        title: row.get("title"),
        artists: row.get("artists"),
        year: row.get("year"),
        file_path: row.get("file_path"),
    }))
}

/// Insert track; an existing row with the same identifier is kept as is
pub async fn insert_track(pool: &SqlitePool, record: &TrackRecord) -> Result<TrackRecord> {
    let result = sqlx::query(
        r#"
        INSERT INTO tracks (track_id, title, artists, year, file_path, created_at)
        VALUES (?, ?, ?, ?, ?, CURRENT_TIMESTAMP)
        ON CONFLICT(track_id) DO NOTHING
        "#,
    )
    .bind(&record.track_id)
    .bind(&record.title)
    .bind(&record.artists)
    .bind(record.year)
    .bind(&record.file_path)
    .execute(pool)
    .await?;

    if result.rows_affected() == 0 {
        tracing::warn!(
            track_id = %record.track_id,
            "Track already stored by a concurrent request, keeping existing row"
        );
    }

    load_track(pool, &record.track_id)
        .await?
        .ok_or_else(|| Error::Internal(format!("Track {} vanished after insert", record.track_id)))
}

/// Count stored tracks
pub async fn count_tracks(pool: &SqlitePool) -> Result<i64> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
        .fetch_one(pool)
        .await?;
    Ok(count)
}
