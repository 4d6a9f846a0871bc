//! Database access for trackgate-gw
//!
//! SQLite store of track metadata, keyed by catalog track identifier.

pub mod tracks;

pub use tracks::{SqliteTrackStore, TrackStore};

use sqlx::SqlitePool;
use trackgate_common::Result;

/// Initialize database connection pool
///
/// Accepts any sqlx SQLite URL, e.g. `sqlite://music_db.db?mode=rwc`.
pub async fn init_database_pool(db_url: &str) -> Result<SqlitePool> {
    tracing::debug!("Connecting to database: {}", db_url);

    let pool = SqlitePool::connect(db_url).await?;
    init_tables(&pool).await?;

    Ok(pool)
}

/// Create the tracks table if it doesn't exist
pub async fn init_tables(pool: &SqlitePool) -> Result<()> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS tracks (
            track_id TEXT PRIMARY KEY,
            title TEXT NOT NULL,
            artists TEXT NOT NULL,
            year INTEGER NOT NULL,
            file_path TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT CURRENT_TIMESTAMP
        )
        "#,
    )
    .execute(pool)
    .await?;

    tracing::info!("Database tables initialized (tracks)");

    Ok(())
}
