//! Catalog data model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Author recorded when no tag supplies one
pub const UNKNOWN_AUTHOR: &str = "Unknown";

/// One catalog row per distinct audio content
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
pub struct Track {
    /// Assigned by the catalog on insert, never reused
    pub id: i64,
    /// Path relative to the music root
    pub file_path: String,
    /// Hex digest of the file content, unique across the catalog
    pub content_hash: String,
    pub title: String,
    pub author: String,
    pub duration_seconds: i64,
    pub file_size_bytes: i64,
    pub play_count: i64,
    pub last_played: Option<DateTime<Utc>>,
}

/// Descriptive metadata written by synchronization
///
/// Play statistics are deliberately absent: only track selection touches them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackMetadata {
    pub title: String,
    pub author: String,
    pub duration_seconds: i64,
    pub file_size_bytes: i64,
}

/// Result of an upsert keyed by content hash
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    /// New hash, new row
    Inserted(i64),
    /// Known hash, path or metadata rewritten in place
    Updated(i64),
    /// Known hash, nothing differed so nothing was written
    Unchanged(i64),
}

impl UpsertOutcome {
    pub fn id(self) -> i64 {
        match self {
            UpsertOutcome::Inserted(id) | UpsertOutcome::Updated(id) | UpsertOutcome::Unchanged(id) => id,
        }
    }
}

/// One page of the track listing
#[derive(Debug, Clone, Serialize)]
pub struct TrackPage {
    pub tracks: Vec<Track>,
    pub total: i64,
    pub page: i64,
    #[serde(rename = "pages")]
    pub total_pages: i64,
}

/// Collection-wide statistics
#[derive(Debug, Clone, Serialize)]
pub struct CatalogStats {
    pub total_tracks: i64,
    #[serde(rename = "total_duration")]
    pub total_duration_seconds: i64,
    /// Highest play count, lowest id on ties
    pub most_played: Track,
}
