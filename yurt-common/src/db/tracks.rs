//! Track catalog operations
//!
//! Every multi-statement operation runs in its own transaction. An early
//! return drops the transaction uncommitted, which rolls it back.

use crate::db::models::{CatalogStats, Track, TrackMetadata, TrackPage, UpsertOutcome};
use crate::pagination::calculate_pagination;
use crate::{Error, Result};
use chrono::Utc;
use rand::Rng;
use sqlx::{QueryBuilder, Sqlite, SqliteConnection, SqlitePool};
use std::collections::HashSet;
use tracing::{debug, error};

const TRACK_COLUMNS: &str = "id, file_path, content_hash, title, author, duration_seconds, \
                             file_size_bytes, play_count, last_played";

/// Persisted collection of known tracks
#[derive(Clone)]
pub struct Catalog {
    pool: SqlitePool,
}

impl Catalog {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    /// Insert a row for an unseen hash, or rewrite path/metadata of the known row.
    ///
    /// Play statistics are never touched. A row whose path and metadata already
    /// match is left unwritten, which keeps repeated synchronization passes free
    /// of catalog changes.
    pub async fn upsert_by_hash(
        &self,
        hash: &str,
        file_path: &str,
        meta: &TrackMetadata,
    ) -> Result<UpsertOutcome> {
        let mut tx = self.pool.begin().await?;

        let existing: Option<(i64, String, String, String, i64, i64)> = sqlx::query_as(
            r#"
            SELECT id, file_path, title, author, duration_seconds, file_size_bytes
            FROM tracks
            WHERE content_hash = ?
            "#,
        )
        .bind(hash)
        .fetch_optional(&mut *tx)
        .await?;

        let outcome = match existing {
            None => {
                let result = sqlx::query(
                    r#"
                    INSERT INTO tracks (file_path, content_hash, title, author, duration_seconds, file_size_bytes)
                    VALUES (?, ?, ?, ?, ?, ?)
                    "#,
                )
                .bind(file_path)
                .bind(hash)
                .bind(&meta.title)
                .bind(&meta.author)
                .bind(meta.duration_seconds)
                .bind(meta.file_size_bytes)
                .execute(&mut *tx)
                .await
                .map_err(|e| map_unique_violation(e, hash))?;

                UpsertOutcome::Inserted(result.last_insert_rowid())
            }
            Some((id, path, title, author, duration, size))
                if path == file_path
                    && title == meta.title
                    && author == meta.author
                    && duration == meta.duration_seconds
                    && size == meta.file_size_bytes =>
            {
                UpsertOutcome::Unchanged(id)
            }
            Some((id, ..)) => {
                sqlx::query(
                    r#"
                    UPDATE tracks
                    SET file_path = ?, title = ?, author = ?, duration_seconds = ?, file_size_bytes = ?
                    WHERE id = ?
                    "#,
                )
                .bind(file_path)
                .bind(&meta.title)
                .bind(&meta.author)
                .bind(meta.duration_seconds)
                .bind(meta.file_size_bytes)
                .bind(id)
                .execute(&mut *tx)
                .await?;

                UpsertOutcome::Updated(id)
            }
        };

        tx.commit().await?;

        debug!(hash = %hash, path = %file_path, outcome = ?outcome, "Upserted track");
        Ok(outcome)
    }

    /// Remove every row whose hash is absent from `seen_hashes`; returns rows removed
    pub async fn delete_where_hash_not_in(&self, seen_hashes: &HashSet<String>) -> Result<u64> {
        let mut tx = self.pool.begin().await?;

        let known: Vec<String> = sqlx::query_scalar("SELECT content_hash FROM tracks")
            .fetch_all(&mut *tx)
            .await?;

        let mut removed = 0u64;
        for hash in known.iter().filter(|h| !seen_hashes.contains(*h)) {
            let result = sqlx::query("DELETE FROM tracks WHERE content_hash = ?")
                .bind(hash)
                .execute(&mut *tx)
                .await?;
            removed += result.rows_affected();
            debug!(hash = %hash, "Removed track no longer on disk");
        }

        tx.commit().await?;
        Ok(removed)
    }

    pub async fn get_by_id(&self, id: i64) -> Result<Option<Track>> {
        let track = sqlx::query_as::<_, Track>(&format!(
            "SELECT {} FROM tracks WHERE id = ?",
            TRACK_COLUMNS
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(track)
    }

    /// Uniformly random track whose id is not in `exclude_ids`.
    ///
    /// When the exclusion covers every row, the pick is made over the whole
    /// catalog instead. `None` only when the catalog is empty.
    pub async fn get_random_excluding(&self, exclude_ids: &[i64]) -> Result<Option<Track>> {
        let mut tx = self.pool.begin().await?;

        let mut candidates = count_excluding(&mut tx, exclude_ids).await?;
        let mut exclusion = exclude_ids;
        if candidates == 0 && !exclude_ids.is_empty() {
            debug!(
                excluded = exclude_ids.len(),
                "Recency exclusion covers the catalog, selecting from all tracks"
            );
            exclusion = &[];
            candidates = count_excluding(&mut tx, exclusion).await?;
        }

        if candidates == 0 {
            tx.commit().await?;
            return Ok(None);
        }

        let offset = rand::thread_rng().gen_range(0..candidates);

        let mut query = QueryBuilder::<Sqlite>::new(format!("SELECT {} FROM tracks", TRACK_COLUMNS));
        push_exclusion(&mut query, exclusion);
        query.push(" ORDER BY id LIMIT 1 OFFSET ");
        query.push_bind(offset);

        let track = query
            .build_query_as::<Track>()
            .fetch_optional(&mut *tx)
            .await?;

        tx.commit().await?;
        Ok(track)
    }

    /// One page of tracks ordered by id (1-indexed pages)
    pub async fn list_page(&self, page: i64, page_size: i64) -> Result<TrackPage> {
        let mut tx = self.pool.begin().await?;

        let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
            .fetch_one(&mut *tx)
            .await?;

        let pagination = calculate_pagination(total, page, page_size)?;

        let tracks = if pagination.is_past_end() {
            Vec::new()
        } else {
            sqlx::query_as::<_, Track>(&format!(
                "SELECT {} FROM tracks ORDER BY id LIMIT ? OFFSET ?",
                TRACK_COLUMNS
            ))
            .bind(pagination.page_size)
            .bind(pagination.offset)
            .fetch_all(&mut *tx)
            .await?
        };

        tx.commit().await?;

        Ok(TrackPage {
            tracks,
            total,
            page: pagination.page,
            total_pages: pagination.total_pages,
        })
    }

    /// Atomically bump `play_count` and stamp `last_played` with the current time
    pub async fn increment_play(&self, id: i64) -> Result<()> {
        let result = sqlx::query(
            "UPDATE tracks SET play_count = play_count + 1, last_played = ? WHERE id = ?",
        )
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(Error::TrackNotFound(id));
        }
        Ok(())
    }

    pub async fn stats(&self) -> Result<CatalogStats> {
        let mut tx = self.pool.begin().await?;

        let (total_tracks, total_duration_seconds): (i64, i64) = sqlx::query_as(
            "SELECT COUNT(*), COALESCE(SUM(duration_seconds), 0) FROM tracks",
        )
        .fetch_one(&mut *tx)
        .await?;

        if total_tracks == 0 {
            return Err(Error::EmptyCatalog);
        }

        let most_played = sqlx::query_as::<_, Track>(&format!(
            "SELECT {} FROM tracks ORDER BY play_count DESC, id ASC LIMIT 1",
            TRACK_COLUMNS
        ))
        .fetch_optional(&mut *tx)
        .await?
        .ok_or(Error::EmptyCatalog)?;

        tx.commit().await?;

        Ok(CatalogStats {
            total_tracks,
            total_duration_seconds,
            most_played,
        })
    }

    pub async fn count(&self) -> Result<i64> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tracks")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }
}

async fn count_excluding(conn: &mut SqliteConnection, exclude_ids: &[i64]) -> Result<i64> {
    let mut query = QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM tracks");
    push_exclusion(&mut query, exclude_ids);

    let count = query
        .build_query_scalar::<i64>()
        .fetch_one(&mut *conn)
        .await?;
    Ok(count)
}

/// Append `WHERE id NOT IN (?, ?, ...)` with one bound parameter per id
fn push_exclusion(query: &mut QueryBuilder<'_, Sqlite>, exclude_ids: &[i64]) {
    if exclude_ids.is_empty() {
        return;
    }

    query.push(" WHERE id NOT IN (");
    let mut separated = query.separated(", ");
    for id in exclude_ids {
        separated.push_bind(*id);
    }
    separated.push_unseparated(")");
}

fn map_unique_violation(err: sqlx::Error, hash: &str) -> Error {
    if let sqlx::Error::Database(db_err) = &err {
        if db_err.is_unique_violation() {
            error!(hash = %hash, "Unique constraint violated on content hash insert");
            return Error::DuplicateHash(hash.to_string());
        }
    }
    Error::Database(err)
}
