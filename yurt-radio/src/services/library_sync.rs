//! Library synchronization
//!
//! Reconciles the catalog with the files directly inside the music root
//! (non-recursive). Each supported file is hashed and its metadata extracted,
//! then upserted by hash; rows whose hash was not seen in the pass are deleted
//! afterwards. A file that cannot be hashed or parsed is skipped with a warning.
//!
//! Passes are single-flight: `synchronize` waits for a running pass,
//! `try_synchronize` fails fast with `SyncInProgress`.

use crate::services::{ContentHasher, MetadataExtractor};
use serde::Serialize;
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use yurt_common::config::RadioConfig;
use yurt_common::db::UpsertOutcome;
use yurt_common::{Catalog, Error, Result};

/// Counts from one synchronization pass
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct SyncReport {
    /// Supported files examined
    pub scanned: usize,
    pub added: usize,
    /// Known tracks whose path or metadata changed
    pub updated: usize,
    pub removed: u64,
    /// Files skipped because hashing or extraction failed
    pub skipped: usize,
    /// Files whose content was already seen earlier in the same pass
    pub duplicates: usize,
}

pub struct LibrarySynchronizer {
    catalog: Catalog,
    config: Arc<RadioConfig>,
    hasher: ContentHasher,
    extractor: MetadataExtractor,
    running: Mutex<()>,
}

impl LibrarySynchronizer {
    pub fn new(catalog: Catalog, config: Arc<RadioConfig>) -> Self {
        let extractor = MetadataExtractor::with_embedded_tags(config.use_embedded_tags);
        Self {
            catalog,
            config,
            hasher: ContentHasher::new(),
            extractor,
            running: Mutex::new(()),
        }
    }

    /// Run a pass, waiting for any pass already in progress to finish first
    pub async fn synchronize(&self, music_root: &Path) -> Result<SyncReport> {
        let _guard = self.running.lock().await;
        self.run_pass(music_root).await
    }

    /// Run a pass unless one is already in progress
    pub async fn try_synchronize(&self, music_root: &Path) -> Result<SyncReport> {
        let _guard = self.running.try_lock().map_err(|_| Error::SyncInProgress)?;
        self.run_pass(music_root).await
    }

    async fn run_pass(&self, music_root: &Path) -> Result<SyncReport> {
        let is_dir = tokio::fs::metadata(music_root)
            .await
            .map(|m| m.is_dir())
            .unwrap_or(false);
        if !is_dir {
            return Err(Error::MusicRootMissing(music_root.to_path_buf()));
        }

        info!("Synchronizing library: {}", music_root.display());

        let candidates = self.list_candidates(music_root).await?;
        let mut report = SyncReport::default();
        let mut seen_hashes: HashSet<String> = HashSet::with_capacity(candidates.len());

        for (path, file_name) in candidates {
            report.scanned += 1;

            let hash = match self.hasher.hash(&path).await {
                Ok(hash) => hash,
                Err(e) => {
                    warn!(path = %path.display(), error = %e, "Skipping file: hashing failed");
                    report.skipped += 1;
                    continue;
                }
            };

            if seen_hashes.contains(&hash) {
                debug!(path = %path.display(), hash = %hash, "Skipping duplicate content");
                report.duplicates += 1;
                continue;
            }

            let meta = match self.extractor.extract_async(&path).await {
                Ok(meta) => meta,
                Err(e) => {
                    warn!(
                        path = %path.display(),
                        error = %e,
                        "Skipping file: metadata extraction failed"
                    );
                    report.skipped += 1;
                    // Content is still present; keep any row already catalogued for it
                    seen_hashes.insert(hash);
                    continue;
                }
            };

            match self.catalog.upsert_by_hash(&hash, &file_name, &meta).await? {
                UpsertOutcome::Inserted(id) => {
                    debug!(track_id = id, path = %file_name, "Added track");
                    report.added += 1;
                }
                UpsertOutcome::Updated(id) => {
                    debug!(track_id = id, path = %file_name, "Updated track");
                    report.updated += 1;
                }
                UpsertOutcome::Unchanged(_) => {}
            }

            seen_hashes.insert(hash);
        }

        report.removed = self.catalog.delete_where_hash_not_in(&seen_hashes).await?;

        info!(
            scanned = report.scanned,
            added = report.added,
            updated = report.updated,
            removed = report.removed,
            skipped = report.skipped,
            duplicates = report.duplicates,
            "Synchronization complete"
        );
        Ok(report)
    }

    /// Supported regular files directly inside the root, sorted by name
    async fn list_candidates(&self, music_root: &Path) -> Result<Vec<(PathBuf, String)>> {
        let mut entries = tokio::fs::read_dir(music_root).await?;
        let mut candidates = Vec::new();

        while let Some(entry) = entries.next_entry().await? {
            let path = entry.path();

            let Some(file_name) = entry.file_name().to_str().map(str::to_string) else {
                warn!(path = %path.display(), "Skipping file with non UTF-8 name");
                continue;
            };
            if file_name.starts_with('.') {
                continue;
            }

            let is_file = tokio::fs::metadata(&path)
                .await
                .map(|m| m.is_file())
                .unwrap_or(false);
            if !is_file || !self.config.is_supported(&path) {
                continue;
            }

            candidates.push((path, file_name));
        }

        // Stable order keeps the first of several identical files as the canonical path
        candidates.sort_by(|a, b| a.1.cmp(&b.1));
        Ok(candidates)
    }
}
