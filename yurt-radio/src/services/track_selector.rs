//! Next-track selection with a bounded anti-repeat window
//!
//! The recency window lock is held across select, play accounting and window
//! update, so concurrent callers are fully serialized and never observe a
//! half-applied append/evict.

use std::collections::VecDeque;
use tokio::sync::Mutex;
use tracing::{debug, info, warn};
use yurt_common::config::MAX_RECENT_TRACKS;
use yurt_common::{Catalog, Error, Result, Track};

pub struct TrackSelector {
    catalog: Catalog,
    max_recent: usize,
    recent_ids: Mutex<VecDeque<i64>>,
}

impl TrackSelector {
    /// `max_recent == 0` disables the recency window; values above
    /// [`MAX_RECENT_TRACKS`] are clamped to it
    pub fn new(catalog: Catalog, max_recent: usize) -> Self {
        let max_recent = max_recent.min(MAX_RECENT_TRACKS);
        Self {
            catalog,
            max_recent,
            recent_ids: Mutex::new(VecDeque::with_capacity(max_recent + 1)),
        }
    }

    pub fn max_recent(&self) -> usize {
        self.max_recent
    }

    /// Pick a random track not served recently, count the play and remember it
    pub async fn next_track(&self) -> Result<Track> {
        let mut recent = self.recent_ids.lock().await;

        let exclude: Vec<i64> = recent.iter().copied().collect();
        let candidate = self
            .catalog
            .get_random_excluding(&exclude)
            .await?
            .ok_or(Error::NoTracksAvailable)?;

        let track = match self.record_play(candidate).await? {
            Some(track) => track,
            // A rescan removed the row after it was picked; draw once more
            None => {
                let retry = self
                    .catalog
                    .get_random_excluding(&exclude)
                    .await?
                    .ok_or(Error::NoTracksAvailable)?;
                self.record_play(retry).await?.ok_or(Error::NoTracksAvailable)?
            }
        };

        if self.max_recent > 0 {
            // An id repeated by the full-catalog fallback moves to the newest slot
            recent.retain(|&id| id != track.id);
            recent.push_back(track.id);
            if recent.len() > self.max_recent {
                recent.pop_front();
            }
        }

        debug!(
            track_id = track.id,
            play_count = track.play_count,
            window = recent.len(),
            "Selected track"
        );
        Ok(track)
    }

    /// Count a play for `track`; `None` when its row no longer exists
    async fn record_play(&self, track: Track) -> Result<Option<Track>> {
        match self.catalog.increment_play(track.id).await {
            Ok(()) => {}
            Err(Error::TrackNotFound(id)) => {
                warn!(track_id = id, "Selected track was removed before its play was counted");
                return Ok(None);
            }
            Err(e) => return Err(e),
        }

        // Reflect the committed increment in the returned row
        Ok(Some(self.catalog.get_by_id(track.id).await?.unwrap_or(track)))
    }

    /// Forget every recently served id
    pub async fn clear(&self) {
        let mut recent = self.recent_ids.lock().await;
        let cleared = recent.len();
        recent.clear();
        info!(cleared, "Cleared recency window");
    }

    /// Snapshot of the window, oldest first
    pub async fn recent_ids(&self) -> Vec<i64> {
        self.recent_ids.lock().await.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;
    use yurt_common::db::init_in_memory;
    use yurt_common::TrackMetadata;

    async fn seeded(count: usize) -> (Catalog, Vec<i64>) {
        let catalog = Catalog::new(init_in_memory().await.unwrap());
        let mut ids = Vec::new();
        for i in 0..count {
            let meta = TrackMetadata {
                title: format!("t{}", i),
                author: "Unknown".to_string(),
                duration_seconds: 10,
                file_size_bytes: 100,
            };
            let id = catalog
                .upsert_by_hash(&format!("h{}", i), &format!("t{}.mp3", i), &meta)
                .await
                .unwrap()
                .id();
            ids.push(id);
        }
        (catalog, ids)
    }

    #[tokio::test]
    async fn test_empty_catalog() {
        let (catalog, _) = seeded(0).await;
        let selector = TrackSelector::new(catalog, 10);

        assert!(matches!(selector.next_track().await, Err(Error::NoTracksAvailable)));
        assert!(selector.recent_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_window_evicts_oldest() {
        let (catalog, _) = seeded(5).await;
        let selector = TrackSelector::new(catalog, 2);

        let mut served = Vec::new();
        for _ in 0..4 {
            served.push(selector.next_track().await.unwrap().id);
        }

        assert_eq!(selector.recent_ids().await, served[2..].to_vec());
    }

    #[tokio::test]
    async fn test_zero_window_keeps_nothing() {
        let (catalog, _) = seeded(3).await;
        let selector = TrackSelector::new(catalog, 0);

        for _ in 0..5 {
            selector.next_track().await.unwrap();
        }
        assert!(selector.recent_ids().await.is_empty());
    }

    #[tokio::test]
    async fn test_returned_track_reflects_play() {
        let (catalog, ids) = seeded(1).await;
        let selector = TrackSelector::new(catalog, 10);

        let track = selector.next_track().await.unwrap();
        assert_eq!(track.id, ids[0]);
        assert_eq!(track.play_count, 1);
        assert!(track.last_played.is_some());
    }

    #[tokio::test]
    async fn test_window_never_repeats_an_id() {
        let (catalog, ids) = seeded(2).await;
        let selector = TrackSelector::new(catalog, 10);

        for _ in 0..20 {
            selector.next_track().await.unwrap();
            let window = selector.recent_ids().await;
            let distinct: HashSet<i64> = window.iter().copied().collect();
            assert!(window.len() <= ids.len());
            assert_eq!(distinct.len(), window.len(), "repeat inside {:?}", window);
        }
    }

    #[tokio::test]
    async fn test_oversized_window_is_clamped() {
        let (catalog, _) = seeded(1).await;
        let selector = TrackSelector::new(catalog, usize::MAX);

        assert_eq!(selector.max_recent(), MAX_RECENT_TRACKS);
        assert_eq!(selector.next_track().await.unwrap().play_count, 1);
    }

    #[tokio::test]
    async fn test_record_play_on_removed_row() {
        let (catalog, ids) = seeded(1).await;
        let selector = TrackSelector::new(catalog.clone(), 10);
        let track = catalog.get_by_id(ids[0]).await.unwrap().unwrap();

        catalog.delete_where_hash_not_in(&HashSet::new()).await.unwrap();

        assert!(selector.record_play(track).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_record_play_counts() {
        let (catalog, ids) = seeded(1).await;
        let selector = TrackSelector::new(catalog.clone(), 10);
        let track = catalog.get_by_id(ids[0]).await.unwrap().unwrap();

        let played = selector.record_play(track).await.unwrap().unwrap();
        assert_eq!(played.play_count, 1);
    }

    #[tokio::test]
    async fn test_clear() {
        let (catalog, _) = seeded(3).await;
        let selector = TrackSelector::new(catalog, 10);
        selector.next_track().await.unwrap();

        selector.clear().await;
        assert!(selector.recent_ids().await.is_empty());
    }
}
