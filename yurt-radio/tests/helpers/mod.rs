//! Shared test helpers: temporary music roots, catalogs and app state

#![allow(dead_code)]

pub mod audio_generator;

use std::path::PathBuf;
use tempfile::TempDir;
use yurt_common::config::RadioConfig;
use yurt_common::db::init_database;
use yurt_common::Catalog;
use yurt_radio::AppState;

/// Temporary music root, static directory and catalog database
pub struct TestEnv {
    pub temp_dir: TempDir,
    pub music_root: PathBuf,
    pub state: AppState,
}

impl TestEnv {
    pub async fn new() -> Self {
        Self::with_max_recent(10).await
    }

    pub async fn with_max_recent(max_recent_tracks: usize) -> Self {
        let temp_dir = TempDir::new().expect("Should create temp dir");
        let music_root = temp_dir.path().join("music");
        let static_dir = temp_dir.path().join("static");
        std::fs::create_dir_all(&music_root).unwrap();
        std::fs::create_dir_all(&static_dir).unwrap();
        std::fs::write(static_dir.join("index.html"), "<html><body>Yurt Radio</body></html>").unwrap();

        let config = RadioConfig {
            music_directory: music_root.clone(),
            database_path: temp_dir.path().join("data/yurt_radio.db"),
            static_directory: static_dir,
            max_recent_tracks,
            ..RadioConfig::default()
        };

        let pool = init_database(&config.database_path)
            .await
            .expect("Should create test database");
        let state = AppState::new(Catalog::new(pool), config);

        Self {
            temp_dir,
            music_root,
            state,
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.state.catalog
    }

    /// Populate the music root with `count` distinct WAV files
    pub fn add_tracks(&self, count: usize) -> Vec<PathBuf> {
        audio_generator::generate_library(&self.music_root, count).expect("Should generate WAV fixtures")
    }
}
