//! Library synchronization integration tests
//!
//! Real WAV files in a temporary music root, file-backed catalog.

mod helpers;

use helpers::audio_generator::generate_test_wav;
use helpers::TestEnv;
use std::collections::HashSet;
use yurt_common::{Error, Track};

async fn all_tracks(env: &TestEnv) -> Vec<Track> {
    env.catalog().list_page(1, 500).await.unwrap().tracks
}

#[tokio::test]
async fn test_first_pass_adds_every_supported_file() {
    let env = TestEnv::new().await;
    env.add_tracks(3);
    std::fs::write(env.music_root.join("cover.jpg"), b"not audio").unwrap();

    let report = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    assert_eq!(report.scanned, 3);
    assert_eq!(report.added, 3);
    assert_eq!(report.removed, 0);
    assert_eq!(report.skipped, 0);

    let tracks = all_tracks(&env).await;
    assert_eq!(tracks.len(), 3);
    assert_eq!(tracks[0].file_path, "track_000.wav");
    assert_eq!(tracks[0].title, "track_000");
    assert_eq!(tracks[0].author, "Unknown");
    assert_eq!(tracks[0].duration_seconds, 1);
    assert_eq!(tracks[0].play_count, 0);
    assert!(tracks[0].last_played.is_none());
}

#[tokio::test]
async fn test_second_pass_is_idempotent() {
    let env = TestEnv::new().await;
    env.add_tracks(4);

    env.state.synchronizer.synchronize(&env.music_root).await.unwrap();
    let played_id = env.state.selector.next_track().await.unwrap().id;
    let before = all_tracks(&env).await;

    let report = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();
    let after = all_tracks(&env).await;

    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 0);
    assert_eq!(report.removed, 0);
    assert_eq!(before, after);
    assert_eq!(after.iter().find(|t| t.id == played_id).map(|t| t.play_count), Some(1));
}

#[tokio::test]
async fn test_removed_file_is_reconciled() {
    let env = TestEnv::new().await;
    let files = env.add_tracks(3);
    env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    std::fs::remove_file(&files[1]).unwrap();
    let report = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    assert_eq!(report.removed, 1);
    let paths: Vec<String> = all_tracks(&env).await.into_iter().map(|t| t.file_path).collect();
    assert_eq!(paths, vec!["track_000.wav", "track_002.wav"]);

    // Same content returning gets a fresh row
    generate_test_wav(&files[1], 1, 240.0).unwrap();
    let report = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();
    assert_eq!(report.added, 1);
    assert_eq!(env.catalog().count().await.unwrap(), 3);
}

#[tokio::test]
async fn test_rename_keeps_identity_and_play_stats() {
    let env = TestEnv::with_max_recent(0).await;
    let files = env.add_tracks(1);
    env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    let played = env.state.selector.next_track().await.unwrap();

    let renamed = env.music_root.join("renamed.wav");
    std::fs::rename(&files[0], &renamed).unwrap();
    let report = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    assert_eq!(report.added, 0);
    assert_eq!(report.updated, 1);
    assert_eq!(report.removed, 0);

    let track = env.catalog().get_by_id(played.id).await.unwrap().unwrap();
    assert_eq!(track.file_path, "renamed.wav");
    assert_eq!(track.title, "renamed");
    assert_eq!(track.content_hash, played.content_hash);
    assert_eq!(track.play_count, 1);
}

#[tokio::test]
async fn test_unreadable_file_is_skipped_not_fatal() {
    let env = TestEnv::new().await;
    env.add_tracks(2);
    std::fs::write(env.music_root.join("broken.wav"), b"RIFF but not really").unwrap();

    let report = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    assert_eq!(report.scanned, 3);
    assert_eq!(report.added, 2);
    assert_eq!(report.skipped, 1);
}

#[tokio::test]
async fn test_unparseable_known_content_keeps_its_row() {
    let env = TestEnv::with_max_recent(0).await;
    let files = env.add_tracks(1);
    env.state.synchronizer.synchronize(&env.music_root).await.unwrap();
    let played = env.state.selector.next_track().await.unwrap();

    // Same bytes, but the MPEG reader cannot parse a RIFF body
    std::fs::rename(&files[0], env.music_root.join("track_000.mp3")).unwrap();
    let report = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    assert_eq!(report.scanned, 1);
    assert_eq!(report.skipped, 1);
    assert_eq!(report.removed, 0);

    let track = env.catalog().get_by_id(played.id).await.unwrap().unwrap();
    assert_eq!(track.content_hash, played.content_hash);
    assert_eq!(track.play_count, 1);
}

#[tokio::test]
async fn test_identical_copies_share_one_row() {
    let env = TestEnv::new().await;
    let files = env.add_tracks(1);
    std::fs::copy(&files[0], env.music_root.join("zz_copy.wav")).unwrap();

    let first = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();
    let second = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    assert_eq!(first.added, 1);
    assert_eq!(first.duplicates, 1);
    assert_eq!(second.updated, 0);

    let tracks = all_tracks(&env).await;
    assert_eq!(tracks.len(), 1);
    assert_eq!(tracks[0].file_path, "track_000.wav");
}

#[tokio::test]
async fn test_subdirectories_not_scanned() {
    let env = TestEnv::new().await;
    let nested = env.music_root.join("album");
    std::fs::create_dir(&nested).unwrap();
    generate_test_wav(&nested.join("deep.wav"), 1, 500.0).unwrap();

    let report = env.state.synchronizer.synchronize(&env.music_root).await.unwrap();
    assert_eq!(report.scanned, 0);
    assert_eq!(env.catalog().count().await.unwrap(), 0);
}

#[tokio::test]
async fn test_missing_root_leaves_catalog_alone() {
    let env = TestEnv::new().await;
    env.add_tracks(2);
    env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    let missing = env.temp_dir.path().join("nowhere");
    let result = env.state.synchronizer.synchronize(&missing).await;

    assert!(matches!(result, Err(Error::MusicRootMissing(_))));
    assert_eq!(env.catalog().count().await.unwrap(), 2);
}

#[tokio::test]
async fn test_hashes_unique_after_passes() {
    let env = TestEnv::new().await;
    env.add_tracks(6);
    env.state.synchronizer.synchronize(&env.music_root).await.unwrap();
    env.state.synchronizer.synchronize(&env.music_root).await.unwrap();

    let tracks = all_tracks(&env).await;
    let hashes: HashSet<&str> = tracks.iter().map(|t| t.content_hash.as_str()).collect();
    assert_eq!(hashes.len(), tracks.len());
}

#[tokio::test]
async fn test_concurrent_passes_are_serialized() {
    let env = TestEnv::new().await;
    env.add_tracks(5);

    let sync = env.state.synchronizer.clone();
    let root = env.music_root.clone();
    let (a, b) = tokio::join!(sync.synchronize(&root), sync.synchronize(&root));

    let (a, b) = (a.unwrap(), b.unwrap());
    assert_eq!(a.added + b.added, 5);
    assert_eq!(env.catalog().count().await.unwrap(), 5);
}
