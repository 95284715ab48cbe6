//! Core services: hashing, metadata extraction, synchronization and selection

pub mod content_hasher;
pub mod library_sync;
pub mod metadata_extractor;
pub mod track_selector;

pub use content_hasher::ContentHasher;
pub use library_sync::{LibrarySynchronizer, SyncReport};
pub use metadata_extractor::MetadataExtractor;
pub use track_selector::TrackSelector;
