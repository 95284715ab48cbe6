//! HTTP API handlers

pub mod health;
pub mod library;
pub mod stats;
pub mod stream;
pub mod tracks;

pub use health::{api_index, health_check, health_routes};
pub use library::rescan;
pub use stats::get_stats;
pub use stream::stream_track;
pub use tracks::{clear_recent, get_track, list_tracks, random_track};
