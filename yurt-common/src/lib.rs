//! # Yurt Radio Common Library
//!
//! Shared code for the Yurt Radio server:
//! - Catalog storage (SQLite schema, track model, queries)
//! - Error taxonomy
//! - Configuration loading
//! - Audio format table and MIME mapping
//! - Pagination math and duration formatting

pub mod config;
pub mod db;
pub mod error;
pub mod formats;
pub mod human_time;
pub mod pagination;

pub use db::{Catalog, Track, TrackMetadata};
pub use error::{Error, Result};
pub use formats::AudioFormat;
