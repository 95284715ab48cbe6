//! Common error types for Yurt Radio

use std::path::PathBuf;
use thiserror::Error;

/// Common result type for Yurt Radio operations
pub type Result<T> = std::result::Result<T, Error>;

/// Error taxonomy shared by the catalog, the services and the HTTP layer
#[derive(Error, Debug)]
pub enum Error {
    /// Database operation error (wraps sqlx::Error)
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// I/O operation error (wraps std::io::Error)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Configuration loading or validation error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Invalid user input or request parameter
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// File extension outside the supported set
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// Track selection attempted against an empty catalog
    #[error("No tracks available")]
    NoTracksAvailable,

    /// Statistics requested on an empty catalog
    #[error("Catalog is empty")]
    EmptyCatalog,

    /// Lookup by id failed
    #[error("Track not found: {0}")]
    TrackNotFound(i64),

    /// A second row with an existing content hash reached the storage layer
    #[error("Duplicate content hash: {0}")]
    DuplicateHash(String),

    /// Synchronization requested against a music root that does not exist
    #[error("Music root not found: {0}")]
    MusicRootMissing(PathBuf),

    /// A synchronization pass is already running
    #[error("Synchronization already in progress")]
    SyncInProgress,

    /// Internal error
    #[error("Internal error: {0}")]
    Internal(String),
}

impl Error {
    /// True for the "nothing there" family of failures that map to not-found responses
    pub fn is_not_found(&self) -> bool {
        matches!(
            self,
            Error::NoTracksAvailable | Error::EmptyCatalog | Error::TrackNotFound(_)
        )
    }
}
