//! Content fingerprinting for catalog identity
//!
//! Calculates the SHA-256 hash of file content, streamed in fixed-size chunks
//! so memory use does not grow with file size. Identical bytes always hash the
//! same regardless of path, name or filesystem metadata.

use sha2::{Digest, Sha256};
use std::fs::File;
use std::io::Read;
use std::path::{Path, PathBuf};
use yurt_common::{Error, Result};

/// Read buffer size for hashing
pub const HASH_CHUNK_SIZE: usize = 8 * 1024;

/// Content hasher
#[derive(Debug, Clone, Copy, Default)]
pub struct ContentHasher;

impl ContentHasher {
    pub fn new() -> Self {
        Self
    }

    /// Hex-encoded SHA-256 of the file content (blocking)
    pub fn hash_file(&self, file_path: &Path) -> Result<String> {
        let mut file = File::open(file_path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to open {} for hashing: {}", file_path.display(), e),
            ))
        })?;

        let mut hasher = Sha256::new();
        let mut buffer = [0u8; HASH_CHUNK_SIZE];

        loop {
            let bytes_read = file.read(&mut buffer).map_err(|e| {
                Error::Io(std::io::Error::new(
                    e.kind(),
                    format!("Failed to read {} for hashing: {}", file_path.display(), e),
                ))
            })?;

            if bytes_read == 0 {
                break;
            }

            hasher.update(&buffer[..bytes_read]);
        }

        Ok(format!("{:x}", hasher.finalize()))
    }

    /// Hash on the blocking thread pool
    pub async fn hash(&self, file_path: &Path) -> Result<String> {
        let path_buf: PathBuf = file_path.to_path_buf();
        let hasher = *self;

        let hash = tokio::task::spawn_blocking(move || hasher.hash_file(&path_buf))
            .await
            .map_err(|e| Error::Internal(format!("Hash calculation task failed: {}", e)))??;

        tracing::debug!(path = %file_path.display(), hash = %hash, "Calculated hash");
        Ok(hash)
    }
}
