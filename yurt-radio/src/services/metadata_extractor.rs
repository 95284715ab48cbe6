//! Audio metadata extraction service
//!
//! Reads the container with lofty, forcing the parser from the file extension,
//! and derives catalog metadata:
//! - Title (filename stem, or embedded title when enabled)
//! - Author ("Unknown", or embedded artist when enabled)
//! - Duration, truncated to whole seconds
//! - On-disk file size

use lofty::file::FileType;
use lofty::prelude::*;
use lofty::probe::Probe;
use std::fs::File;
use std::io::BufReader;
use std::path::{Path, PathBuf};
use yurt_common::db::UNKNOWN_AUTHOR;
use yurt_common::{AudioFormat, Error, Result, TrackMetadata};

/// Metadata extractor service
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor {
    use_embedded_tags: bool,
}

impl MetadataExtractor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Extractor that prefers non-empty embedded title/artist tags
    pub fn with_embedded_tags(use_embedded_tags: bool) -> Self {
        Self { use_embedded_tags }
    }

    /// Extract catalog metadata from an audio file (blocking)
    pub fn extract(&self, file_path: &Path) -> Result<TrackMetadata> {
        let format = AudioFormat::from_path(file_path).ok_or_else(|| {
            Error::UnsupportedFormat(file_path.display().to_string())
        })?;

        let file_size_bytes = i64::try_from(std::fs::metadata(file_path)?.len())
            .map_err(|_| Error::Internal(format!("File too large: {}", file_path.display())))?;

        let reader = BufReader::new(File::open(file_path)?);
        let tagged_file = Probe::with_file_type(reader, container_for(format))
            .read()
            .map_err(|e| unreadable(file_path, e))?;

        let duration = tagged_file.properties().duration().as_secs();
        let duration_seconds = i64::try_from(duration).unwrap_or(i64::MAX);

        let mut title = title_from_filename(file_path);
        let mut author = UNKNOWN_AUTHOR.to_string();

        if self.use_embedded_tags {
            if let Some(tag) = tagged_file.primary_tag().or_else(|| tagged_file.first_tag()) {
                if let Some(embedded) = non_empty(tag.title().as_deref()) {
                    title = embedded;
                }
                if let Some(embedded) = non_empty(tag.artist().as_deref()) {
                    author = embedded;
                }
            }
        }

        tracing::debug!(
            file = %file_path.display(),
            title = %title,
            author = %author,
            duration_s = duration_seconds,
            "Extracted metadata"
        );

        Ok(TrackMetadata {
            title,
            author,
            duration_seconds,
            file_size_bytes,
        })
    }

    /// Extract on the blocking thread pool
    pub async fn extract_async(&self, file_path: &Path) -> Result<TrackMetadata> {
        let path_buf: PathBuf = file_path.to_path_buf();
        let extractor = *self;

        tokio::task::spawn_blocking(move || extractor.extract(&path_buf))
            .await
            .map_err(|e| Error::Internal(format!("Metadata extraction task failed: {}", e)))?
    }
}

fn container_for(format: AudioFormat) -> FileType {
    match format {
        AudioFormat::Mp3 => FileType::Mpeg,
        AudioFormat::Flac => FileType::Flac,
        AudioFormat::Ogg => FileType::Vorbis,
        AudioFormat::M4a => FileType::Mp4,
        AudioFormat::Wav => FileType::Wav,
    }
}

/// Filename without its extension
pub fn title_from_filename(file_path: &Path) -> String {
    file_path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn non_empty(value: Option<&str>) -> Option<String> {
    value
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
}

fn unreadable(file_path: &Path, err: lofty::error::LoftyError) -> Error {
    Error::Io(std::io::Error::new(
        std::io::ErrorKind::InvalidData,
        format!("Failed to parse {}: {}", file_path.display(), err),
    ))
}
