//! Audio container formats known to the radio
//!
//! Maps file extensions to a format and each format to the fixed MIME string
//! used when streaming.

use std::path::Path;

/// MIME type sent for extensions outside the format table
pub const DEFAULT_AUDIO_MIME: &str = "audio/mpeg";

/// Audio container formats the radio can catalog and stream
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AudioFormat {
    Mp3,
    Flac,
    Ogg,
    M4a,
    Wav,
}

impl AudioFormat {
    /// All known formats, in default configuration order
    pub const ALL: [AudioFormat; 5] = [
        AudioFormat::Mp3,
        AudioFormat::Flac,
        AudioFormat::Ogg,
        AudioFormat::M4a,
        AudioFormat::Wav,
    ];

    /// Parse an extension (with or without leading dot, any case)
    pub fn from_extension(ext: &str) -> Option<Self> {
        let ext = ext.trim_start_matches('.').to_ascii_lowercase();
        match ext.as_str() {
            "mp3" => Some(AudioFormat::Mp3),
            "flac" => Some(AudioFormat::Flac),
            "ogg" => Some(AudioFormat::Ogg),
            "m4a" => Some(AudioFormat::M4a),
            "wav" => Some(AudioFormat::Wav),
            _ => None,
        }
    }

    /// Determine format from a file path's extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(Self::from_extension)
    }

    /// Canonical extension including the leading dot
    pub fn extension(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => ".mp3",
            AudioFormat::Flac => ".flac",
            AudioFormat::Ogg => ".ogg",
            AudioFormat::M4a => ".m4a",
            AudioFormat::Wav => ".wav",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            AudioFormat::Mp3 => "audio/mpeg",
            AudioFormat::Flac => "audio/flac",
            AudioFormat::Ogg => "audio/ogg",
            AudioFormat::M4a => "audio/mp4",
            AudioFormat::Wav => "audio/wav",
        }
    }
}

/// MIME type for streaming a file, derived purely from its extension
pub fn mime_for_path(path: &Path) -> &'static str {
    AudioFormat::from_path(path)
        .map(AudioFormat::mime_type)
        .unwrap_or(DEFAULT_AUDIO_MIME)
}

/// Normalise an extension to lowercase with a leading dot
pub fn normalize_extension(ext: &str) -> String {
    let trimmed = ext.trim().trim_start_matches('.').to_ascii_lowercase();
    format!(".{}", trimmed)
}
