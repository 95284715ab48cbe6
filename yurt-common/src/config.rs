//! Configuration loading and resolution
//!
//! Priority order:
//! 1. Command-line argument / environment variable (resolved by the binary's clap layer)
//! 2. TOML config file
//! 3. Compiled defaults
//!
//! A missing TOML file is not fatal: a warning is logged and defaults apply.

use crate::formats::{normalize_extension, AudioFormat};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{info, warn};

/// Default number of recently served tracks excluded from selection
pub const DEFAULT_MAX_RECENT_TRACKS: usize = 10;
/// Upper bound for `max_recent_tracks`; the window is sent as bound SQL parameters
pub const MAX_RECENT_TRACKS: usize = 1000;

/// TOML configuration file contents
///
/// Every field is optional; absent fields fall back to compiled defaults.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct TomlConfig {
    /// Directory holding the audio files
    pub music_directory: Option<PathBuf>,
    /// SQLite catalog file
    pub database_path: Option<PathBuf>,
    /// Extensions eligible for cataloging (e.g. ".mp3")
    pub supported_formats: Option<Vec<String>>,
    /// Size of the anti-repeat window
    pub max_recent_tracks: Option<usize>,
    pub host: Option<String>,
    pub port: Option<u16>,
    /// Directory with static content pages
    pub static_directory: Option<PathBuf>,
    /// Run a synchronization pass before serving
    pub rescan_on_startup: Option<bool>,
    /// Prefer embedded title/artist tags over filename defaults
    pub use_embedded_tags: Option<bool>,
    /// Default page size for the track listing
    pub page_size: Option<i64>,
    pub logging: LoggingConfig,
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level (trace, debug, info, warn, error)
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Values supplied on the command line or through the environment
#[derive(Debug, Clone, Default)]
pub struct ConfigOverrides {
    pub music_directory: Option<PathBuf>,
    pub database_path: Option<PathBuf>,
    pub host: Option<String>,
    pub port: Option<u16>,
    pub rescan_on_startup: Option<bool>,
}

/// Fully resolved configuration consumed by the server and the services
#[derive(Debug, Clone)]
pub struct RadioConfig {
    pub music_directory: PathBuf,
    pub database_path: PathBuf,
    /// Normalised extensions, lowercase with leading dot
    pub supported_formats: Vec<String>,
    pub max_recent_tracks: usize,
    pub host: String,
    pub port: u16,
    pub static_directory: PathBuf,
    pub rescan_on_startup: bool,
    pub use_embedded_tags: bool,
    pub page_size: i64,
    pub log_level: String,
}

impl Default for RadioConfig {
    fn default() -> Self {
        Self {
            music_directory: PathBuf::from("./music"),
            database_path: PathBuf::from("./data/yurt_radio.db"),
            supported_formats: AudioFormat::ALL
                .iter()
                .map(|f| f.extension().to_string())
                .collect(),
            max_recent_tracks: DEFAULT_MAX_RECENT_TRACKS,
            host: "127.0.0.1".to_string(),
            port: 5000,
            static_directory: PathBuf::from("./static"),
            rescan_on_startup: true,
            use_embedded_tags: false,
            page_size: DEFAULT_PAGE_SIZE,
            log_level: "info".to_string(),
        }
    }
}

impl RadioConfig {
    /// Merge TOML values and overrides over compiled defaults, then validate
    pub fn resolve(toml: TomlConfig, overrides: ConfigOverrides) -> Result<Self> {
        let defaults = RadioConfig::default();

        let supported_formats = match toml.supported_formats {
            Some(formats) => normalize_formats(&formats)?,
            None => defaults.supported_formats,
        };

        let config = RadioConfig {
            music_directory: overrides
                .music_directory
                .or(toml.music_directory)
                .unwrap_or(defaults.music_directory),
            database_path: overrides
                .database_path
                .or(toml.database_path)
                .unwrap_or(defaults.database_path),
            supported_formats,
            max_recent_tracks: toml.max_recent_tracks.unwrap_or(defaults.max_recent_tracks),
            host: overrides.host.or(toml.host).unwrap_or(defaults.host),
            port: overrides.port.or(toml.port).unwrap_or(defaults.port),
            static_directory: toml.static_directory.unwrap_or(defaults.static_directory),
            rescan_on_startup: overrides
                .rescan_on_startup
                .or(toml.rescan_on_startup)
                .unwrap_or(defaults.rescan_on_startup),
            use_embedded_tags: toml.use_embedded_tags.unwrap_or(defaults.use_embedded_tags),
            page_size: toml.page_size.unwrap_or(defaults.page_size),
            log_level: toml.logging.level,
        };

        config.validate()?;
        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        if self.port == 0 {
            return Err(Error::Config("port must be non-zero".to_string()));
        }
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(Error::Config(format!(
                "page_size must be between 1 and {}",
                MAX_PAGE_SIZE
            )));
        }
        if self.max_recent_tracks > MAX_RECENT_TRACKS {
            return Err(Error::Config(format!(
                "max_recent_tracks must be at most {}",
                MAX_RECENT_TRACKS
            )));
        }
        Ok(())
    }

    /// Whether a file's extension is both configured and known to the format table
    pub fn is_supported(&self, path: &Path) -> bool {
        let Some(ext) = path.extension().and_then(|e| e.to_str()) else {
            return false;
        };
        let ext = normalize_extension(ext);
        AudioFormat::from_extension(&ext).is_some() && self.supported_formats.contains(&ext)
    }

    /// Socket address string the HTTP server binds to
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

fn normalize_formats(formats: &[String]) -> Result<Vec<String>> {
    let mut normalized: Vec<String> = Vec::with_capacity(formats.len());
    for format in formats {
        let ext = normalize_extension(format);
        if AudioFormat::from_extension(&ext).is_none() {
            warn!("Ignoring unknown audio format in configuration: {}", format);
            continue;
        }
        if !normalized.contains(&ext) {
            normalized.push(ext);
        }
    }

    if normalized.is_empty() {
        return Err(Error::Config(
            "supported_formats must name at least one known audio format".to_string(),
        ));
    }
    Ok(normalized)
}

/// Default location of the TOML config file (`<config_dir>/yurt-radio/config.toml`)
pub fn default_config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("yurt-radio").join("config.toml"))
}

/// Load the TOML config file, falling back to defaults when it does not exist
pub fn load_toml_config(path: &Path) -> Result<TomlConfig> {
    if !path.exists() {
        warn!(
            "Config file not found at {}, using built-in defaults",
            path.display()
        );
        return Ok(TomlConfig::default());
    }

    let content = std::fs::read_to_string(path)
        .map_err(|e| Error::Config(format!("Read {} failed: {}", path.display(), e)))?;
    let config: TomlConfig = toml::from_str(&content)
        .map_err(|e| Error::Config(format!("Parse {} failed: {}", path.display(), e)))?;

    info!("Loaded configuration from {}", path.display());
    Ok(config)
}
