//! Command-line interface
//!
//! Flags double as environment variables through clap's `env` attribute and
//! take priority over the TOML file.

use clap::{Args as ClapArgs, Parser, Subcommand};
use std::path::PathBuf;
use yurt_common::config::{default_config_path, load_toml_config, ConfigOverrides, RadioConfig};

/// Command-line arguments for yurt-radio
#[derive(Parser, Debug)]
#[command(name = "yurt-radio")]
#[command(about = "Personal web radio server")]
#[command(version)]
pub struct Args {
    /// Path to the TOML configuration file
    #[arg(short, long, global = true, env = "YURT_CONFIG")]
    pub config: Option<PathBuf>,

    /// Directory containing music files
    #[arg(short, long = "music-dir", global = true, env = "MUSIC_DIR")]
    pub music_dir: Option<PathBuf>,

    /// SQLite catalog file
    #[arg(short, long, global = true, env = "DB_PATH")]
    pub database: Option<PathBuf>,

    /// Address to bind
    #[arg(long, global = true, env = "YURT_HOST")]
    pub host: Option<String>,

    /// Port to listen on
    #[arg(short, long, global = true, env = "YURT_PORT")]
    pub port: Option<u16>,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Run the HTTP server (default)
    Serve(ServeArgs),
    /// Run one synchronization pass and exit
    Scan,
}

#[derive(ClapArgs, Debug, Clone, Default, PartialEq, Eq)]
pub struct ServeArgs {
    /// Synchronize the library before serving
    #[arg(long, conflicts_with = "no_rescan")]
    pub rescan: bool,

    /// Skip the startup synchronization
    #[arg(long)]
    pub no_rescan: bool,
}

impl ServeArgs {
    fn rescan_override(&self) -> Option<bool> {
        match (self.rescan, self.no_rescan) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

impl Args {
    /// Subcommand to run, `serve` when none was given
    pub fn effective_command(&self) -> Command {
        self.command
            .clone()
            .unwrap_or_else(|| Command::Serve(ServeArgs::default()))
    }

    pub fn overrides(&self) -> ConfigOverrides {
        let rescan_on_startup = match &self.command {
            Some(Command::Serve(serve)) => serve.rescan_override(),
            _ => None,
        };

        ConfigOverrides {
            music_directory: self.music_dir.clone(),
            database_path: self.database.clone(),
            host: self.host.clone(),
            port: self.port,
            rescan_on_startup,
        }
    }

    /// Load the TOML file (explicit or default location) and apply the overrides
    pub fn resolve_config(&self) -> yurt_common::Result<RadioConfig> {
        let toml = match self.config.clone().or_else(default_config_path) {
            Some(path) => load_toml_config(&path)?,
            None => Default::default(),
        };
        RadioConfig::resolve(toml, self.overrides())
    }
}
