//! CLI argument definitions using Clap

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::domain::config::AppConfig;

/// Voice Memos - record, list, play and export voice memos
#[derive(Parser, Debug)]
#[command(name = "voice-memos")]
#[command(version)]
#[command(about = "Record, list, play and export voice memos")]
#[command(long_about = None)]
pub struct Cli {
    /// Directory recorded audio files are written to
    #[arg(long, global = true, value_name = "DIR", env = "VOICE_MEMOS_RECORDINGS_DIR")]
    pub recordings_dir: Option<String>,

    /// Directory holding the recordings list
    #[arg(long, global = true, value_name = "DIR", env = "VOICE_MEMOS_STORAGE_DIR")]
    pub storage_dir: Option<String>,

    /// Show desktop notifications
    #[arg(short = 'n', long, global = true)]
    pub notify: bool,

    /// Use this config file instead of the XDG location
    #[arg(long, global = true, value_name = "FILE", env = "VOICE_MEMOS_CONFIG")]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Commands,
}

impl Cli {
    /// Config values given on the command line
    pub fn to_config(&self) -> AppConfig {
        let max_duration = match &self.command {
            Commands::Record { max_duration } => max_duration.clone(),
            _ => None,
        };

        AppConfig {
            recordings_dir: self.recordings_dir.clone(),
            storage_dir: self.storage_dir.clone(),
            max_duration,
            notify: self.notify.then_some(true),
            ..Default::default()
        }
    }
}

/// Subcommands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Record a new memo (Enter or Ctrl+C stops)
    Record {
        /// Stop automatically after this long (e.g., 30s, 5m, 1h)
        #[arg(short = 'm', long, value_name = "TIME")]
        max_duration: Option<String>,
    },
    /// List stored recordings, oldest first
    List,
    /// Play a recording (Enter pauses/resumes, Ctrl+C stops)
    Play {
        /// Recording name, as shown by `list`
        name: String,
    },
    /// Remove a recording from the list
    Delete {
        /// Recording name, as shown by `list`
        name: String,
        /// Do not ask for confirmation
        #[arg(short = 'y', long)]
        yes: bool,
    },
    /// Save a copy of a recording
    Export {
        /// Recording name, as shown by `list`
        name: String,
        /// Target directory (defaults to the configured export_dir)
        #[arg(short = 'd', long, value_name = "DIR")]
        dir: Option<PathBuf>,
    },
    /// Manage configuration
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Config action subcommands
#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Create config file with defaults
    Init,
    /// Set a config value
    Set {
        /// Config key
        key: String,
        /// Config value
        value: String,
    },
    /// Get a config value
    Get {
        /// Config key
        key: String,
    },
    /// List all config values
    List,
    /// Show config file path
    Path,
}

/// Valid config keys
pub const VALID_CONFIG_KEYS: &[&str] = &[
    "recordings_dir",
    "storage_dir",
    "export_dir",
    "poll_interval",
    "max_duration",
    "notify",
];

/// Check if a config key is valid
pub fn is_valid_config_key(key: &str) -> bool {
    VALID_CONFIG_KEYS.contains(&key)
}
