//! Command dispatch and shared wiring

use std::process::ExitCode;

use crate::application::ports::ConfigStore;
use crate::application::RecordingsStore;
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::infrastructure::{FileKeyValueStore, XdgConfigStore};

use super::args::{Cli, Commands};
use super::config_cmd::handle_config_command;
use super::library_cmd::{run_delete, run_export, run_list};
use super::play_cmd::run_play;
use super::presenter::Presenter;
use super::record_cmd::run_record;

/// Exit codes
pub const EXIT_SUCCESS: u8 = 0;
pub const EXIT_ERROR: u8 = 1;
pub const EXIT_USAGE_ERROR: u8 = 2;

/// Run the parsed command line
pub async fn run(cli: Cli) -> ExitCode {
    let mut presenter = Presenter::new();
    let config_store = match &cli.config {
        Some(path) => XdgConfigStore::with_path(path),
        None => XdgConfigStore::new(),
    };

    let cli_config = cli.to_config();
    match cli.command {
        Commands::Config { action } => {
            if let Err(e) = handle_config_command(action, &config_store, &presenter).await {
                presenter.error(&e.to_string());
                return ExitCode::from(EXIT_ERROR);
            }
            ExitCode::from(EXIT_SUCCESS)
        }
        Commands::Record { .. } => {
            let config = load_merged_config(&config_store, cli_config).await;
            let max_duration = match parse_max_duration(&config) {
                Ok(d) => d,
                Err(message) => {
                    presenter.error(&message);
                    return ExitCode::from(EXIT_USAGE_ERROR);
                }
            };
            run_record(&config, max_duration, &mut presenter).await
        }
        Commands::List => {
            let config = load_merged_config(&config_store, cli_config).await;
            run_list(&config, &presenter).await
        }
        Commands::Play { name } => {
            let config = load_merged_config(&config_store, cli_config).await;
            run_play(&config, &name, &presenter).await
        }
        Commands::Delete { name, yes } => {
            let config = load_merged_config(&config_store, cli_config).await;
            run_delete(&config, &name, yes, &presenter).await
        }
        Commands::Export { name, dir } => {
            let config = load_merged_config(&config_store, cli_config).await;
            run_export(&config, &name, dir.as_deref(), &presenter).await
        }
    }
}

/// Load and merge configuration: defaults < file < CLI
pub async fn load_merged_config<S: ConfigStore>(store: &S, cli_config: AppConfig) -> AppConfig {
    let file_config = store.load_or_empty().await;
    let config = AppConfig::defaults().merge(file_config).merge(cli_config);
    tracing::debug!(?config, "effective configuration");
    config
}

/// The persisted recordings list for `config`
pub fn open_recordings(config: &AppConfig) -> RecordingsStore<FileKeyValueStore> {
    RecordingsStore::new(FileKeyValueStore::new(config.storage_dir_or_default()))
}

/// Strict parse of `max_duration`; a bad value is a usage error here
fn parse_max_duration(config: &AppConfig) -> Result<Duration, String> {
    match config.max_duration.as_deref() {
        Some(s) => s
            .parse::<Duration>()
            .map_err(|e| format!("Invalid max-duration: {}", e)),
        None => Ok(Duration::default_max_duration()),
    }
}
