//! CLI layer - Command-line interface
//!
//! Contains argument parsing, output formatting, interactive control
//! input, and one runner per subcommand.

pub mod app;
pub mod args;
pub mod config_cmd;
pub mod library_cmd;
pub mod play_cmd;
pub mod presenter;
pub mod record_cmd;
pub mod signals;

// Re-export commonly used types
pub use app::{run, EXIT_ERROR, EXIT_SUCCESS, EXIT_USAGE_ERROR};
pub use args::{Cli, Commands, ConfigAction};
pub use presenter::Presenter;
