//! CLI presenter for output formatting

use std::io::{self, Write};

use colored::*;
use indicatif::{ProgressBar, ProgressStyle};

use crate::domain::recording::{Duration, RecordingEntry};

/// Presenter for CLI output formatting
pub struct Presenter {
    spinner: Option<ProgressBar>,
}

impl Presenter {
    /// Create a new presenter
    pub fn new() -> Self {
        Self { spinner: None }
    }

    /// Start a spinner with message
    pub fn start_spinner(&mut self, message: &str) {
        let spinner = ProgressBar::new_spinner();
        let style = ProgressStyle::default_spinner()
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏")
            .template("{spinner:.cyan} {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner());
        spinner.set_style(style);
        spinner.set_message(message.to_string());
        spinner.enable_steady_tick(std::time::Duration::from_millis(80));
        self.spinner = Some(spinner);
    }

    /// Update spinner message
    pub fn update_spinner(&self, message: &str) {
        if let Some(ref spinner) = self.spinner {
            spinner.set_message(message.to_string());
        }
    }

    /// Mark spinner as success and finish
    pub fn spinner_success(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✓".green(), message));
        }
    }

    /// Mark spinner as failed and finish
    pub fn spinner_fail(&mut self, message: &str) {
        if let Some(spinner) = self.spinner.take() {
            spinner.finish_with_message(format!("{} {}", "✗".red(), message));
        }
    }

    /// Print a line above the spinner, or to stderr when there is none
    fn line(&self, text: String) {
        match &self.spinner {
            Some(spinner) => spinner.println(text),
            None => eprintln!("{}", text),
        }
    }

    /// Print info message to stderr
    pub fn info(&self, message: &str) {
        self.line(format!("{} {}", "ℹ".cyan(), message));
    }

    /// Print success message to stderr
    pub fn success(&self, message: &str) {
        self.line(format!("{} {}", "✓".green(), message));
    }

    /// Print warning message to stderr
    pub fn warn(&self, message: &str) {
        self.line(format!("{} {}", "⚠".yellow(), message));
    }

    /// Print error message to stderr
    pub fn error(&self, message: &str) {
        self.line(format!("{} {}", "✗".red(), message));
    }

    /// Output text to stdout
    pub fn output(&self, text: &str) {
        println!("{}", text);
    }

    /// Ask a question on stderr, leaving the cursor on the same line
    pub fn prompt(&self, question: &str) {
        eprint!("{} {} ", "?".yellow(), question);
        let _ = io::stderr().flush();
    }

    /// Print one stored recording
    pub fn entry(&self, entry: &RecordingEntry) {
        println!("{}  {}", entry.name, entry.uri.dimmed());
    }

    /// Format the elapsed recording time against the limit
    pub fn format_recording_clock(&self, elapsed_ms: u64, max_ms: u64) -> String {
        let elapsed = Duration::from_millis(elapsed_ms).format_clock();
        let max = Duration::from_millis(max_ms).format_clock();
        format!("{} / {}", elapsed.red().bold(), max)
    }

    /// Show the recording spinner
    pub fn show_recording(&mut self, max_ms: u64) {
        let clock = self.format_recording_clock(0, max_ms);
        self.start_spinner(&format!("Recording {}  (Enter to stop)", clock));
    }

    /// Update the recording spinner clock
    pub fn update_recording(&self, elapsed_ms: u64, max_ms: u64) {
        let clock = self.format_recording_clock(elapsed_ms, max_ms);
        self.update_spinner(&format!("Recording {}  (Enter to stop)", clock));
    }

    /// Print a key-value pair (for config list)
    pub fn key_value(&self, key: &str, value: &str) {
        println!("{}: {}", key.cyan(), value);
    }
}

impl Default for Presenter {
    fn default() -> Self {
        Self::new()
    }
}
