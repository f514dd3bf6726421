//! `record` command: one capture from start to saved entry

use std::process::ExitCode;

use crate::application::{RecordingSession, SessionConfig, StartOutcome};
use crate::domain::config::AppConfig;
use crate::domain::recording::Duration;
use crate::infrastructure::CpalCapture;

use super::app::{open_recordings, EXIT_ERROR, EXIT_SUCCESS};
use super::presenter::Presenter;
use super::signals::{ControlEvent, ControlEvents};

/// Why the capture ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StopReason {
    Requested,
    MaxDuration,
}

/// Record until Enter, Ctrl+C or `max_duration`, then save the entry
pub async fn run_record(
    config: &AppConfig,
    max_duration: Duration,
    presenter: &mut Presenter,
) -> ExitCode {
    let session = RecordingSession::new(
        CpalCapture::new(config.recordings_dir_or_default()),
        open_recordings(config),
        SessionConfig {
            poll_interval: config.poll_interval_or_default(),
        },
    );
    let mut events = ControlEvents::listen();

    match session.start().await {
        Ok(StartOutcome::Started) => {}
        Ok(StartOutcome::AlreadyRecording) => {
            presenter.warn("A recording is already in progress");
            return ExitCode::from(EXIT_ERROR);
        }
        Err(e) => {
            presenter.error(&e.to_string());
            return ExitCode::from(EXIT_ERROR);
        }
    }

    let max_ms = max_duration.as_millis();
    presenter.show_recording(max_ms);

    let mut duration_rx = session.subscribe_duration();
    let deadline = tokio::time::sleep(max_duration.as_std());
    tokio::pin!(deadline);

    let reason = loop {
        tokio::select! {
            changed = duration_rx.changed() => {
                if changed.is_err() {
                    break StopReason::Requested;
                }
                let elapsed = *duration_rx.borrow_and_update();
                presenter.update_recording(elapsed, max_ms);
            }
            event = events.recv() => match event {
                Some(ControlEvent::Enter) | Some(ControlEvent::Interrupt) | None => {
                    break StopReason::Requested;
                }
            },
            _ = &mut deadline => break StopReason::MaxDuration,
        }
    };

    if reason == StopReason::MaxDuration {
        presenter.info(&format!("Maximum duration of {} reached", max_duration));
    }
    presenter.update_spinner("Saving recording...");

    match session.stop().await {
        Ok(Some(entry)) => {
            presenter.spinner_success(&format!("Saved {}", entry.name));
            presenter.output(&entry.name);
            ExitCode::from(EXIT_SUCCESS)
        }
        Ok(None) => {
            presenter.spinner_fail("Nothing was recording");
            ExitCode::from(EXIT_ERROR)
        }
        Err(e) => {
            presenter.spinner_fail(&e.to_string());
            ExitCode::from(EXIT_ERROR)
        }
    }
}
