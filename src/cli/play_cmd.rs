//! `play` command: play one recording with an Enter pause/resume toggle

use std::process::ExitCode;

use crate::application::{PlayOutcome, PlaybackController};
use crate::domain::config::AppConfig;
use crate::infrastructure::RodioPlayer;

use super::app::{open_recordings, EXIT_ERROR, EXIT_SUCCESS};
use super::presenter::Presenter;
use super::signals::{ControlEvent, ControlEvents};

/// Play `name` until it ends or Ctrl+C
pub async fn run_play(config: &AppConfig, name: &str, presenter: &Presenter) -> ExitCode {
    let controller = PlaybackController::new(RodioPlayer::new(), open_recordings(config));
    let mut current = controller.subscribe();
    let mut events = ControlEvents::listen();

    if let Err(e) = controller.play(name).await {
        presenter.error(&e.to_string());
        return ExitCode::from(EXIT_ERROR);
    }
    presenter.info(&format!(
        "Playing {}  (Enter to pause/resume, Ctrl+C to stop)",
        name
    ));

    loop {
        tokio::select! {
            changed = current.changed() => {
                if changed.is_err() || controller.loaded().is_none() {
                    presenter.success("Finished");
                    return ExitCode::from(EXIT_SUCCESS);
                }
            }
            event = events.recv() => match event {
                Some(ControlEvent::Enter) => match controller.play(name).await {
                    Ok(PlayOutcome::Paused) => presenter.info("Paused"),
                    Ok(PlayOutcome::Resumed) | Ok(PlayOutcome::Started) => presenter.info("Playing"),
                    Err(e) => {
                        presenter.error(&e.to_string());
                        return ExitCode::from(EXIT_ERROR);
                    }
                },
                Some(ControlEvent::Interrupt) | None => {
                    if let Err(e) = controller.stop().await {
                        presenter.error(&e.to_string());
                        return ExitCode::from(EXIT_ERROR);
                    }
                    presenter.info("Stopped");
                    return ExitCode::from(EXIT_SUCCESS);
                }
            },
        }
    }
}
