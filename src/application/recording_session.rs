//! Recording session use case
//!
//! Owns at most one capture at a time, publishes its elapsed duration from
//! a polling task, and appends a [`RecordingEntry`] to the persisted list
//! when the capture is stopped.

use std::sync::Arc;

use thiserror::Error;
use tokio::sync::{watch, Mutex};
use tokio::task::JoinHandle;
use tokio::time::{interval, MissedTickBehavior};

use crate::domain::recording::{epoch_millis_now, Duration, RecordingEntry};
use crate::domain::session::{InvalidStateTransition, SessionState, SessionStateMachine};

use super::ports::{AudioCapture, CaptureHandle, KeyValueStore, RecordingError, StorageError};
use super::recordings_store::RecordingsStore;

/// Errors from the recording session
#[derive(Debug, Error)]
pub enum SessionError {
    #[error("Permission to record audio was not granted")]
    PermissionDenied,

    #[error("Recording failed: {0}")]
    Capture(#[from] RecordingError),

    #[error("Failed to save recording: {0}")]
    Storage(#[from] StorageError),

    #[error(transparent)]
    InvalidState(#[from] InvalidStateTransition),
}

/// Result of a successful `start` call
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StartOutcome {
    /// A new capture began
    Started,
    /// A capture was already running; nothing changed
    AlreadyRecording,
}

/// Configuration for a recording session
#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// How often the elapsed duration is queried while recording
    pub poll_interval: Duration,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            poll_interval: Duration::default_poll_interval(),
        }
    }
}

/// Source of epoch milliseconds used to name finished recordings
pub type Clock = Arc<dyn Fn() -> u64 + Send + Sync>;

#[derive(Default)]
struct SessionInner {
    machine: SessionStateMachine,
    capture: Option<Arc<dyn CaptureHandle>>,
    poller: Option<JoinHandle<()>>,
    permission_granted: bool,
}

impl SessionInner {
    fn cancel_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
        }
    }

    /// Abort the poller and wait until it can no longer publish
    async fn join_poller(&mut self) {
        if let Some(poller) = self.poller.take() {
            poller.abort();
            if let Err(e) = poller.await {
                if !e.is_cancelled() {
                    tracing::warn!(error = %e, "duration poller ended abnormally");
                }
            }
        }
    }
}

/// One recording session.
///
/// Operations are serialized: each `start`/`stop` holds the session lock
/// until it has finished talking to the capture backend and the store.
pub struct RecordingSession<C: AudioCapture, S: KeyValueStore> {
    capture: C,
    store: RecordingsStore<S>,
    inner: Mutex<SessionInner>,
    duration_tx: Arc<watch::Sender<u64>>,
    config: SessionConfig,
    clock: Clock,
}

impl<C: AudioCapture, S: KeyValueStore> RecordingSession<C, S> {
    /// Create an idle session
    pub fn new(capture: C, store: RecordingsStore<S>, config: SessionConfig) -> Self {
        let (duration_tx, _) = watch::channel(0);
        Self {
            capture,
            store,
            inner: Mutex::new(SessionInner::default()),
            duration_tx: Arc::new(duration_tx),
            config,
            clock: Arc::new(epoch_millis_now),
        }
    }

    /// Replace the clock used for naming recordings
    pub fn with_clock(mut self, clock: Clock) -> Self {
        self.clock = clock;
        self
    }

    /// Get current session state
    pub async fn state(&self) -> SessionState {
        self.inner.lock().await.machine.state()
    }

    /// Check if a capture is active
    pub async fn is_recording(&self) -> bool {
        self.inner.lock().await.capture.is_some()
    }

    /// Last published elapsed duration in milliseconds
    pub fn duration_ms(&self) -> u64 {
        *self.duration_tx.borrow()
    }

    /// Subscribe to elapsed duration updates
    pub fn subscribe_duration(&self) -> watch::Receiver<u64> {
        self.duration_tx.subscribe()
    }

    /// Begin a new capture.
    ///
    /// Calling this while a capture is active does nothing and returns
    /// [`StartOutcome::AlreadyRecording`]. On any failure the session stays
    /// idle.
    pub async fn start(&self) -> Result<StartOutcome, SessionError> {
        let mut inner = self.inner.lock().await;

        if inner.capture.is_some() {
            tracing::info!("recording already in progress, ignoring start");
            return Ok(StartOutcome::AlreadyRecording);
        }

        if !inner.permission_granted {
            inner.permission_granted = self.capture.request_permission().await;
        }
        if !inner.permission_granted {
            tracing::warn!("no permission to record audio");
            return Err(SessionError::PermissionDenied);
        }

        // Checked before the device is started
        if !inner.machine.is_idle() {
            return Err(InvalidStateTransition {
                current_state: inner.machine.state(),
                action: "start recording".to_string(),
            }
            .into());
        }

        let handle = match self.capture.start().await {
            Ok(handle) => handle,
            Err(e) => {
                tracing::error!(error = %e, "failed to start recording");
                return Err(e.into());
            }
        };

        inner.machine.start()?;
        inner.join_poller().await;
        self.duration_tx.send_replace(0);
        inner.poller = Some(spawn_duration_poller(
            Arc::clone(&handle),
            Arc::clone(&self.duration_tx),
            self.config.poll_interval,
        ));
        inner.capture = Some(handle);

        tracing::info!("recording started");
        Ok(StartOutcome::Started)
    }

    /// Finalize the active capture and append it to the recordings list.
    ///
    /// Returns `Ok(None)` when nothing was recording. The session is idle
    /// afterwards whether or not finalizing or saving succeeded.
    pub async fn stop(&self) -> Result<Option<RecordingEntry>, SessionError> {
        let mut inner = self.inner.lock().await;

        let Some(handle) = inner.capture.take() else {
            tracing::debug!("no recording in progress, ignoring stop");
            return Ok(None);
        };

        inner.join_poller().await;
        self.duration_tx.send_replace(0);
        inner.machine.stop()?;

        let uri = match handle.stop().await {
            Ok(uri) => uri,
            Err(e) => {
                tracing::error!(error = %e, "failed to stop recording");
                return Err(e.into());
            }
        };

        let entry = RecordingEntry::captured_at(uri, (self.clock)());
        if let Err(e) = self.store.append(entry.clone()).await {
            tracing::error!(
                uri = %entry.uri,
                name = %entry.name,
                error = %e,
                "recording finalized but could not be added to the list"
            );
            return Err(e.into());
        }

        tracing::info!(name = %entry.name, uri = %entry.uri, "recording saved");
        Ok(Some(entry))
    }
}

impl<C: AudioCapture, S: KeyValueStore> Drop for RecordingSession<C, S> {
    fn drop(&mut self) {
        self.inner.get_mut().cancel_poller();
    }
}

/// Publish the handle's elapsed time every `period` until aborted
fn spawn_duration_poller(
    handle: Arc<dyn CaptureHandle>,
    duration_tx: Arc<watch::Sender<u64>>,
    period: Duration,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut ticker = interval(period.as_std());
        ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
        // The first tick completes immediately
        ticker.tick().await;

        loop {
            ticker.tick().await;
            match handle.elapsed_ms().await {
                Ok(elapsed) => {
                    duration_tx.send_replace(elapsed);
                }
                Err(e) => tracing::debug!(error = %e, "duration poll failed"),
            }
        }
    })
}
