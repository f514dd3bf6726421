//! Playback controller use case
//!
//! Keeps at most one player loaded. Starting a different recording always
//! stops and releases the previous player before the next one is loaded.

use std::sync::{Arc, Mutex as StdMutex, Weak};

use tokio::sync::{watch, Mutex};

use super::ports::{AudioPlayer, FinishCallback, KeyValueStore, PlaybackError, PlayerHandle};
use super::recordings_store::RecordingsStore;

/// What a `play` call did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlayOutcome {
    /// A new player was loaded and started
    Started,
    /// The requested recording was audible and is now paused
    Paused,
    /// The requested recording was paused and is audible again
    Resumed,
}

struct LoadedPlayer {
    name: String,
    handle: Arc<dyn PlayerHandle>,
    generation: u64,
    playing: bool,
}

#[derive(Default)]
struct PlaybackState {
    loaded: Option<LoadedPlayer>,
    next_generation: u64,
}

/// Shared between the controller and finish callbacks
struct Shared {
    state: StdMutex<PlaybackState>,
    current_tx: watch::Sender<Option<String>>,
}

impl Shared {
    fn lock(&self) -> std::sync::MutexGuard<'_, PlaybackState> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn publish(&self, state: &PlaybackState) {
        let current = state
            .loaded
            .as_ref()
            .filter(|l| l.playing)
            .map(|l| l.name.clone());
        self.current_tx.send_if_modified(|value| {
            if *value == current {
                return false;
            }
            *value = current;
            true
        });
    }

    fn set_playing(&self, generation: u64, playing: bool) {
        let mut state = self.lock();
        if let Some(loaded) = state.loaded.as_mut().filter(|l| l.generation == generation) {
            loaded.playing = playing;
        }
        self.publish(&state);
    }

    /// Drop the loaded player if it is still `generation`
    fn release(&self, generation: u64) -> bool {
        let mut state = self.lock();
        let matches = state
            .loaded
            .as_ref()
            .is_some_and(|l| l.generation == generation);
        if matches {
            state.loaded = None;
            self.publish(&state);
        }
        matches
    }
}

/// Copy of the loaded player taken under the state lock
struct Snapshot {
    name: String,
    handle: Arc<dyn PlayerHandle>,
    generation: u64,
    playing: bool,
}

/// Single-flight playback over the persisted recordings
pub struct PlaybackController<P: AudioPlayer, S: KeyValueStore> {
    player: P,
    store: RecordingsStore<S>,
    ops: Mutex<()>,
    shared: Arc<Shared>,
}

impl<P: AudioPlayer, S: KeyValueStore> PlaybackController<P, S> {
    /// Create a controller with nothing loaded
    pub fn new(player: P, store: RecordingsStore<S>) -> Self {
        let (current_tx, _) = watch::channel(None);
        Self {
            player,
            store,
            ops: Mutex::new(()),
            shared: Arc::new(Shared {
                state: StdMutex::new(PlaybackState::default()),
                current_tx,
            }),
        }
    }

    /// Name of the recording that is currently audible
    pub fn current(&self) -> Option<String> {
        self.current_tx().borrow().clone()
    }

    /// Name of the loaded recording, audible or paused
    pub fn loaded(&self) -> Option<String> {
        self.shared.lock().loaded.as_ref().map(|l| l.name.clone())
    }

    /// Subscribe to changes of the currently audible recording
    pub fn subscribe(&self) -> watch::Receiver<Option<String>> {
        self.current_tx().subscribe()
    }

    fn current_tx(&self) -> &watch::Sender<Option<String>> {
        &self.shared.current_tx
    }

    fn snapshot(&self) -> Option<Snapshot> {
        self.shared.lock().loaded.as_ref().map(|l| Snapshot {
            name: l.name.clone(),
            handle: Arc::clone(&l.handle),
            generation: l.generation,
            playing: l.playing,
        })
    }

    /// Toggle playback of the recording called `name`.
    ///
    /// - audible: pause it
    /// - loaded but paused: resume it
    /// - anything else: stop the loaded player, then load and start `name`
    pub async fn play(&self, name: &str) -> Result<PlayOutcome, PlaybackError> {
        let _op = self.ops.lock().await;

        match self.snapshot() {
            Some(loaded) if loaded.name == name && loaded.playing => {
                loaded.handle.pause().await.inspect_err(|e| {
                    tracing::error!(name, error = %e, "failed to pause playback");
                })?;
                self.shared.set_playing(loaded.generation, false);
                tracing::debug!(name, "playback paused");
                Ok(PlayOutcome::Paused)
            }
            Some(loaded) if loaded.name == name => {
                loaded.handle.play().await.inspect_err(|e| {
                    tracing::error!(name, error = %e, "failed to resume playback");
                })?;
                self.shared.set_playing(loaded.generation, true);
                tracing::debug!(name, "playback resumed");
                Ok(PlayOutcome::Resumed)
            }
            previous => {
                if let Some(previous) = previous {
                    self.stop_loaded(previous).await?;
                }
                self.start_new(name).await?;
                Ok(PlayOutcome::Started)
            }
        }
    }

    /// Pause the audible recording. Returns whether anything was paused.
    pub async fn pause(&self) -> Result<bool, PlaybackError> {
        let _op = self.ops.lock().await;
        let Some(loaded) = self.snapshot().filter(|l| l.playing) else {
            return Ok(false);
        };
        loaded.handle.pause().await?;
        self.shared.set_playing(loaded.generation, false);
        Ok(true)
    }

    /// Resume the paused recording. Returns whether anything was resumed.
    pub async fn resume(&self) -> Result<bool, PlaybackError> {
        let _op = self.ops.lock().await;
        let Some(loaded) = self.snapshot().filter(|l| !l.playing) else {
            return Ok(false);
        };
        loaded.handle.play().await?;
        self.shared.set_playing(loaded.generation, true);
        Ok(true)
    }

    /// Stop and release the loaded player. Returns whether one was loaded.
    pub async fn stop(&self) -> Result<bool, PlaybackError> {
        let _op = self.ops.lock().await;
        match self.snapshot() {
            Some(loaded) => {
                self.stop_loaded(loaded).await?;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    /// Stop the player, then forget it. A player that failed to stop stays tracked.
    async fn stop_loaded(&self, loaded: Snapshot) -> Result<(), PlaybackError> {
        loaded.handle.stop().await.inspect_err(|e| {
            tracing::error!(name = %loaded.name, error = %e, "failed to stop playback");
        })?;
        self.shared.release(loaded.generation);
        Ok(())
    }

    async fn start_new(&self, name: &str) -> Result<(), PlaybackError> {
        let entry = self
            .store
            .find(name)
            .await
            .map_err(|e| PlaybackError::Storage(e.to_string()))?
            .ok_or_else(|| PlaybackError::UnknownRecording(name.to_string()))?;

        let generation = {
            let mut state = self.shared.lock();
            state.next_generation += 1;
            state.next_generation
        };

        let handle = self
            .player
            .load(&entry.uri, finish_callback(Arc::downgrade(&self.shared), generation))
            .await
            .inspect_err(|e| {
                tracing::error!(name, uri = %entry.uri, error = %e, "failed to load recording");
            })?;

        {
            let mut state = self.shared.lock();
            state.loaded = Some(LoadedPlayer {
                name: name.to_string(),
                handle: Arc::clone(&handle),
                generation,
                playing: true,
            });
            self.shared.publish(&state);
        }

        if let Err(e) = handle.play().await {
            tracing::error!(name, error = %e, "failed to start playback");
            self.shared.release(generation);
            if let Err(stop_err) = handle.stop().await {
                tracing::warn!(name, error = %stop_err, "failed to release player after start failure");
            }
            return Err(e);
        }

        tracing::info!(name, uri = %entry.uri, "playback started");
        Ok(())
    }
}

fn finish_callback(shared: Weak<Shared>, generation: u64) -> FinishCallback {
    Arc::new(move || {
        if let Some(shared) = shared.upgrade() {
            if shared.release(generation) {
                tracing::debug!(generation, "playback finished");
            }
        }
    })
}
