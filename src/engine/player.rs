use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::catalog::{TrackDescriptor, TrackId};
use crate::progress::ProgressSnapshot;

use super::types::{EngineError, PlaybackEngine, PlaybackState, RepeatMode};

/// Best-effort front of a [`PlaybackEngine`].
///
/// Engine errors are logged here and never reach the UI: the screen keeps
/// rendering its last known state. Commands are refused until `setup`
/// succeeds, and `play`/`pause` are ignored while no track is current.
pub struct Player<E> {
    engine: E,
    ready: bool,
}

impl<E: PlaybackEngine> Player<E> {
    pub fn new(engine: E) -> Self {
        Self {
            engine,
            ready: false,
        }
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn is_ready(&self) -> bool {
        self.ready
    }

    /// Returns whether the engine is usable afterwards.
    pub fn setup(&mut self) -> bool {
        if self.ready {
            debug!("engine already set up");
            return true;
        }
        match self.engine.setup() {
            Ok(()) => {
                info!("playback engine ready");
                self.ready = true;
            }
            Err(e) => error!(error = %e, "playback engine setup failed"),
        }
        self.ready
    }

    pub fn add(&self, tracks: &[TrackDescriptor]) {
        if tracks.is_empty() || !self.check_ready("add") {
            return;
        }
        let result = self.engine.add(tracks);
        if result.is_ok() {
            info!(count = tracks.len(), "queued catalog");
        }
        self.report("add", result);
    }

    pub fn play(&self) {
        if self.check_ready("play") && self.has_current_track("play") {
            self.report("play", self.engine.play());
        }
    }

    pub fn pause(&self) {
        if self.check_ready("pause") && self.has_current_track("pause") {
            self.report("pause", self.engine.pause());
        }
    }

    pub fn stop(&self) {
        if self.check_ready("stop") {
            self.report("stop", self.engine.stop());
        }
    }

    pub fn skip(&self, id: &TrackId) {
        if self.check_ready("skip") {
            debug!(track = %id, "skip");
            self.report("skip", self.engine.skip(id));
        }
    }

    /// `seconds` is passed through unvalidated; the engine clamps it.
    pub fn seek_to(&self, seconds: f64) {
        if self.check_ready("seek") {
            self.report("seek", self.engine.seek_to(seconds));
        }
    }

    pub fn set_repeat_mode(&self, mode: RepeatMode) {
        if self.check_ready("repeat") {
            self.report("repeat", self.engine.set_repeat_mode(mode));
        }
    }

    pub fn current_track(&self) -> Option<TrackId> {
        if !self.ready {
            return None;
        }
        self.engine.current_track()
    }

    pub fn playback_state(&self) -> PlaybackState {
        if !self.ready {
            return PlaybackState::Idle;
        }
        self.engine.playback_state()
    }

    pub fn progress(&self) -> ProgressSnapshot {
        if !self.ready {
            return ProgressSnapshot::default();
        }
        self.engine.progress()
    }

    pub fn shutdown(&self, fade_out: Duration) {
        if self.ready {
            self.engine.shutdown(fade_out);
        }
    }

    fn check_ready(&self, command: &'static str) -> bool {
        if !self.ready {
            warn!(command, error = %EngineError::NotReady, "command dropped");
        }
        self.ready
    }

    fn has_current_track(&self, command: &'static str) -> bool {
        let loaded = self.engine.current_track().is_some();
        if !loaded {
            debug!(command, "no current track; ignoring");
        }
        loaded
    }

    fn report(&self, command: &'static str, result: Result<(), EngineError>) {
        if let Err(e) = result {
            warn!(command, error = %e, "engine command failed");
        }
    }
}
