//! Recording engine for tests.

use std::cell::{Cell, RefCell};
use std::time::Duration;

use crate::catalog::{TrackDescriptor, TrackId};
use crate::progress::ProgressSnapshot;

use super::types::{EngineError, PlaybackEngine, PlaybackState, RepeatMode};

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Call {
    Setup,
    Add(Vec<TrackId>),
    Play,
    Pause,
    Stop,
    Skip(TrackId),
    SeekTo(f64),
    Repeat(RepeatMode),
    Shutdown,
}

#[derive(Default)]
pub(crate) struct FakeEngine {
    pub calls: RefCell<Vec<Call>>,
    pub current: RefCell<Option<TrackId>>,
    pub state: Cell<PlaybackState>,
    pub progress: Cell<ProgressSnapshot>,
    pub fail_setup: Cell<bool>,
    pub fail_commands: Cell<bool>,
}

impl FakeEngine {
    pub fn calls(&self) -> Vec<Call> {
        self.calls.borrow().clone()
    }

    /// Calls other than setup/add.
    pub fn commands(&self) -> Vec<Call> {
        self.calls
            .borrow()
            .iter()
            .filter(|c| !matches!(c, Call::Setup | Call::Add(_)))
            .cloned()
            .collect()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn set_current(&self, id: Option<&str>) {
        *self.current.borrow_mut() = id.map(TrackId::new);
    }

    fn record(&self, call: Call, command: &'static str) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(call);
        if self.fail_commands.get() {
            return Err(EngineError::Command {
                command,
                reason: "rejected by fake".to_string(),
            });
        }
        Ok(())
    }
}

impl PlaybackEngine for FakeEngine {
    fn setup(&self) -> Result<(), EngineError> {
        self.calls.borrow_mut().push(Call::Setup);
        if self.fail_setup.get() {
            return Err(EngineError::Setup("no output device".to_string()));
        }
        Ok(())
    }

    fn add(&self, tracks: &[TrackDescriptor]) -> Result<(), EngineError> {
        self.record(Call::Add(tracks.iter().map(|t| t.id.clone()).collect()), "add")?;
        if self.current.borrow().is_none() {
            if let Some(first) = tracks.first() {
                *self.current.borrow_mut() = Some(first.id.clone());
                self.state.set(PlaybackState::Paused);
            }
        }
        Ok(())
    }

    fn play(&self) -> Result<(), EngineError> {
        self.record(Call::Play, "play")?;
        self.state.set(PlaybackState::Playing);
        Ok(())
    }

    fn pause(&self) -> Result<(), EngineError> {
        self.record(Call::Pause, "pause")?;
        self.state.set(PlaybackState::Paused);
        Ok(())
    }

    fn stop(&self) -> Result<(), EngineError> {
        self.record(Call::Stop, "stop")?;
        self.state.set(PlaybackState::Stopped);
        Ok(())
    }

    fn skip(&self, id: &TrackId) -> Result<(), EngineError> {
        self.record(Call::Skip(id.clone()), "skip")?;
        *self.current.borrow_mut() = Some(id.clone());
        Ok(())
    }

    fn seek_to(&self, seconds: f64) -> Result<(), EngineError> {
        self.record(Call::SeekTo(seconds), "seek")
    }

    fn set_repeat_mode(&self, mode: RepeatMode) -> Result<(), EngineError> {
        self.record(Call::Repeat(mode), "repeat")
    }

    fn current_track(&self) -> Option<TrackId> {
        self.current.borrow().clone()
    }

    fn playback_state(&self) -> PlaybackState {
        self.state.get()
    }

    fn progress(&self) -> ProgressSnapshot {
        self.progress.get()
    }

    fn shutdown(&self, _fade_out: Duration) {
        self.calls.borrow_mut().push(Call::Shutdown);
    }
}
