//! Engine-facing types: the engine trait, its state enums and errors.

use std::time::Duration;

use thiserror::Error;

use crate::catalog::{TrackDescriptor, TrackId};
use crate::progress::ProgressSnapshot;

/// State reported by the playback engine. Read-only for everything else.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum PlaybackState {
    /// Nothing queued.
    #[default]
    Idle,
    /// Opening/decoding the current track.
    Buffering,
    Playing,
    Paused,
    Stopped,
    /// The current track could not be played.
    Error,
}

/// What the engine does when the current track ends.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum RepeatMode {
    /// Advance through the queue and stop after the last track.
    Off,
    /// Replay the current track.
    Track,
    /// Advance and wrap around to the first track.
    #[default]
    Queue,
}

impl RepeatMode {
    /// `Off -> Queue -> Track -> Off`.
    pub fn cycle(self) -> Self {
        match self {
            Self::Off => Self::Queue,
            Self::Queue => Self::Track,
            Self::Track => Self::Off,
        }
    }
}

#[derive(Debug, Error)]
pub enum EngineError {
    #[error("engine setup failed: {0}")]
    Setup(String),
    #[error("engine is not set up")]
    NotReady,
    #[error("`{command}` rejected: {reason}")]
    Command {
        command: &'static str,
        reason: String,
    },
    #[error("track `{0}` is not queued")]
    UnknownTrack(TrackId),
    #[error("engine worker is gone")]
    Disconnected,
}

/// Capability interface of a playback engine.
///
/// Commands are fire-and-forget: a successful return only means the engine
/// accepted the command.
pub trait PlaybackEngine {
    /// Prepare the engine for use. Calling it again after success is allowed.
    fn setup(&self) -> Result<(), EngineError>;
    /// Append `tracks` to the queue in order.
    fn add(&self, tracks: &[TrackDescriptor]) -> Result<(), EngineError>;
    fn play(&self) -> Result<(), EngineError>;
    fn pause(&self) -> Result<(), EngineError>;
    fn stop(&self) -> Result<(), EngineError>;
    /// Make `id` the current track, keeping the play/pause state.
    fn skip(&self, id: &TrackId) -> Result<(), EngineError>;
    /// Seek within the current track. The engine clamps to `[0, duration]`.
    fn seek_to(&self, seconds: f64) -> Result<(), EngineError>;
    fn set_repeat_mode(&self, mode: RepeatMode) -> Result<(), EngineError>;

    fn current_track(&self) -> Option<TrackId>;
    fn playback_state(&self) -> PlaybackState;
    fn progress(&self) -> ProgressSnapshot;

    /// Stop output, fading out over `fade_out`, and release the device.
    fn shutdown(&self, fade_out: Duration);
}
