//! Background relay for remote-control signals (media keys, lock screen,
//! desktop media widgets).
//!
//! Every signal goes through one mapping table. The default table keeps the
//! long-standing behavior where play, pause and stop all resume playback;
//! `RemoteMapping::corrected` (or the `[remote]` config section) gives each
//! signal its own action.

use tracing::info;

use crate::engine::{PlaybackEngine, Player};
use crate::transport;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoteSignal {
    Play,
    Pause,
    PlayPause,
    Stop,
    Next,
    Previous,
    /// Seek relative to the current position, in microseconds.
    SeekBy { micros: i64 },
    /// Seek to an absolute position, in microseconds.
    SetPosition { micros: i64 },
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum RemoteAction {
    Play,
    Pause,
    Stop,
    TogglePause,
    SkipNext,
    SkipPrevious,
    Ignore,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RemoteMapping {
    pub play: RemoteAction,
    pub pause: RemoteAction,
    pub play_pause: RemoteAction,
    pub stop: RemoteAction,
    pub next: RemoteAction,
    pub previous: RemoteAction,
}

impl Default for RemoteMapping {
    fn default() -> Self {
        Self {
            play: RemoteAction::Play,
            // Known quirk: pause and stop resume playback.
            pause: RemoteAction::Play,
            stop: RemoteAction::Play,
            play_pause: RemoteAction::TogglePause,
            next: RemoteAction::SkipNext,
            previous: RemoteAction::SkipPrevious,
        }
    }
}

impl RemoteMapping {
    /// Each signal mapped to the action of the same name.
    pub fn corrected() -> Self {
        Self {
            pause: RemoteAction::Pause,
            stop: RemoteAction::Stop,
            ..Self::default()
        }
    }

    /// Table entry for `signal`. Seek signals are not in the table.
    pub fn action(&self, signal: RemoteSignal) -> Option<RemoteAction> {
        match signal {
            RemoteSignal::Play => Some(self.play),
            RemoteSignal::Pause => Some(self.pause),
            RemoteSignal::PlayPause => Some(self.play_pause),
            RemoteSignal::Stop => Some(self.stop),
            RemoteSignal::Next => Some(self.next),
            RemoteSignal::Previous => Some(self.previous),
            RemoteSignal::SeekBy { .. } | RemoteSignal::SetPosition { .. } => None,
        }
    }
}

/// Skip the relay hands back to the screen, which owns the carousel.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum SkipRequest {
    Next,
    Previous,
}

pub struct RemoteRelay {
    mapping: RemoteMapping,
}

impl RemoteRelay {
    pub fn new(mapping: RemoteMapping) -> Self {
        Self { mapping }
    }

    /// Apply `signal` to the engine, or return the skip it asks for.
    pub fn forward<E: PlaybackEngine>(
        &self,
        signal: RemoteSignal,
        player: &Player<E>,
    ) -> Option<SkipRequest> {
        let Some(action) = self.mapping.action(signal) else {
            info!(?signal, "remote seek");
            seek(signal, player);
            return None;
        };
        info!(?signal, ?action, "remote control");
        match action {
            RemoteAction::Play => player.play(),
            RemoteAction::Pause => player.pause(),
            RemoteAction::Stop => player.stop(),
            RemoteAction::TogglePause => {
                transport::toggle(player);
            }
            RemoteAction::SkipNext => return Some(SkipRequest::Next),
            RemoteAction::SkipPrevious => return Some(SkipRequest::Previous),
            RemoteAction::Ignore => {}
        }
        None
    }
}

fn micros_to_secs(micros: i64) -> f64 {
    micros as f64 / 1_000_000.0
}

/// Targets are passed through unvalidated; the engine clamps them.
fn seek<E: PlaybackEngine>(signal: RemoteSignal, player: &Player<E>) {
    match signal {
        RemoteSignal::SeekBy { micros } => {
            player.seek_to(player.progress().position_secs + micros_to_secs(micros));
        }
        RemoteSignal::SetPosition { micros } => player.seek_to(micros_to_secs(micros)),
        _ => {}
    }
}

#[cfg(test)]
mod tests;
