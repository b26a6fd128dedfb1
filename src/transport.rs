//! Transport controls: play/pause toggle and skip.

use tracing::debug;

use crate::carousel::Carousel;
use crate::catalog::Catalog;
use crate::engine::{PlaybackEngine, PlaybackState, Player};
use crate::tracker::ActiveTrackTracker;

/// Two-state view of the engine used by the play/pause button.
///
/// Only `Playing` counts as playing; buffering, stopped, idle and error all
/// show (and act) as paused.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportState {
    Playing,
    Paused,
}

impl From<PlaybackState> for TransportState {
    fn from(state: PlaybackState) -> Self {
        match state {
            PlaybackState::Playing => Self::Playing,
            _ => Self::Paused,
        }
    }
}

/// Engine command issued by a toggle press.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum TransportCommand {
    Play,
    Pause,
}

/// Press of the play/pause button. Does nothing without a current track.
pub fn toggle<E: PlaybackEngine>(player: &Player<E>) -> Option<TransportCommand> {
    if player.current_track().is_none() {
        debug!("toggle ignored: no current track");
        return None;
    }
    match TransportState::from(player.playback_state()) {
        TransportState::Paused => {
            player.play();
            Some(TransportCommand::Play)
        }
        TransportState::Playing => {
            player.pause();
            Some(TransportCommand::Pause)
        }
    }
}

pub fn skip_next(tracker: &ActiveTrackTracker, carousel: &mut Carousel) -> Option<f32> {
    tracker.skip_forward(carousel)
}

pub fn skip_previous(tracker: &ActiveTrackTracker, carousel: &mut Carousel) -> Option<f32> {
    tracker.skip_backward(carousel)
}

/// Point the engine at the track on `page` once the carousel has settled there.
///
/// Returns whether a skip was issued.
pub fn sync_engine_to_page<E: PlaybackEngine>(
    page: usize,
    catalog: &Catalog,
    player: &Player<E>,
) -> bool {
    let Some(current) = player.current_track() else {
        return false;
    };
    let Some(track) = catalog.get(page) else {
        return false;
    };
    if track.id == current {
        return false;
    }
    player.skip(&track.id);
    true
}

#[cfg(test)]
mod tests;
