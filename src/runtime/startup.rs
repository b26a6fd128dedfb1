use std::time::Duration;

use tracing::info;

use crate::app::{App, ScreenConfig};
use crate::config::{self, RemoteActionSetting, RemoteSettings};
use crate::engine::{PlaybackEngine, RepeatMode};
use crate::relay::{RemoteAction, RemoteMapping};
use crate::tracker::SkipBoundary;

pub fn repeat_mode(setting: config::RepeatModeSetting) -> RepeatMode {
    match setting {
        config::RepeatModeSetting::Off => RepeatMode::Off,
        config::RepeatModeSetting::Track => RepeatMode::Track,
        config::RepeatModeSetting::Queue => RepeatMode::Queue,
    }
}

fn skip_boundary(setting: config::SkipBoundarySetting) -> SkipBoundary {
    match setting {
        config::SkipBoundarySetting::Clamp => SkipBoundary::Clamp,
        config::SkipBoundarySetting::Unbounded => SkipBoundary::Unbounded,
    }
}

fn remote_action(setting: RemoteActionSetting) -> RemoteAction {
    match setting {
        RemoteActionSetting::Play => RemoteAction::Play,
        RemoteActionSetting::Pause => RemoteAction::Pause,
        RemoteActionSetting::Stop => RemoteAction::Stop,
        RemoteActionSetting::TogglePause => RemoteAction::TogglePause,
        RemoteActionSetting::SkipNext => RemoteAction::SkipNext,
        RemoteActionSetting::SkipPrevious => RemoteAction::SkipPrevious,
        RemoteActionSetting::Ignore => RemoteAction::Ignore,
    }
}

fn remote_mapping(remote: &RemoteSettings) -> RemoteMapping {
    RemoteMapping {
        play: remote_action(remote.play),
        pause: remote_action(remote.pause),
        play_pause: remote_action(remote.play_pause),
        stop: remote_action(remote.stop),
        next: remote_action(remote.next),
        previous: remote_action(remote.previous),
    }
}

pub fn screen_config(settings: &config::Settings) -> ScreenConfig {
    let carousel = &settings.carousel;
    ScreenConfig {
        skip_boundary: skip_boundary(carousel.skip_boundary),
        pages_per_second: carousel.pages_per_second,
        settle_delay: Duration::from_millis(carousel.settle_delay_ms),
        drag_fraction: carousel.drag_fraction,
        follow_playback: carousel.follow_playback,
        sync_engine_on_settle: carousel.sync_engine_on_settle,
        poll_interval: Duration::from_millis(settings.progress.poll_interval_ms),
        scrub_seconds: settings.controls.scrub_seconds as f64,
        repeat_mode: repeat_mode(settings.playback.repeat_mode),
        remote: remote_mapping(&settings.remote),
    }
}

/// Pick up the engine's initial state and start playback when configured.
pub fn apply_playback_defaults<E: PlaybackEngine>(app: &mut App<E>, settings: &config::Settings) {
    app.sync_engine_state();
    if settings.playback.autoplay {
        info!("autoplay");
        app.player.play();
        app.sync_engine_state();
    }
}
