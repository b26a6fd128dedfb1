//! Screen model: everything the single player screen shows and does.

use std::time::{Duration, Instant};

use tracing::debug;

use crate::carousel::Carousel;
use crate::catalog::{Catalog, TrackDescriptor, TrackId};
use crate::engine::{PlaybackEngine, PlaybackState, Player, RepeatMode};
use crate::progress::{ProgressPoller, ProgressSnapshot};
use crate::relay::{RemoteMapping, RemoteRelay, RemoteSignal, SkipRequest};
use crate::tracker::{ActiveIndex, ActiveTrackTracker, SkipBoundary};
use crate::transport::{self, TransportCommand, TransportState};

/// Behavior knobs of the screen, resolved from settings at startup.
#[derive(Debug, Clone)]
pub struct ScreenConfig {
    pub skip_boundary: SkipBoundary,
    pub pages_per_second: f32,
    pub settle_delay: Duration,
    pub drag_fraction: f32,
    pub follow_playback: bool,
    pub sync_engine_on_settle: bool,
    pub poll_interval: Duration,
    pub scrub_seconds: f64,
    pub repeat_mode: RepeatMode,
    pub remote: RemoteMapping,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            skip_boundary: SkipBoundary::Clamp,
            pages_per_second: 4.0,
            settle_delay: Duration::from_millis(250),
            drag_fraction: 0.125,
            follow_playback: true,
            sync_engine_on_settle: true,
            poll_interval: Duration::from_millis(1000),
            scrub_seconds: 5.0,
            repeat_mode: RepeatMode::Queue,
            remote: RemoteMapping::default(),
        }
    }
}

/// The player screen.
pub struct App<E: PlaybackEngine> {
    pub catalog: Catalog,
    pub player: Player<E>,
    pub carousel: Carousel,
    tracker: ActiveTrackTracker,
    /// Read side of the tracker's derived index; drives the labels.
    active: ActiveIndex,
    relay: RemoteRelay,
    poller: ProgressPoller,

    /// Last polled progress of the engine's current track.
    pub progress: ProgressSnapshot,
    /// Last observed engine state.
    pub playback: PlaybackState,
    /// Last observed engine track.
    pub engine_track: Option<TrackId>,
    pub repeat_mode: RepeatMode,
    pub metadata_window: bool,

    follow_playback: bool,
    sync_engine_on_settle: bool,
    drag_fraction: f32,
    scrub_seconds: f64,
}

impl<E: PlaybackEngine> App<E> {
    pub fn new(catalog: Catalog, player: Player<E>, config: &ScreenConfig) -> Self {
        let carousel = Carousel::new(catalog.len(), config.pages_per_second, config.settle_delay);
        let tracker = ActiveTrackTracker::new(config.skip_boundary);
        let active = tracker.active();
        Self {
            catalog,
            player,
            carousel,
            tracker,
            active,
            relay: RemoteRelay::new(config.remote),
            poller: ProgressPoller::new(config.poll_interval),
            progress: ProgressSnapshot::default(),
            playback: PlaybackState::Idle,
            engine_track: None,
            repeat_mode: config.repeat_mode,
            metadata_window: false,
            follow_playback: config.follow_playback,
            sync_engine_on_settle: config.sync_engine_on_settle,
            drag_fraction: config.drag_fraction,
            scrub_seconds: config.scrub_seconds,
        }
    }

    /// Attach the active-track observer and start progress polling.
    pub fn mount(&mut self) {
        self.tracker.mount(&mut self.carousel);
        self.poller.start();
    }

    /// Detach every listener and stop polling. In-flight engine commands are
    /// left to finish on their own.
    pub fn unmount(&mut self) {
        self.tracker.unmount(&mut self.carousel);
        self.poller.stop();
    }

    /// Leave the screen for good: unmount and stop the engine, fading out.
    pub fn shutdown(&mut self, fade_out: Duration) {
        self.unmount();
        self.player.shutdown(fade_out);
    }

    pub fn is_mounted(&self) -> bool {
        self.tracker.is_mounted()
    }

    pub fn active_index(&self) -> usize {
        self.active.get()
    }

    /// Track whose labels are shown.
    pub fn active_track(&self) -> Option<&TrackDescriptor> {
        self.catalog.get(self.active_index())
    }

    pub fn transport_state(&self) -> TransportState {
        self.playback.into()
    }

    /// Carousel pages are as wide as the viewport.
    pub fn set_viewport_width(&mut self, width: u16) {
        self.carousel.set_page_width(f32::from(width));
    }

    pub fn toggle_playback(&mut self) -> Option<TransportCommand> {
        let cmd = transport::toggle(&self.player);
        self.sync_engine_state();
        cmd
    }

    pub fn skip_next(&mut self) -> Option<f32> {
        transport::skip_next(&self.tracker, &mut self.carousel)
    }

    pub fn skip_previous(&mut self) -> Option<f32> {
        transport::skip_previous(&self.tracker, &mut self.carousel)
    }

    /// One swipe step; `direction` > 0 moves towards later tracks.
    pub fn swipe(&mut self, direction: f32) {
        let dx = direction.signum() * self.drag_fraction * self.carousel.page_width();
        self.carousel.drag_by(dx);
    }

    /// Advance carousel motion. Returns the page it settled on, if any.
    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        let page = self.carousel.tick(dt)?;
        debug!(page, "carousel settled");
        if self.sync_engine_on_settle
            && self.is_mounted()
            && transport::sync_engine_to_page(page, &self.catalog, &self.player)
        {
            self.sync_engine_state();
        }
        Some(page)
    }

    /// Progress slider released at `seconds`.
    pub fn seek_to(&mut self, seconds: f64) {
        self.player.seek_to(seconds);
    }

    /// Move the progress slider by one scrub step and release it.
    pub fn scrub(&mut self, direction: f64) {
        let target = self.progress.position_secs + direction.signum() * self.scrub_seconds;
        self.seek_to(target);
    }

    pub fn cycle_repeat(&mut self) {
        self.repeat_mode = self.repeat_mode.cycle();
        self.player.set_repeat_mode(self.repeat_mode);
    }

    pub fn toggle_metadata_window(&mut self) {
        self.metadata_window = !self.metadata_window;
    }

    pub fn handle_remote(&mut self, signal: RemoteSignal) {
        match self.relay.forward(signal, &self.player) {
            Some(SkipRequest::Next) => {
                self.skip_next();
            }
            Some(SkipRequest::Previous) => {
                self.skip_previous();
            }
            None => self.sync_engine_state(),
        }
    }

    /// Poll progress when the polling cadence says so. Returns whether it polled.
    pub fn poll_progress(&mut self, now: Instant) -> bool {
        if !self.poller.due(now) {
            return false;
        }
        self.progress = self.player.progress();
        true
    }

    /// Pick up the engine's state and current track; follow the track in the
    /// carousel when the engine moved on by itself.
    pub fn sync_engine_state(&mut self) {
        if !self.is_mounted() {
            return;
        }
        self.playback = self.player.playback_state();

        let track = self.player.current_track();
        if track == self.engine_track {
            return;
        }
        self.engine_track = track;

        if !self.follow_playback || !self.carousel.is_idle() {
            return;
        }
        let Some(index) = self
            .engine_track
            .as_ref()
            .and_then(|id| self.catalog.index_of(id))
        else {
            return;
        };
        if index != self.active_index() {
            debug!(index, "following engine track");
            self.tracker.scroll_to_track(&mut self.carousel, index);
        }
    }
}
