//! Playback progress: snapshots polled from the engine and the polling cadence.

use std::time::{Duration, Instant};

/// Position and duration of the current track, in seconds.
///
/// The engine keeps `position <= duration`, but near track boundaries a
/// snapshot can briefly disagree; the display helpers clamp instead of
/// trusting it.
#[derive(Debug, Copy, Clone, PartialEq, Default)]
pub struct ProgressSnapshot {
    pub position_secs: f64,
    pub duration_secs: f64,
}

impl ProgressSnapshot {
    pub fn new(position_secs: f64, duration_secs: f64) -> Self {
        Self {
            position_secs: sanitize(position_secs),
            duration_secs: sanitize(duration_secs),
        }
    }

    /// Position clamped into `[0, duration]` (unclamped when duration is unknown).
    pub fn display_position(&self) -> f64 {
        if self.duration_secs > 0.0 {
            self.position_secs.min(self.duration_secs)
        } else {
            self.position_secs
        }
    }

    pub fn remaining(&self) -> f64 {
        (self.duration_secs - self.display_position()).max(0.0)
    }

    /// Fraction of the track played, in `[0, 1]`.
    pub fn ratio(&self) -> f64 {
        if self.duration_secs > 0.0 {
            (self.display_position() / self.duration_secs).clamp(0.0, 1.0)
        } else {
            0.0
        }
    }
}

fn sanitize(secs: f64) -> f64 {
    if secs.is_finite() { secs.max(0.0) } else { 0.0 }
}

/// Format seconds as `MM:SS`.
pub fn format_clock(secs: f64) -> String {
    let secs = sanitize(secs) as u64;
    format!("{:02}:{:02}", secs / 60, secs % 60)
}

/// Periodic progress subscription.
///
/// Active between `start` and `stop`; `due` says whether the engine should be
/// polled now.
#[derive(Debug)]
pub struct ProgressPoller {
    interval: Duration,
    last_poll: Option<Instant>,
    active: bool,
}

impl ProgressPoller {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_poll: None,
            active: false,
        }
    }

    pub fn start(&mut self) {
        self.active = true;
        self.last_poll = None;
    }

    pub fn stop(&mut self) {
        self.active = false;
    }

    /// Returns true (and records the poll) when a poll is due at `now`.
    pub fn due(&mut self, now: Instant) -> bool {
        if !self.active {
            return false;
        }
        let due = self
            .last_poll
            .map(|last| now.saturating_duration_since(last) >= self.interval)
            .unwrap_or(true);
        if due {
            self.last_poll = Some(now);
        }
        due
    }
}
