//! The engine worker thread: owns the output stream and the current sink.

use std::path::PathBuf;
use std::sync::mpsc::{Receiver, RecvTimeoutError, SyncSender};
use std::sync::{Arc, Mutex};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use rodio::{OutputStream, OutputStreamBuilder, Sink};
use tracing::{debug, info, warn};

use crate::catalog::TrackId;

use super::sink::create_sink_at;
use super::types::{PlaybackState, RepeatMode};

/// Status refresh cadence while no command arrives.
const TICK: Duration = Duration::from_millis(200);

#[derive(Debug)]
pub(super) struct QueuedTrack {
    pub id: TrackId,
    pub path: PathBuf,
    pub duration_hint: Option<Duration>,
}

#[derive(Debug)]
pub(super) enum EngineCmd {
    Add(Vec<QueuedTrack>),
    Play,
    Pause,
    Stop,
    Skip(TrackId),
    SeekTo(Duration),
    SetRepeat(RepeatMode),
    /// Fade out over `fade_out` and exit the worker.
    Quit { fade_out: Duration },
}

/// Snapshot published by the worker for the engine's read-only queries.
#[derive(Debug, Clone, Default)]
pub(super) struct EngineStatus {
    pub current: Option<TrackId>,
    pub state: PlaybackState,
    pub position: Duration,
    pub duration: Duration,
}

pub(super) type StatusHandle = Arc<Mutex<EngineStatus>>;

pub(super) fn spawn_worker(
    rx: Receiver<EngineCmd>,
    ready: SyncSender<Result<(), String>>,
    status: StatusHandle,
    repeat: RepeatMode,
) -> JoinHandle<()> {
    thread::spawn(move || {
        let mut stream = match OutputStreamBuilder::open_default_stream() {
            Ok(s) => s,
            Err(e) => {
                let _ = ready.send(Err(e.to_string()));
                return;
            }
        };
        // rodio logs to stderr when the stream is dropped, which would
        // scribble over the terminal UI.
        stream.log_on_drop(false);
        let _ = ready.send(Ok(()));

        let mut worker = Worker::new(stream, status, repeat);
        loop {
            match rx.recv_timeout(TICK) {
                Ok(EngineCmd::Quit { fade_out }) => {
                    worker.quit(fade_out);
                    break;
                }
                Ok(cmd) => worker.handle(cmd),
                Err(RecvTimeoutError::Timeout) => worker.check_track_end(),
                Err(RecvTimeoutError::Disconnected) => break,
            }
            worker.publish();
        }
        worker.publish();
        debug!("engine worker exited");
    })
}

struct Worker {
    stream: OutputStream,
    status: StatusHandle,
    queue: Vec<QueuedTrack>,
    pos: Option<usize>,
    sink: Option<Sink>,
    /// Offset the current sink started at (seek position).
    base: Duration,
    duration: Duration,
    state: PlaybackState,
    repeat: RepeatMode,
}

impl Worker {
    fn new(stream: OutputStream, status: StatusHandle, repeat: RepeatMode) -> Self {
        Self {
            stream,
            status,
            queue: Vec::new(),
            pos: None,
            sink: None,
            base: Duration::ZERO,
            duration: Duration::ZERO,
            state: PlaybackState::Idle,
            repeat,
        }
    }

    fn handle(&mut self, cmd: EngineCmd) {
        match cmd {
            EngineCmd::Add(tracks) => self.add(tracks),
            EngineCmd::Play => self.play(),
            EngineCmd::Pause => self.pause(),
            EngineCmd::Stop => self.stop(),
            EngineCmd::Skip(id) => self.skip(&id),
            EngineCmd::SeekTo(at) => self.seek(at),
            EngineCmd::SetRepeat(mode) => self.repeat = mode,
            EngineCmd::Quit { .. } => {}
        }
    }

    fn add(&mut self, tracks: Vec<QueuedTrack>) {
        self.queue.extend(tracks);
        if self.pos.is_none() && !self.queue.is_empty() {
            self.cue(0);
        }
    }

    /// Make `index` current without opening it; output starts on `play`.
    fn cue(&mut self, index: usize) {
        self.drop_sink();
        self.pos = Some(index);
        self.base = Duration::ZERO;
        self.duration = self.queue[index].duration_hint.unwrap_or_default();
        self.state = PlaybackState::Paused;
    }

    fn play(&mut self) {
        if self.pos.is_none() {
            return;
        }
        if self.sink.is_none() && !self.open(self.base) {
            return;
        }
        if let Some(s) = &self.sink {
            s.play();
            self.state = PlaybackState::Playing;
        }
    }

    fn pause(&mut self) {
        if let Some(s) = &self.sink {
            s.pause();
        }
        if self.pos.is_some() {
            self.state = PlaybackState::Paused;
        }
    }

    fn stop(&mut self) {
        self.drop_sink();
        self.base = Duration::ZERO;
        self.state = if self.pos.is_some() {
            PlaybackState::Stopped
        } else {
            PlaybackState::Idle
        };
    }

    fn skip(&mut self, id: &TrackId) {
        let Some(index) = self.queue.iter().position(|t| &t.id == id) else {
            warn!(track = %id, "skip to unknown track");
            return;
        };
        let was_playing = self.state == PlaybackState::Playing;
        self.cue(index);
        if was_playing {
            self.play();
        }
    }

    fn seek(&mut self, at: Duration) {
        if self.pos.is_none() {
            return;
        }
        let at = if self.duration.is_zero() {
            at
        } else {
            at.min(self.duration)
        };

        if self.sink.is_none() {
            self.base = at;
            return;
        }

        // Rebuild the sink and skip into the file.
        let resume = self.state == PlaybackState::Playing;
        self.drop_sink();
        if self.open(at) && resume {
            self.play();
        } else if self.sink.is_some() {
            self.state = PlaybackState::Paused;
        }
    }

    /// Open the current track into a paused sink starting at `start_at`.
    fn open(&mut self, start_at: Duration) -> bool {
        let Some(index) = self.pos else {
            return false;
        };
        self.state = PlaybackState::Buffering;
        self.publish();

        let track = &self.queue[index];
        match create_sink_at(&self.stream, &track.path, start_at) {
            Ok((sink, total)) => {
                debug!(track = %track.id, ?start_at, "opened");
                self.duration = total.or(track.duration_hint).unwrap_or_default();
                self.base = start_at;
                self.sink = Some(sink);
                self.state = PlaybackState::Paused;
                true
            }
            Err(e) => {
                warn!(track = %track.id, error = %e, "track cannot be played");
                self.sink = None;
                self.state = PlaybackState::Error;
                false
            }
        }
    }

    /// Auto-advance when the sink has drained.
    fn check_track_end(&mut self) {
        let finished = self.state == PlaybackState::Playing
            && self.sink.as_ref().map(Sink::empty).unwrap_or(false);
        if !finished {
            return;
        }
        let Some(index) = self.pos else {
            return;
        };

        let next = match self.repeat {
            RepeatMode::Track => Some(index),
            RepeatMode::Queue => Some((index + 1) % self.queue.len()),
            RepeatMode::Off => (index + 1 < self.queue.len()).then_some(index + 1),
        };
        match next {
            Some(n) => {
                info!(track = %self.queue[n].id, "advancing");
                self.cue(n);
                self.play();
            }
            None => {
                info!("end of queue");
                self.stop();
            }
        }
    }

    fn position(&self) -> Duration {
        match &self.sink {
            Some(s) => self.base + s.get_pos(),
            None => self.base,
        }
    }

    fn drop_sink(&mut self) {
        if let Some(s) = self.sink.take() {
            s.stop();
        }
    }

    fn quit(&mut self, fade_out: Duration) {
        if let Some(s) = &self.sink {
            if self.state == PlaybackState::Playing {
                fade_out_sink(s, fade_out);
            }
        }
        self.drop_sink();
        self.state = PlaybackState::Stopped;
    }

    fn publish(&self) {
        if let Ok(mut status) = self.status.lock() {
            status.current = self.pos.map(|i| self.queue[i].id.clone());
            status.state = self.state;
            status.position = self.position();
            status.duration = self.duration;
        }
    }
}

const FADE_STEPS: u32 = 20;

/// Longest fade honored on quit.
const MAX_FADE_OUT: Duration = Duration::from_secs(10);

/// Sleep between volume steps; `None` means cut the volume at once.
fn fade_step(fade_out: Duration) -> Option<Duration> {
    if fade_out.is_zero() {
        return None;
    }
    let step = fade_out.min(MAX_FADE_OUT) / FADE_STEPS;
    Some(step.max(Duration::from_millis(1)))
}

fn fade_out_sink(sink: &Sink, fade_out: Duration) {
    let Some(step_delay) = fade_step(fade_out) else {
        sink.set_volume(0.0);
        return;
    };
    let start = sink.volume();
    for step in 1..=FADE_STEPS {
        let t = step as f32 / FADE_STEPS as f32;
        sink.set_volume(start * (1.0 - t));
        thread::sleep(step_delay);
    }
    sink.set_volume(0.0);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fade_step_splits_the_fade_evenly() {
        assert_eq!(fade_step(Duration::ZERO), None);
        assert_eq!(fade_step(Duration::from_millis(500)), Some(Duration::from_millis(25)));
        assert_eq!(fade_step(Duration::from_micros(10)), Some(Duration::from_millis(1)));
    }

    #[test]
    fn huge_fades_are_capped() {
        assert_eq!(fade_step(Duration::MAX), Some(MAX_FADE_OUT / FADE_STEPS));
    }
}
