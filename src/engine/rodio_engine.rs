use std::sync::mpsc::{self, Sender};
use std::sync::{Arc, Mutex};
use std::thread::JoinHandle;
use std::time::Duration;

use crate::catalog::{TrackDescriptor, TrackId};
use crate::progress::ProgressSnapshot;

use super::types::{EngineError, PlaybackEngine, PlaybackState, RepeatMode};
use super::worker::{EngineCmd, EngineStatus, QueuedTrack, StatusHandle, spawn_worker};

/// Engine backed by the default `rodio` output device.
pub struct RodioEngine {
    initial_repeat: RepeatMode,
    tx: Mutex<Option<Sender<EngineCmd>>>,
    status: StatusHandle,
    queued: Mutex<Vec<TrackId>>,
    join: Mutex<Option<JoinHandle<()>>>,
}

impl RodioEngine {
    pub fn new(initial_repeat: RepeatMode) -> Self {
        Self {
            initial_repeat,
            tx: Mutex::new(None),
            status: Arc::new(Mutex::new(EngineStatus::default())),
            queued: Mutex::new(Vec::new()),
            join: Mutex::new(None),
        }
    }

    fn send(&self, cmd: EngineCmd) -> Result<(), EngineError> {
        let guard = self.tx.lock().map_err(|_| EngineError::Disconnected)?;
        let tx = guard.as_ref().ok_or(EngineError::NotReady)?;
        tx.send(cmd).map_err(|_| EngineError::Disconnected)
    }

    fn status(&self) -> EngineStatus {
        self.status
            .lock()
            .map(|s| s.clone())
            .unwrap_or_default()
    }
}

impl PlaybackEngine for RodioEngine {
    fn setup(&self) -> Result<(), EngineError> {
        let mut tx_slot = self.tx.lock().map_err(|_| EngineError::Disconnected)?;
        if tx_slot.is_some() {
            return Ok(());
        }

        let (tx, rx) = mpsc::channel::<EngineCmd>();
        let (ready_tx, ready_rx) = mpsc::sync_channel::<Result<(), String>>(1);
        let handle = spawn_worker(rx, ready_tx, self.status.clone(), self.initial_repeat);

        match ready_rx.recv() {
            Ok(Ok(())) => {
                *tx_slot = Some(tx);
                if let Ok(mut j) = self.join.lock() {
                    *j = Some(handle);
                }
                Ok(())
            }
            Ok(Err(reason)) => {
                let _ = handle.join();
                Err(EngineError::Setup(reason))
            }
            Err(_) => Err(EngineError::Setup(
                "engine worker exited during setup".to_string(),
            )),
        }
    }

    fn add(&self, tracks: &[TrackDescriptor]) -> Result<(), EngineError> {
        let batch: Vec<QueuedTrack> = tracks
            .iter()
            .map(|t| QueuedTrack {
                id: t.id.clone(),
                path: t.source.clone(),
                duration_hint: t.duration,
            })
            .collect();
        self.send(EngineCmd::Add(batch))?;
        if let Ok(mut q) = self.queued.lock() {
            q.extend(tracks.iter().map(|t| t.id.clone()));
        }
        // The worker cues the first track; show it before the worker publishes.
        if let (Ok(mut status), Some(first)) = (self.status.lock(), tracks.first()) {
            if status.current.is_none() {
                status.current = Some(first.id.clone());
                status.state = PlaybackState::Paused;
                status.duration = first.duration.unwrap_or_default();
            }
        }
        Ok(())
    }

    fn play(&self) -> Result<(), EngineError> {
        self.send(EngineCmd::Play)
    }

    fn pause(&self) -> Result<(), EngineError> {
        self.send(EngineCmd::Pause)
    }

    fn stop(&self) -> Result<(), EngineError> {
        self.send(EngineCmd::Stop)
    }

    fn skip(&self, id: &TrackId) -> Result<(), EngineError> {
        let known = self
            .queued
            .lock()
            .map(|q| q.contains(id))
            .unwrap_or(false);
        if !known {
            return Err(EngineError::UnknownTrack(id.clone()));
        }
        self.send(EngineCmd::Skip(id.clone()))
    }

    fn seek_to(&self, seconds: f64) -> Result<(), EngineError> {
        if seconds.is_nan() {
            return Err(EngineError::Command {
                command: "seek",
                reason: "position is not a number".to_string(),
            });
        }
        let at = Duration::try_from_secs_f64(seconds.max(0.0)).unwrap_or(Duration::MAX);
        self.send(EngineCmd::SeekTo(at))
    }

    fn set_repeat_mode(&self, mode: RepeatMode) -> Result<(), EngineError> {
        self.send(EngineCmd::SetRepeat(mode))
    }

    fn current_track(&self) -> Option<TrackId> {
        self.status().current
    }

    fn playback_state(&self) -> PlaybackState {
        self.status().state
    }

    fn progress(&self) -> ProgressSnapshot {
        let s = self.status();
        ProgressSnapshot::new(s.position.as_secs_f64(), s.duration.as_secs_f64())
    }

    fn shutdown(&self, fade_out: Duration) {
        let _ = self.send(EngineCmd::Quit { fade_out });

        if let Ok(mut j) = self.join.lock() {
            if let Some(h) = j.take() {
                let _ = h.join();
            }
        }
    }
}
