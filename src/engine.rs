//! Playback engine boundary.
//!
//! The UI never talks to audio output directly: it holds a [`Player`], a
//! best-effort wrapper around any [`PlaybackEngine`]. The production engine
//! is [`RodioEngine`], which owns a `rodio` sink on a worker thread.

mod player;
mod rodio_engine;
mod sink;
mod types;
mod worker;

pub use player::Player;
pub use rodio_engine::RodioEngine;
pub use types::*;

#[cfg(test)]
pub(crate) mod fake;
