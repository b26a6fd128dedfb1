//! Application module: exposes the screen model used by the TUI and runtime.
//!
//! The `App` model lives in `app::model` and holds the catalog, the carousel
//! and the last known engine state.

mod model;

pub use model::*;

#[cfg(test)]
mod tests;
