//! Active-track tracking: which track the carousel is showing.
//!
//! The active index is derived from the scroll offset and nothing else. One
//! observer registered on the carousel recomputes it on every offset report,
//! so labels follow the finger during a swipe instead of waiting for the page
//! to settle.

use std::cell::Cell;
use std::rc::Rc;

use tracing::debug;

use crate::carousel::{Carousel, ListenerId};

/// `round(offset / page_width)` clamped to `[0, page_count - 1]`.
///
/// Degenerate layouts (no pages, zero width, non-finite offset) map to 0.
pub fn active_index(offset: f32, page_width: f32, page_count: usize) -> usize {
    if page_count == 0 || page_width <= 0.0 || !offset.is_finite() {
        return 0;
    }
    let page = (offset / page_width).round();
    if page <= 0.0 {
        0
    } else {
        (page as usize).min(page_count - 1)
    }
}

/// What a skip does at the first/last track.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Default)]
pub enum SkipBoundary {
    /// Stay on the first/last page.
    #[default]
    Clamp,
    /// Request the out-of-range page and let the carousel stop at its edge.
    Unbounded,
}

/// Read-only view of the derived active index.
#[derive(Debug, Clone, Default)]
pub struct ActiveIndex(Rc<Cell<usize>>);

impl ActiveIndex {
    pub fn get(&self) -> usize {
        self.0.get()
    }

    fn set(&self, index: usize) {
        self.0.set(index);
    }
}

pub struct ActiveTrackTracker {
    active: ActiveIndex,
    listener: Option<ListenerId>,
    boundary: SkipBoundary,
}

impl ActiveTrackTracker {
    pub fn new(boundary: SkipBoundary) -> Self {
        Self {
            active: ActiveIndex::default(),
            listener: None,
            boundary,
        }
    }

    pub fn active(&self) -> ActiveIndex {
        self.active.clone()
    }

    pub fn active_index(&self) -> usize {
        self.active.get()
    }

    pub fn is_mounted(&self) -> bool {
        self.listener.is_some()
    }

    /// Register the offset observer. Mounting twice keeps the first observer.
    pub fn mount(&mut self, carousel: &mut Carousel) {
        if self.listener.is_some() {
            return;
        }
        let active = self.active.clone();
        let id = carousel.add_listener(move |ev| {
            active.set(active_index(ev.offset, ev.page_width, ev.page_count));
        });
        debug!(?id, "active-track observer registered");
        self.listener = Some(id);
    }

    pub fn unmount(&mut self, carousel: &mut Carousel) {
        if let Some(id) = self.listener.take() {
            carousel.remove_listener(id);
            debug!(?id, "active-track observer removed");
        }
    }

    /// Scroll one page forward. Returns the requested offset.
    ///
    /// The active index itself only changes as the carousel reports movement.
    pub fn skip_forward(&self, carousel: &mut Carousel) -> Option<f32> {
        self.skip(carousel, 1)
    }

    /// Scroll one page back. Returns the requested offset.
    pub fn skip_backward(&self, carousel: &mut Carousel) -> Option<f32> {
        self.skip(carousel, -1)
    }

    /// Scroll to `index` (used to follow the engine's current track).
    pub fn scroll_to_track(&self, carousel: &mut Carousel, index: usize) -> f32 {
        let offset = index as f32 * carousel.page_width();
        carousel.scroll_to_offset(offset);
        offset
    }

    fn skip(&self, carousel: &mut Carousel, step: i64) -> Option<f32> {
        let count = carousel.page_count();
        if count == 0 {
            return None;
        }
        let requested = self.active_index() as i64 + step;
        let target = match self.boundary {
            SkipBoundary::Clamp => requested.clamp(0, count as i64 - 1),
            SkipBoundary::Unbounded => requested,
        };
        let offset = target as f32 * carousel.page_width();
        carousel.scroll_to_offset(offset);
        Some(offset)
    }
}
