//! Horizontally paged track list: one page per track.
//!
//! The carousel owns the continuous scroll offset. User swipes move it
//! directly (`drag_by`); programmatic scrolls animate towards a target
//! (`scroll_to_offset`). Every offset change is reported to the registered
//! listeners. After a swipe goes quiet for the settle delay the carousel snaps
//! to the nearest page, and `tick` reports the page once motion stops.

use std::time::Duration;

use crate::tracker::active_index;

/// Offset report delivered to listeners.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScrollEvent {
    pub offset: f32,
    pub page_width: f32,
    pub page_count: usize,
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Listener = Box<dyn FnMut(&ScrollEvent)>;

#[derive(Debug, Copy, Clone, PartialEq)]
enum Motion {
    Idle,
    /// Finger down; `quiet` is the time since the last drag input.
    Dragging { quiet: Duration },
    Animating { target: f32 },
}

const EPSILON: f32 = 0.01;

pub struct Carousel {
    offset: f32,
    page_width: f32,
    page_count: usize,
    motion: Motion,
    /// Animation speed in pages per second.
    pages_per_second: f32,
    settle_delay: Duration,
    listeners: Vec<(ListenerId, Listener)>,
    next_listener: u64,
}

impl Carousel {
    pub fn new(page_count: usize, pages_per_second: f32, settle_delay: Duration) -> Self {
        Self {
            offset: 0.0,
            page_width: 0.0,
            page_count,
            motion: Motion::Idle,
            pages_per_second: pages_per_second.max(0.1),
            settle_delay,
            listeners: Vec::new(),
            next_listener: 0,
        }
    }

    pub fn offset(&self) -> f32 {
        self.offset
    }

    pub fn page_width(&self) -> f32 {
        self.page_width
    }

    pub fn page_count(&self) -> usize {
        self.page_count
    }

    pub fn max_offset(&self) -> f32 {
        self.page_count.saturating_sub(1) as f32 * self.page_width
    }

    pub fn is_idle(&self) -> bool {
        self.motion == Motion::Idle
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.motion, Motion::Dragging { .. })
    }

    /// Register an offset listener. It is called once right away with the
    /// current position, then on every offset change.
    pub fn add_listener(&mut self, listener: impl FnMut(&ScrollEvent) + 'static) -> ListenerId {
        let id = ListenerId(self.next_listener);
        self.next_listener += 1;

        let mut listener: Listener = Box::new(listener);
        listener(&self.event());
        self.listeners.push((id, listener));
        id
    }

    pub fn remove_listener(&mut self, id: ListenerId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Apply a swipe of `dx` (positive = towards later tracks).
    pub fn drag_by(&mut self, dx: f32) {
        if self.page_width <= 0.0 || self.page_count == 0 {
            return;
        }
        self.motion = Motion::Dragging {
            quiet: Duration::ZERO,
        };
        self.set_offset((self.offset + dx).clamp(0.0, self.max_offset()));
    }

    /// Animate towards `target`, clamped to the scrollable extent.
    pub fn scroll_to_offset(&mut self, target: f32) {
        if !target.is_finite() {
            return;
        }
        self.motion = Motion::Animating {
            target: target.clamp(0.0, self.max_offset()),
        };
    }

    /// Resize pages, keeping the current page in view.
    pub fn set_page_width(&mut self, width: f32) {
        let width = width.max(0.0);
        if (width - self.page_width).abs() < EPSILON {
            return;
        }
        let page = self.nearest_page();
        if let Motion::Animating { target } = self.motion {
            let target_page = if self.page_width > 0.0 {
                (target / self.page_width).round()
            } else {
                0.0
            };
            self.motion = Motion::Animating {
                target: target_page * width,
            };
        }
        self.page_width = width;
        self.set_offset(page as f32 * width);
    }

    /// Advance motion by `dt`. Returns the page motion settled on, if it
    /// stopped during this tick.
    pub fn tick(&mut self, dt: Duration) -> Option<usize> {
        match self.motion {
            Motion::Idle => None,
            Motion::Dragging { quiet } => {
                let quiet = quiet + dt;
                if quiet >= self.settle_delay {
                    let target = self.nearest_page() as f32 * self.page_width;
                    self.motion = Motion::Animating { target };
                } else {
                    self.motion = Motion::Dragging { quiet };
                }
                None
            }
            Motion::Animating { target } => {
                let step = self.pages_per_second * self.page_width * dt.as_secs_f32();
                let delta = target - self.offset;
                if delta.abs() <= step.max(EPSILON) {
                    self.set_offset(target);
                    self.motion = Motion::Idle;
                    Some(self.nearest_page())
                } else {
                    self.set_offset(self.offset + step.copysign(delta));
                    None
                }
            }
        }
    }

    fn nearest_page(&self) -> usize {
        active_index(self.offset, self.page_width, self.page_count)
    }

    fn event(&self) -> ScrollEvent {
        ScrollEvent {
            offset: self.offset,
            page_width: self.page_width,
            page_count: self.page_count,
        }
    }

    fn set_offset(&mut self, offset: f32) {
        if offset == self.offset {
            return;
        }
        self.offset = offset;
        let ev = self.event();
        for (_, listener) in &mut self.listeners {
            listener(&ev);
        }
    }
}
