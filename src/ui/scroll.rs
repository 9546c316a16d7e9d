//! Scroll-section visibility state.
//!
//! Mirrors an intersection-observer driven fade: a section is `Hidden`
//! until it intersects the viewport, `Visible` while it does, and `Leaving`
//! for a short grace period after it stops intersecting so the exit
//! animation can play before the section hides. Re-entering during the
//! grace period cancels the pending hide.
//!
//! Time is passed in explicitly so the machine stays deterministic under
//! test.

use std::time::{Duration, Instant};

/// How long a leaving section stays rendered before hiding.
pub const LEAVE_GRACE: Duration = Duration::from_millis(300);

/// Visibility classification driving the fade/slide animation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    Hidden,
    Leaving,
    Visible,
}

/// Per-section visibility state machine.
#[derive(Debug, Clone)]
pub struct ScrollSection {
    visibility: Visibility,
    hide_after: Option<Instant>,
}

impl ScrollSection {
    pub fn new() -> Self {
        Self {
            visibility: Visibility::Hidden,
            hide_after: None,
        }
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    /// The section started intersecting the viewport.
    pub fn enter(&mut self) {
        self.visibility = Visibility::Visible;
        self.hide_after = None;
    }

    /// The section stopped intersecting the viewport.
    pub fn leave(&mut self, now: Instant) {
        if self.visibility == Visibility::Hidden {
            return;
        }
        self.visibility = Visibility::Leaving;
        self.hide_after = Some(now + LEAVE_GRACE);
    }

    /// Advance the machine: a leaving section hides once its grace period
    /// has elapsed.
    pub fn poll(&mut self, now: Instant) {
        if let Some(deadline) = self.hide_after {
            if now >= deadline {
                self.visibility = Visibility::Hidden;
                self.hide_after = None;
            }
        }
    }
}

impl Default for ScrollSection {
    fn default() -> Self {
        Self::new()
    }
}
