//! Pointer position and the "is moving" debounce.
//!
//! Mouse and single-finger touch input share one pointer. Each move marks the
//! pointer as moving and pushes a deadline 100 ms into the future; once a tick
//! observes the deadline has passed the pointer settles. Only the most recent
//! deadline counts.

use std::time::{Duration, Instant};

use glam::Vec2;

/// How long after the last move the pointer is still considered moving.
pub const POINTER_SETTLE_DELAY: Duration = Duration::from_millis(100);

/// Whether the pointer is moving, and until when.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Motion {
    /// Not moving.
    #[default]
    Idle,
    /// Flagged as moving with no pending deadline (enter, touch start).
    Held,
    /// Moving until the deadline passes.
    Until(Instant),
}

/// Last known pointer position plus its motion state.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    position: Vec2,
    motion: Motion,
}

impl PointerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a move at `now` and rearm the settle deadline.
    pub fn move_to(&mut self, position: Vec2, now: Instant) {
        self.position = position;
        self.motion = Motion::Until(now + POINTER_SETTLE_DELAY);
    }

    /// Flag the pointer as moving without touching its position or arming a
    /// deadline.
    pub fn hold(&mut self) {
        self.motion = match self.motion {
            // A pending deadline keeps ownership of the flag.
            pending @ Motion::Until(_) => pending,
            _ => Motion::Held,
        };
    }

    /// Record a touch start: new position, moving, no deadline.
    pub fn touch_at(&mut self, position: Vec2) {
        self.position = position;
        self.hold();
    }

    /// Drop any pending deadline and mark the pointer idle.
    pub fn cancel(&mut self) {
        self.motion = Motion::Idle;
    }

    /// Resolve an expired deadline. Returns `true` if the pointer settled.
    pub fn settle(&mut self, now: Instant) -> bool {
        match self.motion {
            Motion::Until(deadline) if now >= deadline => {
                self.motion = Motion::Idle;
                true
            }
            _ => false,
        }
    }

    /// Whether the pointer counts as moving at `now`.
    pub fn is_moving(&self, now: Instant) -> bool {
        match self.motion {
            Motion::Idle => false,
            Motion::Held => true,
            Motion::Until(deadline) => now < deadline,
        }
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn motion(&self) -> Motion {
        self.motion
    }
}
