//! Time facilities for the frame loop and the pointer debounce.
//!
//! [`Clock`] is the single source of "now". Production code uses
//! [`SystemClock`]; tests drive a [`ManualClock`] so debounce windows can be
//! checked exactly. [`FrameTimer`] tracks per-frame timing for diagnostics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

/// A monotonic time source.
pub trait Clock: Send + Sync {
    fn now(&self) -> Instant;
}

/// Wall clock backed by [`Instant::now`].
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    #[inline]
    fn now(&self) -> Instant {
        Instant::now()
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same time, so a test can keep one handle and give another
/// to a [`Field`](crate::Field).
#[derive(Debug, Clone)]
pub struct ManualClock {
    origin: Instant,
    offset_nanos: Arc<AtomicU64>,
}

impl ManualClock {
    pub fn new() -> Self {
        Self {
            origin: Instant::now(),
            offset_nanos: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Move time forward.
    pub fn advance(&self, by: Duration) {
        self.offset_nanos.fetch_add(by.as_nanos() as u64, Ordering::SeqCst);
    }

    /// Time elapsed since the clock was created.
    pub fn elapsed(&self) -> Duration {
        Duration::from_nanos(self.offset_nanos.load(Ordering::SeqCst))
    }
}

impl Default for ManualClock {
    fn default() -> Self {
        Self::new()
    }
}

impl Clock for ManualClock {
    fn now(&self) -> Instant {
        self.origin + self.elapsed()
    }
}

/// Per-frame timing: frame count, delta and a periodically refreshed FPS.
#[derive(Debug)]
pub struct FrameTimer {
    last_frame: Instant,
    delta: Duration,
    frame_count: u64,
    fps: f32,
    fps_frame_count: u64,
    fps_update_time: Instant,
    fps_update_interval: Duration,
}

impl FrameTimer {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(now: Instant) -> Self {
        Self {
            last_frame: now,
            delta: Duration::ZERO,
            frame_count: 0,
            fps: 0.0,
            fps_frame_count: 0,
            fps_update_time: now,
            fps_update_interval: Duration::from_millis(500),
        }
    }

    /// Record a frame at `now`.
    ///
    /// Returns `true` when the FPS estimate was refreshed by this call.
    pub fn tick(&mut self, now: Instant) -> bool {
        self.delta = now.saturating_duration_since(self.last_frame);
        self.last_frame = now;
        self.frame_count += 1;

        let since_update = now.saturating_duration_since(self.fps_update_time);
        if since_update >= self.fps_update_interval {
            let frames = self.frame_count - self.fps_frame_count;
            self.fps = frames as f32 / since_update.as_secs_f32();
            self.fps_frame_count = self.frame_count;
            self.fps_update_time = now;
            return true;
        }
        false
    }

    /// How often the FPS estimate is refreshed.
    pub fn set_fps_interval(&mut self, interval: Duration) {
        self.fps_update_interval = interval;
    }

    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame_count
    }

    #[inline]
    pub fn delta(&self) -> Duration {
        self.delta
    }

    #[inline]
    pub fn fps(&self) -> f32 {
        self.fps
    }
}

impl Default for FrameTimer {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_advances_all_clones() {
        let clock = ManualClock::new();
        let other = clock.clone();
        let start = other.now();

        clock.advance(Duration::from_millis(40));

        assert_eq!(other.now() - start, Duration::from_millis(40));
        assert_eq!(other.elapsed(), Duration::from_millis(40));
    }

    #[test]
    fn test_frame_timer_counts_and_deltas() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        timer.tick(start + Duration::from_millis(16));
        timer.tick(start + Duration::from_millis(33));

        assert_eq!(timer.frame(), 2);
        assert_eq!(timer.delta(), Duration::from_millis(17));
    }

    #[test]
    fn test_frame_timer_fps_refresh() {
        let start = Instant::now();
        let mut timer = FrameTimer::starting_at(start);
        timer.set_fps_interval(Duration::from_secs(1));

        let mut refreshed = false;
        for i in 1..=60u64 {
            refreshed = timer.tick(start + Duration::from_micros(i * 16_667));
        }

        assert!(refreshed);
        assert!((timer.fps() - 60.0).abs() < 1.0);
    }

    #[test]
    fn test_frame_timer_tolerates_time_going_backwards() {
        let start = Instant::now() + Duration::from_secs(1);
        let mut timer = FrameTimer::starting_at(start);
        timer.tick(start - Duration::from_millis(5));
        assert_eq!(timer.delta(), Duration::ZERO);
    }
}
