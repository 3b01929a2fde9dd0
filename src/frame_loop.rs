//! Caller-owned run loop.
//!
//! [`FrameLoop`] drives a [`Field`] at a pace set by a [`FrameScheduler`]
//! until the field stops, a [`StopHandle`] fires, or an optional frame limit
//! is reached. Nothing reschedules itself: the loop is an ordinary `while`
//! that the owner can end deterministically.

use std::convert::Infallible;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::{Duration, Instant};

use log::debug;

use crate::field::Field;
use crate::surface::Surface;
use crate::time::FrameTimer;

const DEFAULT_FPS_INTERVAL: Duration = Duration::from_secs(5);

/// Paces frames.
pub trait FrameScheduler {
    /// Block until the next frame should run.
    fn wait_for_frame(&mut self);
}

/// Runs frames back to back. Useful for headless rendering and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct ImmediateScheduler;

impl FrameScheduler for ImmediateScheduler {
    fn wait_for_frame(&mut self) {}
}

/// Sleeps so that frames start at most once per interval.
#[derive(Debug, Clone)]
pub struct IntervalScheduler {
    interval: Duration,
    last_frame: Option<Instant>,
}

impl IntervalScheduler {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last_frame: None,
        }
    }

    /// Target a frame rate. Zero means unpaced.
    pub fn with_target_fps(fps: u32) -> Self {
        let interval = if fps == 0 {
            Duration::ZERO
        } else {
            Duration::from_secs(1) / fps
        };
        Self::new(interval)
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}

impl FrameScheduler for IntervalScheduler {
    fn wait_for_frame(&mut self) {
        if let Some(last) = self.last_frame {
            let elapsed = last.elapsed();
            if elapsed < self.interval {
                spin_sleep::sleep(self.interval - elapsed);
            }
        }
        self.last_frame = Some(Instant::now());
    }
}

/// Shareable flag that ends a [`FrameLoop`] after its current frame.
#[derive(Debug, Clone, Default)]
pub struct StopHandle(Arc<AtomicBool>);

impl StopHandle {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn stop(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

/// Drives `Field::tick` once per scheduled frame.
#[derive(Debug)]
pub struct FrameLoop<Sch: FrameScheduler> {
    scheduler: Sch,
    stop: StopHandle,
    max_frames: Option<u64>,
    fps_interval: Duration,
    timer: FrameTimer,
}

impl<Sch: FrameScheduler> FrameLoop<Sch> {
    pub fn new(scheduler: Sch) -> Self {
        Self {
            scheduler,
            stop: StopHandle::new(),
            max_frames: None,
            fps_interval: DEFAULT_FPS_INTERVAL,
            timer: FrameTimer::new(),
        }
    }

    /// How often the FPS estimate is refreshed and logged.
    pub fn with_fps_interval(mut self, interval: Duration) -> Self {
        self.fps_interval = interval;
        self
    }

    /// End the loop after this many frames.
    pub fn with_max_frames(mut self, frames: u64) -> Self {
        self.max_frames = Some(frames);
        self
    }

    /// A handle that stops this loop from anywhere.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    /// Timing of the most recent run, measured on the field's clock.
    pub fn timer(&self) -> &FrameTimer {
        &self.timer
    }

    /// Run until stopped. Returns the number of frames ticked.
    pub fn run<S: Surface + ?Sized>(&mut self, field: &mut Field, surface: &mut S) -> u64 {
        match self.run_with(field, surface, |_, _, _| Ok::<(), Infallible>(())) {
            Ok(frames) => frames,
            Err(never) => match never {},
        }
    }

    /// Run until stopped, calling `after_frame` with the field, the surface
    /// and the 1-based frame number after every tick. An error from the
    /// callback stops the field and is returned.
    pub fn run_with<S, F, E>(&mut self, field: &mut Field, surface: &mut S, mut after_frame: F) -> Result<u64, E>
    where
        S: Surface + ?Sized,
        F: FnMut(&Field, &S, u64) -> Result<(), E>,
    {
        if !field.is_running() {
            field.initialize(&*surface);
        }
        self.timer = FrameTimer::starting_at(field.now());
        self.timer.set_fps_interval(self.fps_interval);

        let mut frames = 0u64;
        while field.is_running() && !self.stop.is_stopped() {
            if self.max_frames.is_some_and(|max| frames >= max) {
                break;
            }
            self.scheduler.wait_for_frame();
            field.tick(surface);
            frames += 1;

            if self.timer.tick(field.now()) {
                debug!("{:.1} fps at frame {}", self.timer.fps(), self.timer.frame());
            }
            if let Err(e) = after_frame(field, surface, frames) {
                field.stop();
                return Err(e);
            }
        }

        field.stop();
        Ok(frames)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::FieldConfig;
    use crate::surface::RecordingSurface;
    use crate::time::ManualClock;

    fn small_field() -> Field {
        Field::new(FieldConfig::default().with_particle_count(5)).with_seed(3)
    }

    #[test]
    fn test_max_frames_ends_loop_and_stops_field() {
        let mut field = small_field();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut frame_loop = FrameLoop::new(ImmediateScheduler).with_max_frames(12);

        let frames = frame_loop.run(&mut field, &mut surface);

        assert_eq!(frames, 12);
        assert!(!field.is_running());
        assert_eq!(field.particles().len(), 5);
        assert_eq!(frame_loop.timer().frame(), 12);
    }

    #[test]
    fn test_stop_handle_from_callback() {
        let mut field = small_field();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut frame_loop = FrameLoop::new(ImmediateScheduler);
        let stop = frame_loop.stop_handle();

        let frames = frame_loop
            .run_with(&mut field, &mut surface, |_, _, n| {
                if n == 3 {
                    stop.stop();
                }
                Ok::<(), ()>(())
            })
            .unwrap();

        assert_eq!(frames, 3);
    }

    #[test]
    fn test_callback_error_propagates() {
        let mut field = small_field();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut frame_loop = FrameLoop::new(ImmediateScheduler).with_max_frames(10);

        let result = frame_loop.run_with(&mut field, &mut surface, |_, _, n| {
            if n == 2 {
                Err("disk full")
            } else {
                Ok(())
            }
        });

        assert_eq!(result, Err("disk full"));
        assert!(!field.is_running());
    }

    #[test]
    fn test_callback_sees_a_drawn_frame() {
        let mut field = small_field();
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut frame_loop = FrameLoop::new(ImmediateScheduler).with_max_frames(1);

        frame_loop
            .run_with(&mut field, &mut surface, |field, surface, _| {
                assert_eq!(surface.discs().count(), field.particles().len() * 2);
                Ok::<(), ()>(())
            })
            .unwrap();
    }

    #[test]
    fn test_interval_scheduler_paces_frames() {
        let mut scheduler = IntervalScheduler::new(Duration::from_millis(10));
        let start = Instant::now();
        for _ in 0..4 {
            scheduler.wait_for_frame();
        }
        // The first frame runs immediately; three intervals follow.
        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn test_target_fps_interval() {
        assert_eq!(IntervalScheduler::with_target_fps(50).interval(), Duration::from_millis(20));
        assert_eq!(IntervalScheduler::with_target_fps(0).interval(), Duration::ZERO);
    }

    #[test]
    fn test_fps_follows_field_clock() {
        let clock = ManualClock::new();
        let mut field = Field::with_clock(
            FieldConfig::default().with_particle_count(5),
            Arc::new(clock.clone()),
        )
        .with_seed(3);
        let mut surface = RecordingSurface::new(100.0, 100.0);
        let mut frame_loop = FrameLoop::new(ImmediateScheduler)
            .with_max_frames(11)
            .with_fps_interval(Duration::from_secs(1));

        frame_loop
            .run_with(&mut field, &mut surface, |_, _, _| {
                clock.advance(Duration::from_millis(100));
                Ok::<(), ()>(())
            })
            .unwrap();

        let timer = frame_loop.timer();
        assert_eq!(timer.frame(), 11);
        assert_eq!(timer.delta(), Duration::from_millis(100));
        assert!((timer.fps() - 11.0).abs() < 1e-3);
    }
}
