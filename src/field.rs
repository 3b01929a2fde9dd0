//! The simulation field.
//!
//! A [`Field`] owns every particle, the pointer state and the current config.
//! Each [`tick`](Field::tick) drains queued input, settles the pointer
//! debounce, advances every particle once and draws one frame.
//!
//! # Example
//!
//! ```ignore
//! let mut surface = RasterSurface::new(800, 600);
//! let mut field = Field::new(FieldConfig::default());
//! field.initialize(&surface);
//! field.apply_performance_tier(PerformanceHint::detect(800.0).is_low_power());
//!
//! field.set_pointer(400.0, 300.0);
//! field.tick(&mut surface);
//! ```

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use glam::Vec2;
use log::{debug, info};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::config::FieldConfig;
use crate::connections::draw_connections;
use crate::input::{InputEvent, InputQueue, InputSender};
use crate::particle::Particle;
use crate::pointer::PointerState;
use crate::surface::Surface;
use crate::time::{Clock, SystemClock};

/// The particle backdrop simulation.
pub struct Field {
    config: FieldConfig,
    particles: Vec<Particle>,
    pointer: PointerState,
    width: f32,
    height: f32,
    rng: StdRng,
    clock: Arc<dyn Clock>,
    input: InputQueue,
    running: bool,
}

impl Field {
    /// An idle field on the system clock. No particles exist until
    /// [`initialize`](Self::initialize) or [`resize`](Self::resize).
    pub fn new(config: FieldConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    /// An idle field reading time from `clock`.
    pub fn with_clock(config: FieldConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            particles: Vec::new(),
            pointer: PointerState::new(),
            width: 0.0,
            height: 0.0,
            rng: StdRng::from_entropy(),
            clock,
            input: InputQueue::new(),
            running: false,
        }
    }

    /// Make particle generation deterministic.
    pub fn with_seed(mut self, seed: u64) -> Self {
        self.rng = StdRng::seed_from_u64(seed);
        self
    }

    // ========== Lifecycle ==========

    /// Adopt the surface's size, generate particles and start running.
    pub fn initialize<S: Surface + ?Sized>(&mut self, surface: &S) {
        self.width = sanitize_extent(surface.width());
        self.height = sanitize_extent(surface.height());
        self.regenerate();
        self.start();
        info!(
            "Field initialized: {} particles on {}x{}",
            self.particles.len(),
            self.width,
            self.height
        );
    }

    /// Mark the field as running.
    pub fn start(&mut self) {
        self.running = true;
    }

    /// Stop running and cancel any pending pointer deadline.
    pub fn stop(&mut self) {
        if self.running {
            info!("Field stopped");
        }
        self.running = false;
        self.pointer.cancel();
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    // ========== Configuration ==========

    /// Change the surface size. All particles are regenerated.
    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = sanitize_extent(width);
        self.height = sanitize_extent(height);
        self.regenerate();
        debug!("Field resized to {}x{}", self.width, self.height);
    }

    /// Replace the config wholesale. All particles are regenerated.
    pub fn set_config(&mut self, config: FieldConfig) {
        self.config = config;
        self.regenerate();
    }

    /// Switch to the low power profile when `is_low_power` is set.
    pub fn apply_performance_tier(&mut self, is_low_power: bool) {
        if !is_low_power {
            debug!("Full performance tier: {} particles", self.config.particle_count);
            return;
        }
        self.config = self.config.low_power_variant();
        self.regenerate();
        info!(
            "Low power tier: {} particles, link distance {}",
            self.config.particle_count, self.config.max_distance
        );
    }

    fn regenerate(&mut self) {
        let count = self.config.particle_count;
        let mut particles = Vec::with_capacity(count);
        for _ in 0..count {
            particles.push(Particle::spawn(&mut self.rng, self.width, self.height));
        }
        self.particles = particles;
    }

    // ========== Input ==========

    /// Record a pointer move now.
    pub fn set_pointer(&mut self, x: f32, y: f32) {
        let now = self.clock.now();
        self.pointer.move_to(Vec2::new(x, y), now);
    }

    /// A handle other threads can use to queue input for the next tick.
    pub fn input_sender(&self) -> InputSender {
        self.input.sender(Arc::clone(&self.clock))
    }

    /// Apply one input event as if it happened at `at`.
    pub fn apply_input(&mut self, at: Instant, event: InputEvent) {
        match event {
            InputEvent::PointerMoved { x, y } | InputEvent::TouchMoved { x, y } => {
                self.pointer.move_to(Vec2::new(x, y), at);
            }
            InputEvent::TouchStarted { x, y } => self.pointer.touch_at(Vec2::new(x, y)),
            InputEvent::PointerEntered => self.pointer.hold(),
            InputEvent::Resized { width, height } => self.resize(width, height),
        }
    }

    fn process_input(&mut self) {
        for (at, event) in self.input.drain() {
            self.apply_input(at, event);
        }
    }

    // ========== Frame ==========

    /// Run one frame: input, debounce, update, draw.
    pub fn tick<S: Surface + ?Sized>(&mut self, surface: &mut S) {
        self.process_input();
        if self.pointer.settle(self.clock.now()) {
            debug!("Pointer settled");
        }
        self.update();
        self.draw(surface);
    }

    /// Advance every particle one step.
    pub fn update(&mut self) {
        let pointer = self.pointer.position();
        let moving = self.pointer.is_moving(self.clock.now());
        let radius = self.config.mouse_radius;
        for particle in &mut self.particles {
            particle.update(pointer, moving, radius);
        }
    }

    /// Clear the surface, then draw links followed by particles.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S) {
        let visuals = &self.config.visuals;
        surface.clear();
        draw_connections(
            surface,
            &self.particles,
            self.config.max_distance,
            self.config.connection_opacity,
            visuals,
        );
        for particle in &self.particles {
            particle.draw(surface, visuals);
        }
    }

    // ========== Accessors ==========

    pub fn particles(&self) -> &[Particle] {
        &self.particles
    }

    /// Mutable access to the particles. The count cannot change.
    pub fn particles_mut(&mut self) -> &mut [Particle] {
        &mut self.particles
    }

    pub fn config(&self) -> &FieldConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// The current time on the field's clock.
    pub fn now(&self) -> Instant {
        self.clock.now()
    }

    pub fn is_pointer_moving(&self) -> bool {
        self.pointer.is_moving(self.clock.now())
    }

    /// Surface size as `(width, height)`.
    pub fn size(&self) -> Vec2 {
        Vec2::new(self.width, self.height)
    }
}

impl fmt::Debug for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Field")
            .field("particles", &self.particles.len())
            .field("width", &self.width)
            .field("height", &self.height)
            .field("pointer", &self.pointer)
            .field("running", &self.running)
            .finish_non_exhaustive()
    }
}

/// Negative or NaN extents collapse to zero.
fn sanitize_extent(value: f32) -> f32 {
    if value.is_finite() {
        value.max(0.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::surface::RecordingSurface;
    use crate::time::ManualClock;
    use std::time::Duration;

    fn field_with_clock(config: FieldConfig) -> (Field, ManualClock) {
        let clock = ManualClock::new();
        let field = Field::with_clock(config, Arc::new(clock.clone())).with_seed(42);
        (field, clock)
    }

    #[test]
    fn test_new_field_is_idle_and_empty() {
        let field = Field::new(FieldConfig::default());
        assert!(!field.is_running());
        assert!(field.particles().is_empty());
        assert_eq!(field.pointer().position(), Vec2::ZERO);
    }

    #[test]
    fn test_initialize_reads_surface_and_starts() {
        let (mut field, _) = field_with_clock(FieldConfig::default().with_particle_count(25));
        field.initialize(&RecordingSurface::new(320.0, 200.0));

        assert!(field.is_running());
        assert_eq!(field.size(), Vec2::new(320.0, 200.0));
        assert_eq!(field.particles().len(), 25);
    }

    #[test]
    fn test_stop_cancels_pending_debounce() {
        let (mut field, _) = field_with_clock(FieldConfig::default().with_particle_count(1));
        field.initialize(&RecordingSurface::new(100.0, 100.0));
        field.set_pointer(5.0, 5.0);
        assert!(field.is_pointer_moving());

        field.stop();
        assert!(!field.is_running());
        assert!(!field.is_pointer_moving());
    }

    #[test]
    fn test_tick_settles_pointer_after_delay() {
        let (mut field, clock) = field_with_clock(FieldConfig::default().with_particle_count(1));
        let mut surface = RecordingSurface::new(100.0, 100.0);
        field.initialize(&surface);

        field.set_pointer(50.0, 50.0);
        clock.advance(Duration::from_millis(99));
        field.tick(&mut surface);
        assert!(field.is_pointer_moving());

        clock.advance(Duration::from_millis(1));
        field.tick(&mut surface);
        assert!(!field.is_pointer_moving());
        assert_eq!(field.pointer().motion(), crate::pointer::Motion::Idle);
    }

    #[test]
    fn test_queued_resize_applies_on_tick() {
        let (mut field, _) = field_with_clock(FieldConfig::default().with_particle_count(10));
        let mut surface = RecordingSurface::new(100.0, 100.0);
        field.initialize(&surface);

        field.input_sender().send(InputEvent::Resized {
            width: 40.0,
            height: 30.0,
        });
        field.tick(&mut surface);

        assert_eq!(field.size(), Vec2::new(40.0, 30.0));
        assert_eq!(field.particles().len(), 10);
        for p in field.particles() {
            assert!(p.position().x <= 40.0 && p.position().y <= 30.0);
        }
    }

    #[test]
    fn test_enter_and_touch_start_hold_the_flag() {
        let (mut field, clock) = field_with_clock(FieldConfig::default().with_particle_count(1));
        let mut surface = RecordingSurface::new(100.0, 100.0);
        field.initialize(&surface);

        let sender = field.input_sender();
        sender.send(InputEvent::TouchStarted { x: 7.0, y: 8.0 });
        field.tick(&mut surface);
        clock.advance(Duration::from_secs(5));
        field.tick(&mut surface);

        assert!(field.is_pointer_moving());
        assert_eq!(field.pointer().position(), Vec2::new(7.0, 8.0));
    }

    #[test]
    fn test_negative_and_nan_sizes_collapse_to_zero() {
        let (mut field, _) = field_with_clock(FieldConfig::default().with_particle_count(3));
        field.resize(-5.0, f32::NAN);
        assert_eq!(field.size(), Vec2::ZERO);
        for p in field.particles() {
            assert_eq!(p.position(), Vec2::ZERO);
        }
    }

    #[test]
    fn test_set_config_regenerates() {
        let (mut field, _) = field_with_clock(FieldConfig::default().with_particle_count(3));
        field.resize(100.0, 100.0);
        field.set_config(FieldConfig::default().with_particle_count(9));
        assert_eq!(field.particles().len(), 9);
        assert_eq!(field.config().particle_count, 9);
    }
}
