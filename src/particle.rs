//! A single drifting point.
//!
//! Particles drift at their home velocity, get pulled toward the pointer when
//! it is near, bounce off the surface edges with some energy loss, and slow
//! down a little every frame.

use glam::Vec2;
use rand::Rng;

use crate::surface::Surface;
use crate::visuals::VisualConfig;

/// Hard cap on particle speed, in pixels per frame.
pub const MAX_SPEED: f32 = 5.0;

/// Velocity gained per frame at full pointer force.
const ATTRACTION: f32 = 0.1;
/// Fraction of the gap to the home velocity closed per frame.
const RELAXATION: f32 = 0.02;
/// Velocity kept (and reversed) on a wall hit.
const WALL_DAMPING: f32 = 0.8;
/// Velocity kept per frame.
const FRICTION: f32 = 0.99;

/// A point mass with fixed visual attributes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Particle {
    position: Vec2,
    velocity: Vec2,
    home_velocity: Vec2,
    size: f32,
    opacity: f32,
    bounds: Vec2,
}

impl Particle {
    /// A particle at rest at its home velocity.
    ///
    /// `bounds` is the surface size the particle collides against.
    pub fn new(position: Vec2, velocity: Vec2, size: f32, opacity: f32, bounds: Vec2) -> Self {
        Self {
            position,
            velocity,
            home_velocity: velocity,
            size,
            opacity,
            bounds,
        }
    }

    /// A random particle somewhere on a `width` x `height` surface.
    ///
    /// A zero-sized surface puts every particle at the origin.
    pub fn spawn<R: Rng + ?Sized>(rng: &mut R, width: f32, height: f32) -> Self {
        let width = width.max(0.0);
        let height = height.max(0.0);
        let position = Vec2::new(rng.gen::<f32>() * width, rng.gen::<f32>() * height);
        let velocity = Vec2::new(rng.gen_range(-1.0..1.0), rng.gen_range(-1.0..1.0));
        Self::new(
            position,
            velocity,
            rng.gen_range(1.0..4.0),
            rng.gen_range(0.2..1.0),
            Vec2::new(width, height),
        )
    }

    /// Override the current velocity, keeping the home velocity.
    pub fn with_velocity(mut self, velocity: Vec2) -> Self {
        self.velocity = velocity;
        self
    }

    /// Advance one frame.
    ///
    /// Attraction depends on distance only; `_is_pointer_moving` is accepted so
    /// callers can pass the debounced flag through, but it does not gate the
    /// pull.
    pub fn update(&mut self, pointer: Vec2, _is_pointer_moving: bool, mouse_radius: f32) {
        let offset = pointer - self.position;
        let distance = offset.length();

        if distance < mouse_radius {
            // Coincident with the pointer: no direction to pull in.
            if distance > 0.0 {
                let force = (mouse_radius - distance) / mouse_radius;
                let angle = offset.y.atan2(offset.x);
                self.velocity += Vec2::from_angle(angle) * force * ATTRACTION;
            }
        } else {
            self.velocity += (self.home_velocity - self.velocity) * RELAXATION;
        }

        self.velocity = self.velocity.clamp_length_max(MAX_SPEED);
        self.position += self.velocity;

        if self.position.x < 0.0 || self.position.x > self.bounds.x {
            self.velocity.x *= -WALL_DAMPING;
            self.position.x = self.position.x.clamp(0.0, self.bounds.x);
        }
        if self.position.y < 0.0 || self.position.y > self.bounds.y {
            self.velocity.y *= -WALL_DAMPING;
            self.position.y = self.position.y.clamp(0.0, self.bounds.y);
        }

        self.velocity *= FRICTION;
    }

    /// Draw the core disc, then its halo.
    pub fn draw<S: Surface + ?Sized>(&self, surface: &mut S, visuals: &VisualConfig) {
        surface.draw_disc(self.position, self.size, visuals.particle_color, self.opacity);
        surface.draw_disc(
            self.position,
            self.size * visuals.halo_scale,
            visuals.halo_color,
            self.opacity * visuals.halo_opacity,
        );
    }

    #[inline]
    pub fn position(&self) -> Vec2 {
        self.position
    }

    #[inline]
    pub fn velocity(&self) -> Vec2 {
        self.velocity
    }

    #[inline]
    pub fn home_velocity(&self) -> Vec2 {
        self.home_velocity
    }

    #[inline]
    pub fn size(&self) -> f32 {
        self.size
    }

    #[inline]
    pub fn opacity(&self) -> f32 {
        self.opacity
    }

    #[inline]
    pub fn bounds(&self) -> Vec2 {
        self.bounds
    }
}
