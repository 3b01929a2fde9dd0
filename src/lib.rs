//! # driftfield
//!
//! An ambient particle backdrop: points drift across a 2D surface, lean toward
//! the pointer when it comes near, bounce off the edges and are linked by faint
//! lines when they pass close to each other.
//!
//! ## Quick Start
//!
//! ```ignore
//! use driftfield::prelude::*;
//!
//! fn main() {
//!     let mut surface = RasterSurface::new(800, 600);
//!     let mut field = Field::new(FieldConfig::default().with_particle_count(300));
//!
//!     FrameLoop::new(IntervalScheduler::with_target_fps(60))
//!         .with_max_frames(600)
//!         .run(&mut field, &mut surface);
//! }
//! ```
//!
//! ## Core Concepts
//!
//! ### Field
//!
//! [`Field`] owns the particles, the pointer and the [`FieldConfig`]. One
//! [`Field::tick`] drains queued input, updates every particle once and draws
//! one frame onto a [`Surface`]. Resizing or replacing the config regenerates
//! every particle.
//!
//! ### Per-frame physics
//!
//! | Step | Effect |
//! |------|--------|
//! | Attraction | within `mouse_radius`, pull toward the pointer, stronger when closer |
//! | Relaxation | otherwise ease back toward the particle's home velocity |
//! | Speed limit | cap speed at [`MAX_SPEED`] |
//! | Walls | reverse and damp velocity, clamp into the surface |
//! | Friction | lose 1% of velocity |
//!
//! ### Drawing
//!
//! Particles closer than `max_distance` are linked by a line whose alpha fades
//! to zero at that distance. Each particle is then drawn as a disc with a
//! larger, fainter halo.
//!
//! ### Hosts
//!
//! Anything implementing [`Surface`] can be drawn on. [`RasterSurface`] is a
//! software rasterizer; with the `window` feature, [`window::run`] presents it
//! in a native window.

pub mod config;
pub mod connections;
pub mod error;
mod field;
pub mod frame_loop;
pub mod input;
pub mod logging;
pub mod particle;
pub mod performance;
pub mod pointer;
mod raster;
pub mod surface;
pub mod time;
pub mod visuals;

#[cfg(feature = "window")]
mod present;
#[cfg(feature = "window")]
pub mod window;

pub use glam::Vec2;

pub use config::{FieldConfig, LowPowerProfile};
pub use connections::{connection_alpha, Connection};
pub use error::{ConfigError, RenderError};
pub use field::Field;
pub use frame_loop::{FrameLoop, FrameScheduler, ImmediateScheduler, IntervalScheduler, StopHandle};
pub use input::{InputEvent, InputSender};
pub use particle::{Particle, MAX_SPEED};
pub use performance::PerformanceHint;
pub use pointer::{PointerState, POINTER_SETTLE_DELAY};
pub use raster::RasterSurface;
pub use surface::{DrawCommand, RecordingSurface, Surface};
pub use time::{Clock, FrameTimer, ManualClock, SystemClock};
pub use visuals::{Rgb, VisualConfig};

#[cfg(feature = "window")]
pub use error::{AppError, PresentError};
#[cfg(feature = "window")]
pub use present::Presenter;

/// Convenient re-exports for common usage.
///
/// ```ignore
/// use driftfield::prelude::*;
/// ```
pub mod prelude {
    pub use crate::config::{FieldConfig, LowPowerProfile};
    pub use crate::field::Field;
    pub use crate::frame_loop::{FrameLoop, FrameScheduler, ImmediateScheduler, IntervalScheduler, StopHandle};
    pub use crate::input::{InputEvent, InputSender};
    pub use crate::particle::Particle;
    pub use crate::performance::PerformanceHint;
    pub use crate::raster::RasterSurface;
    pub use crate::surface::{RecordingSurface, Surface};
    pub use crate::visuals::{Rgb, VisualConfig};
    pub use crate::Vec2;
}
