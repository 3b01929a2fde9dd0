//! The drawing surface abstraction.
//!
//! A [`Surface`] is anything that can clear itself and draw alpha-blended
//! lines and discs in pixel coordinates. [`RasterSurface`](crate::RasterSurface)
//! draws into an RGBA image; [`RecordingSurface`] just records the calls.

use glam::Vec2;

use crate::visuals::Rgb;

/// A 2D drawing target measured in pixels.
pub trait Surface {
    fn width(&self) -> f32;
    fn height(&self) -> f32;

    /// Clear the whole surface.
    fn clear(&mut self);

    /// Stroke a line segment.
    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32);

    /// Fill a disc.
    fn draw_disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32);

    /// `(width, height)` as a vector.
    fn size(&self) -> Vec2 {
        Vec2::new(self.width(), self.height())
    }
}

/// One recorded draw call.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum DrawCommand {
    Clear,
    Line {
        from: Vec2,
        to: Vec2,
        color: Rgb,
        alpha: f32,
        width: f32,
    },
    Disc {
        center: Vec2,
        radius: f32,
        color: Rgb,
        alpha: f32,
    },
}

/// A surface that keeps every draw call since the last clear.
#[derive(Debug, Clone, Default)]
pub struct RecordingSurface {
    width: f32,
    height: f32,
    commands: Vec<DrawCommand>,
}

impl RecordingSurface {
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            commands: Vec::new(),
        }
    }

    pub fn resize(&mut self, width: f32, height: f32) {
        self.width = width;
        self.height = height;
    }

    /// Calls since (and including) the last clear.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn lines(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Line { .. }))
    }

    pub fn discs(&self) -> impl Iterator<Item = &DrawCommand> {
        self.commands
            .iter()
            .filter(|c| matches!(c, DrawCommand::Disc { .. }))
    }
}

impl Surface for RecordingSurface {
    fn width(&self) -> f32 {
        self.width
    }

    fn height(&self) -> f32 {
        self.height
    }

    fn clear(&mut self) {
        self.commands.clear();
        self.commands.push(DrawCommand::Clear);
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32) {
        self.commands.push(DrawCommand::Line {
            from,
            to,
            color,
            alpha,
            width,
        });
    }

    fn draw_disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        self.commands.push(DrawCommand::Disc {
            center,
            radius,
            color,
            alpha,
        });
    }
}
