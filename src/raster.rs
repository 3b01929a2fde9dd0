//! Software rasterizer.
//!
//! [`RasterSurface`] draws into an 8-bit RGBA [`image::RgbaImage`] with
//! source-over blending and coverage-based anti-aliasing. It is what the
//! windowed host uploads each frame and what the headless renderer saves.

use std::path::Path;

use glam::Vec2;
use image::{ImageFormat, Rgba, RgbaImage};

use crate::error::RenderError;
use crate::surface::Surface;
use crate::visuals::Rgb;

/// An RGBA pixel buffer implementing [`Surface`].
#[derive(Debug, Clone)]
pub struct RasterSurface {
    image: RgbaImage,
    background: Option<Rgb>,
}

impl RasterSurface {
    /// A transparent surface of the given pixel size. Zero sizes are allowed.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            image: RgbaImage::new(width, height),
            background: None,
        }
    }

    /// Clear to an opaque color instead of transparent.
    pub fn with_background(mut self, background: Option<Rgb>) -> Self {
        self.background = background;
        self
    }

    pub fn set_background(&mut self, background: Option<Rgb>) {
        self.background = background;
    }

    /// Reallocate to a new size. Contents are discarded.
    pub fn resize(&mut self, width: u32, height: u32) {
        if self.image.dimensions() != (width, height) {
            self.image = RgbaImage::new(width, height);
        }
    }

    #[inline]
    pub fn pixel_width(&self) -> u32 {
        self.image.width()
    }

    #[inline]
    pub fn pixel_height(&self) -> u32 {
        self.image.height()
    }

    /// Row-major RGBA bytes.
    pub fn as_raw(&self) -> &[u8] {
        self.image.as_raw()
    }

    pub fn image(&self) -> &RgbaImage {
        &self.image
    }

    /// The RGBA value at a pixel, if in range.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        self.image.get_pixel_checked(x, y).map(|p| p.0)
    }

    /// Write the current frame as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> Result<(), RenderError> {
        let (width, height) = self.image.dimensions();
        if width == 0 || height == 0 {
            return Err(RenderError::EmptyFrame { width, height });
        }
        self.image.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// Source-over blend of `color` at `alpha` onto one pixel.
    fn blend(&mut self, x: i64, y: i64, color: Rgb, alpha: f32) {
        if x < 0 || y < 0 || x >= self.image.width() as i64 || y >= self.image.height() as i64 {
            return;
        }
        let sa = alpha.clamp(0.0, 1.0);
        if sa <= 0.0 {
            return;
        }
        let dst = self.image.get_pixel_mut(x as u32, y as u32);
        let da = dst.0[3] as f32 / 255.0;
        let out_a = sa + da * (1.0 - sa);
        let src = color.to_array();
        let mut out = [0u8; 4];
        for c in 0..3 {
            let s = src[c] as f32;
            let d = dst.0[c] as f32;
            let v = (s * sa + d * da * (1.0 - sa)) / out_a;
            out[c] = v.round().clamp(0.0, 255.0) as u8;
        }
        out[3] = (out_a * 255.0).round().clamp(0.0, 255.0) as u8;
        *dst = Rgba(out);
    }
}

impl Surface for RasterSurface {
    fn width(&self) -> f32 {
        self.image.width() as f32
    }

    fn height(&self) -> f32 {
        self.image.height() as f32
    }

    fn clear(&mut self) {
        let fill = match self.background {
            Some(c) => Rgba([c.r, c.g, c.b, 255]),
            None => Rgba([0, 0, 0, 0]),
        };
        for p in self.image.pixels_mut() {
            *p = fill;
        }
    }

    fn draw_line(&mut self, from: Vec2, to: Vec2, color: Rgb, alpha: f32, width: f32) {
        if !alpha.is_finite() || !from.is_finite() || !to.is_finite() || width <= 0.0 {
            return;
        }
        let delta = to - from;
        // Walk the major axis one pixel column at a time.
        let steep = delta.y.abs() > delta.x.abs();
        let (mut a, mut b) = if steep {
            (Vec2::new(from.y, from.x), Vec2::new(to.y, to.x))
        } else {
            (from, to)
        };
        if a.x > b.x {
            std::mem::swap(&mut a, &mut b);
        }
        let run = b.x - a.x;
        if run <= f32::EPSILON {
            return;
        }
        let gradient = (b.y - a.y) / run;
        let half = 0.5 * width * (1.0 + gradient * gradient).sqrt();

        let (major_len, minor_len) = if steep {
            (self.image.height() as i64, self.image.width() as i64)
        } else {
            (self.image.width() as i64, self.image.height() as i64)
        };
        let major_start = (a.x.floor() as i64).max(0);
        let major_end = (b.x.ceil() as i64).min(major_len);

        for major in major_start..major_end {
            let m0 = (major as f32).max(a.x);
            let m1 = ((major + 1) as f32).min(b.x);
            let along = m1 - m0;
            if along <= 0.0 {
                continue;
            }
            let center = a.y + gradient * ((m0 + m1) * 0.5 - a.x);
            let lo = center - half;
            let hi = center + half;
            let minor_start = (lo.floor() as i64).max(0);
            let minor_end = (hi.ceil() as i64).min(minor_len);
            for minor in minor_start..minor_end {
                let across = ((minor + 1) as f32).min(hi) - (minor as f32).max(lo);
                if across <= 0.0 {
                    continue;
                }
                let coverage = across.min(1.0) * along;
                if steep {
                    self.blend(minor, major, color, alpha * coverage);
                } else {
                    self.blend(major, minor, color, alpha * coverage);
                }
            }
        }
    }

    fn draw_disc(&mut self, center: Vec2, radius: f32, color: Rgb, alpha: f32) {
        if !alpha.is_finite() || !center.is_finite() || !(radius > 0.0) {
            return;
        }
        // Only the part of the bounding box that lands on the image.
        let x0 = ((center.x - radius - 1.0).floor() as i64).max(0);
        let x1 = ((center.x + radius + 1.0).ceil() as i64).min(self.image.width() as i64);
        let y0 = ((center.y - radius - 1.0).floor() as i64).max(0);
        let y1 = ((center.y + radius + 1.0).ceil() as i64).min(self.image.height() as i64);
        for y in y0..y1 {
            for x in x0..x1 {
                let sample = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
                let coverage = (radius + 0.5 - sample.distance(center)).clamp(0.0, 1.0);
                if coverage > 0.0 {
                    self.blend(x, y, color, alpha * coverage);
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::visuals::VisualConfig;

    #[test]
    fn test_clear_transparent_and_background() {
        let mut s = RasterSurface::new(4, 4);
        s.clear();
        assert_eq!(s.pixel(1, 1), Some([0, 0, 0, 0]));

        s.set_background(Some(Rgb::new(10, 20, 30)));
        s.clear();
        assert_eq!(s.pixel(3, 3), Some([10, 20, 30, 255]));
    }

    #[test]
    fn test_disc_center_is_opaque_and_far_pixels_untouched() {
        let mut s = RasterSurface::new(20, 20);
        s.clear();
        s.draw_disc(Vec2::new(10.0, 10.0), 3.0, Rgb::WHITE, 1.0);

        assert_eq!(s.pixel(10, 10), Some([255, 255, 255, 255]));
        assert_eq!(s.pixel(0, 0), Some([0, 0, 0, 0]));
        assert_eq!(s.pixel(19, 10), Some([0, 0, 0, 0]));
    }

    #[test]
    fn test_half_alpha_over_opaque_black() {
        let mut s = RasterSurface::new(8, 8).with_background(Some(Rgb::BLACK));
        s.clear();
        s.draw_disc(Vec2::new(4.0, 4.0), 3.0, Rgb::WHITE, 0.5);

        let [r, g, b, a] = s.pixel(4, 4).unwrap();
        assert_eq!(a, 255);
        assert!((r as i32 - 128).abs() <= 1);
        assert_eq!(r, g);
        assert_eq!(g, b);
    }

    #[test]
    fn test_horizontal_line_covers_its_row() {
        let mut s = RasterSurface::new(10, 5);
        s.clear();
        s.draw_line(Vec2::new(1.0, 2.5), Vec2::new(9.0, 2.5), Rgb::WHITE, 1.0, 1.0);

        for x in 1..9 {
            assert_eq!(s.pixel(x, 2).unwrap()[3], 255, "pixel {} not covered", x);
            assert_eq!(s.pixel(x, 0).unwrap()[3], 0);
        }
        assert_eq!(s.pixel(0, 2).unwrap()[3], 0);
    }

    #[test]
    fn test_steep_line_is_drawn() {
        let mut s = RasterSurface::new(5, 10);
        s.clear();
        s.draw_line(Vec2::new(2.5, 9.0), Vec2::new(2.5, 1.0), Rgb::WHITE, 1.0, 1.0);
        for y in 1..9 {
            assert!(s.pixel(2, y).unwrap()[3] > 0);
        }
    }

    #[test]
    fn test_degenerate_draws_are_ignored() {
        let mut s = RasterSurface::new(4, 4);
        s.clear();
        s.draw_line(Vec2::ONE, Vec2::ONE, Rgb::WHITE, 1.0, 1.0);
        s.draw_disc(Vec2::ONE, 0.0, Rgb::WHITE, 1.0);
        s.draw_disc(Vec2::new(f32::NAN, 1.0), 2.0, Rgb::WHITE, 1.0);
        s.draw_line(Vec2::ZERO, Vec2::new(3.0, 3.0), Rgb::WHITE, f32::NAN, 1.0);
        assert!(s.as_raw().iter().all(|&b| b == 0));
    }

    #[test]
    fn test_zero_size_surface_accepts_draws() {
        let mut s = RasterSurface::new(0, 0);
        s.clear();
        s.draw_disc(Vec2::ZERO, 5.0, Rgb::WHITE, 1.0);
        s.draw_line(Vec2::ZERO, Vec2::new(10.0, 10.0), Rgb::WHITE, 1.0, 1.0);
        assert!(s.as_raw().is_empty());
        assert!(matches!(
            s.save_png(std::env::temp_dir().join("driftfield-empty.png")),
            Err(RenderError::EmptyFrame { .. })
        ));
    }

    #[test]
    fn test_save_png_writes_file() {
        let path = std::env::temp_dir().join(format!("driftfield-raster-{}.png", std::process::id()));
        let mut s = RasterSurface::new(6, 6);
        s.clear();
        s.draw_disc(Vec2::new(3.0, 3.0), 2.0, Rgb::SEAFOAM, 1.0);
        s.save_png(&path).unwrap();

        let loaded = image::open(&path).unwrap().to_rgba8();
        assert_eq!(loaded.dimensions(), (6, 6));
        assert_eq!(loaded.get_pixel(3, 3).0, [168, 237, 234, 255]);
        let _ = std::fs::remove_file(path);
    }

    #[test]
    fn test_resize_reallocates() {
        let mut s = RasterSurface::new(2, 2);
        s.resize(5, 3);
        assert_eq!((s.pixel_width(), s.pixel_height()), (5, 3));
        assert_eq!(s.as_raw().len(), 5 * 3 * 4);
    }

    #[test]
    fn test_faint_line_on_window_background_stays_dim() {
        let background = VisualConfig::default().opaque_background();
        let mut s = RasterSurface::new(10, 5).with_background(Some(background));
        s.clear();
        s.draw_line(Vec2::new(1.0, 2.5), Vec2::new(9.0, 2.5), Rgb::WHITE, 0.0125, 1.0);

        let [r, g, b, a] = s.pixel(5, 2).unwrap();
        assert_eq!(a, 255);
        assert!(r > 0 && r < 8, "faint line drawn at {}", r);
        assert_eq!((r, g), (g, b));
    }

    #[test]
    fn test_huge_shapes_only_touch_visible_pixels() {
        let start = std::time::Instant::now();
        let mut s = RasterSurface::new(10, 10);
        s.clear();
        s.draw_disc(Vec2::new(5.0, 5.0), 20_000.0, Rgb::SEAFOAM, 0.5);
        s.draw_line(Vec2::new(-1.0e7, 5.0), Vec2::new(1.0e7, 5.0), Rgb::WHITE, 1.0, 50_000.0);
        s.draw_line(Vec2::new(5.0, -1.0e7), Vec2::new(5.0, 1.0e7), Rgb::WHITE, 1.0, 50_000.0);

        assert!(s.as_raw().chunks(4).all(|px| px[3] == 255));
        assert!(start.elapsed() < std::time::Duration::from_secs(1));
    }
}
