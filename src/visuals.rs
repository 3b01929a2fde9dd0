//! Visual configuration for the backdrop.
//!
//! Controls how particles and their links look, separate from the physics
//! tunables in [`FieldConfig`](crate::FieldConfig).
//!
//! # Usage
//!
//! ```ignore
//! let config = FieldConfig::default().with_visuals(|v| {
//!     v.halo_color = Rgb::new(255, 180, 120);
//!     v.line_width = 1.5;
//! });
//! ```

use serde::{Deserialize, Serialize};

/// An 8-bit RGB color. Alpha is supplied per draw call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb::new(255, 255, 255);
    pub const BLACK: Rgb = Rgb::new(0, 0, 0);

    /// The pale teal used for particle halos.
    pub const SEAFOAM: Rgb = Rgb::new(168, 237, 234);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    /// Channels as `[r, g, b]`.
    #[inline]
    pub fn to_array(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl From<[u8; 3]> for Rgb {
    fn from([r, g, b]: [u8; 3]) -> Self {
        Self::new(r, g, b)
    }
}

/// Colors and shapes used when drawing a frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct VisualConfig {
    /// Color the surface is cleared to. `None` clears to fully transparent.
    pub background: Option<Rgb>,
    /// Stroke color of connection lines.
    pub line_color: Rgb,
    /// Stroke width of connection lines in pixels.
    pub line_width: f32,
    /// Fill color of the particle core disc.
    pub particle_color: Rgb,
    /// Fill color of the glow disc drawn over each particle.
    pub halo_color: Rgb,
    /// Halo radius as a multiple of particle size.
    pub halo_scale: f32,
    /// Halo alpha as a multiple of particle opacity.
    pub halo_opacity: f32,
}

impl Default for VisualConfig {
    fn default() -> Self {
        Self {
            background: None,
            line_color: Rgb::WHITE,
            line_width: 1.0,
            particle_color: Rgb::WHITE,
            halo_color: Rgb::SEAFOAM,
            halo_scale: 2.0,
            halo_opacity: 0.3,
        }
    }
}

impl VisualConfig {
    /// Opaque color a window is cleared to.
    ///
    /// A window has nothing behind it to blend with, so a transparent
    /// background is shown as black.
    pub fn opaque_background(&self) -> Rgb {
        self.background.unwrap_or(Rgb::BLACK)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_halo_is_double_size_at_thirty_percent() {
        let v = VisualConfig::default();
        assert_eq!(v.halo_scale, 2.0);
        assert_eq!(v.halo_opacity, 0.3);
        assert_eq!(v.halo_color.to_array(), [168, 237, 234]);
    }

    #[test]
    fn test_partial_json_keeps_defaults() {
        let v: VisualConfig = serde_json::from_str(r#"{ "line_width": 2.5 }"#).unwrap();
        assert_eq!(v.line_width, 2.5);
        assert_eq!(v.line_color, Rgb::WHITE);
        assert!(v.background.is_none());
    }

    #[test]
    fn test_opaque_background_defaults_to_black() {
        assert_eq!(VisualConfig::default().opaque_background(), Rgb::BLACK);

        let v = VisualConfig {
            background: Some(Rgb::new(12, 34, 56)),
            ..Default::default()
        };
        assert_eq!(v.opaque_background(), Rgb::new(12, 34, 56));
    }
}
