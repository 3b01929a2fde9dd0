//! Field configuration.
//!
//! A [`FieldConfig`] is immutable while a session runs. Replacing it (directly
//! or through the performance tier) regenerates every particle.
//!
//! Configs serialize to JSON. Every field has a default, so a file only needs
//! the values it changes:
//!
//! ```json
//! { "particle_count": 400, "visuals": { "halo_opacity": 0.5 } }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::visuals::VisualConfig;

/// Largest accepted `visuals.line_width` and `visuals.halo_scale`.
pub const MAX_STROKE_SCALE: f32 = 64.0;

/// Overrides applied when the host is judged to be low powered.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LowPowerProfile {
    pub particle_count: usize,
    pub max_distance: f32,
}

impl Default for LowPowerProfile {
    fn default() -> Self {
        Self {
            particle_count: 50,
            max_distance: 80.0,
        }
    }
}

/// Tunables for a [`Field`](crate::Field).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FieldConfig {
    /// Number of particles.
    pub particle_count: usize,
    /// Pixel distance under which two particles are linked by a line.
    pub max_distance: f32,
    /// Pixel radius of pointer attraction.
    pub mouse_radius: f32,
    /// Nominal particle size. Advisory; actual sizes are randomized.
    pub particle_size: f32,
    /// Nominal drift speed. Advisory; home velocities are randomized.
    pub particle_speed: f32,
    /// Alpha of a link line between two coincident particles.
    pub connection_opacity: f32,
    /// Nominal particle alpha. Advisory; actual opacities are randomized.
    pub particle_opacity: f32,
    /// Overrides used by [`Field::apply_performance_tier`](crate::Field::apply_performance_tier).
    pub low_power: LowPowerProfile,
    pub visuals: VisualConfig,
}

impl Default for FieldConfig {
    fn default() -> Self {
        Self {
            particle_count: 1000,
            max_distance: 120.0,
            mouse_radius: 200.0,
            particle_size: 2.0,
            particle_speed: 0.5,
            connection_opacity: 0.15,
            particle_opacity: 0.8,
            low_power: LowPowerProfile::default(),
            visuals: VisualConfig::default(),
        }
    }
}

impl FieldConfig {
    /// Set the number of particles.
    pub fn with_particle_count(mut self, count: usize) -> Self {
        self.particle_count = count;
        self
    }

    /// Set the link distance.
    pub fn with_max_distance(mut self, distance: f32) -> Self {
        self.max_distance = distance;
        self
    }

    /// Set the pointer influence radius.
    pub fn with_mouse_radius(mut self, radius: f32) -> Self {
        self.mouse_radius = radius;
        self
    }

    /// Set the peak alpha of link lines.
    pub fn with_connection_opacity(mut self, opacity: f32) -> Self {
        self.connection_opacity = opacity;
        self
    }

    /// Set the low power overrides.
    pub fn with_low_power(mut self, profile: LowPowerProfile) -> Self {
        self.low_power = profile;
        self
    }

    /// Adjust the visual settings in place.
    pub fn with_visuals<F>(mut self, configure: F) -> Self
    where
        F: FnOnce(&mut VisualConfig),
    {
        configure(&mut self.visuals);
        self
    }

    /// This config with the low power overrides applied.
    pub fn low_power_variant(&self) -> Self {
        Self {
            particle_count: self.low_power.particle_count,
            max_distance: self.low_power.max_distance,
            ..self.clone()
        }
    }

    /// Load and validate a config from a JSON file.
    pub fn from_json_file<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        Self::from_json(&text)
    }

    /// Parse and validate a config from a JSON string.
    pub fn from_json(text: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Serialize to pretty-printed JSON.
    pub fn to_json(&self) -> Result<String, ConfigError> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    /// Reject values the simulation cannot use.
    ///
    /// Distances, radii and opacities must be finite and non-negative. Line
    /// width and halo scale are capped at [`MAX_STROKE_SCALE`], and the low
    /// power profile must keep at least one particle.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let scalars = [
            ("max_distance", self.max_distance),
            ("mouse_radius", self.mouse_radius),
            ("particle_size", self.particle_size),
            ("particle_speed", self.particle_speed),
            ("connection_opacity", self.connection_opacity),
            ("particle_opacity", self.particle_opacity),
            ("low_power.max_distance", self.low_power.max_distance),
            ("visuals.line_width", self.visuals.line_width),
            ("visuals.halo_scale", self.visuals.halo_scale),
            ("visuals.halo_opacity", self.visuals.halo_opacity),
        ];
        for (field, value) in scalars {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("expected a finite non-negative number, got {}", value),
                });
            }
        }
        let strokes = [
            ("visuals.line_width", self.visuals.line_width),
            ("visuals.halo_scale", self.visuals.halo_scale),
        ];
        for (field, value) in strokes {
            if value > MAX_STROKE_SCALE {
                return Err(ConfigError::Invalid {
                    field,
                    reason: format!("must be at most {}, got {}", MAX_STROKE_SCALE, value),
                });
            }
        }
        if self.low_power.particle_count == 0 {
            return Err(ConfigError::Invalid {
                field: "low_power.particle_count",
                reason: "must keep at least one particle".into(),
            });
        }
        Ok(())
    }
}
