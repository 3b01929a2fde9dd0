//! Error types for driftfield.
//!
//! The simulation itself never fails. These errors cover the edges around it:
//! loading configuration, writing rendered frames, and presenting frames in a
//! window.

use thiserror::Error;

/// Errors raised while loading or validating a [`FieldConfig`](crate::FieldConfig).
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config file")]
    Io(#[from] std::io::Error),

    #[error("Config is not valid JSON for a field config")]
    Json(#[from] serde_json::Error),

    #[error("Invalid config value for `{field}`: {reason}")]
    Invalid {
        field: &'static str,
        reason: String,
    },
}

/// Errors raised while exporting a rasterized frame.
#[derive(Error, Debug)]
pub enum RenderError {
    #[error("Failed to encode or write frame image")]
    Image(#[from] image::ImageError),

    #[error("Cannot export an empty {width}x{height} frame")]
    EmptyFrame { width: u32, height: u32 },
}

/// Errors raised while setting up frame presentation.
#[cfg(feature = "window")]
#[derive(Error, Debug)]
pub enum PresentError {
    #[error("Failed to create the window surface")]
    SurfaceCreation(#[from] wgpu::CreateSurfaceError),

    #[error("No compatible graphics adapter found")]
    NoAdapter,

    #[error("Failed to create the graphics device")]
    DeviceCreation(#[from] wgpu::RequestDeviceError),
}

/// Errors raised by the windowed host.
#[cfg(feature = "window")]
#[derive(Error, Debug)]
pub enum AppError {
    #[error("Event loop failure")]
    EventLoop(#[from] winit::error::EventLoopError),

    #[error("Failed to create the window")]
    Window(#[from] winit::error::OsError),

    #[error("Frame presentation could not be set up")]
    Present(#[from] PresentError),
}
