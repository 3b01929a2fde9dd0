//! Startup-time performance tier detection.
//!
//! Narrow viewports and machines with few hardware threads get the low power
//! profile. The decision is made once when the host starts.

use std::thread;

/// Viewports narrower than this (in logical pixels) count as mobile.
pub const MOBILE_VIEWPORT_WIDTH: f32 = 768.0;

/// Fewer hardware threads than this counts as low performance.
pub const MIN_HARDWARE_CONCURRENCY: usize = 4;

/// What the host knows about the device at startup.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PerformanceHint {
    pub viewport_width: f32,
    pub hardware_concurrency: usize,
}

impl PerformanceHint {
    pub fn new(viewport_width: f32, hardware_concurrency: usize) -> Self {
        Self {
            viewport_width,
            hardware_concurrency,
        }
    }

    /// Read the concurrency hint from the running machine.
    pub fn detect(viewport_width: f32) -> Self {
        let hardware_concurrency = thread::available_parallelism()
            .map(|n| n.get())
            .unwrap_or(1);
        Self::new(viewport_width, hardware_concurrency)
    }

    pub fn is_mobile(&self) -> bool {
        self.viewport_width < MOBILE_VIEWPORT_WIDTH
    }

    /// Whether the low power profile should be used.
    pub fn is_low_power(&self) -> bool {
        self.is_mobile() || self.hardware_concurrency < MIN_HARDWARE_CONCURRENCY
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_desktop_is_not_low_power() {
        assert!(!PerformanceHint::new(1280.0, 8).is_low_power());
        assert!(!PerformanceHint::new(768.0, 4).is_low_power());
    }

    #[test]
    fn test_narrow_viewport_is_low_power() {
        assert!(PerformanceHint::new(767.0, 16).is_low_power());
    }

    #[test]
    fn test_few_threads_is_low_power() {
        assert!(PerformanceHint::new(1920.0, 3).is_low_power());
    }

    #[test]
    fn test_detect_reports_at_least_one_thread() {
        let hint = PerformanceHint::detect(1024.0);
        assert!(hint.hardware_concurrency >= 1);
        assert_eq!(hint.viewport_width, 1024.0);
    }
}
