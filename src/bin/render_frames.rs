//! Render the backdrop headlessly to a PNG sequence.
//!
//! Usage: `render_frames <frames> <out_dir> [config.json]`
//!
//! A helper thread sweeps the pointer around the middle of the surface so the
//! attraction shows up in the output.

use std::f32::consts::TAU;
use std::fs;
use std::path::PathBuf;
use std::thread::{self, JoinHandle};
use std::time::Duration;

use anyhow::{Context, Result};
use log::{info, warn};
use driftfield::prelude::*;

const WIDTH: u32 = 800;
const HEIGHT: u32 = 600;

fn main() -> Result<()> {
    let _logger = driftfield::logging::setup().context("unable to start logging")?;

    let mut args = std::env::args().skip(1);
    let frames = match args.next() {
        Some(arg) => parse_frame_count(&arg)?,
        None => 120,
    };
    let out_dir = PathBuf::from(args.next().unwrap_or_else(|| "frames".into()));
    let config = match args.next() {
        Some(path) => FieldConfig::from_json_file(&path)
            .with_context(|| format!("unable to load config from {}", path))?,
        None => FieldConfig::default(),
    };

    fs::create_dir_all(&out_dir)
        .with_context(|| format!("unable to create {}", out_dir.display()))?;

    let mut surface = RasterSurface::new(WIDTH, HEIGHT).with_background(config.visuals.background);
    let mut field = Field::new(config);
    field.initialize(&surface);
    field.apply_performance_tier(PerformanceHint::detect(WIDTH as f32).is_low_power());

    let mut frame_loop = FrameLoop::new(ImmediateScheduler).with_max_frames(frames);
    let stop = frame_loop.stop_handle();

    let sender = field.input_sender();
    let sweep_stop = stop.clone();
    let sweeper = thread::spawn(move || {
        let center = Vec2::new(WIDTH as f32, HEIGHT as f32) * 0.5;
        let mut angle = 0.0f32;
        while !sweep_stop.is_stopped() {
            let p = center + Vec2::from_angle(angle) * 180.0;
            if !sender.send(InputEvent::PointerMoved { x: p.x, y: p.y }) {
                break;
            }
            angle = (angle + 0.05) % TAU;
            thread::sleep(Duration::from_millis(16));
        }
    });

    let result = frame_loop.run_with(&mut field, &mut surface, |_, surface, n| {
        let path = out_dir.join(format!("frame_{:04}.png", n));
        surface
            .save_png(&path)
            .with_context(|| format!("unable to write {}", path.display()))
    });

    stop.stop();
    join_sweeper(sweeper);

    let rendered = result?;
    info!("Wrote {} frames to {}", rendered, out_dir.display());
    Ok(())
}

fn parse_frame_count(arg: &str) -> Result<u64> {
    arg.parse::<u64>()
        .with_context(|| format!("frame count must be a whole number, got {:?}", arg))
}

/// Wait for the sweep thread. Returns `false` if it panicked.
fn join_sweeper(sweeper: JoinHandle<()>) -> bool {
    match sweeper.join() {
        Ok(()) => true,
        Err(_) => {
            warn!("Pointer sweep thread panicked");
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_count_parses() {
        assert_eq!(parse_frame_count("48").unwrap(), 48);
    }

    #[test]
    fn test_bad_frame_count_is_an_error() {
        assert!(parse_frame_count("lots").is_err());
        assert!(parse_frame_count("-3").is_err());
    }

    #[test]
    fn test_join_sweeper_reports_panic() {
        assert!(join_sweeper(thread::spawn(|| {})));
        assert!(!join_sweeper(thread::spawn(|| panic!("sweep failed"))));
    }
}
