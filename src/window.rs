//! Windowed host.
//!
//! Opens a window, runs one [`Field`] tick per redraw into a [`RasterSurface`]
//! and presents the result. The performance tier is decided once, from the
//! window's logical width, when the window first appears.

use std::sync::Arc;

use log::{info, warn};
use winit::{
    application::ApplicationHandler,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::config::FieldConfig;
use crate::error::AppError;
use crate::field::Field;
use crate::input::{InputSender, InputTranslator};
use crate::performance::PerformanceHint;
use crate::present::Presenter;
use crate::raster::RasterSurface;
use crate::time::FrameTimer;

/// Open a window and animate `config` until the window is closed.
pub fn run(config: FieldConfig) -> Result<(), AppError> {
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;

    match app.error.take() {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

struct App {
    window: Option<Arc<Window>>,
    presenter: Option<Presenter>,
    raster: RasterSurface,
    field: Field,
    input: InputSender,
    translator: InputTranslator,
    timer: FrameTimer,
    error: Option<AppError>,
}

impl App {
    fn new(config: FieldConfig) -> Self {
        let raster = RasterSurface::new(0, 0).with_background(Some(config.visuals.opaque_background()));
        let field = Field::new(config);
        let input = field.input_sender();
        Self {
            window: None,
            presenter: None,
            raster,
            field,
            input,
            translator: InputTranslator::new(),
            timer: FrameTimer::new(),
            error: None,
        }
    }

    fn open(&mut self, event_loop: &ActiveEventLoop) -> Result<(), AppError> {
        let window_attrs = Window::default_attributes()
            .with_title("driftfield")
            .with_inner_size(winit::dpi::LogicalSize::new(1280, 720));

        let window = Arc::new(event_loop.create_window(window_attrs)?);
        let presenter = pollster::block_on(Presenter::new(window.clone()))?;

        let size = window.inner_size();
        self.raster.resize(size.width, size.height);
        self.field.initialize(&self.raster);

        let logical_width = size.to_logical::<f32>(window.scale_factor()).width;
        let hint = PerformanceHint::detect(logical_width);
        info!(
            "Viewport {} logical px wide, {} hardware threads",
            logical_width, hint.hardware_concurrency
        );
        self.field.apply_performance_tier(hint.is_low_power());

        window.request_redraw();
        self.window = Some(window);
        self.presenter = Some(presenter);
        Ok(())
    }

    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        if self.timer.tick(std::time::Instant::now()) {
            log::debug!("{:.1} fps", self.timer.fps());
        }
        self.field.tick(&mut self.raster);

        if let Some(presenter) = &mut self.presenter {
            match presenter.present(&self.raster) {
                Ok(()) => {}
                Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => presenter.reconfigure(),
                Err(wgpu::SurfaceError::OutOfMemory) => {
                    warn!("Out of memory while presenting, closing");
                    self.field.stop();
                    event_loop.exit();
                }
                Err(e) => warn!("Frame skipped: {:?}", e),
            }
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.open(event_loop) {
            self.error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                self.field.stop();
                event_loop.exit();
                return;
            }
            WindowEvent::Resized(size) => {
                if let Some(presenter) = &mut self.presenter {
                    presenter.resize(size.width, size.height);
                }
                self.raster.resize(size.width, size.height);
            }
            WindowEvent::RedrawRequested => {
                if self.field.is_running() {
                    self.redraw(event_loop);
                }
                if let Some(window) = &self.window {
                    window.request_redraw();
                }
                return;
            }
            _ => {}
        }

        if let Some(input) = self.translator.translate(&event) {
            self.input.send(input);
        }
    }

    fn exiting(&mut self, _event_loop: &ActiveEventLoop) {
        self.field.stop();
    }
}
