// ============================================================================
// DEMO WINDOW
// ============================================================================

use std::sync::Arc;
use std::time::{Duration, Instant};

use pixels::{Pixels, SurfaceTexture};
use winit::dpi::LogicalSize;
use winit::event::{ElementState, Event, WindowEvent};
use winit::event_loop::{ControlFlow, EventLoop};
use winit::keyboard::{Key, NamedKey};
use winit::window::WindowBuilder;

use crate::config::WindowConfig;
use crate::demo::{Ticker, ValueDriver};
use crate::error::Result;
use crate::gauge::Gauge;
use crate::render::{Canvas, FontBook};
use crate::stroke::LimitRingColor;
use crate::theme::Theme;

/// Gauge driven by a [`ValueDriver`] on a fixed timer, with a switchable theme.
pub struct GaugeApp<D> {
    gauge: Gauge,
    driver: D,
    ticker: Ticker,
    theme: Theme,
    window: WindowConfig,
}

impl<D: ValueDriver> GaugeApp<D> {
    pub fn new(gauge: Gauge, window: WindowConfig, driver: D) -> Self {
        let mut app = Self {
            gauge,
            driver,
            ticker: Ticker::default(),
            theme: window.theme,
            window,
        };
        // light colors are the config defaults; only a dark start recolors
        if app.theme == Theme::Dark {
            app.gauge.set_theme(app.theme);
        }
        app.gauge.set_ring_color(LimitRingColor::new(app.theme));
        app
    }

    pub fn gauge(&self) -> &Gauge {
        &self.gauge
    }

    pub fn theme(&self) -> Theme {
        self.theme
    }

    pub fn toggle_theme(&mut self) {
        self.theme = self.theme.toggle();
        log::info!("Switched to {:?} theme", self.theme);
        self.apply_theme();
    }

    fn apply_theme(&mut self) {
        self.gauge.set_theme(self.theme);
        self.gauge.set_ring_color(LimitRingColor::new(self.theme));
    }

    /// Fires the demo timer for every period elapsed in `dt`, then moves the
    /// ring animation forward.
    pub fn advance(&mut self, dt: Duration) {
        for _ in 0..self.ticker.ticks(dt) {
            let config = self.gauge.config();
            let value = self.driver.next_value(config.min_value, config.max_value);
            self.gauge.set_value(value);
        }
        self.gauge.tick(dt);
    }

    /// Rasterizes the current frame into an RGBA buffer of `width * height` pixels.
    pub fn draw(&self, frame: &mut [u8], width: u32, height: u32, fonts: &FontBook) {
        let mut canvas = Canvas::new(frame, width as usize, height as usize);
        self.gauge
            .scene(width, height, self.theme.background())
            .render(&mut canvas, fonts);
    }

    /// Opens the window and runs until it is closed.
    pub fn run(mut self, fonts: FontBook) -> Result<()> {
        let (width, height) = (self.window.width, self.window.height);

        let event_loop = EventLoop::new()?;
        let window = WindowBuilder::new()
            .with_title(&self.window.title)
            .with_inner_size(LogicalSize::new(width as f64, height as f64))
            .with_resizable(true)
            .build(&event_loop)?;
        let window = Arc::new(window);

        let size = window.inner_size();
        let surface_texture = SurfaceTexture::new(size.width, size.height, &window);
        // The buffer stays at logical size; pixels scales it to the surface.
        let mut pixels = Pixels::new(width, height, surface_texture)?;

        let frame_duration = Duration::from_secs_f64(1.0 / self.window.max_framerate.max(1.0));
        let mut last_frame = Instant::now();
        let mut last_update = Instant::now();
        log::info!("Opened {}x{} gauge window", width, height);

        let window_clone = window.clone();
        event_loop.run(move |event, window_target| {
            window_target.set_control_flow(ControlFlow::Poll);
            match event {
                Event::WindowEvent { event, .. } => match event {
                    WindowEvent::CloseRequested => {
                        window_target.exit();
                    }
                    WindowEvent::KeyboardInput { event, .. }
                        if event.state == ElementState::Pressed && !event.repeat =>
                    {
                        match event.logical_key.as_ref() {
                            Key::Named(NamedKey::Escape) => window_target.exit(),
                            Key::Named(NamedKey::Space) | Key::Character("n" | "N") => {
                                self.toggle_theme();
                            }
                            _ => {}
                        }
                    }
                    WindowEvent::Resized(new_size) => {
                        if let Err(err) = pixels.resize_surface(new_size.width, new_size.height) {
                            log::error!("Failed to resize surface: {err}");
                            window_target.exit();
                        }
                    }
                    WindowEvent::RedrawRequested => {
                        let now = Instant::now();
                        self.advance(now.duration_since(last_update));
                        last_update = now;

                        self.draw(pixels.frame_mut(), width, height, &fonts);
                        if let Err(err) = pixels.render() {
                            log::error!("Failed to present frame: {err}");
                            window_target.exit();
                        }
                    }
                    _ => {}
                },
                Event::AboutToWait => {
                    if last_frame.elapsed() >= frame_duration {
                        window_clone.request_redraw();
                        last_frame = Instant::now();
                    }
                }
                _ => {}
            }
        })?;

        Ok(())
    }
}
