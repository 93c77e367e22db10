//! Speedometer-style circular gauge rendered into an RGBA frame buffer,
//! with a demo window that sweeps the value and switches light/dark themes.
//!
//! ```no_run
//! use speedgauge::{Gauge, GaugeConfig, LimitRingColor, Theme};
//!
//! let config = GaugeConfig::builder().max_value(240.0).limit_value(180.0).build();
//! let mut gauge = Gauge::new(config).with_ring_color(LimitRingColor::new(Theme::Light));
//! gauge.set_value(96.0);
//! let scene = gauge.scene(320, 320, Theme::Light.background());
//! ```

// ============================================================================
// MODULES
// ============================================================================

pub mod app;
pub mod color;
pub mod config;
pub mod demo;
pub mod error;
pub mod gauge;
pub mod geometry;
pub mod layout;
pub mod render;
pub mod stroke;
pub mod theme;

// ============================================================================
// PUBLIC API
// ============================================================================

pub use app::GaugeApp;
pub use color::Color;
pub use config::{FontSpec, GaugeConfig, Settings, WindowConfig};
pub use demo::{RandomWalk, Sweep, ValueDriver};
pub use error::{GaugeError, Result};
pub use gauge::Gauge;
pub use geometry::{DialGeometry, Marker, MarkerKind, Point};
pub use layout::LabelLayout;
pub use render::{Canvas, DrawCommand, FontBook, Scene};
pub use stroke::{FixedRingColor, LimitRingColor, RingColor};
pub use theme::Theme;
