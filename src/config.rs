use std::fs;
use std::path::{Path, PathBuf};

use bon::Builder;
use serde::Deserialize;

use crate::color::{Color, LIMIT_DOT_RED};
use crate::error::{GaugeError, Result};
use crate::theme::Theme;

/// Font file and nominal point size for one label.
#[derive(Debug, Clone, PartialEq)]
pub struct FontSpec {
    /// `None` falls back to the first system font found.
    pub path: Option<PathBuf>,
    pub size: f32,
}

impl FontSpec {
    pub fn sized(size: f32) -> Self {
        Self { path: None, size }
    }
}

/// Display parameters of the gauge
#[derive(Debug, Clone, Builder)]
pub struct GaugeConfig {
    // Range
    #[builder(default = 0.0)]
    pub min_value: f64,
    #[builder(default = 120.0)]
    pub max_value: f64,
    #[builder(default = 50.0)]
    pub limit_value: f64,

    // Ring
    #[builder(default = 15.0)]
    pub ring_thickness: f64,
    #[builder(default = Color::gray(0.9, 1.0))]
    pub ring_background_color: Color,

    // Divisions
    #[builder(default = 6)]
    pub divisions: usize,
    #[builder(default = 10)]
    pub subdivisions: usize,
    #[builder(default = 1.25)]
    pub divisions_radius: f64,
    #[builder(default = Color::gray(0.5, 1.0))]
    pub divisions_color: Color,
    #[builder(default = 12.0)]
    pub divisions_padding: f64,
    #[builder(default = 0.75)]
    pub subdivisions_radius: f64,
    #[builder(default = Color::gray(0.5, 0.5))]
    pub subdivisions_color: Color,

    // Limit dot
    #[builder(default = true)]
    pub show_limit_dot: bool,
    #[builder(default = 2.0)]
    pub limit_dot_radius: f64,
    #[builder(default = LIMIT_DOT_RED)]
    pub limit_dot_color: Color,

    // Value label
    #[builder(default = FontSpec::sized(140.0))]
    pub value_font: FontSpec,
    #[builder(default = Color::gray(0.1, 1.0))]
    pub value_text_color: Color,

    // Min/max labels
    #[builder(default = true)]
    pub show_min_max_value: bool,
    #[builder(default = FontSpec::sized(12.0))]
    pub min_max_value_font: FontSpec,
    #[builder(default = Color::gray(0.3, 1.0))]
    pub min_max_value_text_color: Color,

    // Unit of measurement label
    #[builder(default = true)]
    pub show_unit_of_measurement: bool,
    #[builder(into, default = "km/h".to_string())]
    pub unit_of_measurement: String,
    #[builder(default = FontSpec::sized(16.0))]
    pub unit_of_measurement_font: FontSpec,
    #[builder(default = Color::gray(0.3, 1.0))]
    pub unit_of_measurement_text_color: Color,
}

impl Default for GaugeConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

impl GaugeConfig {
    /// Scales dot radii, ring thickness and fonts for a screen whose short
    /// side is `ratio` times 320 points.
    pub fn scaled(mut self, ratio: f64) -> Self {
        self.divisions_radius *= ratio;
        self.subdivisions_radius *= ratio;
        self.ring_thickness *= ratio;
        for font in [
            &mut self.value_font,
            &mut self.min_max_value_font,
            &mut self.unit_of_measurement_font,
        ] {
            font.size *= ratio as f32;
        }
        self
    }

    /// Points every label at the same font file.
    pub fn with_font_path(mut self, path: impl Into<PathBuf>) -> Self {
        let path = path.into();
        for font in [
            &mut self.value_font,
            &mut self.min_max_value_font,
            &mut self.unit_of_measurement_font,
        ] {
            font.path = Some(path.clone());
        }
        self
    }
}

/// Configuration for the demo window
#[derive(Debug, Clone, Builder)]
pub struct WindowConfig {
    #[builder(into, default = "Speed Gauge".to_string())]
    pub title: String,
    #[builder(default = 320)]
    pub width: u32,
    #[builder(default = 320)]
    pub height: u32,
    #[builder(default = 60.0)]
    pub max_framerate: f64,
    #[builder(default)]
    pub theme: Theme,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

/// Gauge and window settings read from a TOML file.
#[derive(Debug, Clone, Default)]
pub struct Settings {
    pub gauge: GaugeConfig,
    pub window: WindowConfig,
}

impl Settings {
    pub fn from_toml_str(text: &str) -> Result<Self> {
        let root: SettingsToml = toml::from_str(text)?;
        let mut settings = Settings::default();
        if let Some(gauge) = root.gauge {
            gauge.apply(&mut settings.gauge);
        }
        if let Some(window) = root.window {
            window.apply(&mut settings.window);
        }
        Ok(settings)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path).map_err(|source| GaugeError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings = Self::from_toml_str(&text)?;
        log::info!("Loaded gauge settings from {}", path.display());
        Ok(settings)
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct SettingsToml {
    gauge: Option<GaugeToml>,
    window: Option<WindowToml>,
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct FontToml {
    path: Option<PathBuf>,
    size: Option<f32>,
}

impl FontToml {
    fn apply(self, font: &mut FontSpec) {
        if self.path.is_some() {
            font.path = self.path;
        }
        if let Some(size) = self.size {
            font.size = size;
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GaugeToml {
    min_value: Option<f64>,
    max_value: Option<f64>,
    limit_value: Option<f64>,
    ring_thickness: Option<f64>,
    ring_background_color: Option<Color>,
    divisions: Option<usize>,
    subdivisions: Option<usize>,
    divisions_radius: Option<f64>,
    divisions_color: Option<Color>,
    divisions_padding: Option<f64>,
    subdivisions_radius: Option<f64>,
    subdivisions_color: Option<Color>,
    show_limit_dot: Option<bool>,
    limit_dot_radius: Option<f64>,
    limit_dot_color: Option<Color>,
    value_font: Option<FontToml>,
    value_text_color: Option<Color>,
    show_min_max_value: Option<bool>,
    min_max_value_font: Option<FontToml>,
    min_max_value_text_color: Option<Color>,
    show_unit_of_measurement: Option<bool>,
    unit_of_measurement: Option<String>,
    unit_of_measurement_font: Option<FontToml>,
    unit_of_measurement_text_color: Option<Color>,
}

macro_rules! override_fields {
    ($src:expr, $dst:expr; $($field:ident),* $(,)?) => {
        $(
            if let Some(v) = $src.$field {
                $dst.$field = v;
            }
        )*
    };
}

impl GaugeToml {
    fn apply(self, config: &mut GaugeConfig) {
        if let Some(font) = self.value_font {
            font.apply(&mut config.value_font);
        }
        if let Some(font) = self.min_max_value_font {
            font.apply(&mut config.min_max_value_font);
        }
        if let Some(font) = self.unit_of_measurement_font {
            font.apply(&mut config.unit_of_measurement_font);
        }
        override_fields!(self, config;
            min_value,
            max_value,
            limit_value,
            ring_thickness,
            ring_background_color,
            divisions,
            subdivisions,
            divisions_radius,
            divisions_color,
            divisions_padding,
            subdivisions_radius,
            subdivisions_color,
            show_limit_dot,
            limit_dot_radius,
            limit_dot_color,
            value_text_color,
            show_min_max_value,
            min_max_value_text_color,
            show_unit_of_measurement,
            unit_of_measurement,
            unit_of_measurement_text_color,
        );
    }
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct WindowToml {
    title: Option<String>,
    width: Option<u32>,
    height: Option<u32>,
    max_framerate: Option<f64>,
    theme: Option<Theme>,
}

impl WindowToml {
    fn apply(self, window: &mut WindowConfig) {
        override_fields!(self, window; title, width, height, max_framerate, theme);
    }
}
