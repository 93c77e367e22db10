use serde::Deserialize;

use crate::color::{Color, BLACK, WHITE};
use crate::config::GaugeConfig;

/// Light/dark appearance of the gauge and the window around it.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    pub fn toggle(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    /// Window background behind the gauge.
    pub fn background(self) -> Color {
        match self {
            Theme::Light => WHITE,
            Theme::Dark => Color::gray(0.1, 1.0),
        }
    }

    /// Recolors the parts of the gauge that must contrast with the background.
    pub fn apply(self, config: &mut GaugeConfig) {
        match self {
            Theme::Light => {
                config.ring_background_color = Color::gray(0.9, 1.0);
                config.value_text_color = Color::gray(0.1, 1.0);
                config.unit_of_measurement_text_color = Color::gray(0.3, 1.0);
            }
            Theme::Dark => {
                config.ring_background_color = BLACK;
                config.value_text_color = WHITE;
                config.unit_of_measurement_text_color = Color::gray(0.7, 1.0);
            }
        }
    }
}
