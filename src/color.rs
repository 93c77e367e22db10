use std::fmt;
use std::str::FromStr;

use serde::Deserialize;

use crate::error::GaugeError;

/// Color representation for gauge elements
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(try_from = "String")]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

/// Default progress ring color.
pub const RING_GREEN: Color = Color::new(76, 217, 100);
/// Ring color once the value reaches the limit.
pub const OVER_LIMIT_RED: Color = Color::new(255, 59, 48);
/// Progress ring color for the dark theme.
pub const RING_BLUE: Color = Color::new(11, 150, 246);
pub const LIMIT_DOT_RED: Color = Color::new(255, 0, 0);
pub const WHITE: Color = Color::new(0xff, 0xff, 0xff);
pub const BLACK: Color = Color::new(0x00, 0x00, 0x00);

impl Color {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 0xff }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Grey level and opacity given as fractions in `[0, 1]`.
    pub fn gray(white: f64, alpha: f64) -> Self {
        let w = unit_to_byte(white);
        Self::rgba(w, w, w, unit_to_byte(alpha))
    }

    pub fn with_alpha(self, alpha: f64) -> Self {
        Self {
            a: unit_to_byte(alpha),
            ..self
        }
    }

    pub fn alpha(self) -> f32 {
        self.a as f32 / 255.0
    }

    pub const fn as_tuple(self) -> (u8, u8, u8) {
        (self.r, self.g, self.b)
    }
}

fn unit_to_byte(v: f64) -> u8 {
    (v.clamp(0.0, 1.0) * 255.0).round() as u8
}

impl FromStr for Color {
    type Err = GaugeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || GaugeError::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(invalid)?;
        if !hex.is_ascii() || !(hex.len() == 6 || hex.len() == 8) {
            return Err(invalid());
        }
        let channel = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| invalid());
        let alpha = if hex.len() == 8 { channel(6)? } else { 0xff };
        Ok(Self::rgba(channel(0)?, channel(2)?, channel(4)?, alpha))
    }
}

impl TryFrom<String> for Color {
    type Error = GaugeError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02x}{:02x}{:02x}", self.r, self.g, self.b)?;
        if self.a != 0xff {
            write!(f, "{:02x}", self.a)?;
        }
        Ok(())
    }
}
