//! Progress ring coloring and the animated stroke-end of the ring.

use std::time::Duration;

use crate::color::{Color, OVER_LIMIT_RED, RING_BLUE, RING_GREEN};
use crate::gauge::Gauge;
use crate::theme::Theme;

/// Chooses the progress ring color for a value.
///
/// Called every time the gauge value changes. Closures of the form
/// `Fn(&Gauge, f64) -> Color` implement it directly.
pub trait RingColor {
    fn ring_stroke_color(&self, gauge: &Gauge, value: f64) -> Color;
}

impl<F> RingColor for F
where
    F: Fn(&Gauge, f64) -> Color,
{
    fn ring_stroke_color(&self, gauge: &Gauge, value: f64) -> Color {
        self(gauge, value)
    }
}

/// Same color for every value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedRingColor(pub Color);

impl Default for FixedRingColor {
    fn default() -> Self {
        Self(RING_GREEN)
    }
}

impl RingColor for FixedRingColor {
    fn ring_stroke_color(&self, _gauge: &Gauge, _value: f64) -> Color {
        self.0
    }
}

/// Red once the value reaches the gauge's limit, otherwise a theme color.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LimitRingColor {
    pub theme: Theme,
}

impl LimitRingColor {
    pub fn new(theme: Theme) -> Self {
        Self { theme }
    }
}

impl RingColor for LimitRingColor {
    fn ring_stroke_color(&self, gauge: &Gauge, value: f64) -> Color {
        if value >= gauge.config().limit_value {
            return OVER_LIMIT_RED;
        }
        match self.theme {
            Theme::Light => RING_GREEN,
            Theme::Dark => RING_BLUE,
        }
    }
}

pub const DEFAULT_STROKE_DURATION: Duration = Duration::from_millis(250);

/// Animated stroke-end fraction of the progress ring.
///
/// Retargeting mid-flight starts the new transition from the fraction that
/// is currently on screen, so the ring never jumps.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeAnimation {
    from: f64,
    to: f64,
    elapsed: Duration,
    duration: Duration,
}

impl Default for StrokeAnimation {
    fn default() -> Self {
        Self::new(DEFAULT_STROKE_DURATION)
    }
}

impl StrokeAnimation {
    pub fn new(duration: Duration) -> Self {
        Self {
            from: 0.0,
            to: 0.0,
            elapsed: duration,
            duration,
        }
    }

    pub fn target(&self) -> f64 {
        self.to
    }

    pub fn set_target(&mut self, fraction: f64) {
        let fraction = fraction.clamp(0.0, 1.0);
        if fraction == self.to {
            return;
        }
        self.from = self.presented();
        self.to = fraction;
        self.elapsed = Duration::ZERO;
    }

    pub fn advance(&mut self, dt: Duration) {
        self.elapsed = (self.elapsed + dt).min(self.duration);
    }

    pub fn is_animating(&self) -> bool {
        self.elapsed < self.duration
    }

    /// Fraction to draw right now.
    pub fn presented(&self) -> f64 {
        if !self.is_animating() {
            return self.to;
        }
        let t = self.elapsed.as_secs_f64() / self.duration.as_secs_f64();
        self.from + (self.to - self.from) * ease_in_out(t)
    }
}

fn ease_in_out(t: f64) -> f64 {
    let t = t.clamp(0.0, 1.0);
    t * t * (3.0 - 2.0 * t)
}
