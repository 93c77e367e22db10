use std::fmt;
use std::time::Duration;

use crate::color::{Color, RING_GREEN};
use crate::config::GaugeConfig;
use crate::geometry::{clamp_value, progress, DialGeometry};
use crate::layout::{format_value, LabelLayout};
use crate::render::{DrawCommand, FontRole, Scene};
use crate::stroke::{FixedRingColor, RingColor, StrokeAnimation};
use crate::theme::Theme;

/// Background ring opacity relative to the ring background color.
const BACKGROUND_RING_ALPHA: f64 = 0.3;

/// Speedometer-style gauge: configuration, current value and the animated
/// progress ring.
pub struct Gauge {
    config: GaugeConfig,
    value: f64,
    ring_color: Box<dyn RingColor>,
    stroke: StrokeAnimation,
    stroke_color: Color,
}

impl fmt::Debug for Gauge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gauge")
            .field("config", &self.config)
            .field("value", &self.value)
            .field("stroke", &self.stroke)
            .field("stroke_color", &self.stroke_color)
            .finish_non_exhaustive()
    }
}

impl Default for Gauge {
    fn default() -> Self {
        Self::new(GaugeConfig::default())
    }
}

impl Gauge {
    pub fn new(config: GaugeConfig) -> Self {
        let value = clamp_value(config.min_value, config.min_value, config.max_value);
        let mut gauge = Self {
            config,
            value,
            ring_color: Box::new(FixedRingColor(RING_GREEN)),
            stroke: StrokeAnimation::default(),
            stroke_color: RING_GREEN,
        };
        gauge.stroke_gauge();
        gauge
    }

    pub fn with_ring_color(mut self, ring_color: impl RingColor + 'static) -> Self {
        self.set_ring_color(ring_color);
        self
    }

    pub fn with_stroke_duration(mut self, duration: Duration) -> Self {
        self.stroke = StrokeAnimation::new(duration);
        self.stroke_gauge();
        self
    }

    pub fn config(&self) -> &GaugeConfig {
        &self.config
    }

    /// Edits the config, then re-clamps the value into the (possibly new)
    /// range and restrokes the ring.
    pub fn update_config(&mut self, edit: impl FnOnce(&mut GaugeConfig)) {
        edit(&mut self.config);
        self.set_value(self.value);
    }

    pub fn set_theme(&mut self, theme: Theme) {
        self.update_config(|config| theme.apply(config));
    }

    pub fn set_ring_color(&mut self, ring_color: impl RingColor + 'static) {
        self.ring_color = Box::new(ring_color);
        self.stroke_gauge();
    }

    pub fn value(&self) -> f64 {
        self.value
    }

    /// Sets the value, clamped into `[min_value, max_value]`.
    pub fn set_value(&mut self, value: f64) {
        self.value = clamp_value(value, self.config.min_value, self.config.max_value);
        log::trace!("gauge value {:.2}", self.value);
        self.stroke_gauge();
    }

    pub fn value_text(&self) -> String {
        format_value(self.value)
    }

    /// Progress fraction of the current value, the target of the ring animation.
    pub fn progress(&self) -> f64 {
        progress(self.value, self.config.min_value, self.config.max_value)
    }

    /// Points the ring animation at the current value and recolors it.
    pub fn stroke_gauge(&mut self) {
        self.stroke.set_target(self.progress());
        let color = self.ring_color.ring_stroke_color(self, self.value);
        self.stroke_color = color;
    }

    pub fn stroke_color(&self) -> Color {
        self.stroke_color
    }

    /// Fraction of the progress ring currently on screen.
    pub fn presented_progress(&self) -> f64 {
        self.stroke.presented()
    }

    pub fn is_animating(&self) -> bool {
        self.stroke.is_animating()
    }

    pub fn tick(&mut self, dt: Duration) {
        self.stroke.advance(dt);
    }

    pub fn geometry(&self, width: u32, height: u32) -> DialGeometry {
        DialGeometry::new(width as f64, height as f64, &self.config)
    }

    pub fn layout(&self, width: u32, height: u32) -> LabelLayout {
        LabelLayout::compute(&self.geometry(width, height), &self.config)
    }

    /// Draw commands for one frame, back to front.
    pub fn scene(&self, width: u32, height: u32, background: Color) -> Scene {
        let config = &self.config;
        let geometry = self.geometry(width, height);
        let layout = LabelLayout::compute(&geometry, config);
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Clear(background));

        scene.add_command(DrawCommand::Ring {
            arc: geometry.background_ring(),
            fraction: 1.0,
            color: config.ring_background_color.with_alpha(BACKGROUND_RING_ALPHA),
        });
        scene.add_command(DrawCommand::Ring {
            arc: geometry.track_ring(),
            fraction: 1.0,
            color: config.ring_background_color,
        });

        for marker in geometry.subdivisions() {
            scene.add_command(DrawCommand::Dot {
                center: marker.position,
                radius: config.subdivisions_radius,
                color: config.subdivisions_color,
            });
        }
        for marker in geometry.divisions() {
            scene.add_command(DrawCommand::Dot {
                center: marker.position,
                radius: config.divisions_radius,
                color: config.divisions_color,
            });
        }
        if let Some(limit) = geometry.limit_marker() {
            scene.add_command(DrawCommand::Dot {
                center: limit.position,
                radius: config.limit_dot_radius,
                color: config.limit_dot_color,
            });
        }

        scene.add_command(DrawCommand::Ring {
            arc: geometry.track_ring(),
            fraction: self.presented_progress(),
            color: self.stroke_color,
        });

        scene.add_command(DrawCommand::Label {
            frame: layout.value,
            text: self.value_text(),
            role: FontRole::Value,
            size: config.value_font.size,
            color: config.value_text_color,
        });
        if config.show_min_max_value {
            for (frame, value) in [
                (layout.min, config.min_value),
                (layout.max, config.max_value),
            ] {
                scene.add_command(DrawCommand::Label {
                    frame,
                    text: format_value(value),
                    role: FontRole::MinMax,
                    size: config.min_max_value_font.size,
                    color: config.min_max_value_text_color,
                });
            }
        }
        if config.show_unit_of_measurement {
            scene.add_command(DrawCommand::Label {
                frame: layout.unit,
                text: config.unit_of_measurement.clone(),
                role: FontRole::Unit,
                size: config.unit_of_measurement_font.size,
                color: config.unit_of_measurement_text_color,
            });
        }
        scene
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{OVER_LIMIT_RED, RING_BLUE, WHITE};
    use crate::stroke::LimitRingColor;

    fn instant_gauge(config: GaugeConfig) -> Gauge {
        Gauge::new(config).with_stroke_duration(Duration::ZERO)
    }

    #[test]
    fn value_is_clamped_on_every_assignment() {
        let mut gauge = Gauge::default();
        gauge.set_value(500.0);
        assert_eq!(gauge.value(), 120.0);
        gauge.set_value(-3.0);
        assert_eq!(gauge.value(), 0.0);
        gauge.set_value(f64::NAN);
        assert_eq!(gauge.value(), 120.0);
    }

    #[test]
    fn narrowing_range_reclamps() {
        let mut gauge = Gauge::default();
        gauge.set_value(100.0);
        gauge.update_config(|c| c.max_value = 80.0);
        assert_eq!(gauge.value(), 80.0);
        assert_eq!(gauge.progress(), 1.0);
    }

    #[test]
    fn progress_targets_value_fraction() {
        let mut gauge = instant_gauge(GaugeConfig::default());
        gauge.set_value(30.0);
        assert!((gauge.presented_progress() - 0.25).abs() < 1e-9);

        let flat = GaugeConfig::builder().min_value(10.0).max_value(10.0).build();
        let mut gauge = instant_gauge(flat);
        gauge.set_value(10.0);
        assert_eq!(gauge.presented_progress(), 0.0);
    }

    #[test]
    fn ring_animates_over_ticks() {
        let mut gauge = Gauge::default();
        gauge.set_value(120.0);
        assert!(gauge.is_animating());
        assert_eq!(gauge.presented_progress(), 0.0);
        gauge.tick(Duration::from_millis(300));
        assert_eq!(gauge.presented_progress(), 1.0);
    }

    #[test]
    fn default_stroke_color_is_green() {
        let mut gauge = Gauge::default();
        gauge.set_value(110.0);
        assert_eq!(gauge.stroke_color(), RING_GREEN);
    }

    #[test]
    fn stroke_color_comes_from_capability() {
        let mut gauge = Gauge::default().with_ring_color(|_: &Gauge, v: f64| {
            if v > 10.0 {
                WHITE
            } else {
                RING_BLUE
            }
        });
        gauge.set_value(5.0);
        assert_eq!(gauge.stroke_color(), RING_BLUE);
        gauge.set_value(11.0);
        assert_eq!(gauge.stroke_color(), WHITE);
    }

    #[test]
    fn limit_color_wins_at_and_over_limit() {
        let mut gauge = Gauge::default().with_ring_color(LimitRingColor::new(Theme::Dark));
        gauge.set_value(49.9);
        assert_eq!(gauge.stroke_color(), RING_BLUE);
        gauge.set_value(50.0);
        assert_eq!(gauge.stroke_color(), OVER_LIMIT_RED);
        gauge.set_ring_color(LimitRingColor::new(Theme::Light));
        gauge.set_value(20.0);
        assert_eq!(gauge.stroke_color(), RING_GREEN);
    }

    #[test]
    fn value_text_has_no_decimals() {
        let mut gauge = Gauge::default();
        gauge.set_value(42.6);
        assert_eq!(gauge.value_text(), "43");
    }

    fn count(scene: &Scene, pred: impl Fn(&DrawCommand) -> bool) -> usize {
        scene.commands().iter().filter(|c| pred(c)).count()
    }

    #[test]
    fn scene_contains_every_marker_and_label() {
        let gauge = Gauge::default();
        let scene = gauge.scene(320, 320, WHITE);
        assert_eq!(scene.commands()[0], DrawCommand::Clear(WHITE));
        assert_eq!(count(&scene, |c| matches!(c, DrawCommand::Ring { .. })), 3);
        // 7 divisions, 54 subdivisions, 1 limit dot
        assert_eq!(count(&scene, |c| matches!(c, DrawCommand::Dot { .. })), 62);
        assert_eq!(count(&scene, |c| matches!(c, DrawCommand::Label { .. })), 4);
    }

    #[test]
    fn toggles_hide_markers_and_labels() {
        let config = GaugeConfig::builder()
            .divisions(0)
            .show_min_max_value(false)
            .show_unit_of_measurement(false)
            .build();
        let scene = Gauge::new(config).scene(200, 200, WHITE);
        assert_eq!(count(&scene, |c| matches!(c, DrawCommand::Dot { .. })), 0);
        let labels: Vec<_> = scene
            .commands()
            .iter()
            .filter_map(|c| match c {
                DrawCommand::Label { role, text, .. } => Some((*role, text.clone())),
                _ => None,
            })
            .collect();
        assert_eq!(labels, vec![(FontRole::Value, "0".to_string())]);
    }

    #[test]
    fn theme_recolors_ring_background() {
        let mut gauge = Gauge::default();
        gauge.set_theme(Theme::Dark);
        let scene = gauge.scene(100, 100, Theme::Dark.background());
        let track = scene
            .commands()
            .iter()
            .find_map(|c| match c {
                DrawCommand::Ring { fraction, color, .. } if *fraction == 1.0 && color.a == 0xff => {
                    Some(*color)
                }
                _ => None,
            })
            .unwrap();
        assert_eq!(track, crate::color::BLACK);
    }
}
