//! Placement of the value, min/max and unit labels around the dial.

use crate::config::GaugeConfig;
use crate::geometry::DialGeometry;

/// Smallest font size any label shrinks to, in points.
pub const MIN_FONT_SIZE: f32 = 10.0;

const MIN_MAX_LABEL_WIDTH: f64 = 40.0;
const MIN_MAX_LABEL_HEIGHT: f64 = 20.0;
const MIN_MAX_LABEL_GAP: f64 = 8.0;
const UNIT_LABEL_HEIGHT: f64 = 20.0;
const UNIT_LABEL_OVERLAP: f64 = 10.0;

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub const fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }

    /// Shrinks the rect by `dx` on the left and right and `dy` on top and bottom.
    pub fn inset(self, dx: f64, dy: f64) -> Self {
        Self::new(
            self.x + dx,
            self.y + dy,
            self.width - 2.0 * dx,
            self.height - 2.0 * dy,
        )
    }

    pub fn offset(self, dx: f64, dy: f64) -> Self {
        Self::new(self.x + dx, self.y + dy, self.width, self.height)
    }

    pub fn max_x(&self) -> f64 {
        self.x + self.width
    }

    pub fn max_y(&self) -> f64 {
        self.y + self.height
    }

    pub fn center_y(&self) -> f64 {
        self.y + self.height / 2.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LabelFrame {
    pub rect: Rect,
    pub align: Align,
}

/// Frames of every label for one dial geometry.
#[derive(Debug, Clone, PartialEq)]
pub struct LabelLayout {
    /// Square the progress ring is inscribed in.
    pub progress_frame: Rect,
    pub value: LabelFrame,
    pub min: LabelFrame,
    pub max: LabelFrame,
    pub unit: LabelFrame,
}

impl LabelLayout {
    pub fn compute(geometry: &DialGeometry, config: &GaugeConfig) -> Self {
        let half_side = geometry.ring_radius + config.ring_thickness / 2.0;
        let progress_frame = Rect::new(
            geometry.center.x - half_side,
            geometry.center.y - half_side,
            half_side * 2.0,
            half_side * 2.0,
        );

        let inset = config.ring_thickness + config.divisions_padding * 2.0 + config.divisions_radius;
        let lift = if config.show_unit_of_measurement {
            -config.divisions_padding / 2.0
        } else {
            0.0
        };
        let value = progress_frame.inset(inset, inset).offset(0.0, lift);

        let min_dot = geometry.min_dot();
        let min = Rect::new(
            min_dot.x + MIN_MAX_LABEL_GAP,
            min_dot.y - MIN_MAX_LABEL_HEIGHT,
            MIN_MAX_LABEL_WIDTH,
            MIN_MAX_LABEL_HEIGHT,
        );
        let max_dot = geometry.max_dot();
        let max = Rect::new(
            max_dot.x - MIN_MAX_LABEL_GAP - MIN_MAX_LABEL_WIDTH,
            max_dot.y - MIN_MAX_LABEL_HEIGHT,
            MIN_MAX_LABEL_WIDTH,
            MIN_MAX_LABEL_HEIGHT,
        );

        let unit = Rect::new(
            value.x,
            value.max_y() - UNIT_LABEL_OVERLAP,
            value.width,
            UNIT_LABEL_HEIGHT,
        );

        Self {
            progress_frame,
            value: LabelFrame {
                rect: value,
                align: Align::Center,
            },
            min: LabelFrame {
                rect: min,
                align: Align::Left,
            },
            max: LabelFrame {
                rect: max,
                align: Align::Right,
            },
            unit: LabelFrame {
                rect: unit,
                align: Align::Center,
            },
        }
    }
}

/// Label text for a value: rounded, no decimals.
pub fn format_value(value: f64) -> String {
    let text = format!("{:.0}", value);
    // "-0" for small negatives reads oddly on a dial
    if text == "-0" {
        "0".to_string()
    } else {
        text
    }
}

/// Largest size not above `nominal` at which `measure(size)` (the rendered
/// text width) fits in `box_width`. Never shrinks below [`MIN_FONT_SIZE`],
/// or below `nominal` when that is already smaller.
pub fn fit_font_size(nominal: f32, box_width: f64, measure: impl Fn(f32) -> f32) -> f32 {
    let floor = MIN_FONT_SIZE.min(nominal);
    let width = measure(nominal);
    if width <= 0.0 || f64::from(width) <= box_width {
        return nominal;
    }
    let mut size = (nominal * (box_width as f32 / width)).max(floor);
    // glyph widths don't scale exactly linearly once hinted
    while size > floor && f64::from(measure(size)) > box_width {
        size = (size - 0.5).max(floor);
    }
    size
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::geometry::DialGeometry;

    fn layout(config: &GaugeConfig) -> (DialGeometry, LabelLayout) {
        let geometry = DialGeometry::new(320.0, 320.0, config);
        let layout = LabelLayout::compute(&geometry, config);
        (geometry, layout)
    }

    #[test]
    fn progress_frame_wraps_ring() {
        let (_, layout) = layout(&GaugeConfig::default());
        assert_eq!(layout.progress_frame, Rect::new(0.0, 0.0, 320.0, 320.0));
    }

    #[test]
    fn value_label_is_inset_and_lifted() {
        let config = GaugeConfig::default();
        let (_, layout) = layout(&config);
        let inset = 15.0 + 24.0 + 1.25;
        assert_eq!(
            layout.value.rect,
            Rect::new(inset, inset - 6.0, 320.0 - 2.0 * inset, 320.0 - 2.0 * inset)
        );
        assert_eq!(layout.unit.rect.y, layout.value.rect.max_y() - 10.0);
        assert_eq!(layout.unit.rect.width, layout.value.rect.width);

        let no_unit = GaugeConfig::builder().show_unit_of_measurement(false).build();
        let (_, layout) = self::layout(&no_unit);
        assert_eq!(layout.value.rect.y, inset);
    }

    #[test]
    fn min_max_labels_hang_above_end_dots() {
        let (geometry, layout) = layout(&GaugeConfig::default());
        let min_dot = geometry.min_dot();
        let max_dot = geometry.max_dot();
        assert!((layout.min.rect.x - (min_dot.x + 8.0)).abs() < 1e-9);
        assert!((layout.min.rect.max_y() - min_dot.y).abs() < 1e-9);
        assert!((layout.max.rect.max_x() - (max_dot.x - 8.0)).abs() < 1e-9);
        assert_eq!(layout.min.align, Align::Left);
        assert_eq!(layout.max.align, Align::Right);
    }

    #[test]
    fn formats_without_decimals() {
        assert_eq!(format_value(0.0), "0");
        assert_eq!(format_value(49.6), "50");
        assert_eq!(format_value(120.0), "120");
        assert_eq!(format_value(-0.2), "0");
        assert_eq!(format_value(-12.7), "-13");
    }

    #[test]
    fn font_fits_or_bottoms_out() {
        let per_char = |size: f32| size * 0.6 * 3.0;
        assert_eq!(fit_font_size(20.0, 100.0, per_char), 20.0);
        let fitted = fit_font_size(140.0, 126.0, per_char);
        assert!(per_char(fitted) <= 126.0 + 1e-3);
        assert!(fitted > 60.0);
        assert_eq!(fit_font_size(140.0, 1.0, per_char), MIN_FONT_SIZE);
        assert_eq!(fit_font_size(8.0, 1.0, per_char), 8.0);
    }
}
