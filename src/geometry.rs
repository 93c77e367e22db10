//! Pure dial math: clamping, value/angle projection and marker placement.
//!
//! Angles are in radians in screen coordinates (y grows downwards), so
//! increasing angles sweep clockwise. The dial starts at the lower left
//! (`3π/4`) and ends at the lower right (`π/4 + 2π`), leaving a 90° gap at
//! the bottom.

use std::f64::consts::PI;

use crate::config::GaugeConfig;

pub const START_ANGLE: f64 = PI * 3.0 / 4.0;
pub const END_ANGLE: f64 = PI / 4.0 + PI * 2.0;

/// Clamps `value` into `[min, max]`.
///
/// Unlike `f64::clamp` this never panics: with `min > max` the lower bound
/// wins.
pub fn clamp_value(value: f64, min: f64, max: f64) -> f64 {
    value.min(max).max(min)
}

/// Normalized position of `value` within `[min, max]`, in `[0, 1]`.
/// An empty range has no progress.
pub fn progress(value: f64, min: f64, max: f64) -> f64 {
    let span = max - min;
    if span == 0.0 || !span.is_finite() {
        return 0.0;
    }
    ((value - min) / span).clamp(0.0, 1.0)
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn distance(self, other: Point) -> f64 {
        (self.x - other.x).hypot(self.y - other.y)
    }
}

/// Stroked circular arc, drawn clockwise from `start_angle` to `end_angle`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ArcPath {
    pub center: Point,
    pub radius: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    pub thickness: f64,
}

impl ArcPath {
    pub fn span(&self) -> f64 {
        self.end_angle - self.start_angle
    }

    /// Angle at which a stroke covering `fraction` of the path ends.
    pub fn angle_at(&self, fraction: f64) -> f64 {
        self.start_angle + self.span() * fraction.clamp(0.0, 1.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkerKind {
    Division,
    Subdivision,
    Limit,
}

/// A dot placed on the dial for a value.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Marker {
    pub kind: MarkerKind,
    pub value: f64,
    pub angle: f64,
    pub position: Point,
}

/// Geometry derived from a gauge config and the size of the area it is drawn
/// into. Cheap to build; rebuilt on every draw.
#[derive(Debug, Clone, PartialEq)]
pub struct DialGeometry {
    pub center: Point,
    pub ring_radius: f64,
    pub ring_thickness: f64,
    /// Radius of the circle the division dots sit on.
    pub dot_radius: f64,
    pub division_unit_value: f64,
    pub division_unit_angle: f64,
    pub start_angle: f64,
    pub end_angle: f64,
    min_value: f64,
    divisions: usize,
    subdivisions: usize,
    limit: Option<f64>,
}

impl DialGeometry {
    pub fn new(width: f64, height: f64, config: &GaugeConfig) -> Self {
        let divisions = config.divisions;
        let (division_unit_value, division_unit_angle) = if divisions != 0 {
            (
                (config.max_value - config.min_value) / divisions as f64,
                (END_ANGLE - START_ANGLE).abs() / divisions as f64,
            )
        } else {
            (0.0, 0.0)
        };
        let ring_radius = width.min(height) / 2.0 - config.ring_thickness / 2.0;
        let dot_radius = ring_radius
            - config.ring_thickness / 2.0
            - config.divisions_padding
            - config.divisions_radius / 2.0;

        Self {
            center: Point::new(width / 2.0, height / 2.0),
            ring_radius,
            ring_thickness: config.ring_thickness,
            dot_radius,
            division_unit_value,
            division_unit_angle,
            start_angle: START_ANGLE,
            end_angle: END_ANGLE,
            min_value: config.min_value,
            divisions,
            subdivisions: config.subdivisions,
            limit: config.show_limit_dot.then_some(config.limit_value),
        }
    }

    /// Projects a value onto the dial. With no divisions every value maps to
    /// the start angle.
    pub fn angle_from_value(&self, value: f64) -> f64 {
        let level = if self.division_unit_value != 0.0 {
            (value - self.min_value) / self.division_unit_value
        } else {
            0.0
        };
        level * self.division_unit_angle + self.start_angle
    }

    pub fn point_at(&self, radius: f64, angle: f64) -> Point {
        Point::new(
            radius * angle.cos() + self.center.x,
            radius * angle.sin() + self.center.y,
        )
    }

    fn marker(&self, kind: MarkerKind, value: f64) -> Marker {
        let angle = self.angle_from_value(value);
        Marker {
            kind,
            value,
            angle,
            position: self.point_at(self.dot_radius, angle),
        }
    }

    /// One dot per division boundary, `min` and `max` included.
    pub fn divisions(&self) -> Vec<Marker> {
        if self.divisions == 0 {
            return Vec::new();
        }
        (0..=self.divisions)
            .map(|i| {
                self.marker(
                    MarkerKind::Division,
                    i as f64 * self.division_unit_value + self.min_value,
                )
            })
            .collect()
    }

    /// Dots strictly between consecutive division dots.
    pub fn subdivisions(&self) -> Vec<Marker> {
        if self.divisions == 0 || self.subdivisions == 0 {
            return Vec::new();
        }
        let step = self.division_unit_value / self.subdivisions as f64;
        (0..self.divisions)
            .flat_map(|i| (1..self.subdivisions).map(move |j| (i, j)))
            .map(|(i, j)| {
                self.marker(
                    MarkerKind::Subdivision,
                    i as f64 * self.division_unit_value + j as f64 * step + self.min_value,
                )
            })
            .collect()
    }

    pub fn limit_marker(&self) -> Option<Marker> {
        if self.divisions == 0 {
            return None;
        }
        self.limit.map(|limit| self.marker(MarkerKind::Limit, limit))
    }

    /// Dot positions of the first and last division, used to anchor the
    /// min/max labels. Defined even without divisions.
    pub fn min_dot(&self) -> Point {
        self.point_at(self.dot_radius, self.start_angle)
    }

    pub fn max_dot(&self) -> Point {
        self.point_at(self.dot_radius, self.end_angle)
    }

    /// Faint full circle behind everything.
    pub fn background_ring(&self) -> ArcPath {
        ArcPath {
            center: self.center,
            radius: self.ring_radius,
            start_angle: 0.0,
            end_angle: PI * 2.0,
            thickness: self.ring_thickness,
        }
    }

    /// The 270° track the progress ring runs along.
    pub fn track_ring(&self) -> ArcPath {
        ArcPath {
            start_angle: self.start_angle,
            end_angle: self.end_angle,
            ..self.background_ring()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f64 = 1e-9;

    fn geometry(config: &GaugeConfig) -> DialGeometry {
        DialGeometry::new(320.0, 320.0, config)
    }

    #[test]
    fn clamp_stays_in_range() {
        for v in [-1e9, -0.5, 0.0, 37.2, 120.0, 120.0001, f64::INFINITY] {
            let c = clamp_value(v, 0.0, 120.0);
            assert!((0.0..=120.0).contains(&c), "{v} -> {c}");
        }
        assert_eq!(clamp_value(10.0, 50.0, 20.0), 50.0);
    }

    #[test]
    fn progress_is_normalized() {
        assert_eq!(progress(0.0, 0.0, 120.0), 0.0);
        assert_eq!(progress(120.0, 0.0, 120.0), 1.0);
        assert!((progress(30.0, 0.0, 120.0) - 0.25).abs() < EPS);
        assert!((progress(-10.0, -20.0, 20.0) - 0.25).abs() < EPS);
        assert_eq!(progress(500.0, 0.0, 120.0), 1.0);
        assert_eq!(progress(5.0, 5.0, 5.0), 0.0);
    }

    #[test]
    fn division_units_for_default_range() {
        let g = geometry(&GaugeConfig::default());
        assert!((g.division_unit_value - 20.0).abs() < EPS);
        assert!((g.division_unit_angle - (END_ANGLE - START_ANGLE) / 6.0).abs() < EPS);
    }

    #[test]
    fn range_ends_map_to_arc_ends() {
        let g = geometry(&GaugeConfig::default());
        assert!((g.angle_from_value(0.0) - START_ANGLE).abs() < EPS);
        assert!((g.angle_from_value(120.0) - END_ANGLE).abs() < EPS);
        assert!((g.angle_from_value(60.0) - (START_ANGLE + END_ANGLE) / 2.0).abs() < EPS);

        let offset = GaugeConfig::builder()
            .min_value(-40.0)
            .max_value(60.0)
            .divisions(5)
            .build();
        let g = geometry(&offset);
        assert!((g.angle_from_value(-40.0) - START_ANGLE).abs() < EPS);
        assert!((g.angle_from_value(60.0) - END_ANGLE).abs() < EPS);
    }

    #[test]
    fn zero_divisions_draw_nothing() {
        let config = GaugeConfig::builder().divisions(0).build();
        let g = geometry(&config);
        assert_eq!(g.division_unit_value, 0.0);
        assert_eq!(g.division_unit_angle, 0.0);
        assert_eq!(g.angle_from_value(90.0), START_ANGLE);
        assert!(g.divisions().is_empty());
        assert!(g.subdivisions().is_empty());
        assert!(g.limit_marker().is_none());
    }

    #[test]
    fn radii_follow_ring_and_padding() {
        let g = DialGeometry::new(320.0, 400.0, &GaugeConfig::default());
        assert_eq!(g.center, Point::new(160.0, 200.0));
        assert!((g.ring_radius - 152.5).abs() < EPS);
        assert!((g.dot_radius - (152.5 - 7.5 - 12.0 - 0.625)).abs() < EPS);
    }

    #[test]
    fn markers_sit_on_dot_circle() {
        let g = geometry(&GaugeConfig::default());
        let divisions = g.divisions();
        let subdivisions = g.subdivisions();
        assert_eq!(divisions.len(), 7);
        assert_eq!(subdivisions.len(), 6 * 9);
        assert_eq!(divisions[0].value, 0.0);
        assert_eq!(divisions[6].value, 120.0);
        for marker in divisions.iter().chain(&subdivisions) {
            assert!((marker.position.distance(g.center) - g.dot_radius).abs() < 1e-6);
        }
        assert!((subdivisions[0].value - 2.0).abs() < EPS);
    }

    #[test]
    fn first_division_is_lower_left() {
        let g = geometry(&GaugeConfig::default());
        let first = g.divisions()[0].position;
        assert!(first.x < g.center.x && first.y > g.center.y);
        let last = g.divisions()[6].position;
        assert!(last.x > g.center.x && last.y > g.center.y);
        assert!((first.y - last.y).abs() < 1e-6);
    }

    #[test]
    fn limit_marker_follows_toggle() {
        let g = geometry(&GaugeConfig::default());
        let limit = g.limit_marker().unwrap();
        assert_eq!(limit.kind, MarkerKind::Limit);
        assert!((limit.angle - g.angle_from_value(50.0)).abs() < EPS);

        let hidden = GaugeConfig::builder().show_limit_dot(false).build();
        assert!(geometry(&hidden).limit_marker().is_none());
    }

    #[test]
    fn arc_fraction_angles() {
        let track = geometry(&GaugeConfig::default()).track_ring();
        assert!((track.span() - PI * 1.5).abs() < EPS);
        assert_eq!(track.angle_at(0.0), START_ANGLE);
        assert!((track.angle_at(1.0) - END_ANGLE).abs() < EPS);
        assert!((track.angle_at(2.0) - END_ANGLE).abs() < EPS);
    }
}
