// ============================================================================
// RETAINED SCENE + SOFTWARE RASTERIZER
// ============================================================================

use std::collections::HashMap;
use std::f64::consts::TAU;
use std::fs;
use std::path::{Path, PathBuf};

use rusttype::{point, Font, PositionedGlyph, Scale};

use crate::color::Color;
use crate::config::{FontSpec, GaugeConfig};
use crate::error::{GaugeError, Result};
use crate::geometry::{ArcPath, Point};
use crate::layout::{fit_font_size, Align, LabelFrame};

/// Which label font a text command uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FontRole {
    Value,
    MinMax,
    Unit,
}

#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    Clear(Color),
    /// Stroke `arc` from its start up to `fraction` of its length, butt caps.
    Ring {
        arc: ArcPath,
        fraction: f64,
        color: Color,
    },
    Dot {
        center: Point,
        radius: f64,
        color: Color,
    },
    Label {
        frame: LabelFrame,
        text: String,
        role: FontRole,
        size: f32,
        color: Color,
    },
}

#[derive(Debug, Clone, Default)]
pub struct Scene {
    commands: Vec<DrawCommand>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_command(&mut self, command: DrawCommand) {
        self.commands.push(command);
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn render(&self, canvas: &mut Canvas, fonts: &FontBook) {
        for command in &self.commands {
            match command {
                DrawCommand::Clear(color) => canvas.clear(*color),
                DrawCommand::Ring {
                    arc,
                    fraction,
                    color,
                } => draw_ring(canvas, arc, *fraction, *color),
                DrawCommand::Dot {
                    center,
                    radius,
                    color,
                } => draw_dot(canvas, *center, *radius, *color),
                DrawCommand::Label {
                    frame,
                    text,
                    role,
                    size,
                    color,
                } => {
                    if let Some(font) = fonts.get(*role) {
                        draw_label(canvas, font, frame, text, *size, *color);
                    }
                }
            }
        }
    }
}

// ============================================================================
// CANVAS
// ============================================================================

/// RGBA8 frame buffer view.
pub struct Canvas<'a> {
    frame: &'a mut [u8],
    width: usize,
    height: usize,
}

impl<'a> Canvas<'a> {
    /// Rows that do not fit in `frame` are dropped.
    pub fn new(frame: &'a mut [u8], width: usize, height: usize) -> Self {
        let height = height.min(frame.len() / 4 / width.max(1));
        Self {
            frame,
            width,
            height,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn clear(&mut self, color: Color) {
        for chunk in self.frame.chunks_exact_mut(4) {
            chunk.copy_from_slice(&[color.r, color.g, color.b, 0xff]);
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<[u8; 4]> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let idx = (y * self.width + x) * 4;
        let mut out = [0; 4];
        out.copy_from_slice(&self.frame[idx..idx + 4]);
        Some(out)
    }

    /// Blends `color` over the pixel with the given coverage.
    fn blend(&mut self, x: i32, y: i32, color: Color, coverage: f32) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let a = (coverage * color.alpha()).clamp(0.0, 1.0);
        if a <= 0.0 {
            return;
        }
        let idx = (y as usize * self.width + x as usize) * 4;
        let src = [color.r as f32, color.g as f32, color.b as f32];
        for (channel, s) in src.iter().enumerate() {
            let d = self.frame[idx + channel] as f32;
            self.frame[idx + channel] = (s * a + d * (1.0 - a)).round() as u8;
        }
        self.frame[idx + 3] = 0xff;
    }

    /// Pixel bounds covering a circle, clipped to the canvas.
    fn bounds(&self, center: Point, reach: f64) -> (i32, i32, i32, i32) {
        let min_x = ((center.x - reach).floor() as i32).max(0);
        let min_y = ((center.y - reach).floor() as i32).max(0);
        let max_x = ((center.x + reach).ceil() as i32).min(self.width as i32 - 1);
        let max_y = ((center.y + reach).ceil() as i32).min(self.height as i32 - 1);
        (min_x, min_y, max_x, max_y)
    }
}

// ============================================================================
// DRAWING PRIMITIVES
// ============================================================================

fn draw_ring(canvas: &mut Canvas, arc: &ArcPath, fraction: f64, color: Color) {
    let sweep = arc.span() * fraction.clamp(0.0, 1.0);
    if sweep <= 0.0 || arc.thickness <= 0.0 {
        return;
    }
    let inner = arc.radius - arc.thickness / 2.0;
    let outer = arc.radius + arc.thickness / 2.0;
    let (min_x, min_y, max_x, max_y) = canvas.bounds(arc.center, outer + 1.0);

    for y in min_y..=max_y {
        for x in min_x..=max_x {
            // sample pixel centers
            let dx = x as f64 + 0.5 - arc.center.x;
            let dy = y as f64 + 0.5 - arc.center.y;
            let dist = dx.hypot(dy);
            let radial = (dist - inner + 0.5).min(outer - dist + 0.5).clamp(0.0, 1.0);
            if radial <= 0.0 {
                continue;
            }
            let angular = if sweep >= TAU {
                1.0
            } else {
                let rel = (dy.atan2(dx) - arc.start_angle).rem_euclid(TAU);
                if rel <= sweep {
                    1.0
                } else {
                    // arc-length distance past the nearest butt cap
                    let past_end = (rel - sweep) * dist;
                    let before_start = (TAU - rel) * dist;
                    (0.5 - past_end.min(before_start)).clamp(0.0, 1.0)
                }
            };
            canvas.blend(x, y, color, (radial * angular) as f32);
        }
    }
}

fn draw_dot(canvas: &mut Canvas, center: Point, radius: f64, color: Color) {
    if radius <= 0.0 {
        return;
    }
    let (min_x, min_y, max_x, max_y) = canvas.bounds(center, radius + 1.0);
    for y in min_y..=max_y {
        for x in min_x..=max_x {
            let dist = (x as f64 + 0.5 - center.x).hypot(y as f64 + 0.5 - center.y);
            // sub-pixel dots keep their area rather than vanishing
            let coverage = if radius < 0.5 {
                (1.0 - dist).clamp(0.0, 1.0) * radius * 2.0
            } else {
                (radius + 0.5 - dist).clamp(0.0, 1.0)
            };
            if coverage > 0.0 {
                canvas.blend(x, y, color, coverage as f32);
            }
        }
    }
}

/// Rendered width of `text` at `size`, from glyph advances.
pub fn text_width(font: &Font<'_>, text: &str, size: f32) -> f32 {
    let glyphs: Vec<PositionedGlyph> = font.layout(text, Scale::uniform(size), point(0.0, 0.0)).collect();
    glyphs
        .last()
        .map(|g| g.position().x + g.unpositioned().h_metrics().advance_width)
        .unwrap_or(0.0)
}

fn draw_label(
    canvas: &mut Canvas,
    font: &Font<'_>,
    frame: &LabelFrame,
    text: &str,
    nominal: f32,
    color: Color,
) {
    if text.is_empty() {
        return;
    }
    let size = fit_font_size(nominal, frame.rect.width, |s| text_width(font, text, s));
    let scale = Scale::uniform(size);
    let v_metrics = font.v_metrics(scale);
    let width = text_width(font, text, size) as f64;

    let left = match frame.align {
        Align::Left => frame.rect.x,
        Align::Center => frame.rect.x + (frame.rect.width - width) / 2.0,
        Align::Right => frame.rect.max_x() - width,
    };
    let line_height = (v_metrics.ascent - v_metrics.descent) as f64;
    let top = frame.rect.center_y() - line_height / 2.0;

    let origin = point(left as f32, top as f32 + v_metrics.ascent);
    for glyph in font.layout(text, scale, origin) {
        if let Some(bb) = glyph.pixel_bounding_box() {
            glyph.draw(|gx, gy, v| {
                canvas.blend(bb.min.x + gx as i32, bb.min.y + gy as i32, color, v);
            });
        }
    }
}

// ============================================================================
// FONTS
// ============================================================================

const SYSTEM_FONT_PATHS: &[&str] = &[
    "/usr/share/fonts/truetype/dejavu/DejaVuSansCondensed-Bold.ttf",
    "/usr/share/fonts/truetype/dejavu/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/TTF/DejaVuSans-Bold.ttf",
    "/usr/share/fonts/truetype/liberation/LiberationSans-Bold.ttf",
    "/usr/share/fonts/liberation/LiberationSans-Bold.ttf",
    "/System/Library/Fonts/Supplemental/Arial Bold.ttf",
    "/Library/Fonts/Arial.ttf",
    "C:\\Windows\\Fonts\\arialbd.ttf",
];

/// Label fonts, loaded once.
#[derive(Default)]
pub struct FontBook {
    value: Option<Font<'static>>,
    min_max: Option<Font<'static>>,
    unit: Option<Font<'static>>,
}

impl FontBook {
    /// No fonts: labels are skipped.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Loads each label's font. An explicitly configured path that fails to
    /// load is an error; labels without a path use the first system font found.
    pub fn load(config: &GaugeConfig) -> Result<Self> {
        let mut cache: HashMap<PathBuf, Font<'static>> = HashMap::new();
        let mut resolve = |font_spec: &FontSpec| -> Result<Option<Font<'static>>> {
            let path = match &font_spec.path {
                Some(path) => path.clone(),
                None => match system_font_path() {
                    Some(path) => path,
                    None => return Ok(None),
                },
            };
            if let Some(font) = cache.get(&path) {
                return Ok(Some(font.clone()));
            }
            let font = load_font(&path)?;
            log::debug!("Loaded font {}", path.display());
            cache.insert(path, font.clone());
            Ok(Some(font))
        };

        let book = Self {
            value: resolve(&config.value_font)?,
            min_max: resolve(&config.min_max_value_font)?,
            unit: resolve(&config.unit_of_measurement_font)?,
        };
        if book.value.is_none() {
            log::warn!("No font configured and none found on the system; labels will not be drawn");
        }
        Ok(book)
    }

    pub fn get(&self, role: FontRole) -> Option<&Font<'static>> {
        match role {
            FontRole::Value => self.value.as_ref(),
            FontRole::MinMax => self.min_max.as_ref(),
            FontRole::Unit => self.unit.as_ref(),
        }
    }
}

fn system_font_path() -> Option<PathBuf> {
    SYSTEM_FONT_PATHS
        .iter()
        .map(PathBuf::from)
        .find(|p| p.exists())
}

pub fn load_font(path: &Path) -> Result<Font<'static>> {
    let data = fs::read(path).map_err(|source| GaugeError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    Font::try_from_vec(data).ok_or_else(|| GaugeError::FontParse(path.to_path_buf()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::{BLACK, RING_GREEN, WHITE};
    use crate::geometry::{END_ANGLE, START_ANGLE};
    use std::io::Write;

    fn frame(w: usize, h: usize) -> Vec<u8> {
        vec![0; w * h * 4]
    }

    fn track(radius: f64, thickness: f64) -> ArcPath {
        ArcPath {
            center: Point::new(50.0, 50.0),
            radius,
            start_angle: START_ANGLE,
            end_angle: END_ANGLE,
            thickness,
        }
    }

    #[test]
    fn short_frame_drops_missing_rows() {
        let mut buf = frame(10, 4);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        assert_eq!(canvas.height(), 4);
        canvas.clear(WHITE);
        draw_dot(&mut canvas, Point::new(5.0, 5.0), 8.0, BLACK);
        assert_eq!(&buf[buf.len() - 4..], &[0, 0, 0, 0xff]);
    }

    #[test]
    fn clear_fills_every_pixel() {
        let mut buf = frame(4, 3);
        let mut canvas = Canvas::new(&mut buf, 4, 3);
        canvas.clear(WHITE);
        assert!(buf.iter().all(|&b| b == 0xff));
    }

    #[test]
    fn ring_stops_at_fraction() {
        let mut buf = frame(100, 100);
        let mut canvas = Canvas::new(&mut buf, 100, 100);
        canvas.clear(BLACK);
        draw_ring(&mut canvas, &track(40.0, 6.0), 0.5, RING_GREEN);
        // half of the 270° sweep ends straight up; left of center is lit, right is not
        assert_eq!(canvas.pixel(10, 49), Some([76, 217, 100, 255]));
        assert_eq!(canvas.pixel(89, 49), Some([0, 0, 0, 255]));
        // the gap at the bottom is never drawn
        assert_eq!(canvas.pixel(49, 89), Some([0, 0, 0, 255]));
    }

    #[test]
    fn full_ring_covers_both_sides() {
        let mut buf = frame(100, 100);
        let mut canvas = Canvas::new(&mut buf, 100, 100);
        draw_ring(&mut canvas, &track(40.0, 6.0), 1.0, WHITE);
        assert_eq!(canvas.pixel(10, 49), Some([255; 4]));
        assert_eq!(canvas.pixel(89, 49), Some([255; 4]));
        assert_eq!(canvas.pixel(49, 49), Some([0; 4]));
    }

    #[test]
    fn zero_fraction_draws_nothing() {
        let mut buf = frame(100, 100);
        let mut canvas = Canvas::new(&mut buf, 100, 100);
        draw_ring(&mut canvas, &track(40.0, 6.0), 0.0, WHITE);
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn translucent_dot_blends() {
        let mut buf = frame(20, 20);
        let mut canvas = Canvas::new(&mut buf, 20, 20);
        canvas.clear(BLACK);
        draw_dot(&mut canvas, Point::new(10.0, 10.0), 3.0, WHITE.with_alpha(0.5));
        assert_eq!(canvas.pixel(9, 9), Some([128, 128, 128, 255]));
        assert_eq!(canvas.pixel(0, 0), Some([0, 0, 0, 255]));
    }

    #[test]
    fn dots_are_clipped_to_canvas() {
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        draw_dot(&mut canvas, Point::new(-2.0, 11.0), 4.0, WHITE);
        assert_eq!(canvas.pixel(0, 9), Some([255; 4]));
    }

    #[test]
    fn labels_without_font_are_skipped() {
        let mut scene = Scene::new();
        scene.add_command(DrawCommand::Label {
            frame: LabelFrame {
                rect: crate::layout::Rect::new(0.0, 0.0, 10.0, 10.0),
                align: Align::Center,
            },
            text: "42".to_string(),
            role: FontRole::Value,
            size: 12.0,
            color: WHITE,
        });
        let mut buf = frame(10, 10);
        let mut canvas = Canvas::new(&mut buf, 10, 10);
        scene.render(&mut canvas, &FontBook::empty());
        assert!(buf.iter().all(|&b| b == 0));
    }

    #[test]
    fn explicit_font_path_errors_surface() {
        let config = GaugeConfig::default().with_font_path("/nonexistent/font.ttf");
        assert!(matches!(
            FontBook::load(&config),
            Err(GaugeError::Io { .. })
        ));

        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"not a font").unwrap();
        assert!(matches!(
            load_font(file.path()),
            Err(GaugeError::FontParse(_))
        ));
    }
}
