//! Parametric shapes: lines, rectangles and circles drawn with the pen's ink.
//!
//! A shape is built as one or more kurbo paths, flattened, and emitted to an
//! [`InkSink`] as straight segments. Dashed and dotted patterns run
//! continuously around each path; every path starts a fresh pattern.

use crate::dash::DashPattern;
use crate::geometry::unit_perpendicular;
use crate::multiline::line_offset;
use crate::render::{InkSegment, InkSink};
use crate::style::{
    MULTI_LINE_COUNT_RANGE, MULTI_LINE_SPACING_RANGE, SerializableColor, StyleConfig, clamp_logged,
};
use kurbo::{BezPath, Circle, PathEl, Point, Rect, Shape, Vec2};
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};

/// Allowed range for [`ShapeStyle::dash_density`].
pub const SHAPE_DASH_DENSITY_RANGE: (f64, f64) = (5.0, 40.0);
/// Allowed range for [`ShapeStyle::wave_density`].
pub const WAVE_DENSITY_RANGE: (f64, f64) = (5.0, 30.0);
/// Circles with a smaller radius are not drawn.
pub const MIN_CIRCLE_RADIUS: f64 = 2.0;

/// Curve flattening accuracy, in canvas units.
const FLATTEN_TOLERANCE: f64 = 0.1;
/// Dash length of the dotted pattern.
const DOT_LENGTH: f64 = 2.0;
/// Wave amplitude of a wavy line, in pen sizes.
const WAVY_LINE_AMPLITUDE: f64 = 1.5;
/// Wave amplitude of a wavy circle, in pen sizes.
const WAVY_CIRCLE_AMPLITUDE: f64 = 1.2;
const MIN_LINE_WAVES: usize = 4;
const MIN_CIRCLE_WAVES: usize = 12;

/// Which shape a drag produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeKind {
    /// From the drag start to the drag end.
    #[default]
    Line,
    /// Axis-aligned, spanned by the drag start and end.
    Rectangle,
    /// Centred on the drag start, through the drag end.
    Circle,
}

/// How a shape outline is stroked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeLineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    Wavy,
    Double,
    Triple,
    /// `multi_line_count` parallel outlines.
    Multi,
}

/// Line style settings for shapes, kept apart from the freehand style.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShapeStyle {
    pub line_style: ShapeLineStyle,
    dash_density: f64,
    wave_density: f64,
    multi_line_count: usize,
    multi_line_spacing: f64,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            line_style: ShapeLineStyle::default(),
            dash_density: 10.0,
            wave_density: 10.0,
            multi_line_count: 2,
            multi_line_spacing: 5.0,
        }
    }
}

impl ShapeStyle {
    pub fn dash_density(&self) -> f64 {
        self.dash_density
    }

    pub fn wave_density(&self) -> f64 {
        self.wave_density
    }

    pub fn multi_line_count(&self) -> usize {
        self.multi_line_count
    }

    pub fn multi_line_spacing(&self) -> f64 {
        self.multi_line_spacing
    }

    /// Set the dash length, clamped to [`SHAPE_DASH_DENSITY_RANGE`].
    pub fn set_dash_density(&mut self, density: f64) {
        self.dash_density = clamp_logged("shape dash_density", density, SHAPE_DASH_DENSITY_RANGE);
    }

    /// Set the wave length, clamped to [`WAVE_DENSITY_RANGE`].
    pub fn set_wave_density(&mut self, density: f64) {
        self.wave_density = clamp_logged("wave_density", density, WAVE_DENSITY_RANGE);
    }

    pub fn set_multi_line_count(&mut self, count: usize) {
        let (min, max) = MULTI_LINE_COUNT_RANGE;
        let clamped = count.clamp(min, max);
        if clamped != count {
            log::warn!("shape multi_line_count {count} out of range, clamped to {clamped}");
        }
        self.multi_line_count = clamped;
    }

    pub fn set_multi_line_spacing(&mut self, spacing: f64) {
        self.multi_line_spacing =
            clamp_logged("shape multi_line_spacing", spacing, MULTI_LINE_SPACING_RANGE);
    }

    /// Re-apply every clamp after deserializing.
    pub fn sanitized(mut self) -> Self {
        self.set_dash_density(self.dash_density);
        self.set_wave_density(self.wave_density);
        self.set_multi_line_count(self.multi_line_count);
        self.set_multi_line_spacing(self.multi_line_spacing);
        self
    }

    /// Dash pattern for dashed and dotted outlines.
    pub fn dash_pattern(&self) -> Option<DashPattern> {
        match self.line_style {
            ShapeLineStyle::Dashed => Some(DashPattern {
                dash_length: self.dash_density,
                gap_length: self.dash_density / 2.0,
            }),
            ShapeLineStyle::Dotted => Some(DashPattern {
                dash_length: DOT_LENGTH,
                gap_length: self.dash_density / 2.0,
            }),
            _ => None,
        }
    }

    /// Number of parallel outlines, for the parallel styles.
    pub fn parallel_count(&self) -> Option<usize> {
        match self.line_style {
            ShapeLineStyle::Double => Some(2),
            ShapeLineStyle::Triple => Some(3),
            ShapeLineStyle::Multi => Some(self.multi_line_count),
            _ => None,
        }
    }
}

/// Width, opacity and colour every shape segment is drawn with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ShapeInk {
    pub width: f64,
    pub alpha: f64,
    pub color: SerializableColor,
}

impl ShapeInk {
    /// The pen's base ink, without speed modulation.
    pub fn from_pen(style: &StyleConfig) -> Self {
        Self {
            width: style.pen_variant.base_width(style.pen_size),
            alpha: style.pen_variant.base_alpha(),
            color: style.color,
        }
    }
}

/// Outline paths of a shape dragged from `start` to `end`.
///
/// Degenerate shapes (a zero-length parallel or wavy line, a circle smaller
/// than [`MIN_CIRCLE_RADIUS`]) produce no paths.
pub fn shape_paths(
    kind: ShapeKind,
    start: Point,
    end: Point,
    style: &ShapeStyle,
    pen_size: f64,
) -> Vec<BezPath> {
    match kind {
        ShapeKind::Line => line_paths(start, end, style, pen_size),
        ShapeKind::Rectangle => rectangle_paths(Rect::from_points(start, end), style, pen_size),
        ShapeKind::Circle => circle_paths(start, start.distance(end), style, pen_size),
    }
}

/// Draw a shape with the pen's ink. Returns the number of segments emitted.
pub fn draw_shape(
    kind: ShapeKind,
    start: Point,
    end: Point,
    style: &ShapeStyle,
    pen: &StyleConfig,
    sink: &mut dyn InkSink,
) -> usize {
    let ink = ShapeInk::from_pen(pen);
    let pattern = style.dash_pattern();
    let mut emitted = 0;
    for path in shape_paths(kind, start, end, style, pen.pen_size) {
        emitted += stroke_path(&path, pattern, ink, sink);
    }
    emitted
}

/// Flatten `path` and emit it as segments, with `pattern` running along the
/// whole path. Returns the number of segments emitted.
pub fn stroke_path(
    path: &BezPath,
    pattern: Option<DashPattern>,
    ink: ShapeInk,
    sink: &mut dyn InkSink,
) -> usize {
    let mut dasher = Dasher {
        pattern: pattern.filter(|p| p.cycle_length() > 0.0),
        distance: 0.0,
        ink,
        sink,
        emitted: 0,
    };
    let mut current = Point::ZERO;
    let mut subpath_start = Point::ZERO;
    kurbo::flatten(path.iter(), FLATTEN_TOLERANCE, |el| match el {
        PathEl::MoveTo(p) => {
            current = p;
            subpath_start = p;
        }
        PathEl::LineTo(p) => {
            dasher.line(current, p);
            current = p;
        }
        PathEl::ClosePath => {
            dasher.line(current, subpath_start);
            current = subpath_start;
        }
        // Flattening only yields lines.
        PathEl::QuadTo(..) | PathEl::CurveTo(..) => {}
    });
    dasher.emitted
}

/// Walks flattened lines, tracking the dash phase across them.
struct Dasher<'a> {
    pattern: Option<DashPattern>,
    distance: f64,
    ink: ShapeInk,
    sink: &'a mut dyn InkSink,
    emitted: usize,
}

impl Dasher<'_> {
    /// Smallest step taken along a line, so the walk always advances.
    const MIN_RUN: f64 = 1e-9;

    fn line(&mut self, from: Point, to: Point) {
        let length = from.distance(to);
        if length <= f64::EPSILON {
            return;
        }
        let Some(pattern) = self.pattern else {
            self.emit(from, to);
            self.distance += length;
            return;
        };

        let direction = (to - from) / length;
        let cycle = pattern.cycle_length();
        let mut pos = 0.0;
        while pos < length {
            let phase = self.distance % cycle;
            let in_dash = pattern.in_dash(self.distance);
            let phase_end = if in_dash { pattern.dash_length } else { cycle };
            let run = (phase_end - phase).max(Self::MIN_RUN).min(length - pos);
            if in_dash {
                self.emit(from + direction * pos, from + direction * (pos + run));
            }
            pos += run;
            self.distance += run;
        }
    }

    fn emit(&mut self, from: Point, to: Point) {
        self.sink.draw_segment(&InkSegment::new(
            from,
            to,
            self.ink.width,
            self.ink.alpha,
            self.ink.color,
        ));
        self.emitted += 1;
    }
}

fn straight_path(from: Point, to: Point) -> BezPath {
    let mut path = BezPath::new();
    path.move_to(from);
    path.line_to(to);
    path
}

fn line_paths(start: Point, end: Point, style: &ShapeStyle, pen_size: f64) -> Vec<BezPath> {
    if let Some(count) = style.parallel_count() {
        let Some(perp) = unit_perpendicular(start, end) else {
            return Vec::new();
        };
        return (0..count)
            .map(|i| {
                let offset = perp * line_offset(i, count, style.multi_line_spacing);
                straight_path(start + offset, end + offset)
            })
            .collect();
    }
    match style.line_style {
        ShapeLineStyle::Wavy => wavy_line(start, end, style.wave_density, pen_size)
            .into_iter()
            .collect(),
        _ => vec![straight_path(start, end)],
    }
}

fn rectangle_paths(rect: Rect, style: &ShapeStyle, pen_size: f64) -> Vec<BezPath> {
    if let Some(count) = style.parallel_count() {
        // Inner outlines shrink, outer ones grow, centred on the dragged box.
        return (0..count)
            .map(|i| {
                let offset = line_offset(i, count, style.multi_line_spacing);
                rect.inflate(offset, offset).to_path(FLATTEN_TOLERANCE)
            })
            .collect();
    }
    match style.line_style {
        ShapeLineStyle::Wavy => {
            let corners = [
                Point::new(rect.x0, rect.y0),
                Point::new(rect.x1, rect.y0),
                Point::new(rect.x1, rect.y1),
                Point::new(rect.x0, rect.y1),
            ];
            (0..corners.len())
                .filter_map(|i| {
                    let next = corners[(i + 1) % corners.len()];
                    wavy_line(corners[i], next, style.wave_density, pen_size)
                })
                .collect()
        }
        _ => vec![rect.to_path(FLATTEN_TOLERANCE)],
    }
}

fn circle_paths(center: Point, radius: f64, style: &ShapeStyle, pen_size: f64) -> Vec<BezPath> {
    if radius < MIN_CIRCLE_RADIUS {
        return Vec::new();
    }
    if let Some(count) = style.parallel_count() {
        return (0..count)
            .map(|i| {
                let r = (radius + line_offset(i, count, style.multi_line_spacing)).max(1.0);
                Circle::new(center, r).to_path(FLATTEN_TOLERANCE)
            })
            .collect();
    }
    match style.line_style {
        ShapeLineStyle::Wavy => vec![wavy_circle(center, radius, style.wave_density, pen_size)],
        _ => vec![Circle::new(center, radius).to_path(FLATTEN_TOLERANCE)],
    }
}

/// A sine-like wave from `start` to `end` built from quadratic pieces.
fn wavy_line(start: Point, end: Point, wave_length: f64, pen_size: f64) -> Option<BezPath> {
    let perp = unit_perpendicular(start, end)?;
    let delta = end - start;
    let length = delta.hypot();
    let amplitude = pen_size * WAVY_LINE_AMPLITUDE;
    let pieces = ((length / (wave_length / 2.0)).floor() as usize).max(MIN_LINE_WAVES);

    let mut path = BezPath::new();
    path.move_to(start);
    for i in 1..=pieces {
        let t = i as f64 / pieces as f64;
        let wave = (t * PI * (length / wave_length)).sin() * amplitude;
        let control = start + delta * ((i as f64 - 0.5) / pieces as f64) + perp * wave;
        path.quad_to(control, start + delta * t + perp * (wave * 0.5));
    }
    path.line_to(end);
    Some(path)
}

/// A closed ring whose radius alternates by the wave amplitude.
fn wavy_circle(center: Point, radius: f64, wave_length: f64, pen_size: f64) -> BezPath {
    let amplitude = pen_size * WAVY_CIRCLE_AMPLITUDE;
    let waves = ((radius * TAU / wave_length).floor() as usize).max(MIN_CIRCLE_WAVES);
    let offset = |i: usize| if i % 2 == 0 { amplitude } else { -amplitude };
    let angle = |i: usize| i as f64 / waves as f64 * TAU;
    let at = |angle: f64, r: f64| center + Vec2::from_angle(angle) * r;

    let mut path = BezPath::new();
    path.move_to(at(0.0, radius + offset(0)));
    for i in 1..=waves {
        let control = at(
            (angle(i) + angle(i - 1)) / 2.0,
            radius + (offset(i) + offset(i - 1)) / 2.0,
        );
        path.quad_to(control, at(angle(i), radius + offset(i)));
    }
    path.close_path();
    path
}
