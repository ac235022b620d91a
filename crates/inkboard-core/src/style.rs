//! Stroke style configuration.
//!
//! Values are clamped when they are set, so the per-sample code can trust them.

use crate::render::LineCap;
use peniko::Color;
use serde::{Deserialize, Serialize};

/// Allowed range for [`StyleConfig::dash_density`].
pub const DASH_DENSITY_RANGE: (f64, f64) = (3.0, 30.0);
/// Allowed range for [`StyleConfig::multi_line_count`].
pub const MULTI_LINE_COUNT_RANGE: (usize, usize) = (2, 10);
/// Allowed range for [`StyleConfig::multi_line_spacing`].
pub const MULTI_LINE_SPACING_RANGE: (f64, f64) = (5.0, 50.0);

/// Serializable color representation (RGBA8).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }
}

impl Default for SerializableColor {
    fn default() -> Self {
        Self::black()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// How a freehand stroke is broken up along its length.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
    Dotted,
    /// Several parallel lines following the pointer.
    Multi,
}

impl LineStyle {
    /// Cycle to the next line style.
    pub fn next(self) -> Self {
        match self {
            LineStyle::Solid => LineStyle::Dashed,
            LineStyle::Dashed => LineStyle::Dotted,
            LineStyle::Dotted => LineStyle::Multi,
            LineStyle::Multi => LineStyle::Solid,
        }
    }

    /// Whether the stroke starts with a round dot instead of a zero-length segment.
    pub fn starts_with_dot(self) -> bool {
        matches!(self, LineStyle::Dashed | LineStyle::Dotted)
    }
}

/// Pen emulation used for width and opacity modulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PenVariant {
    #[default]
    Normal,
    Ballpoint,
    Fountain,
    Brush,
    Pencil,
}

impl PenVariant {
    /// Opacity the stroke context is set up with before any per-segment modulation.
    pub fn base_alpha(self) -> f64 {
        match self {
            PenVariant::Normal | PenVariant::Fountain => 1.0,
            PenVariant::Ballpoint => 0.9,
            PenVariant::Brush => 0.85,
            PenVariant::Pencil => 0.7,
        }
    }

    /// Line width the stroke context is set up with for a given pen size.
    pub fn base_width(self, pen_size: f64) -> f64 {
        match self {
            PenVariant::Brush => pen_size * 1.5,
            _ => pen_size,
        }
    }
}

/// Shape of the eraser tip.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EraserShape {
    #[default]
    Circle,
    Rectangle,
}

impl EraserShape {
    /// Line cap that reproduces the tip shape along a drag.
    pub fn cap(self) -> LineCap {
        match self {
            EraserShape::Circle => LineCap::Round,
            EraserShape::Rectangle => LineCap::Butt,
        }
    }
}

/// Current drawing style, as supplied by the settings layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StyleConfig {
    pub line_style: LineStyle,
    dash_density: f64,
    multi_line_count: usize,
    multi_line_spacing: f64,
    pub pen_variant: PenVariant,
    pub pen_size: f64,
    pub eraser_size: f64,
    pub eraser_shape: EraserShape,
    pub color: SerializableColor,
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            line_style: LineStyle::default(),
            dash_density: 10.0,
            multi_line_count: 2,
            multi_line_spacing: 10.0,
            pen_variant: PenVariant::default(),
            pen_size: 5.0,
            eraser_size: 20.0,
            eraser_shape: EraserShape::default(),
            color: SerializableColor::black(),
        }
    }
}

impl StyleConfig {
    pub fn dash_density(&self) -> f64 {
        self.dash_density
    }

    pub fn multi_line_count(&self) -> usize {
        self.multi_line_count
    }

    pub fn multi_line_spacing(&self) -> f64 {
        self.multi_line_spacing
    }

    /// Set the dash density, clamped to [`DASH_DENSITY_RANGE`].
    pub fn set_dash_density(&mut self, density: f64) {
        self.dash_density = clamp_logged("dash_density", density, DASH_DENSITY_RANGE);
    }

    /// Set the number of parallel lines, clamped to [`MULTI_LINE_COUNT_RANGE`].
    pub fn set_multi_line_count(&mut self, count: usize) {
        let (min, max) = MULTI_LINE_COUNT_RANGE;
        let clamped = count.clamp(min, max);
        if clamped != count {
            log::warn!("multi_line_count {count} out of range, clamped to {clamped}");
        }
        self.multi_line_count = clamped;
    }

    /// Set the spacing between parallel lines, clamped to [`MULTI_LINE_SPACING_RANGE`].
    pub fn set_multi_line_spacing(&mut self, spacing: f64) {
        self.multi_line_spacing =
            clamp_logged("multi_line_spacing", spacing, MULTI_LINE_SPACING_RANGE);
    }

    /// Get the stroke color as a peniko Color.
    pub fn stroke(&self) -> Color {
        self.color.into()
    }

    /// Set the stroke color from a peniko Color.
    pub fn set_stroke(&mut self, color: Color) {
        self.color = color.into();
    }

    /// Re-apply every clamp. Used after deserializing values that bypassed the setters.
    pub fn sanitized(mut self) -> Self {
        self.set_dash_density(self.dash_density);
        self.set_multi_line_count(self.multi_line_count);
        self.set_multi_line_spacing(self.multi_line_spacing);
        if !(self.pen_size.is_finite() && self.pen_size > 0.0) {
            log::warn!("pen_size {} invalid, using default", self.pen_size);
            self.pen_size = Self::default().pen_size;
        }
        if !(self.eraser_size.is_finite() && self.eraser_size > 0.0) {
            log::warn!("eraser_size {} invalid, using default", self.eraser_size);
            self.eraser_size = Self::default().eraser_size;
        }
        self
    }
}

pub(crate) fn clamp_logged(name: &str, value: f64, (min, max): (f64, f64)) -> f64 {
    // NaN falls through clamp unchanged, so pin it to the lower bound.
    let clamped = if value.is_nan() { min } else { value.clamp(min, max) };
    if clamped != value {
        log::warn!("{name} {value} out of range, clamped to {clamped}");
    }
    clamped
}
