//! Distance-driven dash/dot phase tracking.
//!
//! The phase is a continuous accumulator over arc length, so the dash pattern
//! is the same regardless of how densely the pointer was sampled.

use crate::style::{LineStyle, StyleConfig};

/// Dash and gap lengths for one cycle.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashPattern {
    pub dash_length: f64,
    pub gap_length: f64,
}

impl DashPattern {
    /// Pattern for the given style, or `None` for styles that always draw.
    pub fn for_style(line_style: LineStyle, dash_density: f64, pen_size: f64) -> Option<Self> {
        match line_style {
            LineStyle::Solid | LineStyle::Multi => None,
            LineStyle::Dashed => Some(Self {
                dash_length: dash_density,
                gap_length: dash_density * 0.6,
            }),
            LineStyle::Dotted => Some(Self {
                dash_length: pen_size * 1.5,
                gap_length: dash_density * 0.8,
            }),
        }
    }

    /// Pattern for the current style configuration.
    pub fn from_style(style: &StyleConfig) -> Option<Self> {
        Self::for_style(style.line_style, style.dash_density(), style.pen_size)
    }

    pub fn cycle_length(&self) -> f64 {
        self.dash_length + self.gap_length
    }

    /// Whether the given accumulated distance falls inside a dash.
    pub fn in_dash(&self, accumulated_distance: f64) -> bool {
        let cycle = self.cycle_length();
        if cycle <= 0.0 {
            return true;
        }
        accumulated_distance % cycle < self.dash_length
    }
}

/// Per-stroke dash phase.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DashState {
    /// Arc length drawn so far in this stroke. Never decreases.
    pub accumulated_distance: f64,
    /// Phase after the last advance.
    pub in_dash_phase: bool,
}

impl Default for DashState {
    fn default() -> Self {
        Self {
            accumulated_distance: 0.0,
            in_dash_phase: true,
        }
    }
}

impl DashState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a segment of `distance` and report whether it should be drawn.
    ///
    /// The accumulator advances for every style; only dashed and dotted
    /// patterns gate drawing on it.
    pub fn advance(&mut self, distance: f64, pattern: Option<DashPattern>) -> bool {
        // Negative or NaN lengths would move the phase backwards.
        if distance.is_finite() && distance > 0.0 {
            self.accumulated_distance += distance;
        }
        self.in_dash_phase = match pattern {
            Some(pattern) => pattern.in_dash(self.accumulated_distance),
            None => true,
        };
        self.in_dash_phase
    }

    /// Pure form of [`DashState::advance`].
    pub fn advanced(self, distance: f64, pattern: Option<DashPattern>) -> (Self, bool) {
        let mut next = self;
        let draw = next.advance(distance, pattern);
        (next, draw)
    }
}
