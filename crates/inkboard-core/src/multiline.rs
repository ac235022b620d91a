//! Parallel-line rendering along a moving polyline.
//!
//! Each call handles one sample pair. The previous call's end perpendicular and
//! end points are threaded through [`MultiLineState`], so segment `n + 1` starts
//! exactly where segment `n` ended and no seams appear between samples.

use crate::geometry::{normalized, unit_perpendicular};
use crate::render::{InkSegment, InkSink};
use kurbo::{Point, Vec2};

/// Weight of the current segment's perpendicular in the end blend.
const END_BLEND: f64 = 0.9;

/// Per-stroke multi-line state.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultiLineState {
    /// Perpendicular used at the end of the last segment. Always unit length.
    pub last_perp: Option<Vec2>,
    /// End points of every parallel line after the last segment.
    pub last_offset_points: Option<Vec<Point>>,
}

impl MultiLineState {
    pub fn new() -> Self {
        Self::default()
    }
}

/// Parameters for one multi-line segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MultiLineParams {
    pub count: usize,
    pub spacing: f64,
    /// Width and opacity of each line.
    pub width: f64,
    pub alpha: f64,
    pub color: crate::style::SerializableColor,
}

/// Signed offset of line `i` from the centre line.
pub fn line_offset(i: usize, count: usize, spacing: f64) -> f64 {
    (i as f64 - (count as f64 - 1.0) / 2.0) * spacing
}

/// Perpendiculars used at the start and end of segment `prev→curr`.
///
/// Returns `None` for a zero-length segment.
pub fn segment_perpendiculars(
    prev: Point,
    curr: Point,
    last_perp: Option<Vec2>,
) -> Option<(Vec2, Vec2)> {
    let current = unit_perpendicular(prev, curr)?;
    Some(match last_perp {
        Some(last) => {
            let blended = current * END_BLEND + last * (1.0 - END_BLEND);
            (last, normalized(blended).unwrap_or(current))
        }
        None => (current, current),
    })
}

/// Render `params.count` parallel lines for the segment `prev→curr` and return
/// the updated state.
///
/// A zero-length segment draws nothing and returns `state` unchanged.
pub fn render_multi_line_segment(
    prev: Point,
    curr: Point,
    state: MultiLineState,
    params: &MultiLineParams,
    sink: &mut dyn InkSink,
) -> MultiLineState {
    let Some((start_perp, end_perp)) = segment_perpendiculars(prev, curr, state.last_perp) else {
        return state;
    };

    let end_points: Vec<Point> = (0..params.count)
        .map(|i| curr + end_perp * line_offset(i, params.count, params.spacing))
        .collect();

    for (i, &end) in end_points.iter().enumerate() {
        let start = state
            .last_offset_points
            .as_ref()
            .and_then(|points| points.get(i).copied())
            .unwrap_or_else(|| prev + start_perp * line_offset(i, params.count, params.spacing));
        sink.draw_segment(&InkSegment::new(
            start,
            end,
            params.width,
            params.alpha,
            params.color,
        ));
    }

    MultiLineState {
        last_perp: Some(end_perp),
        last_offset_points: Some(end_points),
    }
}
