//! Point and vector helpers shared by the sampler, the multi-line renderer and
//! the edge-constraint resolver.
//!
//! All functions operate in a single canvas space. Angles passed in degrees are
//! named as such; everything else is radians.

use kurbo::{Affine, Point, Vec2};

/// Euclidean distance between two points.
pub fn distance(a: Point, b: Point) -> f64 {
    a.distance(b)
}

/// Parameter `t` in `[0, 1]` of the closest point on segment `a→b`.
///
/// Returns `None` for a degenerate segment.
fn segment_parameter(p: Point, a: Point, b: Point) -> Option<f64> {
    let seg = b - a;
    let len_sq = seg.hypot2();
    if len_sq == 0.0 {
        return None;
    }
    Some(((p - a).dot(seg) / len_sq).clamp(0.0, 1.0))
}

/// Closest point on segment `a→b` to `p`. A degenerate segment yields `a`.
pub fn project_onto_segment(p: Point, a: Point, b: Point) -> Point {
    match segment_parameter(p, a, b) {
        Some(t) => a + (b - a) * t,
        None => a,
    }
}

/// Distance from `p` to segment `a→b`, clamped to the segment.
pub fn point_to_segment_distance(p: Point, a: Point, b: Point) -> f64 {
    distance(p, project_onto_segment(p, a, b))
}

/// Rotate `p` about `center` by `angle_degrees`.
///
/// Positive angles turn clockwise on a y-down canvas, matching CSS `rotate()`.
pub fn rotate_around(p: Point, center: Point, angle_degrees: f64) -> Point {
    Affine::rotate_about(angle_degrees.to_radians(), center) * p
}

/// Direction of travel from `a` to `b` in radians.
pub fn segment_angle(a: Point, b: Point) -> f64 {
    (b.y - a.y).atan2(b.x - a.x)
}

/// Unit vector perpendicular to `a→b`, i.e. `normalize(-dy, dx)`.
///
/// Returns `None` when the segment has zero length.
pub fn unit_perpendicular(a: Point, b: Point) -> Option<Vec2> {
    let d = b - a;
    let len = d.hypot();
    if len == 0.0 {
        return None;
    }
    Some(Vec2::new(-d.y / len, d.x / len))
}

/// Normalize a vector, returning `None` for the zero vector.
pub fn normalized(v: Vec2) -> Option<Vec2> {
    let len = v.hypot();
    (len > 0.0).then(|| v / len)
}
