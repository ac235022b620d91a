//! Pen-variant width and opacity modulation.
//!
//! Segment length stands in for drawing speed: a long segment between two
//! samples means the pointer moved fast, which thins the line.

use crate::geometry::segment_angle;
use crate::style::PenVariant;
use kurbo::{Point, Vec2};

/// Width and opacity for one rendered segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SegmentInk {
    pub width: f64,
    pub alpha: f64,
}

/// Width envelope of a pen variant, in multiples of the pen size.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PenProfile {
    pub min_width: f64,
    pub max_width: f64,
    pub speed_divisor: f64,
    pub alpha: f64,
}

impl PenProfile {
    /// Profile of `variant` scaled to `pen_size`.
    pub fn for_variant(variant: PenVariant, pen_size: f64) -> Self {
        let (min, max, speed_divisor, alpha) = match variant {
            PenVariant::Normal => (1.0, 1.0, 1.0, 1.0),
            PenVariant::Ballpoint => (0.7, 1.2, 8.0, 0.95),
            PenVariant::Fountain => (0.4, 1.8, 12.0, 1.0),
            PenVariant::Brush => (0.8, 2.0, 12.0, 0.75),
            PenVariant::Pencil => (0.9, 0.9, 1.0, 0.6),
        };
        Self {
            min_width: min * pen_size,
            max_width: max * pen_size,
            speed_divisor,
            alpha,
        }
    }

    /// `max - min(distance / divisor, 1) * (max - min)`.
    pub fn width_at(&self, distance: f64) -> f64 {
        let speed_factor = (distance / self.speed_divisor).min(1.0);
        self.max_width - speed_factor * (self.max_width - self.min_width)
    }
}

/// Width and opacity of the main stroke for a segment of `distance` travelling at `angle`.
pub fn modulate(variant: PenVariant, distance: f64, angle: f64, pen_size: f64) -> SegmentInk {
    let profile = PenProfile::for_variant(variant, pen_size);
    let mut width = profile.width_at(distance);
    if variant == PenVariant::Fountain {
        // Calligraphic nib: thinner when travelling diagonally.
        let direction_factor = (angle * 2.0).sin().abs() * 0.3;
        width = (width - direction_factor * pen_size).max(profile.min_width);
    }
    SegmentInk {
        width,
        alpha: profile.alpha,
    }
}

/// Deterministic hash in `[0, 1)` of two coordinates and a stroke index.
///
/// Same inputs always give the same value, so grain is reproducible.
pub fn grain_hash(a: f64, b: f64, i: f64) -> f64 {
    let h = (a * 12.9898 + b * 78.233 + i * 43758.5453).sin() * 43758.5453;
    h - h.floor()
}

/// A secondary stroke drawn alongside the main segment.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GrainStroke {
    /// Offset along the segment's unit perpendicular.
    pub offset: Vec2,
    pub width: f64,
    pub alpha: f64,
}

impl GrainStroke {
    /// Endpoints of this grain stroke for the segment `prev→curr`.
    pub fn endpoints(&self, prev: Point, curr: Point) -> (Point, Point) {
        (prev + self.offset, curr + self.offset)
    }
}

const PENCIL_GRAIN_STROKES: usize = 2;
const BRUSH_GRAIN_STROKES: usize = 4;

/// Secondary strokes for textured pens. Empty for smooth pens.
///
/// `main_width` is the width returned by [`modulate`] for the same segment.
pub fn grain_strokes(
    variant: PenVariant,
    prev: Point,
    curr: Point,
    main_width: f64,
    pen_size: f64,
) -> Vec<GrainStroke> {
    let angle = segment_angle(prev, curr);
    let perp = Vec2::new(-angle.sin(), angle.cos());

    match variant {
        PenVariant::Pencil => (0..PENCIL_GRAIN_STROKES)
            .map(|i| {
                let seed = grain_hash(prev.x, curr.y, i as f64);
                GrainStroke {
                    offset: perp * ((seed - 0.5) * pen_size * 0.3),
                    width: pen_size * 0.4,
                    alpha: 0.3 + seed * 0.2,
                }
            })
            .collect(),
        PenVariant::Brush => (0..BRUSH_GRAIN_STROKES)
            .map(|i| {
                let i = i as f64;
                let seed1 = grain_hash(prev.x, curr.y, i * 1.1);
                let seed2 = grain_hash(prev.y, curr.x, i * 2.2);
                let seed3 = grain_hash(curr.x, prev.y, i * 3.3);
                GrainStroke {
                    offset: perp * ((seed1 - 0.5) * main_width * 0.6),
                    width: main_width * (0.2 + seed3 * 0.4),
                    alpha: 0.1 + seed2 * 0.15,
                }
            })
            .collect(),
        PenVariant::Normal | PenVariant::Ballpoint | PenVariant::Fountain => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ballpoint_width_range() {
        let slow = modulate(PenVariant::Ballpoint, 0.0, 0.0, 10.0);
        let fast = modulate(PenVariant::Ballpoint, 100.0, 0.0, 10.0);
        assert!((slow.width - 12.0).abs() < 1e-9);
        assert!((fast.width - 7.0).abs() < 1e-9);
        assert_eq!(slow.alpha, 0.95);

        let half = modulate(PenVariant::Ballpoint, 4.0, 0.0, 10.0);
        assert!((half.width - 9.5).abs() < 1e-9);
    }

    #[test]
    fn test_normal_and_pencil_constant() {
        for distance in [0.0, 3.0, 50.0] {
            assert_eq!(modulate(PenVariant::Normal, distance, 0.3, 4.0).width, 4.0);
            assert!((modulate(PenVariant::Pencil, distance, 0.3, 4.0).width - 3.6).abs() < 1e-9);
        }
    }

    #[test]
    fn test_fountain_direction() {
        let horizontal = modulate(PenVariant::Fountain, 0.0, 0.0, 10.0);
        let diagonal = modulate(PenVariant::Fountain, 0.0, std::f64::consts::FRAC_PI_4, 10.0);
        assert!((horizontal.width - 18.0).abs() < 1e-9);
        assert!((diagonal.width - 15.0).abs() < 1e-9);

        // Fast diagonal strokes never drop below the minimum width.
        let fast = modulate(PenVariant::Fountain, 500.0, std::f64::consts::FRAC_PI_4, 10.0);
        assert!((fast.width - 4.0).abs() < 1e-9);
    }

    #[test]
    fn test_width_monotonic_in_distance() {
        for variant in [PenVariant::Ballpoint, PenVariant::Fountain, PenVariant::Brush] {
            let mut last = f64::INFINITY;
            for d in 0..20 {
                let w = modulate(variant, d as f64, 0.0, 5.0).width;
                assert!(w <= last);
                last = w;
            }
        }
    }

    #[test]
    fn test_grain_hash_deterministic() {
        let a = grain_hash(10.5, 20.25, 1.0);
        let b = grain_hash(10.5, 20.25, 1.0);
        assert_eq!(a, b);
        assert!((0.0..1.0).contains(&a));
        assert_ne!(grain_hash(10.5, 20.25, 2.0), a);
    }

    #[test]
    fn test_grain_counts() {
        let prev = Point::new(0.0, 0.0);
        let curr = Point::new(10.0, 3.0);
        assert_eq!(grain_strokes(PenVariant::Pencil, prev, curr, 4.5, 5.0).len(), 2);
        assert_eq!(grain_strokes(PenVariant::Brush, prev, curr, 8.0, 5.0).len(), 4);
        assert!(grain_strokes(PenVariant::Ballpoint, prev, curr, 5.0, 5.0).is_empty());
    }

    #[test]
    fn test_grain_reproducible_and_perpendicular() {
        let prev = Point::new(3.0, 7.0);
        let curr = Point::new(13.0, 7.0);
        let first = grain_strokes(PenVariant::Brush, prev, curr, 8.0, 5.0);
        let second = grain_strokes(PenVariant::Brush, prev, curr, 8.0, 5.0);
        assert_eq!(first, second);
        for grain in &first {
            // Horizontal segment: offsets are purely vertical.
            assert!(grain.offset.x.abs() < 1e-9);
            assert!(grain.offset.y.abs() <= 8.0 * 0.3 + 1e-9);
            assert!(grain.alpha >= 0.1 && grain.alpha < 0.25);
        }
    }
}
