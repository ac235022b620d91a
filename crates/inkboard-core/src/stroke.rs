//! Archived strokes and stroke selection.

use crate::geometry::point_to_segment_distance;
use crate::render::{Composite, InkSegment, InkSink, LineCap};
use crate::style::{EraserShape, PenVariant, SerializableColor};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for archived strokes.
pub type StrokeId = Uuid;

/// Distance within which a pointer picks a stroke.
pub const DEFAULT_SELECTION_THRESHOLD: f64 = 10.0;

/// Offset applied to both axes of a copied stroke.
pub const DEFAULT_COPY_OFFSET: f64 = 20.0;

/// What produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StrokeTool {
    #[default]
    Pen,
    Eraser(EraserShape),
}

/// A finished freehand stroke.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Stroke {
    #[serde(default = "Uuid::new_v4")]
    pub id: StrokeId,
    pub points: Vec<Point>,
    pub color: SerializableColor,
    pub width: f64,
    #[serde(default)]
    pub pen_variant: PenVariant,
    #[serde(default)]
    pub tool: StrokeTool,
    /// Reserved for transform overlays; never read by stroke geometry.
    #[serde(default)]
    pub rotation: f64,
}

impl Stroke {
    pub fn new(
        points: Vec<Point>,
        color: SerializableColor,
        width: f64,
        pen_variant: PenVariant,
        tool: StrokeTool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color,
            width,
            pen_variant,
            tool,
            rotation: 0.0,
        }
    }

    /// Whether any segment passes strictly closer than `threshold` to `point`.
    ///
    /// A single-point stroke has no segments and is never near.
    pub fn is_near(&self, point: Point, threshold: f64) -> bool {
        self.points
            .windows(2)
            .any(|w| point_to_segment_distance(point, w[0], w[1]) < threshold)
    }

    /// Bounding box of the points, padded by twice the stroke width.
    pub fn bounds(&self) -> Option<Rect> {
        let (first, rest) = self.points.split_first()?;
        let rect = rest
            .iter()
            .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p));
        Some(rect.inflate(self.width * 2.0, self.width * 2.0))
    }

    /// A copy moved by `offset`, with a fresh id.
    pub fn translated(&self, offset: Vec2) -> Self {
        Self {
            id: Uuid::new_v4(),
            points: self.points.iter().map(|p| *p + offset).collect(),
            ..self.clone()
        }
    }

    /// Replay the stroke as a plain polyline in its base style.
    pub fn redraw(&self, sink: &mut dyn InkSink) {
        let (width, alpha, cap, composite) = match self.tool {
            StrokeTool::Pen => (
                self.pen_variant.base_width(self.width),
                self.pen_variant.base_alpha(),
                LineCap::Round,
                Composite::SourceOver,
            ),
            StrokeTool::Eraser(shape) => (self.width, 1.0, shape.cap(), Composite::Erase),
        };
        for w in self.points.windows(2) {
            sink.draw_segment(&InkSegment {
                cap,
                composite,
                ..InkSegment::new(w[0], w[1], width, alpha, self.color)
            });
        }
    }
}

/// Index of the newest stroke near `point`, if any.
pub fn find_stroke_near(point: Point, strokes: &[Stroke], threshold: f64) -> Option<usize> {
    strokes.iter().rposition(|s| s.is_near(point, threshold))
}

/// Archived strokes of a drawing session, with single-stroke selection.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StrokeArchive {
    strokes: Vec<Stroke>,
    #[serde(skip)]
    selected: Option<usize>,
}

impl StrokeArchive {
    pub fn new() -> Self {
        Self::default()
    }

    /// Archive a finished stroke and return its id.
    pub fn push(&mut self, stroke: Stroke) -> StrokeId {
        let id = stroke.id;
        self.strokes.push(stroke);
        id
    }

    pub fn iter(&self) -> impl Iterator<Item = &Stroke> {
        self.strokes.iter()
    }

    pub fn get(&self, index: usize) -> Option<&Stroke> {
        self.strokes.get(index)
    }

    pub fn len(&self) -> usize {
        self.strokes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strokes.is_empty()
    }

    /// Newest stroke near `point`.
    pub fn find_near(&self, point: Point, threshold: f64) -> Option<usize> {
        find_stroke_near(point, &self.strokes, threshold)
    }

    /// Select the stroke at `index`. Out-of-range indices clear the selection.
    pub fn select(&mut self, index: usize) -> bool {
        self.selected = (index < self.strokes.len()).then_some(index);
        self.selected.is_some()
    }

    pub fn deselect(&mut self) {
        self.selected = None;
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_stroke(&self) -> Option<&Stroke> {
        self.selected.and_then(|i| self.strokes.get(i))
    }

    /// Duplicate the selected stroke, shifted by `offset` on both axes, and
    /// select the duplicate.
    pub fn copy_selected(&mut self, offset: f64) -> Option<StrokeId> {
        let copy = self.selected_stroke()?.translated(Vec2::new(offset, offset));
        let id = self.push(copy);
        self.selected = Some(self.strokes.len() - 1);
        Some(id)
    }

    /// Remove the selected stroke and clear the selection.
    pub fn delete_selected(&mut self) -> Option<Stroke> {
        let index = self.selected.take()?;
        (index < self.strokes.len()).then(|| self.strokes.remove(index))
    }

    pub fn clear(&mut self) {
        self.strokes.clear();
        self.selected = None;
    }

    /// Padded bounds of the selected stroke, for a selection outline.
    pub fn selection_bounds(&self) -> Option<Rect> {
        self.selected_stroke().and_then(Stroke::bounds)
    }

    /// Replay every archived stroke in order.
    pub fn redraw(&self, sink: &mut dyn InkSink) {
        for stroke in &self.strokes {
            stroke.redraw(sink);
        }
    }
}

/// Padded bounding box of `stroke`; `None` when it has no points.
pub fn stroke_bounds(stroke: &Stroke) -> Option<Rect> {
    stroke.bounds()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::RecordingSink;

    fn stroke(points: &[(f64, f64)]) -> Stroke {
        Stroke::new(
            points.iter().map(|&(x, y)| Point::new(x, y)).collect(),
            SerializableColor::black(),
            2.0,
            PenVariant::Normal,
            StrokeTool::Pen,
        )
    }

    #[test]
    fn test_find_stroke_near_prefers_newest() {
        let strokes = vec![
            stroke(&[(0.0, 0.0), (100.0, 0.0)]),
            stroke(&[(50.0, -50.0), (50.0, 50.0)]),
        ];
        assert_eq!(find_stroke_near(Point::new(50.0, 2.0), &strokes, 10.0), Some(1));
        assert_eq!(find_stroke_near(Point::new(10.0, 2.0), &strokes, 10.0), Some(0));
        assert_eq!(find_stroke_near(Point::new(10.0, 30.0), &strokes, 10.0), None);
    }

    #[test]
    fn test_threshold_is_strict() {
        let strokes = vec![stroke(&[(0.0, 0.0), (100.0, 0.0)])];
        assert_eq!(find_stroke_near(Point::new(50.0, 10.0), &strokes, 10.0), None);
        assert_eq!(find_stroke_near(Point::new(50.0, 9.5), &strokes, 10.0), Some(0));
    }

    #[test]
    fn test_single_point_stroke_is_not_near() {
        let strokes = vec![stroke(&[(5.0, 5.0)])];
        assert_eq!(find_stroke_near(Point::new(5.0, 5.0), &strokes, 10.0), None);
    }

    #[test]
    fn test_bounds_padding() {
        let s = stroke(&[(10.0, 20.0), (30.0, 5.0), (15.0, 40.0)]);
        let bounds = stroke_bounds(&s).unwrap();
        assert_eq!(bounds, Rect::new(6.0, 1.0, 34.0, 44.0));
        assert!(stroke_bounds(&stroke(&[])).is_none());
    }

    #[test]
    fn test_copy_selected() {
        let mut archive = StrokeArchive::new();
        let original = archive.push(stroke(&[(0.0, 0.0), (10.0, 10.0)]));
        assert!(archive.copy_selected(DEFAULT_COPY_OFFSET).is_none());

        assert!(archive.select(0));
        let copy = archive.copy_selected(DEFAULT_COPY_OFFSET).unwrap();
        assert_ne!(copy, original);
        assert_eq!(archive.len(), 2);
        assert_eq!(archive.selected(), Some(1));
        assert_eq!(
            archive.selected_stroke().unwrap().points,
            vec![Point::new(20.0, 20.0), Point::new(30.0, 30.0)]
        );
    }

    #[test]
    fn test_delete_selected() {
        let mut archive = StrokeArchive::new();
        archive.push(stroke(&[(0.0, 0.0), (10.0, 10.0)]));
        let keep = archive.push(stroke(&[(0.0, 50.0), (10.0, 50.0)]));

        assert!(archive.delete_selected().is_none());
        archive.select(0);
        assert!(archive.delete_selected().is_some());
        assert_eq!(archive.selected(), None);
        assert_eq!(archive.len(), 1);
        assert_eq!(archive.get(0).unwrap().id, keep);

        assert!(!archive.select(5));
    }

    #[test]
    fn test_clear() {
        let mut archive = StrokeArchive::new();
        archive.push(stroke(&[(0.0, 0.0), (10.0, 10.0)]));
        archive.select(0);
        archive.clear();
        assert!(archive.is_empty());
        assert!(archive.selection_bounds().is_none());
    }

    #[test]
    fn test_redraw_uses_base_style() {
        let mut brush = stroke(&[(0.0, 0.0), (10.0, 0.0), (20.0, 0.0)]);
        brush.pen_variant = PenVariant::Brush;
        let mut sink = RecordingSink::new();
        brush.redraw(&mut sink);

        let segments: Vec<_> = sink.segments().copied().collect();
        assert_eq!(segments.len(), 2);
        assert_eq!(segments[0].width, 3.0);
        assert_eq!(segments[0].alpha, 0.85);

        let mut eraser = stroke(&[(0.0, 0.0), (10.0, 0.0)]);
        eraser.tool = StrokeTool::Eraser(EraserShape::Rectangle);
        sink.clear();
        eraser.redraw(&mut sink);
        let segment = sink.segments().next().unwrap();
        assert_eq!(segment.composite, Composite::Erase);
        assert_eq!(segment.cap, LineCap::Butt);
    }
}
