//! Edge constraints for drawing along teaching tools.
//!
//! A pen point near a drawable tool edge is pulled onto it. A point well
//! inside a tool's body is blocked so the tool behaves as if opaque.

use crate::geometry::{point_to_segment_distance, project_onto_segment};
use crate::tools::{ToolId, ToolShape, ToolShapeKind};
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// Distance (canvas units) within which a point snaps to an edge.
pub const DEFAULT_EDGE_TOLERANCE: f64 = 15.0;

/// Which set-square edges can be drawn along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetSquareEdges {
    /// Only the two legs; the hypotenuse is part of the opaque body.
    Legs,
    /// Both legs and the hypotenuse.
    #[default]
    LegsAndHypotenuse,
}

impl SetSquareEdges {
    pub fn includes_hypotenuse(self) -> bool {
        matches!(self, SetSquareEdges::LegsAndHypotenuse)
    }
}

/// A side of a teaching tool, named in the tool's local frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ToolEdge {
    Top,
    Bottom,
    Left,
    Right,
    Hypotenuse,
}

/// The tool edge a point was snapped to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SnapTarget {
    pub tool_id: ToolId,
    pub edge: ToolEdge,
}

/// Outcome of constraining one input point.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeSnapResult {
    /// The point to draw with: snapped, or the input unchanged.
    pub point: Point,
    pub snapped: bool,
    /// The point lies inside a tool body; no ink should be laid.
    pub blocked: bool,
    /// Which edge was used, when snapped.
    pub target: Option<SnapTarget>,
}

impl EdgeSnapResult {
    /// Unconstrained point.
    pub fn none(point: Point) -> Self {
        Self {
            point,
            snapped: false,
            blocked: false,
            target: None,
        }
    }

    pub fn snapped(point: Point, target: SnapTarget) -> Self {
        Self {
            point,
            snapped: true,
            blocked: false,
            target: Some(target),
        }
    }

    pub fn blocked(point: Point) -> Self {
        Self {
            point,
            snapped: false,
            blocked: true,
            target: None,
        }
    }
}

/// An edge near a point, with the canvas-space point on that edge.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EdgeHit {
    pub edge: ToolEdge,
    pub point: Point,
}

/// Find the edge of `tool` that `point` is near, if any.
pub fn edge_at_point(
    point: Point,
    tool: &ToolShape,
    tolerance: f64,
    edges: SetSquareEdges,
) -> Option<EdgeHit> {
    let local = tool.to_local(point);
    let hit = match tool.kind {
        ToolShapeKind::Ruler => ruler_edge(local, tool, tolerance),
        ToolShapeKind::SetSquare(_) => set_square_edge(local, tool, tolerance, edges),
    }?;
    Some(EdgeHit {
        edge: hit.edge,
        point: tool.to_canvas(hit.point),
    })
}

/// Whether `point` lies inside the opaque body of `tool`, clear of its edges.
pub fn is_point_inside_tool(
    point: Point,
    tool: &ToolShape,
    tolerance: f64,
    edges: SetSquareEdges,
) -> bool {
    let local = tool.to_local(point);
    match tool.kind {
        ToolShapeKind::Ruler => inside_ruler(local, tool, tolerance),
        ToolShapeKind::SetSquare(_) => inside_set_square(local, tool, tolerance, edges),
    }
}

/// Snap, block or pass through `point` against every tool.
///
/// The first tool in list order with a nearby edge wins. Blocking is only
/// considered when no edge is near.
pub fn resolve_point(
    point: Point,
    tools: &[ToolShape],
    tolerance: f64,
    edges: SetSquareEdges,
) -> EdgeSnapResult {
    for tool in tools {
        if let Some(hit) = edge_at_point(point, tool, tolerance, edges) {
            let target = SnapTarget {
                tool_id: tool.id,
                edge: hit.edge,
            };
            return EdgeSnapResult::snapped(hit.point, target);
        }
    }
    if tools
        .iter()
        .any(|tool| is_point_inside_tool(point, tool, tolerance, edges))
    {
        return EdgeSnapResult::blocked(point);
    }
    EdgeSnapResult::none(point)
}

/// Edge resolver that remembers the last edge snapped to.
///
/// The remembered target is only feedback for the UI; it never changes how
/// the next point is resolved.
#[derive(Debug, Clone)]
pub struct EdgeResolver {
    pub tolerance: f64,
    pub set_square_edges: SetSquareEdges,
    last_snap: Option<SnapTarget>,
}

impl Default for EdgeResolver {
    fn default() -> Self {
        Self::new(DEFAULT_EDGE_TOLERANCE, SetSquareEdges::default())
    }
}

impl EdgeResolver {
    pub fn new(tolerance: f64, set_square_edges: SetSquareEdges) -> Self {
        Self {
            tolerance,
            set_square_edges,
            last_snap: None,
        }
    }

    /// Resolve one pen point.
    ///
    /// A blocked point keeps the previous snap target so the UI does not
    /// flicker while the pen crosses a tool.
    pub fn process_point(&mut self, point: Point, tools: &[ToolShape]) -> EdgeSnapResult {
        let result = resolve_point(point, tools, self.tolerance, self.set_square_edges);
        if result.blocked {
            log::trace!("Point ({:.1}, {:.1}) blocked by tool body", point.x, point.y);
        } else if let Some(target) = result.target {
            log::trace!(
                "Point ({:.1}, {:.1}) snapped to {:?} edge of tool {}",
                point.x,
                point.y,
                target.edge,
                target.tool_id
            );
            self.last_snap = Some(target);
        } else {
            self.last_snap = None;
        }
        result
    }

    pub fn is_snapped(&self) -> bool {
        self.last_snap.is_some()
    }

    pub fn last_snap(&self) -> Option<SnapTarget> {
        self.last_snap
    }

    pub fn reset(&mut self) {
        self.last_snap = None;
    }
}

fn ruler_edge(local: Point, tool: &ToolShape, tolerance: f64) -> Option<EdgeHit> {
    let (left, top) = (tool.x, tool.y);
    let (right, bottom) = (tool.x + tool.width, tool.y + tool.height);
    let within_x = local.x >= left - tolerance && local.x <= right + tolerance;
    let within_y = local.y >= top - tolerance && local.y <= bottom + tolerance;
    let clamp_x = local.x.clamp(left, right);
    let clamp_y = local.y.clamp(top, bottom);

    let hit = |edge, x, y| Some(EdgeHit { edge, point: Point::new(x, y) });
    if within_x && (local.y - bottom).abs() < tolerance {
        return hit(ToolEdge::Bottom, clamp_x, bottom);
    }
    if within_x && (local.y - top).abs() < tolerance {
        return hit(ToolEdge::Top, clamp_x, top);
    }
    if within_y && (local.x - left).abs() < tolerance {
        return hit(ToolEdge::Left, left, clamp_y);
    }
    if within_y && (local.x - right).abs() < tolerance {
        return hit(ToolEdge::Right, right, clamp_y);
    }
    None
}

/// Drawable set-square edges in test order.
fn set_square_edges(tool: &ToolShape, edges: SetSquareEdges) -> Vec<(ToolEdge, Point, Point)> {
    let [right_angle, base_end, apex] = tool.triangle_vertices();
    let mut list = vec![
        (ToolEdge::Bottom, right_angle, base_end),
        (ToolEdge::Left, right_angle, apex),
    ];
    if edges.includes_hypotenuse() {
        list.push((ToolEdge::Hypotenuse, apex, base_end));
    }
    list
}

fn within_local_box(local: Point, tool: &ToolShape) -> bool {
    local.x >= tool.x
        && local.x <= tool.x + tool.width
        && local.y >= tool.y
        && local.y <= tool.y + tool.height
}

fn set_square_edge(
    local: Point,
    tool: &ToolShape,
    tolerance: f64,
    edges: SetSquareEdges,
) -> Option<EdgeHit> {
    set_square_edges(tool, edges)
        .into_iter()
        .find_map(|(edge, a, b)| {
            if point_to_segment_distance(local, a, b) >= tolerance {
                return None;
            }
            let point = project_onto_segment(local, a, b);
            if edge == ToolEdge::Hypotenuse && !within_local_box(point, tool) {
                return None;
            }
            Some(EdgeHit { edge, point })
        })
}

fn inside_ruler(local: Point, tool: &ToolShape, margin: f64) -> bool {
    local.x > tool.x + margin
        && local.x < tool.x + tool.width - margin
        && local.y > tool.y + margin
        && local.y < tool.y + tool.height - margin
}

fn inside_set_square(
    local: Point,
    tool: &ToolShape,
    tolerance: f64,
    edges: SetSquareEdges,
) -> bool {
    if !within_local_box(local, tool) {
        return false;
    }

    let [a, b, c] = tool.triangle_vertices();
    let side = |p: Point, q: Point| (local.x - q.x) * (p.y - q.y) - (p.x - q.x) * (local.y - q.y);
    let signs = [side(a, b), side(b, c), side(c, a)];
    let has_neg = signs.iter().any(|&s| s < 0.0);
    let has_pos = signs.iter().any(|&s| s > 0.0);
    if has_neg && has_pos {
        return false;
    }

    // Only drawable edges leave a snap band; an opaque hypotenuse blocks up to the line.
    set_square_edges(tool, edges)
        .into_iter()
        .all(|(_, p, q)| point_to_segment_distance(local, p, q) > tolerance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::EngineConfig;
    use crate::tools::SetSquareAngle;

    fn ruler() -> ToolShape {
        ToolShape::new(ToolShapeKind::Ruler, 100.0, 100.0, 300.0, 30.0)
    }

    fn set_square() -> ToolShape {
        ToolShape::new(
            ToolShapeKind::SetSquare(SetSquareAngle::Deg45),
            0.0,
            0.0,
            100.0,
            100.0,
        )
    }

    fn assert_point_near(a: Point, b: Point) {
        assert!((a.x - b.x).abs() < 1e-9 && (a.y - b.y).abs() < 1e-9, "{a:?} != {b:?}");
    }

    #[test]
    fn test_ruler_top_edge_snap() {
        let tool = ruler();
        let result = resolve_point(
            Point::new(250.0, 99.0),
            std::slice::from_ref(&tool),
            DEFAULT_EDGE_TOLERANCE,
            SetSquareEdges::default(),
        );
        assert!(result.snapped);
        assert!(!result.blocked);
        assert_point_near(result.point, Point::new(250.0, 100.0));
        assert_eq!(result.target.map(|t| t.edge), Some(ToolEdge::Top));
    }

    #[test]
    fn test_ruler_edges() {
        let tool = ruler();
        let cases = [
            (Point::new(200.0, 138.0), ToolEdge::Bottom, Point::new(200.0, 130.0)),
            (Point::new(92.0, 115.0), ToolEdge::Left, Point::new(100.0, 115.0)),
            (Point::new(410.0, 115.0), ToolEdge::Right, Point::new(400.0, 115.0)),
        ];
        for (input, edge, expected) in cases {
            let hit = edge_at_point(input, &tool, DEFAULT_EDGE_TOLERANCE, SetSquareEdges::Legs)
                .unwrap_or_else(|| panic!("no edge near {input:?}"));
            assert_eq!(hit.edge, edge);
            assert_point_near(hit.point, expected);
        }
    }

    #[test]
    fn test_ruler_span_is_clamped() {
        // Just past the left end, still within tolerance along the edge.
        let hit = edge_at_point(
            Point::new(90.0, 99.0),
            &ruler(),
            DEFAULT_EDGE_TOLERANCE,
            SetSquareEdges::default(),
        )
        .unwrap();
        // Bottom is 31 away; top is tested before left.
        assert_eq!(hit.edge, ToolEdge::Top);
        assert_point_near(hit.point, Point::new(100.0, 100.0));

        assert!(
            edge_at_point(
                Point::new(80.0, 99.0),
                &ruler(),
                DEFAULT_EDGE_TOLERANCE,
                SetSquareEdges::default()
            )
            .is_none()
        );
    }

    #[test]
    fn test_thin_ruler_prefers_bottom() {
        // A 20-high ruler: a point in the middle is within tolerance of both
        // long edges; bottom is tested first.
        let tool = ToolShape::new(ToolShapeKind::Ruler, 0.0, 0.0, 300.0, 20.0);
        let hit = edge_at_point(Point::new(150.0, 10.0), &tool, 15.0, SetSquareEdges::default())
            .unwrap();
        assert_eq!(hit.edge, ToolEdge::Bottom);
    }

    #[test]
    fn test_ruler_interior_block() {
        let tool = ToolShape::new(ToolShapeKind::Ruler, 0.0, 0.0, 300.0, 100.0);
        let tools = [tool];
        let result = resolve_point(Point::new(150.0, 50.0), &tools, 15.0, SetSquareEdges::default());
        assert!(result.blocked);
        assert!(!result.snapped);
        assert_eq!(result.point, Point::new(150.0, 50.0));

        let outside = resolve_point(Point::new(500.0, 50.0), &tools, 15.0, SetSquareEdges::default());
        assert_eq!(outside, EdgeSnapResult::none(Point::new(500.0, 50.0)));
    }

    #[test]
    fn test_rotated_ruler_snaps_in_canvas_space() {
        // A ruler turned 90° about its centre (250, 115): its local top edge
        // now runs vertically at canvas x = 265.
        let tool = ruler().with_rotation(90.0);
        let hit = edge_at_point(Point::new(268.0, 150.0), &tool, 15.0, SetSquareEdges::default())
            .unwrap();
        assert_eq!(hit.edge, ToolEdge::Top);
        assert!((hit.point.x - 265.0).abs() < 1e-9);
        assert!((hit.point.y - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_set_square_legs_only_block() {
        let tools = [set_square()];
        let blocked = resolve_point(Point::new(60.0, 60.0), &tools, 15.0, SetSquareEdges::Legs);
        assert!(blocked.blocked);

        let near_corner = resolve_point(Point::new(5.0, 5.0), &tools, 15.0, SetSquareEdges::Legs);
        assert!(!near_corner.blocked);
        assert!(near_corner.snapped);
        assert_eq!(near_corner.target.map(|t| t.edge), Some(ToolEdge::Left));
        assert_point_near(near_corner.point, Point::new(0.0, 5.0));
    }

    #[test]
    fn test_set_square_hypotenuse() {
        let tool = set_square();
        let near_hyp = Point::new(55.0, 45.0);

        let hit = edge_at_point(near_hyp, &tool, 15.0, SetSquareEdges::LegsAndHypotenuse).unwrap();
        assert_eq!(hit.edge, ToolEdge::Hypotenuse);
        assert_point_near(hit.point, Point::new(50.0, 50.0));

        // Without a drawable hypotenuse the same point lies outside the body.
        assert!(edge_at_point(near_hyp, &tool, 15.0, SetSquareEdges::Legs).is_none());
        let result = resolve_point(near_hyp, &[tool], 15.0, SetSquareEdges::Legs);
        assert_eq!(result, EdgeSnapResult::none(near_hyp));
    }

    #[test]
    fn test_set_square_interior_margin() {
        // 173x100: inradius is about 36.6.
        let tool = ToolShape::new(
            ToolShapeKind::SetSquare(SetSquareAngle::Deg60),
            0.0,
            0.0,
            173.0,
            100.0,
        );
        let incentre = Point::new(36.6, 100.0 - 36.6);
        assert!(is_point_inside_tool(incentre, &tool, 15.0, SetSquareEdges::LegsAndHypotenuse));
        // 10 units from the bottom leg: inside the triangle but within the margin.
        assert!(!is_point_inside_tool(
            Point::new(60.0, 90.0),
            &tool,
            15.0,
            SetSquareEdges::Legs
        ));
        // Outside the triangle but inside the bounding box.
        assert!(!is_point_inside_tool(
            Point::new(160.0, 10.0),
            &tool,
            15.0,
            SetSquareEdges::Legs
        ));
    }

    #[test]
    fn test_default_set_squares_block_their_incentre() {
        let config = EngineConfig::default();
        let center = Point::new(200.0, 200.0);
        for angle in [SetSquareAngle::Deg45, SetSquareAngle::Deg60] {
            let tool = ToolShape::set_square(center, angle);
            let [right_angle, base_end, apex] = tool.triangle_vertices();
            let (a, b, c) = (
                base_end.distance(apex),
                right_angle.distance(apex),
                right_angle.distance(base_end),
            );
            // Weighted by the opposite side lengths.
            let incentre = Point::new(
                (a * right_angle.x + b * base_end.x + c * apex.x) / (a + b + c),
                (a * right_angle.y + b * base_end.y + c * apex.y) / (a + b + c),
            );
            let result = resolve_point(
                incentre,
                std::slice::from_ref(&tool),
                config.edge_tolerance,
                config.set_square_edges,
            );
            assert!(result.blocked, "{angle:?} set square lets ink through at {incentre:?}");
        }
    }

    #[test]
    fn test_rotated_set_square() {
        // Turned 90° about its centre (50, 50): local (x, y) lands on
        // canvas (100 - y, x).
        let tool = set_square().with_rotation(90.0);
        let tools = [tool.clone()];

        // Local (80, 70) is 7 from the hypotenuse and projects onto local (75, 75).
        let result = resolve_point(Point::new(30.0, 80.0), &tools, 15.0, SetSquareEdges::default());
        assert!(result.snapped);
        assert_eq!(result.target.map(|t| t.edge), Some(ToolEdge::Hypotenuse));
        assert_point_near(result.point, Point::new(25.0, 75.0));

        // Local (30, 70) is at least 28 from every edge.
        let inside = Point::new(30.0, 30.0);
        let result = resolve_point(inside, &tools, 15.0, SetSquareEdges::default());
        assert_eq!(result, EdgeSnapResult::blocked(inside));

        // Unrotated, the same canvas point sits on the hypotenuse.
        let unrotated = resolve_point(inside, &[set_square()], 15.0, SetSquareEdges::default());
        assert_eq!(unrotated.target.map(|t| t.edge), Some(ToolEdge::Hypotenuse));
    }

    #[test]
    fn test_first_tool_wins() {
        let a = ToolShape::new(ToolShapeKind::Ruler, 0.0, 0.0, 300.0, 30.0);
        let b = ToolShape::new(ToolShapeKind::Ruler, 0.0, 5.0, 300.0, 30.0);
        let result = resolve_point(Point::new(150.0, 2.0), &[a.clone(), b], 15.0, SetSquareEdges::default());
        assert_eq!(result.target.map(|t| t.tool_id), Some(a.id));
    }

    #[test]
    fn test_resolver_tracks_last_snap() {
        let tools = [ToolShape::new(ToolShapeKind::Ruler, 0.0, 0.0, 300.0, 100.0)];
        let mut resolver = EdgeResolver::default();

        resolver.process_point(Point::new(150.0, -3.0), &tools);
        assert!(resolver.is_snapped());
        assert_eq!(resolver.last_snap().map(|t| t.edge), Some(ToolEdge::Top));

        // Crossing the body keeps the last target.
        let blocked = resolver.process_point(Point::new(150.0, 50.0), &tools);
        assert!(blocked.blocked);
        assert!(resolver.is_snapped());

        resolver.process_point(Point::new(150.0, 400.0), &tools);
        assert!(!resolver.is_snapped());

        resolver.process_point(Point::new(150.0, 101.0), &tools);
        assert!(resolver.is_snapped());
        resolver.reset();
        assert!(resolver.last_snap().is_none());
    }

    #[test]
    fn test_no_tools_passes_through() {
        let mut resolver = EdgeResolver::default();
        let p = Point::new(12.0, 34.0);
        assert_eq!(resolver.process_point(p, &[]), EdgeSnapResult::none(p));
    }
}
