//! Teaching tools: rulers and set squares placed on the canvas.
//!
//! A tool's `x`, `y`, `width` and `height` describe a box in the tool's own
//! unrotated frame. `rotation` (degrees) turns that frame about the box centre
//! into canvas space. Edge math always happens in the local frame.

mod placement;

pub use placement::{PinchStart, ResizeHandle, ToolPlacement, MIN_TOOL_SIZE};

use crate::geometry::rotate_around;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for placed tools.
pub type ToolId = Uuid;

/// Default ruler size.
pub const RULER_SIZE: (f64, f64) = (300.0, 30.0);
/// Height of a freshly placed set square.
pub const SET_SQUARE_HEIGHT: f64 = 100.0;

/// Which angles a set square is cut to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SetSquareAngle {
    /// 30/60/90 triangle, legs in a √3:1 ratio.
    #[default]
    Deg60,
    /// 45/45/90 triangle.
    Deg45,
}

/// Outline of a teaching tool.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ToolShapeKind {
    /// Rectangle; all four sides are drawable.
    Ruler,
    /// Right triangle with the right angle at the local bottom-left corner.
    SetSquare(SetSquareAngle),
}

/// A teaching tool placed on the canvas.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ToolShape {
    #[serde(default = "Uuid::new_v4")]
    pub id: ToolId,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Rotation in degrees about the box centre.
    #[serde(default)]
    pub rotation: f64,
    pub kind: ToolShapeKind,
}

impl ToolShape {
    /// Create a tool from its local box.
    pub fn new(kind: ToolShapeKind, x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            x,
            y,
            width,
            height,
            rotation: 0.0,
            kind,
        }
    }

    /// A default-sized ruler centred on `center`.
    pub fn ruler(center: Point) -> Self {
        let (w, h) = RULER_SIZE;
        Self::new(ToolShapeKind::Ruler, center.x - w / 2.0, center.y - h / 2.0, w, h)
    }

    /// A default-sized set square centred on `center`.
    pub fn set_square(center: Point, angle: SetSquareAngle) -> Self {
        let h = SET_SQUARE_HEIGHT;
        let w = match angle {
            SetSquareAngle::Deg60 => (h * 3f64.sqrt()).round(),
            SetSquareAngle::Deg45 => h,
        };
        Self::new(
            ToolShapeKind::SetSquare(angle),
            center.x - w / 2.0,
            center.y - h / 2.0,
            w,
            h,
        )
    }

    /// Builder-style rotation in degrees.
    pub fn with_rotation(mut self, degrees: f64) -> Self {
        self.rotation = degrees;
        self
    }

    /// Centre of the box; the rotation pivot.
    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    /// Canvas point → tool-local frame.
    pub fn to_local(&self, point: Point) -> Point {
        rotate_around(point, self.center(), -self.rotation)
    }

    /// Tool-local frame → canvas point.
    pub fn to_canvas(&self, local: Point) -> Point {
        rotate_around(local, self.center(), self.rotation)
    }

    /// Whether a canvas point falls inside the (rotated) bounding box.
    pub fn contains(&self, point: Point) -> bool {
        let local = self.to_local(point);
        local.x >= self.x
            && local.x <= self.x + self.width
            && local.y >= self.y
            && local.y <= self.y + self.height
    }

    /// Set-square vertices in the local frame: right angle (bottom-left),
    /// bottom-right, top-left.
    pub fn triangle_vertices(&self) -> [Point; 3] {
        [
            Point::new(self.x, self.y + self.height),
            Point::new(self.x + self.width, self.y + self.height),
            Point::new(self.x, self.y),
        ]
    }
}
