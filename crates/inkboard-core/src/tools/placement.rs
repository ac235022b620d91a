//! Placement and direct manipulation of teaching tools.
//!
//! Tools are only moved between strokes; the edge resolver reads the list as a
//! snapshot while a stroke is in progress.

use super::{ToolId, ToolShape};
use crate::geometry::rotate_around;
use kurbo::{Point, Vec2};

/// Smallest width or height a resize may produce.
pub const MIN_TOOL_SIZE: f64 = 30.0;

/// Minimum finger separation for a pinch to be measured against.
const MIN_PINCH_DISTANCE: f64 = 1.0;

/// Resize handle on a tool's local box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ResizeHandle {
    N,
    S,
    E,
    W,
    NE,
    NW,
    SE,
    SW,
}

/// Snapshot taken when a two-finger gesture begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PinchStart {
    pub width: f64,
    pub height: f64,
    pub rotation: f64,
    /// Finger separation at gesture start.
    pub distance: f64,
    /// Finger angle at gesture start, radians.
    pub angle: f64,
}

/// Ordered collection of placed tools; later entries sit on top.
#[derive(Debug, Clone, Default)]
pub struct ToolPlacement {
    tools: Vec<ToolShape>,
}

impl ToolPlacement {
    pub fn new() -> Self {
        Self::default()
    }

    /// Place a tool on top of the others.
    pub fn insert(&mut self, tool: ToolShape) -> ToolId {
        let id = tool.id;
        log::debug!("Placing {:?} tool {}", tool.kind, id);
        self.tools.push(tool);
        id
    }

    /// Remove a tool. Returns it if it was present.
    pub fn remove(&mut self, id: ToolId) -> Option<ToolShape> {
        let index = self.tools.iter().position(|t| t.id == id)?;
        Some(self.tools.remove(index))
    }

    /// Read-only snapshot for the edge resolver.
    pub fn tools(&self) -> &[ToolShape] {
        &self.tools
    }

    pub fn get(&self, id: ToolId) -> Option<&ToolShape> {
        self.tools.iter().find(|t| t.id == id)
    }

    pub fn get_mut(&mut self, id: ToolId) -> Option<&mut ToolShape> {
        self.tools.iter_mut().find(|t| t.id == id)
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Top-most tool whose rotated box contains `point`.
    pub fn tool_at(&self, point: Point) -> Option<ToolId> {
        self.tools.iter().rev().find(|t| t.contains(point)).map(|t| t.id)
    }

    /// Move a tool so that its top-left sits at `pointer - grab_offset`.
    pub fn drag_to(&mut self, id: ToolId, pointer: Point, grab_offset: Vec2) -> bool {
        let Some(tool) = self.get_mut(id) else {
            return false;
        };
        let origin = pointer - grab_offset;
        tool.x = origin.x;
        tool.y = origin.y;
        true
    }

    /// Turn a tool by the change in pointer angle about its centre.
    ///
    /// `last_angle` is the pointer angle (radians) at the previous event; the new
    /// angle is returned so the caller can feed it back on the next event.
    pub fn rotate_towards(&mut self, id: ToolId, pointer: Point, last_angle: f64) -> Option<f64> {
        let tool = self.get_mut(id)?;
        let center = tool.center();
        let angle = (pointer.y - center.y).atan2(pointer.x - center.x);
        tool.rotation += (angle - last_angle).to_degrees();
        Some(angle)
    }

    /// Resize a tool from `start` (its state when the drag began) towards `pointer`.
    ///
    /// Returns `false` if nothing changed.
    pub fn resize(
        &mut self,
        id: ToolId,
        handle: ResizeHandle,
        start: &ToolShape,
        pointer: Point,
    ) -> bool {
        let Some(tool) = self.get_mut(id) else {
            return false;
        };
        apply_resize(tool, handle, start, pointer)
    }

    /// Scale and rotate a tool with a two-finger gesture.
    pub fn pinch(&mut self, id: ToolId, start: &PinchStart, distance: f64, angle: f64) -> bool {
        if start.distance < MIN_PINCH_DISTANCE {
            return false;
        }
        let Some(tool) = self.get_mut(id) else {
            return false;
        };
        let scale = distance / start.distance;
        tool.width = start.width * scale;
        tool.height = start.height * scale;
        tool.rotation = start.rotation + (angle - start.angle).to_degrees();
        true
    }
}

fn apply_resize(
    tool: &mut ToolShape,
    handle: ResizeHandle,
    start: &ToolShape,
    pointer: Point,
) -> bool {
    if start.height == 0.0 {
        return false;
    }
    let aspect = start.width / start.height;
    let local = rotate_around(pointer, start.center(), -start.rotation);
    let right = start.x + start.width;
    let bottom = start.y + start.height;

    // (origin, size) per axis; `None` leaves that axis alone.
    let (horizontal, vertical) = match handle {
        ResizeHandle::NW => {
            let width = right - local.x;
            let height = width / aspect;
            (Some((right - width, width)), Some((bottom - height, height)))
        }
        ResizeHandle::NE => {
            let width = local.x - start.x;
            let height = width / aspect;
            (Some((start.x, width)), Some((bottom - height, height)))
        }
        ResizeHandle::SW => {
            let width = right - local.x;
            let height = width / aspect;
            (Some((right - width, width)), Some((start.y, height)))
        }
        ResizeHandle::SE => {
            let width = local.x - start.x;
            let height = width / aspect;
            (Some((start.x, width)), Some((start.y, height)))
        }
        ResizeHandle::N => {
            let height = bottom - local.y;
            (None, Some((bottom - height, height)))
        }
        ResizeHandle::S => (None, Some((start.y, local.y - start.y))),
        ResizeHandle::W => {
            let width = right - local.x;
            (Some((right - width, width)), None)
        }
        ResizeHandle::E => (Some((start.x, local.x - start.x)), None),
    };

    let mut changed = false;
    if let Some((x, width)) = horizontal.filter(|&(_, w)| w >= MIN_TOOL_SIZE) {
        tool.x = x;
        tool.width = width;
        changed = true;
    }
    if let Some((y, height)) = vertical.filter(|&(_, h)| h >= MIN_TOOL_SIZE) {
        tool.y = y;
        tool.height = height;
        changed = true;
    }
    changed
}
