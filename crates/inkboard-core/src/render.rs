//! Render command abstraction.
//!
//! The engine never touches a drawing surface directly. It emits ink
//! commands to an [`InkSink`], which a backend (canvas, GPU scene, SVG writer,
//! or a test recorder) turns into pixels.

use crate::style::SerializableColor;
use kurbo::Point;
use serde::{Deserialize, Serialize};

/// End cap for a rendered segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineCap {
    #[default]
    Round,
    Butt,
}

/// How ink combines with what is already on the surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Composite {
    /// Paint over existing content.
    #[default]
    SourceOver,
    /// Remove existing content (eraser).
    Erase,
}

/// One straight piece of ink.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkSegment {
    pub from: Point,
    pub to: Point,
    pub width: f64,
    pub alpha: f64,
    pub color: SerializableColor,
    pub cap: LineCap,
    pub composite: Composite,
}

impl InkSegment {
    /// A round-capped, source-over segment.
    pub fn new(from: Point, to: Point, width: f64, alpha: f64, color: SerializableColor) -> Self {
        Self {
            from,
            to,
            width,
            alpha,
            color,
            cap: LineCap::Round,
            composite: Composite::SourceOver,
        }
    }

    pub fn length(&self) -> f64 {
        self.from.distance(self.to)
    }
}

/// A filled circle, used for the first mark of dashed and dotted strokes.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct InkDot {
    pub center: Point,
    pub radius: f64,
    pub alpha: f64,
    pub color: SerializableColor,
}

/// Receiver of render commands.
pub trait InkSink {
    /// Stroke a straight segment.
    fn draw_segment(&mut self, segment: &InkSegment);

    /// Fill a dot.
    fn draw_dot(&mut self, dot: &InkDot);
}

/// A recorded render command.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum InkCommand {
    Segment(InkSegment),
    Dot(InkDot),
}

/// Sink that records every command it receives.
#[derive(Debug, Clone, Default)]
pub struct RecordingSink {
    commands: Vec<InkCommand>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn commands(&self) -> &[InkCommand] {
        &self.commands
    }

    /// Recorded segments, in emission order.
    pub fn segments(&self) -> impl Iterator<Item = &InkSegment> {
        self.commands.iter().filter_map(|c| match c {
            InkCommand::Segment(s) => Some(s),
            InkCommand::Dot(_) => None,
        })
    }

    /// Recorded dots, in emission order.
    pub fn dots(&self) -> impl Iterator<Item = &InkDot> {
        self.commands.iter().filter_map(|c| match c {
            InkCommand::Dot(d) => Some(d),
            InkCommand::Segment(_) => None,
        })
    }

    pub fn len(&self) -> usize {
        self.commands.len()
    }

    pub fn is_empty(&self) -> bool {
        self.commands.is_empty()
    }

    pub fn clear(&mut self) {
        self.commands.clear();
    }

    /// Take the recorded commands, leaving the sink empty.
    pub fn take(&mut self) -> Vec<InkCommand> {
        std::mem::take(&mut self.commands)
    }
}

impl InkSink for RecordingSink {
    fn draw_segment(&mut self, segment: &InkSegment) {
        self.commands.push(InkCommand::Segment(*segment));
    }

    fn draw_dot(&mut self, dot: &InkDot) {
        self.commands.push(InkCommand::Dot(*dot));
    }
}
