//! Replay scripts: recorded pointer events driven through a drawing session.

use inkboard_core::{
    DrawingSession, EngineConfig, InkCommand, RecordingSink, ShapeKind, StrokeId, ToolPlacement,
    ToolShape,
};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

/// Replay errors.
#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("IO error: {0}")]
    Io(String),
    #[error("Script error: {0}")]
    Script(String),
}

/// Result type for replay operations.
pub type ReplayResult<T> = Result<T, ReplayError>;

/// One recorded input event.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ReplayEvent {
    StrokeStart { x: f64, y: f64 },
    StrokeMove { x: f64, y: f64 },
    StrokeEnd,
    StrokeAbort,
    UsePen,
    UseEraser,
    PlaceTool { tool: ToolShape },
    /// Select the newest stroke near a point.
    Select { x: f64, y: f64 },
    CopySelected,
    DeleteSelected,
    ClearStrokes,
    /// Replay every archived stroke in its base style.
    Redraw,
    /// A parametric shape dragged from `start` to `end`.
    DrawShape {
        shape: ShapeKind,
        start: Point,
        end: Point,
    },
}

/// A complete replay script.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ReplayScript {
    pub config: EngineConfig,
    /// Tools placed before the first event.
    pub tools: Vec<ToolShape>,
    pub events: Vec<ReplayEvent>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> ReplayResult<Self> {
        let mut script: Self =
            serde_json::from_str(json).map_err(|e| ReplayError::Script(e.to_string()))?;
        script.config = script.config.sanitized();
        Ok(script)
    }

    pub fn load(path: &Path) -> ReplayResult<Self> {
        let json = fs::read_to_string(path)
            .map_err(|e| ReplayError::Io(format!("Failed to read {}: {}", path.display(), e)))?;
        Self::from_json(&json)
    }
}

/// What a replay produced.
#[derive(Debug, Clone, Default, Serialize)]
pub struct ReplaySummary {
    pub events: usize,
    pub strokes_started: usize,
    /// Stroke starts refused because they fell inside a tool body.
    pub strokes_blocked: usize,
    /// Moves that produced no sample: blocked, jitter, or no stroke active.
    pub moves_skipped: usize,
    pub segments: usize,
    pub dots: usize,
    pub archived: Vec<StrokeId>,
    /// Shapes that produced at least one segment.
    pub shapes_drawn: usize,
    pub final_stroke_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub commands: Option<Vec<InkCommand>>,
}

/// Run every event of `script` through a fresh session.
pub fn run(script: &ReplayScript, keep_commands: bool) -> ReplaySummary {
    let mut session = DrawingSession::new(script.config.clone());
    let mut placement = ToolPlacement::new();
    for tool in &script.tools {
        placement.insert(tool.clone());
    }
    let mut sink = RecordingSink::new();
    let mut summary = ReplaySummary {
        events: script.events.len(),
        ..ReplaySummary::default()
    };

    for event in &script.events {
        match event {
            ReplayEvent::StrokeStart { x, y } => {
                if session.stroke_start(Point::new(*x, *y), placement.tools(), &mut sink) {
                    summary.strokes_started += 1;
                } else {
                    summary.strokes_blocked += 1;
                }
            }
            ReplayEvent::StrokeMove { x, y } => {
                if session
                    .stroke_move(Point::new(*x, *y), placement.tools(), &mut sink)
                    .is_none()
                {
                    summary.moves_skipped += 1;
                }
            }
            ReplayEvent::StrokeEnd => {
                if let Some(id) = session.stroke_end() {
                    summary.archived.push(id);
                }
            }
            ReplayEvent::StrokeAbort => session.stroke_abort(),
            ReplayEvent::UsePen => session.use_pen(),
            ReplayEvent::UseEraser => session.use_eraser(),
            ReplayEvent::PlaceTool { tool } => {
                if session.is_drawing() {
                    log::warn!("Tool placed during a stroke; it applies from the next sample");
                }
                placement.insert(tool.clone());
            }
            ReplayEvent::Select { x, y } => {
                session.select_at(Point::new(*x, *y));
            }
            ReplayEvent::CopySelected => {
                session.copy_selected();
            }
            ReplayEvent::DeleteSelected => {
                session.archive_mut().delete_selected();
            }
            ReplayEvent::ClearStrokes => session.archive_mut().clear(),
            ReplayEvent::Redraw => session.archive().redraw(&mut sink),
            ReplayEvent::DrawShape { shape, start, end } => {
                if session.draw_shape(*shape, *start, *end, &mut sink) > 0 {
                    summary.shapes_drawn += 1;
                }
            }
        }
    }

    if session.is_drawing() {
        log::warn!("Script ended mid-stroke; aborting it");
        session.stroke_abort();
    }

    summary.segments = sink.segments().count();
    summary.dots = sink.dots().count();
    summary.final_stroke_count = session.archive().len();
    if keep_commands {
        summary.commands = Some(sink.take());
    }
    summary
}
