//! Inkboard Core Library
//!
//! Stroke geometry for the Inkboard whiteboard: dash phase tracking, pen
//! modulation, parallel-line rendering and edge constraints for rulers and
//! set squares. Parametric lines, rectangles and circles share the same ink.
//! Rendering backends plug in through [`InkSink`].

pub mod config;
pub mod dash;
pub mod edge;
pub mod geometry;
pub mod multiline;
pub mod pen;
pub mod render;
pub mod sampler;
pub mod session;
pub mod shapes;
pub mod stroke;
pub mod style;
pub mod tools;

pub use config::{ConfigError, ConfigResult, EngineConfig};
pub use dash::{DashPattern, DashState};
pub use edge::{
    DEFAULT_EDGE_TOLERANCE, EdgeResolver, EdgeSnapResult, SetSquareEdges, SnapTarget, ToolEdge,
    resolve_point,
};
pub use multiline::{MultiLineParams, MultiLineState, render_multi_line_segment};
pub use pen::{GrainStroke, SegmentInk, grain_hash, grain_strokes, modulate};
pub use render::{Composite, InkCommand, InkDot, InkSegment, InkSink, LineCap, RecordingSink};
pub use sampler::{SampleOutcome, SamplerParams, StrokeSampler};
pub use session::DrawingSession;
pub use shapes::{
    ShapeInk, ShapeKind, ShapeLineStyle, ShapeStyle, draw_shape, shape_paths, stroke_path,
};
pub use stroke::{Stroke, StrokeArchive, StrokeId, StrokeTool, find_stroke_near, stroke_bounds};
pub use style::{EraserShape, LineStyle, PenVariant, SerializableColor, StyleConfig};
pub use tools::{
    PinchStart, ResizeHandle, SetSquareAngle, ToolId, ToolPlacement, ToolShape, ToolShapeKind,
};
