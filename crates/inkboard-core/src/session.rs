//! Drawing session: turns pointer events into ink and archived strokes.
//!
//! One pointer event runs synchronously through edge resolution, sampling and
//! rendering. Samples must arrive in order; every per-stroke state assumes it.

use crate::config::EngineConfig;
use crate::edge::EdgeResolver;
use crate::multiline::{MultiLineParams, render_multi_line_segment};
use crate::pen::grain_strokes;
use crate::render::{Composite, InkDot, InkSegment, InkSink};
use crate::sampler::{SampleOutcome, SamplerParams, StrokeSampler};
use crate::shapes::{ShapeKind, draw_shape};
use crate::stroke::{Stroke, StrokeArchive, StrokeId, StrokeTool};
use crate::style::{LineStyle, StyleConfig};
use crate::tools::ToolShape;
use kurbo::Point;

/// State of the current pointer interaction.
#[derive(Debug, Clone, Default)]
enum SessionState {
    #[default]
    Idle,
    Drawing {
        sampler: StrokeSampler,
        /// Style captured at stroke start; edits apply from the next stroke.
        style: StyleConfig,
        tool: StrokeTool,
    },
}

/// Owns the stroke archive and the stroke in progress.
#[derive(Debug, Clone, Default)]
pub struct DrawingSession {
    config: EngineConfig,
    archive: StrokeArchive,
    resolver: EdgeResolver,
    tool: StrokeTool,
    state: SessionState,
}

impl DrawingSession {
    pub fn new(config: EngineConfig) -> Self {
        let resolver = EdgeResolver::new(config.edge_tolerance, config.set_square_edges);
        Self {
            config,
            resolver,
            ..Self::default()
        }
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Replace the configuration. Takes effect from the next stroke.
    pub fn set_config(&mut self, config: EngineConfig) {
        self.resolver.tolerance = config.edge_tolerance;
        self.resolver.set_square_edges = config.set_square_edges;
        self.config = config;
    }

    /// Mutable access to the style, for settings that change between strokes.
    pub fn style_mut(&mut self) -> &mut StyleConfig {
        &mut self.config.style
    }

    pub fn tool(&self) -> StrokeTool {
        self.tool
    }

    pub fn set_tool(&mut self, tool: StrokeTool) {
        self.tool = tool;
    }

    /// Switch to the pen.
    pub fn use_pen(&mut self) {
        self.tool = StrokeTool::Pen;
    }

    /// Switch to the eraser, with the configured tip shape.
    pub fn use_eraser(&mut self) {
        self.tool = StrokeTool::Eraser(self.config.style.eraser_shape);
    }

    pub fn archive(&self) -> &StrokeArchive {
        &self.archive
    }

    pub fn archive_mut(&mut self) -> &mut StrokeArchive {
        &mut self.archive
    }

    pub fn is_drawing(&self) -> bool {
        matches!(self.state, SessionState::Drawing { .. })
    }

    /// Whether the pen is currently riding a tool edge.
    pub fn is_snapped_to_edge(&self) -> bool {
        self.resolver.is_snapped()
    }

    /// Samples of the stroke in progress.
    pub fn current_samples(&self) -> &[Point] {
        match &self.state {
            SessionState::Drawing { sampler, .. } => sampler.samples(),
            SessionState::Idle => &[],
        }
    }

    /// Begin a stroke at `point`.
    ///
    /// Returns `false` if a pen stroke would start inside a tool body; no
    /// stroke is started in that case.
    pub fn stroke_start(
        &mut self,
        point: Point,
        tools: &[ToolShape],
        sink: &mut dyn InkSink,
    ) -> bool {
        if self.is_drawing() {
            log::debug!("Stroke restarted before it ended; discarding samples");
        }
        self.state = SessionState::Idle;

        let style = self.config.style.clone();
        let tool = self.tool;
        let (point, params) = match tool {
            StrokeTool::Pen => {
                let resolved = self.resolver.process_point(point, tools);
                if resolved.blocked {
                    log::debug!("Stroke start at ({:.1}, {:.1}) blocked", point.x, point.y);
                    return false;
                }
                (resolved.point, SamplerParams::pen(&style))
            }
            StrokeTool::Eraser(_) => (point, SamplerParams::eraser(&style)),
        };

        emit_start_mark(point, &style, tool, sink);
        log::debug!("Stroke started at ({:.1}, {:.1}) with {:?}", point.x, point.y, tool);
        self.state = SessionState::Drawing {
            sampler: StrokeSampler::begin(point, params),
            style,
            tool,
        };
        true
    }

    /// Feed the next pointer position of the stroke in progress.
    ///
    /// Returns `None` when idle, when the point is blocked by a tool body, or
    /// when it is dropped as jitter.
    pub fn stroke_move(
        &mut self,
        point: Point,
        tools: &[ToolShape],
        sink: &mut dyn InkSink,
    ) -> Option<SampleOutcome> {
        let SessionState::Drawing {
            sampler,
            style,
            tool,
        } = &mut self.state
        else {
            return None;
        };

        let point = match tool {
            StrokeTool::Pen => {
                let resolved = self.resolver.process_point(point, tools);
                if resolved.blocked {
                    return None;
                }
                resolved.point
            }
            StrokeTool::Eraser(_) => point,
        };

        let outcome = sampler.append_sample(point)?;
        if outcome.should_draw {
            match *tool {
                StrokeTool::Eraser(shape) => {
                    sink.draw_segment(&InkSegment {
                        cap: shape.cap(),
                        composite: Composite::Erase,
                        ..InkSegment::new(
                            outcome.from,
                            outcome.to,
                            outcome.render_width,
                            1.0,
                            style.color,
                        )
                    });
                }
                StrokeTool::Pen if style.line_style == LineStyle::Multi => {
                    let params = MultiLineParams {
                        count: style.multi_line_count(),
                        spacing: style.multi_line_spacing(),
                        width: style.pen_variant.base_width(style.pen_size),
                        alpha: style.pen_variant.base_alpha(),
                        color: style.color,
                    };
                    let state = sampler.take_multi_line();
                    let state =
                        render_multi_line_segment(outcome.from, outcome.to, state, &params, sink);
                    sampler.set_multi_line(state);
                }
                StrokeTool::Pen => draw_pen_segment(&outcome, style, sink),
            }
        }
        Some(outcome)
    }

    /// Finish the stroke and archive it.
    pub fn stroke_end(&mut self) -> Option<StrokeId> {
        let state = std::mem::take(&mut self.state);
        self.resolver.reset();
        let SessionState::Drawing {
            sampler,
            style,
            tool,
        } = state
        else {
            return None;
        };

        let points = sampler.finish();
        if points.is_empty() {
            return None;
        }
        let width = match tool {
            StrokeTool::Pen => style.pen_size,
            StrokeTool::Eraser(_) => style.eraser_size,
        };
        let count = points.len();
        let id = self.archive.push(Stroke::new(
            points,
            style.color,
            width,
            style.pen_variant,
            tool,
        ));
        log::debug!("Stroke {} archived with {} samples", id, count);
        Some(id)
    }

    /// Drop the stroke in progress without archiving it.
    pub fn stroke_abort(&mut self) {
        if self.is_drawing() {
            log::debug!("Stroke aborted");
        }
        self.state = SessionState::Idle;
        self.resolver.reset();
    }

    /// Select the newest stroke near `point` using the configured threshold.
    pub fn select_at(&mut self, point: Point) -> Option<usize> {
        let index = self.archive.find_near(point, self.config.selection_threshold);
        match index {
            Some(i) => {
                self.archive.select(i);
            }
            None => self.archive.deselect(),
        }
        index
    }

    /// Draw a parametric shape with the current pen ink and shape line style.
    ///
    /// Shapes go straight to the sink; they are not archived as strokes and
    /// do not interact with teaching tools. Returns the segments emitted.
    pub fn draw_shape(
        &mut self,
        kind: ShapeKind,
        start: Point,
        end: Point,
        sink: &mut dyn InkSink,
    ) -> usize {
        let emitted = draw_shape(kind, start, end, &self.config.shapes, &self.config.style, sink);
        log::debug!(
            "Drew {:?} with {:?} style in {} segments",
            kind,
            self.config.shapes.line_style,
            emitted
        );
        emitted
    }

    /// Duplicate the selected stroke by the configured copy offset.
    pub fn copy_selected(&mut self) -> Option<StrokeId> {
        self.archive.copy_selected(self.config.copy_offset)
    }
}

/// Initial mark laid down when a stroke begins.
fn emit_start_mark(point: Point, style: &StyleConfig, tool: StrokeTool, sink: &mut dyn InkSink) {
    match tool {
        StrokeTool::Pen if style.line_style.starts_with_dot() => sink.draw_dot(&InkDot {
            center: point,
            radius: style.pen_size / 2.0,
            alpha: style.pen_variant.base_alpha(),
            color: style.color,
        }),
        StrokeTool::Pen => sink.draw_segment(&InkSegment::new(
            point,
            point,
            style.pen_variant.base_width(style.pen_size),
            style.pen_variant.base_alpha(),
            style.color,
        )),
        StrokeTool::Eraser(shape) => sink.draw_segment(&InkSegment {
            cap: shape.cap(),
            composite: Composite::Erase,
            ..InkSegment::new(point, point, style.eraser_size, 1.0, style.color)
        }),
    }
}

/// Main segment plus any grain strokes for a pen sample.
fn draw_pen_segment(outcome: &SampleOutcome, style: &StyleConfig, sink: &mut dyn InkSink) {
    sink.draw_segment(&InkSegment::new(
        outcome.from,
        outcome.to,
        outcome.render_width,
        outcome.render_alpha,
        style.color,
    ));
    for grain in grain_strokes(
        style.pen_variant,
        outcome.from,
        outcome.to,
        outcome.render_width,
        style.pen_size,
    ) {
        let (from, to) = grain.endpoints(outcome.from, outcome.to);
        sink.draw_segment(&InkSegment::new(from, to, grain.width, grain.alpha, style.color));
    }
}
