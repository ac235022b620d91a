//! Per-stroke sample accumulation.
//!
//! The sampler owns everything that only lives for one stroke: the retained
//! samples, the dash phase and the multi-line offsets. It never draws; the
//! session turns its outcomes into ink.

use crate::dash::{DashPattern, DashState};
use crate::geometry::{distance, segment_angle};
use crate::multiline::MultiLineState;
use crate::pen::modulate;
use crate::style::{PenVariant, StyleConfig};
use kurbo::Point;

/// Samples closer than this on both axes to the last retained one are dropped.
pub const MIN_SAMPLE_SPACING: f64 = 0.5;

/// Decision for one retained sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SampleOutcome {
    /// Previous retained sample.
    pub from: Point,
    /// The sample just appended.
    pub to: Point,
    /// Length of `from→to`.
    pub distance: f64,
    /// `false` when the segment falls in a dash gap.
    pub should_draw: bool,
    pub render_width: f64,
    pub render_alpha: f64,
}

/// Stroke parameters fixed when the stroke begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SamplerParams {
    pub pattern: Option<DashPattern>,
    pub pen_variant: PenVariant,
    pub pen_size: f64,
}

impl SamplerParams {
    /// Pen stroke with the current style.
    pub fn pen(style: &StyleConfig) -> Self {
        Self {
            pattern: DashPattern::from_style(style),
            pen_variant: style.pen_variant,
            pen_size: style.pen_size,
        }
    }

    /// Eraser stroke: always solid, constant width.
    pub fn eraser(style: &StyleConfig) -> Self {
        Self {
            pattern: None,
            pen_variant: PenVariant::Normal,
            pen_size: style.eraser_size,
        }
    }
}

/// Samples and phase state of one in-progress stroke.
#[derive(Debug, Clone)]
pub struct StrokeSampler {
    params: SamplerParams,
    samples: Vec<Point>,
    dash: DashState,
    multi_line: MultiLineState,
}

impl StrokeSampler {
    /// Start a stroke at `start`.
    pub fn begin(start: Point, params: SamplerParams) -> Self {
        Self {
            params,
            samples: vec![start],
            dash: DashState::new(),
            multi_line: MultiLineState::new(),
        }
    }

    /// Retained samples, in arrival order.
    pub fn samples(&self) -> &[Point] {
        &self.samples
    }

    pub fn last_point(&self) -> Option<Point> {
        self.samples.last().copied()
    }

    pub fn dash_state(&self) -> DashState {
        self.dash
    }

    /// Take the multi-line state for one render call; hand it back with
    /// [`StrokeSampler::set_multi_line`].
    pub fn take_multi_line(&mut self) -> MultiLineState {
        std::mem::take(&mut self.multi_line)
    }

    pub fn set_multi_line(&mut self, state: MultiLineState) {
        self.multi_line = state;
    }

    /// Append a sample and decide how its segment is drawn.
    ///
    /// Returns `None` when the sample is dropped as jitter.
    pub fn append_sample(&mut self, point: Point) -> Option<SampleOutcome> {
        let Some(from) = self.last_point() else {
            self.samples.push(point);
            return None;
        };
        if (point.x - from.x).abs() < MIN_SAMPLE_SPACING
            && (point.y - from.y).abs() < MIN_SAMPLE_SPACING
        {
            return None;
        }

        self.samples.push(point);
        let distance = distance(from, point);
        let should_draw = self.dash.advance(distance, self.params.pattern);
        let ink = modulate(
            self.params.pen_variant,
            distance,
            segment_angle(from, point),
            self.params.pen_size,
        );
        Some(SampleOutcome {
            from,
            to: point,
            distance,
            should_draw,
            render_width: ink.width,
            render_alpha: ink.alpha,
        })
    }

    /// Freeze the stroke and return its samples.
    pub fn finish(self) -> Vec<Point> {
        self.samples
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::LineStyle;

    fn dashed(density: f64) -> SamplerParams {
        let mut style = StyleConfig::default();
        style.line_style = LineStyle::Dashed;
        style.set_dash_density(density);
        SamplerParams::pen(&style)
    }

    #[test]
    fn test_dashed_scenario() {
        // dash 10, gap 6: positions 5, 10, 15, 20 (4), 25 (9) in the cycle.
        let mut sampler = StrokeSampler::begin(Point::ZERO, dashed(10.0));
        let flags: Vec<bool> = (1..=5)
            .map(|i| {
                sampler
                    .append_sample(Point::new(5.0 * i as f64, 0.0))
                    .unwrap()
                    .should_draw
            })
            .collect();
        assert_eq!(flags, vec![true, false, false, true, true]);
        assert!(sampler.dash_state().in_dash_phase);
        assert_eq!(sampler.dash_state().accumulated_distance, 25.0);
    }

    #[test]
    fn test_micro_movement_filtered() {
        let mut sampler = StrokeSampler::begin(Point::new(10.0, 10.0), dashed(10.0));
        assert!(sampler.append_sample(Point::new(10.4, 9.7)).is_none());
        assert_eq!(sampler.samples().len(), 1);
        assert_eq!(sampler.dash_state().accumulated_distance, 0.0);

        // Moving 0.5 or more on either axis is kept.
        let outcome = sampler.append_sample(Point::new(10.0, 10.5)).unwrap();
        assert_eq!(outcome.distance, 0.5);
        assert_eq!(sampler.samples().len(), 2);
    }

    #[test]
    fn test_solid_always_draws() {
        let style = StyleConfig::default();
        let mut sampler = StrokeSampler::begin(Point::ZERO, SamplerParams::pen(&style));
        for i in 1..40 {
            let outcome = sampler.append_sample(Point::new(i as f64 * 3.0, 0.0)).unwrap();
            assert!(outcome.should_draw);
            assert_eq!(outcome.render_width, style.pen_size);
        }
        // The accumulator still advances.
        assert!((sampler.dash_state().accumulated_distance - 117.0).abs() < 1e-9);
    }

    #[test]
    fn test_eraser_params() {
        let mut style = StyleConfig::default();
        style.line_style = LineStyle::Dotted;
        style.pen_variant = PenVariant::Fountain;
        let mut sampler = StrokeSampler::begin(Point::ZERO, SamplerParams::eraser(&style));
        let outcome = sampler.append_sample(Point::new(50.0, 50.0)).unwrap();
        assert!(outcome.should_draw);
        assert_eq!(outcome.render_width, style.eraser_size);
        assert_eq!(outcome.render_alpha, 1.0);
    }

    #[test]
    fn test_finish_returns_samples() {
        let mut sampler = StrokeSampler::begin(Point::ZERO, dashed(10.0));
        sampler.append_sample(Point::new(3.0, 4.0));
        sampler.append_sample(Point::new(3.1, 4.1));
        assert_eq!(sampler.finish(), vec![Point::ZERO, Point::new(3.0, 4.0)]);
    }
}
