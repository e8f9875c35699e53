//! Motion segments and their sampled points

use gcodecloud_core::constants::STEP_COUNT_EPSILON;
use gcodecloud_core::Point3;
use serde::{Deserialize, Serialize};

use super::{DecodeMode, MotionKind};

/// One resolved move between two absolute positions
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionSegment {
    pub start: Point3,
    pub end: Point3,
    pub kind: MotionKind,
    /// Linear move whose extrusion went up
    pub is_deposit: bool,
    /// 1-based source line, 0 when decoded outside a file
    pub line: usize,
}

impl MotionSegment {
    pub fn length(&self) -> f64 {
        self.start.distance(&self.end)
    }

    /// Number of densified samples for this segment at `step` spacing.
    ///
    /// `floor(length / step)`; zero for degenerate steps.
    pub fn step_count(&self, step: f64) -> usize {
        if step <= 0.0 || !step.is_finite() {
            return 0;
        }
        let ratio = self.length() / step;
        if !ratio.is_finite() {
            return 0;
        }
        (ratio + STEP_COUNT_EPSILON).floor() as usize
    }

    /// Evenly spaced samples from `start` (inclusive) towards `end` (exclusive)
    pub fn densify(&self, step: f64) -> SegmentPoints {
        SegmentPoints::Samples {
            start: self.start,
            end: self.end,
            steps: self.step_count(step),
            next: 0,
        }
    }

    /// Points this segment contributes to a cloud in the given mode
    ///
    /// Vertex mode yields the end position of every segment. Interpolated
    /// mode yields densified samples of deposit segments only.
    pub fn points(&self, mode: DecodeMode, step: f64) -> SegmentPoints {
        match mode {
            DecodeMode::Vertex => SegmentPoints::Vertex(Some(self.end)),
            DecodeMode::Interpolated if self.is_deposit => self.densify(step),
            DecodeMode::Interpolated => SegmentPoints::Vertex(None),
        }
    }
}

/// Iterator over the points of one segment
#[derive(Debug, Clone)]
pub enum SegmentPoints {
    Vertex(Option<Point3>),
    Samples {
        start: Point3,
        end: Point3,
        steps: usize,
        next: usize,
    },
}

impl Iterator for SegmentPoints {
    type Item = Point3;

    fn next(&mut self) -> Option<Point3> {
        match self {
            SegmentPoints::Vertex(point) => point.take(),
            SegmentPoints::Samples {
                start,
                end,
                steps,
                next,
            } => {
                if *next >= *steps {
                    return None;
                }
                let t = *next as f64 / *steps as f64;
                *next += 1;
                Some(start.lerp(end, t))
            }
        }
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = match self {
            SegmentPoints::Vertex(point) => usize::from(point.is_some()),
            SegmentPoints::Samples { steps, next, .. } => steps.saturating_sub(*next),
        };
        (n, Some(n))
    }
}

impl ExactSizeIterator for SegmentPoints {}
