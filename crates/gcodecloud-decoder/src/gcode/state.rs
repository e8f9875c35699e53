//! Tool state machine

use gcodecloud_core::Point3;
use serde::{Deserialize, Serialize};

use super::{MotionCommand, MotionKind, MotionSegment};

/// Running state of the tool head during one decode run
///
/// Each recognized command produces a new state; omitted axis words keep
/// their previous value.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ToolState {
    /// Absolute position after the last command
    pub position: Point3,
    /// Cumulative extruder position; may go down on retraction
    pub extrusion: f64,
    /// Last programmed feed rate
    pub feed_rate: Option<f64>,
}

impl ToolState {
    /// Fresh state at the origin with no extrusion
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve `command` against this state.
    ///
    /// Returns the next state and the segment travelled to reach it. The
    /// state always advances, whether or not the move deposits material.
    pub fn apply(&self, command: &MotionCommand) -> (ToolState, MotionSegment) {
        let words = &command.words;
        let end = Point3::new(
            words.x.unwrap_or(self.position.x),
            words.y.unwrap_or(self.position.y),
            words.z.unwrap_or(self.position.z),
        );
        let extrusion = words.e.unwrap_or(self.extrusion);
        let is_deposit = command.kind == MotionKind::Linear && extrusion > self.extrusion;

        let next = ToolState {
            position: end,
            extrusion,
            feed_rate: words.f.or(self.feed_rate),
        };
        let segment = MotionSegment {
            start: self.position,
            end,
            kind: command.kind,
            is_deposit,
            line: 0,
        };
        (next, segment)
    }
}
