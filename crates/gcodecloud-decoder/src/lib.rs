//! # GCodeCloud Decoder
//!
//! Turns G-code text into absolute tool positions.
//! Includes the motion word parser, the tool state machine, the segment
//! iterators and a streaming file reader.

pub mod gcode;
pub mod utils;

pub use gcode::{
    AxisWords, DecodeMode, DecodeOptions, DecodeStats, MotionCommand, MotionDecoder, MotionKind,
    MotionParser, MotionSegment, PointStream, SegmentPoints, Segments, ToolState,
};
pub use utils::{FileReadStats, GcodeFileReader};
