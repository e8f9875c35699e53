//! Streaming motion decoder
//!
//! [`MotionDecoder`] consumes lines one at a time and hands back the
//! resolved [`MotionSegment`] for each G0/G1 line. [`Segments`] and
//! [`PointStream`] wrap it as lazy iterators so a caller can stop after any
//! number of points without rescanning.

use serde::{Deserialize, Serialize};
use std::str::FromStr;
use tracing::debug;

use gcodecloud_core::constants::DEFAULT_RESOLUTION_STEP;

use super::{MotionKind, MotionParser, MotionSegment, SegmentPoints, ToolState};

/// How segments are turned into points
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DecodeMode {
    /// One point per motion command at its end position
    Vertex,
    /// Densified samples along deposit segments only
    #[default]
    Interpolated,
}

impl std::fmt::Display for DecodeMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Vertex => write!(f, "vertex"),
            Self::Interpolated => write!(f, "interpolated"),
        }
    }
}

impl FromStr for DecodeMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "vertex" | "vertices" => Ok(Self::Vertex),
            "interpolated" | "interpolate" => Ok(Self::Interpolated),
            other => Err(format!("Unknown decode mode: {}", other)),
        }
    }
}

/// Decoder configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct DecodeOptions {
    pub mode: DecodeMode,
    /// Sample spacing for interpolated mode, in source units
    pub resolution_step: f64,
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            mode: DecodeMode::default(),
            resolution_step: DEFAULT_RESOLUTION_STEP,
        }
    }
}

impl DecodeOptions {
    pub fn vertex() -> Self {
        Self {
            mode: DecodeMode::Vertex,
            ..Self::default()
        }
    }

    pub fn interpolated(resolution_step: f64) -> Self {
        Self {
            mode: DecodeMode::Interpolated,
            resolution_step,
        }
    }
}

/// Counters for one decode run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DecodeStats {
    /// Lines consumed
    pub lines: u64,
    /// G0 commands
    pub rapid_moves: u64,
    /// G1 commands
    pub linear_moves: u64,
    /// G1 commands that increased extrusion
    pub deposit_moves: u64,
    /// Non-motion lines
    pub ignored_lines: u64,
    /// Axis words dropped for an unreadable number
    pub malformed_words: u64,
}

impl DecodeStats {
    pub fn motion_commands(&self) -> u64 {
        self.rapid_moves + self.linear_moves
    }

    pub fn travel_moves(&self) -> u64 {
        self.motion_commands() - self.deposit_moves
    }
}

/// Line-by-line G0/G1 decoder with its own [`ToolState`]
#[derive(Debug, Clone, Default)]
pub struct MotionDecoder {
    parser: MotionParser,
    state: ToolState,
    lines: u64,
    rapid_moves: u64,
    linear_moves: u64,
    deposit_moves: u64,
}

impl MotionDecoder {
    /// Create a decoder starting at the origin with zero extrusion
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode one line; `None` for anything that is not a G0/G1 move
    pub fn decode_line(&mut self, line: &str) -> Option<MotionSegment> {
        self.lines += 1;
        let command = self.parser.parse(line)?;

        let (next, mut segment) = self.state.apply(&command);
        segment.line = self.lines as usize;
        self.state = next;

        match command.kind {
            MotionKind::Rapid => self.rapid_moves += 1,
            MotionKind::Linear => self.linear_moves += 1,
        }
        if segment.is_deposit {
            self.deposit_moves += 1;
        }

        Some(segment)
    }

    /// Current tool state
    pub fn state(&self) -> &ToolState {
        &self.state
    }

    pub fn stats(&self) -> DecodeStats {
        let parse = self.parser.stats();
        DecodeStats {
            lines: self.lines,
            rapid_moves: self.rapid_moves,
            linear_moves: self.linear_moves,
            deposit_moves: self.deposit_moves,
            ignored_lines: parse.ignored_lines,
            malformed_words: parse.malformed_words,
        }
    }

    /// Lazily decode `lines` into segments
    pub fn segments<I>(self, lines: I) -> Segments<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        Segments {
            lines: lines.into_iter(),
            decoder: self,
        }
    }

    /// Lazily decode `lines` into cloud points according to `options`
    pub fn points<I>(self, lines: I, options: DecodeOptions) -> PointStream<I::IntoIter>
    where
        I: IntoIterator,
        I::Item: AsRef<str>,
    {
        PointStream {
            segments: self.segments(lines),
            options,
            current: SegmentPoints::Vertex(None),
        }
    }
}

/// Iterator of segments over a line source
#[derive(Debug)]
pub struct Segments<I> {
    lines: I,
    decoder: MotionDecoder,
}

impl<I> Segments<I> {
    /// Decoder state and counters so far
    pub fn decoder(&self) -> &MotionDecoder {
        &self.decoder
    }

    pub fn into_decoder(self) -> MotionDecoder {
        self.decoder
    }
}

impl<I> Iterator for Segments<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = MotionSegment;

    fn next(&mut self) -> Option<MotionSegment> {
        loop {
            let line = self.lines.next()?;
            if let Some(segment) = self.decoder.decode_line(line.as_ref()) {
                return Some(segment);
            }
        }
    }
}

/// Iterator of cloud points over a line source
#[derive(Debug)]
pub struct PointStream<I> {
    segments: Segments<I>,
    options: DecodeOptions,
    current: SegmentPoints,
}

impl<I> PointStream<I> {
    pub fn decoder(&self) -> &MotionDecoder {
        self.segments.decoder()
    }

    pub fn options(&self) -> &DecodeOptions {
        &self.options
    }
}

impl<I> Iterator for PointStream<I>
where
    I: Iterator,
    I::Item: AsRef<str>,
{
    type Item = gcodecloud_core::Point3;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(point) = self.current.next() {
                return Some(point);
            }
            let Some(segment) = self.segments.next() else {
                debug!("Point stream exhausted: {:?}", self.segments.decoder().stats());
                return None;
            };
            self.current = segment.points(self.options.mode, self.options.resolution_step);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodecloud_core::Point3;

    const SQUARE: &str = "G0 X0 Y0 Z0\nG1 X10 Y0 Z0 E1.0\nG1 X10 Y10 Z0 E2.0\n";

    #[test]
    fn test_decode_mode_parse() {
        assert_eq!("vertex".parse::<DecodeMode>(), Ok(DecodeMode::Vertex));
        assert_eq!(
            " Interpolated ".parse::<DecodeMode>(),
            Ok(DecodeMode::Interpolated)
        );
        assert!("mesh".parse::<DecodeMode>().is_err());
        assert_eq!(DecodeMode::Vertex.to_string(), "vertex");
    }

    #[test]
    fn test_default_options() {
        let options = DecodeOptions::default();
        assert_eq!(options.mode, DecodeMode::Interpolated);
        assert_eq!(options.resolution_step, 0.1);
    }

    #[test]
    fn test_segments_in_file_order() {
        let segments: Vec<_> = MotionDecoder::new().segments(SQUARE.lines()).collect();
        assert_eq!(segments.len(), 3);
        assert!(!segments[0].is_deposit);
        assert!(segments[1].is_deposit);
        assert!(segments[2].is_deposit);
        assert_eq!(segments[1].start, Point3::ORIGIN);
        assert_eq!(segments[2].end, Point3::new(10.0, 10.0, 0.0));
        assert_eq!(segments[2].line, 3);
    }

    #[test]
    fn test_vertex_points() {
        let points: Vec<_> = MotionDecoder::new()
            .points(SQUARE.lines(), DecodeOptions::vertex())
            .collect();
        assert_eq!(
            points,
            vec![
                Point3::ORIGIN,
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 10.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_interpolated_points() {
        let points: Vec<_> = MotionDecoder::new()
            .points(SQUARE.lines(), DecodeOptions::interpolated(5.0))
            .collect();
        assert_eq!(
            points,
            vec![
                Point3::ORIGIN,
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 5.0, 0.0),
            ]
        );
    }

    #[test]
    fn test_early_termination_stops_reading() {
        let lines = SQUARE.lines().chain(std::iter::repeat("G1 X0 E100"));
        let mut stream = MotionDecoder::new().points(lines, DecodeOptions::vertex());
        let first: Vec<_> = stream.by_ref().take(5).collect();
        assert_eq!(first.len(), 5);
        assert_eq!(stream.decoder().stats().lines, 5);
    }

    #[test]
    fn test_stats() {
        let text = "; header\nM104 S200\nG28\nG0 X1\nG1 X2 E1\nG1 X3\nG1 Xq E2\n";
        let mut segments = MotionDecoder::new().segments(text.lines());
        let count = segments.by_ref().count();
        assert_eq!(count, 4);

        let stats = segments.decoder().stats();
        assert_eq!(stats.lines, 7);
        assert_eq!(stats.rapid_moves, 1);
        assert_eq!(stats.linear_moves, 3);
        assert_eq!(stats.deposit_moves, 2);
        assert_eq!(stats.travel_moves(), 2);
        assert_eq!(stats.ignored_lines, 3);
        assert_eq!(stats.malformed_words, 1);
    }

    #[test]
    fn test_empty_input_yields_nothing() {
        let empty: Vec<String> = Vec::new();
        assert_eq!(MotionDecoder::new().segments(empty).count(), 0);
    }
}
