//! Point cloud assembly
//!
//! [`PointCloudAssembler`] consumes decoded segments in order and builds a
//! [`PointCloud`]. The bounding box is accumulated from both endpoints of
//! every deposit segment, whatever the emission mode, so travel moves never
//! widen it.

use std::ops::ControlFlow;

use gcodecloud_core::constants::DEFAULT_ROUND_DECIMALS;
use gcodecloud_core::{Bounds, Point3};
use gcodecloud_decoder::{DecodeOptions, MotionSegment};
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Assembly configuration
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AssemblyOptions {
    pub decode: DecodeOptions,
    /// Round every coordinate to this many decimals; `None` keeps raw values
    pub round_decimals: Option<u32>,
    /// Stop once this many points have been collected
    pub max_points: Option<usize>,
}

impl Default for AssemblyOptions {
    fn default() -> Self {
        Self {
            decode: DecodeOptions::default(),
            round_decimals: Some(DEFAULT_ROUND_DECIMALS),
            max_points: None,
        }
    }
}

impl AssemblyOptions {
    pub fn new(decode: DecodeOptions) -> Self {
        Self {
            decode,
            ..Self::default()
        }
    }

    pub fn with_rounding(mut self, decimals: Option<u32>) -> Self {
        self.round_decimals = decimals;
        self
    }

    pub fn with_max_points(mut self, max_points: Option<usize>) -> Self {
        self.max_points = max_points;
        self
    }

    fn normalize(&self, p: Point3) -> Point3 {
        match self.round_decimals {
            Some(decimals) => p.rounded(decimals),
            None => p,
        }
    }
}

/// Ordered point collection with its deposit bounding box
///
/// Points keep traversal order and may repeat.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PointCloud {
    points: Vec<Point3>,
    bounds: Bounds,
}

impl PointCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_parts(points: Vec<Point3>, bounds: Bounds) -> Self {
        Self { points, bounds }
    }

    pub fn points(&self) -> &[Point3] {
        &self.points
    }

    pub fn into_points(self) -> Vec<Point3> {
        self.points
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Point3> {
        self.points.iter()
    }

    /// Deposit bounding box; at its `±inf` sentinel if nothing was deposited
    pub fn bounds(&self) -> &Bounds {
        &self.bounds
    }

    pub fn bounding_min(&self) -> Point3 {
        self.bounds.min
    }

    pub fn bounding_max(&self) -> Point3 {
        self.bounds.max
    }

    pub fn has_deposits(&self) -> bool {
        self.bounds.is_valid()
    }

    /// Points as plain triples, the shape most geometry libraries take
    pub fn to_arrays(&self) -> Vec<[f64; 3]> {
        self.points.iter().map(|p| p.to_array()).collect()
    }
}

impl<'a> IntoIterator for &'a PointCloud {
    type Item = &'a Point3;
    type IntoIter = std::slice::Iter<'a, Point3>;

    fn into_iter(self) -> Self::IntoIter {
        self.points.iter()
    }
}

/// Incremental builder for a [`PointCloud`]
#[derive(Debug, Clone)]
pub struct PointCloudAssembler {
    options: AssemblyOptions,
    cloud: PointCloud,
    segments: usize,
}

impl PointCloudAssembler {
    pub fn new(options: AssemblyOptions) -> Self {
        Self {
            options,
            cloud: PointCloud::new(),
            segments: 0,
        }
    }

    pub fn options(&self) -> &AssemblyOptions {
        &self.options
    }

    /// Points collected so far
    pub fn len(&self) -> usize {
        self.cloud.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cloud.is_empty()
    }

    /// Segments consumed so far
    pub fn segment_count(&self) -> usize {
        self.segments
    }

    /// True once `max_points` has been reached
    pub fn is_full(&self) -> bool {
        self.options
            .max_points
            .is_some_and(|max| self.cloud.len() >= max)
    }

    /// Add one segment's contribution
    ///
    /// Returns [`ControlFlow::Break`] once the point limit is reached so a
    /// caller streaming a file can stop reading. A deposit segment cut short
    /// by the limit only widens the bounds up to its last emitted point.
    pub fn push_segment(&mut self, segment: &MotionSegment) -> ControlFlow<()> {
        if self.is_full() {
            return ControlFlow::Break(());
        }
        self.segments += 1;

        if segment.is_deposit {
            self.cloud
                .bounds
                .update(&self.options.normalize(segment.start));
        }

        let decode = self.options.decode;
        let points = segment.points(decode.mode, decode.resolution_step);
        let total = points.len();
        for (i, point) in points.enumerate() {
            let point = self.options.normalize(point);
            self.cloud.points.push(point);
            if self.is_full() {
                if segment.is_deposit {
                    if i + 1 == total {
                        self.cloud.bounds.update(&self.options.normalize(segment.end));
                    } else {
                        self.cloud.bounds.update(&point);
                    }
                }
                return ControlFlow::Break(());
            }
        }

        if segment.is_deposit {
            self.cloud.bounds.update(&self.options.normalize(segment.end));
        }
        ControlFlow::Continue(())
    }

    /// Consume the assembler, yielding the finished cloud
    pub fn finish(self) -> PointCloud {
        if self.cloud.is_empty() {
            warn!("Assembled point cloud is empty ({} segments)", self.segments);
        } else {
            debug!(
                "Assembled {} points from {} segments ({} mode)",
                self.cloud.len(),
                self.segments,
                self.options.decode.mode
            );
        }
        self.cloud
    }

    /// Assemble a cloud from a segment stream, stopping early when full
    pub fn assemble<I>(options: AssemblyOptions, segments: I) -> PointCloud
    where
        I: IntoIterator<Item = MotionSegment>,
    {
        let mut assembler = Self::new(options);
        for segment in segments {
            if assembler.push_segment(&segment).is_break() {
                break;
            }
        }
        assembler.finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use gcodecloud_decoder::{DecodeMode, MotionDecoder};

    const SQUARE: &str = "G0 X0 Y0 Z0\nG1 X10 Y0 Z0 E1.0\nG1 X10 Y10 Z0 E2.0\n";

    fn assemble(text: &str, options: AssemblyOptions) -> PointCloud {
        PointCloudAssembler::assemble(options, MotionDecoder::new().segments(text.lines()))
    }

    #[test]
    fn test_vertex_mode_end_to_end() {
        let options = AssemblyOptions::new(DecodeOptions {
            mode: DecodeMode::Vertex,
            resolution_step: 5.0,
        });
        let cloud = assemble(SQUARE, options);
        assert_eq!(
            cloud.points(),
            &[
                Point3::ORIGIN,
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 10.0, 0.0),
            ]
        );
        assert_eq!(cloud.bounding_min(), Point3::ORIGIN);
        assert_eq!(cloud.bounding_max(), Point3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn test_interpolated_mode_end_to_end() {
        let cloud = assemble(SQUARE, AssemblyOptions::new(DecodeOptions::interpolated(5.0)));
        assert_eq!(
            cloud.points(),
            &[
                Point3::ORIGIN,
                Point3::new(5.0, 0.0, 0.0),
                Point3::new(10.0, 0.0, 0.0),
                Point3::new(10.0, 5.0, 0.0),
            ]
        );
        assert_eq!(cloud.bounding_min(), Point3::ORIGIN);
        assert_eq!(cloud.bounding_max(), Point3::new(10.0, 10.0, 0.0));
    }

    #[test]
    fn test_travel_only_leaves_bounds_unset() {
        let text = "G0 X5 Y5 Z1\nG1 X10 Y10\nG0 X-3 E4\n";
        let cloud = assemble(text, AssemblyOptions::new(DecodeOptions::vertex()));
        assert_eq!(cloud.len(), 3);
        assert!(!cloud.has_deposits());
        assert_eq!(cloud.bounding_min().x, f64::INFINITY);
        assert_eq!(cloud.bounding_max().x, f64::NEG_INFINITY);
    }

    #[test]
    fn test_travel_does_not_widen_bounds() {
        let text = "G1 X1 Y1 E1\nG1 X2 Y2 E2\nG0 X100 Y-100 Z50\n";
        let cloud = assemble(text, AssemblyOptions::new(DecodeOptions::vertex()));
        assert_eq!(cloud.bounding_min(), Point3::ORIGIN);
        assert_eq!(cloud.bounding_max(), Point3::new(2.0, 2.0, 0.0));
        assert_eq!(cloud.points()[2], Point3::new(100.0, -100.0, 50.0));
    }

    #[test]
    fn test_rounding_applied() {
        let text = "G1 X0.1234567 Y1.0000049 Z0.2 E1\n";
        let cloud = assemble(text, AssemblyOptions::new(DecodeOptions::vertex()));
        assert_eq!(cloud.points()[0], Point3::new(0.12346, 1.0, 0.2));

        let raw = assemble(
            text,
            AssemblyOptions::new(DecodeOptions::vertex()).with_rounding(None),
        );
        assert_eq!(raw.points()[0].x, 0.1234567);
    }

    #[test]
    fn test_duplicates_kept() {
        let text = "G1 X1 E1\nG1 X1\nG1 X1 E2\n";
        let cloud = assemble(text, AssemblyOptions::new(DecodeOptions::vertex()));
        assert_eq!(cloud.len(), 3);
        assert!(cloud.iter().all(|p| *p == Point3::new(1.0, 0.0, 0.0)));
    }

    #[test]
    fn test_max_points_stops_early() {
        let options =
            AssemblyOptions::new(DecodeOptions::interpolated(0.1)).with_max_points(Some(25));
        let text = "G1 X10 E1\nG1 Y10 E2\n";
        let mut segments = MotionDecoder::new().segments(text.lines());
        let cloud = PointCloudAssembler::assemble(options, segments.by_ref());
        assert_eq!(cloud.len(), 25);
        // the second line was never decoded
        assert_eq!(segments.decoder().stats().lines, 1);
    }

    #[test]
    fn test_point_limit_clips_bounds_to_emitted_points() {
        let options =
            AssemblyOptions::new(DecodeOptions::interpolated(1.0)).with_max_points(Some(2));
        let cloud = assemble("G1 X100 E1\n", options);
        assert_eq!(
            cloud.points(),
            &[Point3::ORIGIN, Point3::new(1.0, 0.0, 0.0)]
        );
        assert_eq!(cloud.bounding_min(), Point3::ORIGIN);
        assert_eq!(cloud.bounding_max(), Point3::new(1.0, 0.0, 0.0));
    }

    #[test]
    fn test_point_limit_on_segment_boundary_keeps_end() {
        let options =
            AssemblyOptions::new(DecodeOptions::interpolated(1.0)).with_max_points(Some(2));
        let cloud = assemble("G1 X2 E1\nG1 X50 E2\n", options);
        assert_eq!(cloud.len(), 2);
        assert_eq!(cloud.bounding_max(), Point3::new(2.0, 0.0, 0.0));
    }

    #[test]
    fn test_push_segment_after_full_breaks() {
        let options = AssemblyOptions::new(DecodeOptions::vertex()).with_max_points(Some(1));
        let mut assembler = PointCloudAssembler::new(options);
        let mut decoder = MotionDecoder::new();
        let first = decoder.decode_line("G1 X1 E1").unwrap();
        let second = decoder.decode_line("G1 X2 E2").unwrap();
        assert!(assembler.push_segment(&first).is_break());
        assert!(assembler.push_segment(&second).is_break());
        assert_eq!(assembler.segment_count(), 1);
        assert_eq!(assembler.finish().len(), 1);
    }

    #[test]
    fn test_empty_input() {
        let cloud = assemble("; nothing here\n", AssemblyOptions::default());
        assert!(cloud.is_empty());
        assert!(!cloud.has_deposits());
    }
}
