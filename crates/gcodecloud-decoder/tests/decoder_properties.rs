//! Behavioural tests for the motion decoder

use std::io::Write;
use std::ops::ControlFlow;

use gcodecloud_core::Point3;
use gcodecloud_decoder::{DecodeOptions, GcodeFileReader, MotionDecoder, MotionKind};
use proptest::prelude::*;

#[test]
fn test_carry_forward_across_lines() {
    let text = "G1 X1 Y2 Z3\nG1 X5\nG0 Z7\nG1 Y-1 E0.5";
    let ends: Vec<_> = MotionDecoder::new()
        .segments(text.lines())
        .map(|s| s.end)
        .collect();
    assert_eq!(
        ends,
        vec![
            Point3::new(1.0, 2.0, 3.0),
            Point3::new(5.0, 2.0, 3.0),
            Point3::new(5.0, 2.0, 7.0),
            Point3::new(5.0, -1.0, 7.0),
        ]
    );
}

#[test]
fn test_each_segment_starts_where_the_previous_ended() {
    let text = "G0 X1\nG1 X2 Y2 E1\n; comment\nG1 Z0.4\nG1 X0 Y0 E2";
    let segments: Vec<_> = MotionDecoder::new().segments(text.lines()).collect();
    assert_eq!(segments[0].start, Point3::ORIGIN);
    for pair in segments.windows(2) {
        assert_eq!(pair[1].start, pair[0].end);
    }
}

#[test]
fn test_malformed_token_does_not_abort_line() {
    let text = "G1 X7 Y1\nG1 Xabc Y5";
    let segments: Vec<_> = MotionDecoder::new().segments(text.lines()).collect();
    assert_eq!(segments.len(), 2);
    assert_eq!(segments[1].end, Point3::new(7.0, 5.0, 0.0));
}

#[test]
fn test_kinds_preserved() {
    let text = "G0 X1\nG1 X2\nG00 X3\nG01 X4";
    let kinds: Vec<_> = MotionDecoder::new()
        .segments(text.lines())
        .map(|s| s.kind)
        .collect();
    assert_eq!(
        kinds,
        vec![
            MotionKind::Rapid,
            MotionKind::Linear,
            MotionKind::Rapid,
            MotionKind::Linear
        ]
    );
}

#[test]
fn test_decode_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "; generated").unwrap();
    writeln!(file, "G0 X0 Y0 Z0").unwrap();
    writeln!(file, "G1 X10 Y0 Z0 E1.0").unwrap();
    writeln!(file, "G1 X10 Y10 Z0 E2.0").unwrap();
    file.flush().unwrap();

    let reader = GcodeFileReader::new(file.path()).unwrap();
    let mut decoder = MotionDecoder::new();
    let mut deposits = 0;
    reader
        .read_lines(|line| {
            if let Some(seg) = decoder.decode_line(line) {
                deposits += usize::from(seg.is_deposit);
            }
            ControlFlow::Continue(())
        })
        .unwrap();

    assert_eq!(deposits, 2);
    assert_eq!(decoder.state().position, Point3::new(10.0, 10.0, 0.0));
    assert_eq!(decoder.state().extrusion, 2.0);
}

fn axis_word(letter: char) -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        (-500i32..500).prop_map(move |v| Some(format!("{}{}", letter, v as f64 / 4.0))),
    ]
}

fn motion_line() -> impl Strategy<Value = String> {
    (
        prop_oneof![Just("G0"), Just("G1")],
        axis_word('X'),
        axis_word('Y'),
        axis_word('Z'),
        axis_word('E'),
    )
        .prop_map(|(code, x, y, z, e)| {
            let mut line = code.to_string();
            for word in [x, y, z, e].into_iter().flatten() {
                line.push(' ');
                line.push_str(&word);
            }
            line
        })
}

proptest! {
    #[test]
    fn prop_omitted_axes_carry_forward(lines in prop::collection::vec(motion_line(), 1..40)) {
        let segments: Vec<_> = MotionDecoder::new().segments(lines.iter()).collect();
        prop_assert_eq!(segments.len(), lines.len());

        for (line, seg) in lines.iter().zip(&segments) {
            if !line.contains('X') {
                prop_assert_eq!(seg.end.x, seg.start.x);
            }
            if !line.contains('Y') {
                prop_assert_eq!(seg.end.y, seg.start.y);
            }
            if !line.contains('Z') {
                prop_assert_eq!(seg.end.z, seg.start.z);
            }
            if line.starts_with("G0") {
                prop_assert!(!seg.is_deposit);
            }
        }
    }

    #[test]
    fn prop_vertex_points_follow_line_order(lines in prop::collection::vec(motion_line(), 0..40)) {
        let ends: Vec<_> = MotionDecoder::new().segments(lines.iter()).map(|s| s.end).collect();
        let points: Vec<_> = MotionDecoder::new()
            .points(lines.iter(), DecodeOptions::vertex())
            .collect();
        prop_assert_eq!(points, ends);
    }

    #[test]
    fn prop_source_lines_strictly_increase(lines in prop::collection::vec(motion_line(), 0..40)) {
        let numbers: Vec<_> = MotionDecoder::new().segments(lines.iter()).map(|s| s.line).collect();
        prop_assert!(numbers.windows(2).all(|w| w[0] < w[1]));
    }
}
