//! G-code motion line parser
//!
//! Lines are accepted only when their leading command word is G0 or G1
//! (`G00`/`G01` included). Words are split on whitespace and on letters, so
//! `G1X10Y5` and `G1 X10 Y5` read the same. `( ... )` comments are removed
//! wherever they sit on the line; `;` ends the line. An axis word whose
//! number does not parse is dropped on its own; the rest of the line still
//! applies.

use regex::Regex;
use std::borrow::Cow;
use std::sync::OnceLock;
use tracing::trace;

use super::{AxisWords, MotionCommand, MotionKind};

fn comment_regex() -> &'static Regex {
    static COMMENT_REGEX: OnceLock<Regex> = OnceLock::new();
    // an unclosed `(` runs to the end of the line
    COMMENT_REGEX
        .get_or_init(|| Regex::new(r";.*|\([^)]*\)?").expect("invalid regex pattern"))
}

fn word_regex() -> &'static Regex {
    static WORD_REGEX: OnceLock<Regex> = OnceLock::new();
    WORD_REGEX
        .get_or_init(|| Regex::new(r"([A-Za-z])([^A-Za-z\s]*)").expect("invalid regex pattern"))
}

/// Remove comments, leaving a space so words on either side stay apart
fn strip_comments(line: &str) -> Cow<'_, str> {
    comment_regex().replace_all(line, " ")
}

/// Split comment-free code into `(LETTER, suffix)` words
fn words(code: &str) -> impl Iterator<Item = (char, &str)> {
    word_regex().captures_iter(code).filter_map(|caps| {
        let letter = caps.get(1)?.as_str().chars().next()?.to_ascii_uppercase();
        let suffix = caps.get(2).map_or("", |m| m.as_str());
        Some((letter, suffix))
    })
}

fn motion_kind(letter: char, suffix: &str) -> Option<MotionKind> {
    if letter != 'G' {
        return None;
    }
    match suffix {
        "0" | "00" => Some(MotionKind::Rapid),
        "1" | "01" => Some(MotionKind::Linear),
        _ => None,
    }
}

/// Counters collected while parsing
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    /// Lines that produced a motion command
    pub motion_lines: u64,
    /// Lines skipped as non-motion
    pub ignored_lines: u64,
    /// Axis words dropped because their number was unreadable
    pub malformed_words: u64,
}

/// Parse one line without keeping statistics.
pub fn parse_line(line: &str) -> Option<MotionCommand> {
    MotionParser::new().parse(line)
}

/// Stateless-per-line parser that keeps running counters
#[derive(Debug, Clone, Default)]
pub struct MotionParser {
    stats: ParseStats,
}

impl MotionParser {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a line into a motion command, or `None` if it is not G0/G1
    pub fn parse(&mut self, line: &str) -> Option<MotionCommand> {
        let code = strip_comments(line);
        let mut iter = words(&code);

        let Some(kind) = iter
            .next()
            .and_then(|(letter, suffix)| motion_kind(letter, suffix))
        else {
            self.stats.ignored_lines += 1;
            return None;
        };

        let mut axes = AxisWords::default();
        for (letter, suffix) in iter {
            if !matches!(letter, 'X' | 'Y' | 'Z' | 'E' | 'F') {
                continue;
            }
            match suffix.parse::<f64>() {
                Ok(value) if value.is_finite() => {
                    axes.set(letter, value);
                }
                _ => {
                    self.stats.malformed_words += 1;
                    trace!("Ignoring malformed word {}{:?} in {:?}", letter, suffix, line);
                }
            }
        }

        self.stats.motion_lines += 1;
        Some(MotionCommand::with_words(kind, axes))
    }

    pub fn stats(&self) -> ParseStats {
        self.stats
    }

    pub fn reset(&mut self) {
        self.stats = ParseStats::default();
    }
}
