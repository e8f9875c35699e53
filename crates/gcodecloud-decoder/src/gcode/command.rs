//! Motion command types

use serde::{Deserialize, Serialize};

/// Recognized motion codes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MotionKind {
    /// G0 rapid positioning, never deposits material
    Rapid,
    /// G1 linear move, deposits when extrusion increases
    Linear,
}

impl MotionKind {
    /// Map a G-code number to a motion kind
    pub fn from_code(code: u32) -> Option<Self> {
        match code {
            0 => Some(Self::Rapid),
            1 => Some(Self::Linear),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Self::Rapid => "G0",
            Self::Linear => "G1",
        }
    }
}

impl std::fmt::Display for MotionKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Axis words present on one line; `None` means "not specified here"
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct AxisWords {
    pub x: Option<f64>,
    pub y: Option<f64>,
    pub z: Option<f64>,
    /// Extruder position
    pub e: Option<f64>,
    /// Feed rate, carried along but geometrically inert
    pub f: Option<f64>,
}

impl AxisWords {
    /// Store a value under its axis letter; returns false for unknown letters
    pub fn set(&mut self, letter: char, value: f64) -> bool {
        let slot = match letter {
            'X' => &mut self.x,
            'Y' => &mut self.y,
            'Z' => &mut self.z,
            'E' => &mut self.e,
            'F' => &mut self.f,
            _ => return false,
        };
        *slot = Some(value);
        true
    }

    pub fn get(&self, letter: char) -> Option<f64> {
        match letter {
            'X' => self.x,
            'Y' => self.y,
            'Z' => self.z,
            'E' => self.e,
            'F' => self.f,
            _ => None,
        }
    }

    /// True when no axis word was given
    pub fn is_empty(&self) -> bool {
        self.x.is_none()
            && self.y.is_none()
            && self.z.is_none()
            && self.e.is_none()
            && self.f.is_none()
    }
}

/// One parsed G0/G1 line
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MotionCommand {
    pub kind: MotionKind,
    pub words: AxisWords,
}

impl MotionCommand {
    pub fn new(kind: MotionKind) -> Self {
        Self {
            kind,
            words: AxisWords::default(),
        }
    }

    pub fn with_words(kind: MotionKind, words: AxisWords) -> Self {
        Self { kind, words }
    }
}

impl std::fmt::Display for MotionCommand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.kind)?;
        for letter in ['X', 'Y', 'Z', 'E', 'F'] {
            if let Some(v) = self.words.get(letter) {
                write!(f, " {}{}", letter, v)?;
            }
        }
        Ok(())
    }
}
