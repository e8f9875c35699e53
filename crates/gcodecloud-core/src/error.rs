//! Error handling for GCodeCloud
//!
//! Provides error types for every layer that can actually fail:
//! - Input errors (source file missing or unreadable)
//! - Export errors (writing point files)
//! - Reconstruction errors (collaborator preconditions)
//!
//! Content-level problems in the G-code itself never surface here; the
//! decoder recovers from them locally.
//!
//! All error types use `thiserror` for ergonomic error handling.

use std::path::PathBuf;
use thiserror::Error;

/// Input error type
///
/// Raised before any decoding starts when the source cannot be opened.
#[derive(Error, Debug)]
pub enum InputError {
    /// The path does not exist
    #[error("File does not exist: {}", path.display())]
    NotFound {
        /// The missing path.
        path: PathBuf,
    },

    /// The path exists but is not a regular file
    #[error("Path is not a file: {}", path.display())]
    NotAFile {
        /// The offending path.
        path: PathBuf,
    },

    /// The file could not be opened or read
    #[error("Failed to read {}: {source}", path.display())]
    Unreadable {
        /// The path being read.
        path: PathBuf,
        /// The underlying I/O failure.
        #[source]
        source: std::io::Error,
    },
}

/// Export error type
#[derive(Error, Debug)]
pub enum ExportError {
    /// Output format could not be determined
    #[error("Unsupported export format: {format}")]
    UnsupportedFormat {
        /// The requested format or extension.
        format: String,
    },

    /// Writing the output failed
    #[error("Failed to write points: {0}")]
    Io(#[from] std::io::Error),
}

/// Reconstruction error type
///
/// Precondition failures detected before a point cloud is handed to an
/// external surface reconstruction collaborator.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ReconstructionError {
    /// Not enough points to estimate normals
    #[error("Too few points for reconstruction: {actual} (need at least {required})")]
    TooFewPoints {
        /// Points available.
        actual: usize,
        /// Minimum accepted.
        required: usize,
    },

    /// The cloud has no deposit bounding box
    #[error("Point cloud has no deposit bounds")]
    MissingBounds,

    /// A parameter was rejected before calling the collaborator
    #[error("Invalid reconstruction parameter '{param}': {reason}")]
    InvalidParameter {
        /// The parameter name.
        param: String,
        /// Why it was rejected.
        reason: String,
    },

    /// The collaborator itself reported a failure
    #[error("Reconstruction backend failed: {message}")]
    Backend {
        /// The backend message.
        message: String,
    },
}

/// Main error type for GCodeCloud
///
/// A unified error type that can represent any error from all layers.
/// This is the primary error type used in public APIs.
#[derive(Error, Debug)]
pub enum Error {
    /// Input error
    #[error(transparent)]
    Input(#[from] InputError),

    /// Export error
    #[error(transparent)]
    Export(#[from] ExportError),

    /// Reconstruction error
    #[error(transparent)]
    Reconstruction(#[from] ReconstructionError),

    /// Standard I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create an error from a string message
    pub fn other(msg: impl Into<String>) -> Self {
        Error::Other(msg.into())
    }

    /// Check if this is an input error
    pub fn is_input_error(&self) -> bool {
        matches!(self, Error::Input(_))
    }

    /// Check if this is a reconstruction precondition failure
    pub fn is_precondition_failure(&self) -> bool {
        matches!(
            self,
            Error::Reconstruction(
                ReconstructionError::TooFewPoints { .. }
                    | ReconstructionError::MissingBounds
                    | ReconstructionError::InvalidParameter { .. }
            )
        )
    }
}

/// Result type using Error
pub type Result<T> = std::result::Result<T, Error>;
