//! # GCodeCloud Core
//!
//! Core types and utilities for GCodeCloud.
//! Provides the geometry primitives shared by the decoder and the point
//! cloud assembler, the default tuning constants, and the error types.

pub mod constants;
pub mod error;
pub mod geometry;

pub use error::{Error, ExportError, InputError, ReconstructionError, Result};
pub use geometry::{round_to, Bounds, Point3};
