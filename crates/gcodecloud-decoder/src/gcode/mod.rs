//! G-code motion decoding
//!
//! This module provides:
//! - Motion word parsing (G0/G1 with X, Y, Z, E, F)
//! - Tool state tracking with carry-forward
//! - Deposit/travel classification
//! - Segment densification
//! - Lazy segment and point iterators

pub mod command;
pub mod decoder;
pub mod parser;
pub mod segment;
pub mod state;

pub use command::*;
pub use decoder::*;
pub use parser::*;
pub use segment::*;
pub use state::*;
