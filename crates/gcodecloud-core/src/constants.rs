//! Default tuning values shared across crates.

/// Spacing between densified samples along a deposit segment.
pub const DEFAULT_RESOLUTION_STEP: f64 = 0.1;

/// Decimal places used when rounding emitted points.
pub const DEFAULT_ROUND_DECIMALS: u32 = 5;

/// Largest rounding precision accepted; beyond this f64 has no digits left.
pub const MAX_ROUND_DECIMALS: u32 = 15;

/// Relative slack applied before flooring `distance / step`.
pub const STEP_COUNT_EPSILON: f64 = 1e-9;

/// Fewest points a reconstruction collaborator is handed by default.
pub const DEFAULT_MIN_RECONSTRUCTION_POINTS: usize = 32;

/// Files above this size get a warning before being decoded.
pub const LARGE_FILE_WARN_BYTES: u64 = 500 * 1024 * 1024;
