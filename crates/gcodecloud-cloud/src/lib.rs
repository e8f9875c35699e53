//! # GCodeCloud Cloud
//!
//! Collects decoded toolpaths into ordered point clouds and hands them to
//! the outside world: point file export, Z-layer grouping for plotting, and
//! the contract for an external surface reconstruction backend.

pub mod assembler;
pub mod export;
pub mod layers;
pub mod reconstruct;

pub use assembler::{AssemblyOptions, PointCloud, PointCloudAssembler};
pub use export::{save_points, write_points, PointFormat};
pub use layers::{group_layers, Layer};
pub use reconstruct::{
    check_preconditions, reconstruct_surface, ReconstructionParams, SurfaceReconstructor,
};
