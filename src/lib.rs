//! # GCodeCloud
//!
//! Turns 3D-printer G-code into point clouds for surface reconstruction:
//! - Decodes G0/G1 motion into absolute tool positions
//! - Separates deposition moves from travel by the extrusion axis
//! - Emits either command end points or densified deposition paths
//! - Exports CSV, XYZ, PLY or JSON point files
//!
//! ## Architecture
//!
//! GCodeCloud is organized as a workspace with multiple crates:
//!
//! 1. **gcodecloud-core** - Geometry primitives, constants, error types
//! 2. **gcodecloud-decoder** - Motion word parser, tool state, decoder iterators, file reader
//! 3. **gcodecloud-cloud** - Point cloud assembly, layers, export, reconstruction hand-off
//! 4. **gcodecloud-settings** - JSON/TOML configuration
//! 5. **gcodecloud** - Command line binary tying the crates together

use std::fmt;
use std::ops::ControlFlow;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info, warn};

pub use gcodecloud_cloud::{
    check_preconditions, group_layers, reconstruct_surface, save_points, write_points,
    AssemblyOptions, Layer, PointCloud, PointCloudAssembler, PointFormat, ReconstructionParams,
    SurfaceReconstructor,
};
pub use gcodecloud_core::{
    Bounds, Error, ExportError, InputError, Point3, ReconstructionError, Result,
};
pub use gcodecloud_decoder::{
    DecodeMode, DecodeOptions, DecodeStats, FileReadStats, GcodeFileReader, MotionDecoder,
    MotionKind, MotionSegment,
};
pub use gcodecloud_settings::{Config, SettingsError};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Build date (set at compile time)
pub const BUILD_DATE: &str = env!("BUILD_DATE");

/// Initialize logging
///
/// Sets up structured logging with:
/// - Console output on stderr, pretty or JSON formatted
/// - RUST_LOG environment variable support, INFO by default
pub fn init_logging(json: bool) -> anyhow::Result<()> {
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;
    use tracing_subscriber::EnvFilter;

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(tracing::Level::INFO.to_string()));

    let layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_target(true)
        .with_level(true)
        .with_line_number(true);

    if json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.json())
            .try_init()?;
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(layer.pretty())
            .try_init()?;
    }

    Ok(())
}

/// Result of decoding one file
#[derive(Debug, Clone)]
pub struct Conversion {
    pub input: PathBuf,
    pub cloud: PointCloud,
    pub stats: DecodeStats,
    pub read: FileReadStats,
}

impl Conversion {
    /// Report of this run, including whether the cloud can be handed to a
    /// reconstruction backend with `params`
    pub fn summary(&self, params: &ReconstructionParams) -> Summary {
        let reconstruction_issue = check_preconditions(&self.cloud, params)
            .err()
            .map(|e| e.to_string());
        Summary {
            input: self.input.clone(),
            points: self.cloud.len(),
            layers: None,
            bounding_min: self.cloud.has_deposits().then(|| self.cloud.bounding_min().to_array()),
            bounding_max: self.cloud.has_deposits().then(|| self.cloud.bounding_max().to_array()),
            stats: self.stats,
            lossy_lines: self.read.lossy_lines,
            stopped_early: self.read.stopped_early,
            reconstruction_ready: reconstruction_issue.is_none(),
            reconstruction_issue,
        }
    }
}

/// Human and machine readable report of a run
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Summary {
    pub input: PathBuf,
    pub points: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub layers: Option<usize>,
    pub bounding_min: Option<[f64; 3]>,
    pub bounding_max: Option<[f64; 3]>,
    pub stats: DecodeStats,
    pub lossy_lines: u64,
    pub stopped_early: bool,
    pub reconstruction_ready: bool,
    /// Why the cloud fails the reconstruction preconditions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reconstruction_issue: Option<String>,
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "Input:           {}", self.input.display())?;
        writeln!(f, "Lines:           {}", self.stats.lines)?;
        writeln!(
            f,
            "Motion commands: {} ({} rapid, {} linear)",
            self.stats.motion_commands(),
            self.stats.rapid_moves,
            self.stats.linear_moves
        )?;
        writeln!(
            f,
            "Deposit moves:   {} ({} travel)",
            self.stats.deposit_moves,
            self.stats.travel_moves()
        )?;
        writeln!(f, "Ignored lines:   {}", self.stats.ignored_lines)?;
        if self.stats.malformed_words > 0 {
            writeln!(f, "Malformed words: {}", self.stats.malformed_words)?;
        }
        if let Some(layers) = self.layers {
            writeln!(f, "Layers:          {}", layers)?;
        }
        writeln!(f, "Points:          {}", self.points)?;
        match (self.bounding_min, self.bounding_max) {
            (Some(min), Some(max)) => {
                writeln!(f, "Min:             ({}, {}, {})", min[0], min[1], min[2])?;
                write!(f, "Max:             ({}, {}, {})", max[0], max[1], max[2])?;
            }
            _ => write!(f, "Bounds:          none (no deposition moves)")?,
        }
        match &self.reconstruction_issue {
            None => write!(f, "\nReconstruction:  ready")?,
            Some(issue) => write!(f, "\nReconstruction:  not ready ({})", issue)?,
        }
        if self.stopped_early {
            write!(f, "\nStopped early at the point limit")?;
        }
        Ok(())
    }
}

fn decode_file<F>(path: &Path, options: &AssemblyOptions, mut on_segment: F) -> Result<Conversion>
where
    F: FnMut(&MotionSegment),
{
    let reader = GcodeFileReader::new(path)?;
    info!(
        "Decoding {} ({} bytes, {} mode)",
        path.display(),
        reader.file_size(),
        options.decode.mode
    );

    let mut decoder = MotionDecoder::new();
    let mut assembler = PointCloudAssembler::new(*options);

    let read = reader.read_lines(|line| match decoder.decode_line(line) {
        Some(segment) => {
            on_segment(&segment);
            assembler.push_segment(&segment)
        }
        None => ControlFlow::Continue(()),
    })?;

    let stats = decoder.stats();
    if stats.malformed_words > 0 {
        warn!(
            "{} axis words had unreadable numbers and were ignored",
            stats.malformed_words
        );
    }
    if read.lossy_lines > 0 {
        debug!("{} lines were not valid UTF-8", read.lossy_lines);
    }

    Ok(Conversion {
        input: path.to_path_buf(),
        cloud: assembler.finish(),
        stats,
        read,
    })
}

/// Decode a G-code file into a point cloud
///
/// # Errors
/// Fails only when the file is missing or cannot be read.
pub fn convert_file(path: &Path, options: &AssemblyOptions) -> Result<Conversion> {
    decode_file(path, options, |_| {})
}

/// Decode a file and also group its deposition moves into layers
pub fn inspect_file(path: &Path, options: &AssemblyOptions) -> Result<(Conversion, Vec<Layer>)> {
    let mut deposits = Vec::new();
    let conversion = decode_file(path, options, |segment| {
        if segment.is_deposit {
            deposits.push(*segment);
        }
    })?;
    let layers = group_layers(deposits);
    debug!("{} layers in {}", layers.len(), path.display());
    Ok((conversion, layers))
}
