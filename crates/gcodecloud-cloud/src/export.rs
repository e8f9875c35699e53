//! Point file export
//!
//! Writes a cloud in the plain formats reconstruction tools read:
//! - `csv`: `x,y,z` per line, no header
//! - `xyz`: whitespace separated, one point per line
//! - `ply`: ASCII PLY with a vertex-only element
//! - `json`: the serialized [`PointCloud`], bounds included

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::str::FromStr;

use gcodecloud_core::ExportError;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::PointCloud;

/// Supported point file formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointFormat {
    #[default]
    Csv,
    Xyz,
    Ply,
    Json,
}

impl PointFormat {
    /// Guess the format from a file extension
    pub fn from_path(path: &Path) -> Option<Self> {
        path.extension()
            .and_then(|ext| ext.to_str())
            .and_then(|ext| ext.parse().ok())
    }

    pub fn extension(&self) -> &'static str {
        match self {
            Self::Csv => "csv",
            Self::Xyz => "xyz",
            Self::Ply => "ply",
            Self::Json => "json",
        }
    }
}

impl std::fmt::Display for PointFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}

impl FromStr for PointFormat {
    type Err = ExportError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "csv" | "txt" => Ok(Self::Csv),
            "xyz" | "pts" => Ok(Self::Xyz),
            "ply" => Ok(Self::Ply),
            "json" => Ok(Self::Json),
            other => Err(ExportError::UnsupportedFormat {
                format: other.to_string(),
            }),
        }
    }
}

/// Write `cloud` to any writer
pub fn write_points<W: Write>(
    mut writer: W,
    cloud: &PointCloud,
    format: PointFormat,
    delimiter: &str,
) -> Result<(), ExportError> {
    match format {
        PointFormat::Csv => {
            for p in cloud {
                writeln!(writer, "{}{delimiter}{}{delimiter}{}", p.x, p.y, p.z)?;
            }
        }
        PointFormat::Xyz => {
            for p in cloud {
                writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
            }
        }
        PointFormat::Ply => {
            writeln!(writer, "ply")?;
            writeln!(writer, "format ascii 1.0")?;
            writeln!(writer, "comment generated by gcodecloud")?;
            writeln!(writer, "element vertex {}", cloud.len())?;
            writeln!(writer, "property double x")?;
            writeln!(writer, "property double y")?;
            writeln!(writer, "property double z")?;
            writeln!(writer, "end_header")?;
            for p in cloud {
                writeln!(writer, "{} {} {}", p.x, p.y, p.z)?;
            }
        }
        PointFormat::Json => {
            serde_json::to_writer_pretty(&mut writer, cloud)
                .map_err(|e| ExportError::Io(e.into()))?;
            writeln!(writer)?;
        }
    }
    writer.flush()?;
    Ok(())
}

/// Write `cloud` to `path`
pub fn save_points(
    path: &Path,
    cloud: &PointCloud,
    format: PointFormat,
    delimiter: &str,
) -> Result<(), ExportError> {
    let file = File::create(path)?;
    write_points(BufWriter::new(file), cloud, format, delimiter)?;
    debug!(
        "Wrote {} points to {} as {}",
        cloud.len(),
        path.display(),
        format
    );
    Ok(())
}
