//! Configuration for GCodeCloud
//!
//! Supports JSON and TOML files, picked by extension. Configuration is
//! organized into sections:
//! - Decode settings (emission mode, sample spacing, rounding, point cap)
//! - Reconstruction parameters forwarded to the surface backend
//! - Export settings (point file format, delimiter)

use std::path::{Path, PathBuf};

use gcodecloud_cloud::{AssemblyOptions, PointFormat, ReconstructionParams};
use gcodecloud_core::constants::{
    DEFAULT_RESOLUTION_STEP, DEFAULT_ROUND_DECIMALS, MAX_ROUND_DECIMALS,
};
use gcodecloud_core::ReconstructionError;
use gcodecloud_decoder::{DecodeMode, DecodeOptions};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{ConfigError, ConfigResult, SettingsError, SettingsResult};

/// File name used under the platform config directory
pub const CONFIG_FILE_NAME: &str = "config.toml";

/// Decoding and assembly settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DecodeSettings {
    pub mode: DecodeMode,
    /// Sample spacing for interpolated mode
    pub resolution_step: f64,
    /// Round output coordinates
    pub round: bool,
    /// Decimals kept when `round` is set
    pub round_decimals: u32,
    /// Stop after this many points
    pub max_points: Option<usize>,
}

impl Default for DecodeSettings {
    fn default() -> Self {
        Self {
            mode: DecodeMode::default(),
            resolution_step: DEFAULT_RESOLUTION_STEP,
            round: true,
            round_decimals: DEFAULT_ROUND_DECIMALS,
            max_points: None,
        }
    }
}

impl DecodeSettings {
    /// Effective rounding, `None` when disabled
    pub fn rounding(&self) -> Option<u32> {
        self.round.then_some(self.round_decimals)
    }
}

/// Point file export settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExportSettings {
    pub format: PointFormat,
    /// Field separator for CSV output
    pub delimiter: String,
}

impl Default for ExportSettings {
    fn default() -> Self {
        Self {
            format: PointFormat::Csv,
            delimiter: ",".to_string(),
        }
    }
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub decode: DecodeSettings,
    pub reconstruction: ReconstructionParams,
    pub export: ExportSettings,
}

enum FileFormat {
    Json,
    Toml,
}

impl FileFormat {
    fn of(path: &Path) -> ConfigResult<Self> {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => Ok(Self::Json),
            Some(ext) if ext.eq_ignore_ascii_case("toml") => Ok(Self::Toml),
            other => Err(ConfigError::UnsupportedFormat(
                other.unwrap_or("<none>").to_string(),
            )),
        }
    }
}

impl Config {
    /// Create new config with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Platform config location, e.g. `~/.config/gcodecloud/config.toml`
    pub fn default_config_path() -> SettingsResult<PathBuf> {
        dirs::config_dir()
            .map(|dir| dir.join("gcodecloud").join(CONFIG_FILE_NAME))
            .ok_or_else(|| {
                SettingsError::ConfigDirectory("no config directory on this platform".to_string())
            })
    }

    /// Load config from file (JSON or TOML)
    pub fn load_from_file(path: &Path) -> SettingsResult<Self> {
        let format = FileFormat::of(path)?;
        let content = std::fs::read_to_string(path).map_err(|e| {
            SettingsError::LoadError(format!("{}: {}", path.display(), e))
        })?;

        let config: Self = match format {
            FileFormat::Json => serde_json::from_str(&content)?,
            FileFormat::Toml => toml::from_str(&content)?,
        };

        config.validate()?;
        debug!("Loaded config from {}", path.display());
        Ok(config)
    }

    /// Load `path` if given, else the platform config if present, else defaults
    pub fn load_or_default(path: Option<&Path>) -> SettingsResult<Self> {
        if let Some(path) = path {
            return Self::load_from_file(path);
        }
        match Self::default_config_path() {
            Ok(path) if path.is_file() => Self::load_from_file(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Save config to file (JSON or TOML)
    pub fn save_to_file(&self, path: &Path) -> SettingsResult<()> {
        self.validate()?;

        let content = match FileFormat::of(path)? {
            FileFormat::Json => serde_json::to_string_pretty(self)?,
            FileFormat::Toml => toml::to_string_pretty(self)?,
        };

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content).map_err(|e| {
            SettingsError::SaveError(format!("{}: {}", path.display(), e))
        })?;

        Ok(())
    }

    /// Validate configuration
    pub fn validate(&self) -> ConfigResult<()> {
        let decode = &self.decode;
        if !(decode.resolution_step.is_finite() && decode.resolution_step > 0.0) {
            return Err(ConfigError::out_of_range(
                "decode.resolution_step",
                decode.resolution_step,
                "must be > 0",
            ));
        }
        if decode.round_decimals > MAX_ROUND_DECIMALS {
            return Err(ConfigError::out_of_range(
                "decode.round_decimals",
                decode.round_decimals,
                format!("must be <= {}", MAX_ROUND_DECIMALS),
            ));
        }
        if decode.max_points == Some(0) {
            return Err(ConfigError::out_of_range(
                "decode.max_points",
                0,
                "must be > 0",
            ));
        }

        if let Err(ReconstructionError::InvalidParameter { param, reason }) =
            self.reconstruction.validate()
        {
            let value = match param.as_str() {
                "depth" => self.reconstruction.depth.to_string(),
                "scale" => self.reconstruction.scale.to_string(),
                "num_samples" => self.reconstruction.num_samples.to_string(),
                "normal_radius" => self.reconstruction.normal_radius.to_string(),
                "max_neighbours" => self.reconstruction.max_neighbours.to_string(),
                _ => String::new(),
            };
            return Err(ConfigError::out_of_range(
                &format!("reconstruction.{}", param),
                value,
                reason,
            ));
        }

        if self.export.delimiter.is_empty() {
            return Err(ConfigError::out_of_range(
                "export.delimiter",
                "\"\"",
                "must not be empty",
            ));
        }

        Ok(())
    }

    /// Decoder options for this config
    pub fn decode_options(&self) -> DecodeOptions {
        DecodeOptions {
            mode: self.decode.mode,
            resolution_step: self.decode.resolution_step,
        }
    }

    /// Assembly options for this config
    pub fn assembly_options(&self) -> AssemblyOptions {
        AssemblyOptions::new(self.decode_options())
            .with_rounding(self.decode.rounding())
            .with_max_points(self.decode.max_points)
    }
}
