//! GCodeCloud Settings Crate
//!
//! Handles application configuration: loading, saving and validating the
//! decode, reconstruction and export sections.

pub mod config;
pub mod error;

pub use config::{Config, DecodeSettings, ExportSettings, CONFIG_FILE_NAME};
pub use error::{ConfigError, ConfigResult, SettingsError, SettingsResult};
