//! Shared configuration loader for the mm toolchain.
//!
//! `defaults/mm.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on
//! top of those defaults via [`Loader`] before deserializing into
//! [`MmConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use mm_convert::ToolPaths;
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../defaults/mm.default.toml");

/// Top-level configuration consumed by mm applications.
#[derive(Debug, Clone, Deserialize)]
pub struct MmConfig {
    pub tools: ToolsConfig,
    pub convert: ConvertConfig,
}

/// Locations of the external converter binaries. An empty string means
/// resolve via environment override, then PATH.
#[derive(Debug, Clone, Deserialize)]
pub struct ToolsConfig {
    pub ffmpeg: String,
    pub pandoc: String,
    pub pdftoppm: String,
}

/// Conversion behavior knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct ConvertConfig {
    pub raster_dpi: u32,
}

fn tool_path(configured: &str) -> Option<PathBuf> {
    if configured.is_empty() {
        None
    } else {
        Some(PathBuf::from(configured))
    }
}

impl From<&ToolsConfig> for ToolPaths {
    fn from(config: &ToolsConfig) -> Self {
        ToolPaths {
            ffmpeg: tool_path(&config.ffmpeg),
            pandoc: tool_path(&config.pandoc),
            pdftoppm: tool_path(&config.pdftoppm),
        }
    }
}

impl From<ToolsConfig> for ToolPaths {
    fn from(config: ToolsConfig) -> Self {
        ToolPaths::from(&config)
    }
}

/// Helper for layering user overrides over the built-in defaults.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    /// Start a loader seeded with the embedded defaults.
    pub fn new() -> Self {
        let builder = Config::builder().add_source(File::from_str(DEFAULT_TOML, FileFormat::Toml));
        Self { builder }
    }

    /// Layer a configuration file. Missing files trigger an error.
    pub fn with_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(true);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Layer an optional configuration file (ignored if the file is absent).
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override (useful for CLI settings).
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    /// Finalize the builder and deserialize the resulting configuration.
    pub fn build(self) -> Result<MmConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<MmConfig, ConfigError> {
    Loader::new().build()
}
