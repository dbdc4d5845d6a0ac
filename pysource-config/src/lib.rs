//! Shared configuration loader for the pysource toolchain.
//!
//! `defaults/pysource.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`PysourceConfig`].
//!
//! The parser itself never reads configuration: values end up in
//! [`ParseOptions`] and [`OutlineOptions`], which are passed to each call.

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use pysource_parser::py::outline::OutlineOptions;
use pysource_parser::py::parsing::ParseOptions;
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/pysource.default.toml");

/// Top-level configuration consumed by pysource applications.
#[derive(Debug, Clone, Deserialize)]
pub struct PysourceConfig {
    pub parser: ParserConfig,
    pub outline: OutlineConfig,
    pub inspect: InspectConfig,
    pub check: CheckConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ParserConfig {
    pub tab_size: usize,
}

/// Import classification knobs.
#[derive(Debug, Clone, Deserialize)]
pub struct OutlineConfig {
    pub first_party: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InspectConfig {
    pub show_line_numbers: bool,
}

/// Round-trip check output.
#[derive(Debug, Clone, Deserialize)]
pub struct CheckConfig {
    pub context_lines: usize,
}

impl PysourceConfig {
    pub fn parse_options(&self) -> ParseOptions {
        ParseOptions::with_tab_size(self.parser.tab_size)
    }

    pub fn outline_options(&self) -> OutlineOptions {
        OutlineOptions::with_first_party(self.outline.first_party.iter().cloned())
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
    pub fn build(self) -> Result<PysourceConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<PysourceConfig, ConfigError> {
    Loader::new().build()
}
