//! Layered configuration for the zettel renderers.
//!
//! `defaults/zettel.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user files and flags on top
//! of those defaults via [`Loader`] before deserializing into [`ZettelConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use zettel_html::RenderOptions;

pub use config::ConfigError;

const DEFAULT_TOML: &str = include_str!("../defaults/zettel.default.toml");

/// Top-level configuration consumed by zettel applications.
#[derive(Debug, Clone, Deserialize)]
pub struct ZettelConfig {
    pub render: RenderOptions,
    pub input: InputConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct InputConfig {
    pub format: InputFormat,
}

/// Which reader to use for the input document
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InputFormat {
    /// Pick by file extension
    Auto,
    Sz,
    Zjson,
}

impl InputFormat {
    /// Registry name of the format, `None` for [`InputFormat::Auto`]
    pub fn format_name(self) -> Option<&'static str> {
        match self {
            InputFormat::Auto => None,
            InputFormat::Sz => Some("sz"),
            InputFormat::Zjson => Some("zjson"),
        }
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

    /// Layer a configuration file that may be absent.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. `render.heading_offset` from a flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ZettelConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

pub fn load_defaults() -> Result<ZettelConfig, ConfigError> {
    Loader::new().build()
}
