//! Configuration loading
//!
//! `defaults/comtext.default.toml` is embedded into the binary so documented
//! defaults and runtime behavior stay in sync. Callers layer their own files
//! and command-line overrides on top through [`Loader`] before deserializing
//! into [`ComtextConfig`].

use crate::comtext::keywords;
use crate::comtext::target::Target;
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::{Path, PathBuf};

const DEFAULT_TOML: &str = include_str!("../../defaults/comtext.default.toml");

/// Top-level configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ComtextConfig {
    pub compile: CompileOptions,
    pub output: OutputConfig,
}

/// Knobs of a single compilation
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct CompileOptions {
    pub include_path: Vec<PathBuf>,
    pub extensions: Vec<String>,
    pub max_depth: usize,
    pub preload: Vec<String>,
}

impl Default for CompileOptions {
    fn default() -> Self {
        Self {
            include_path: keywords::INCLUDE_PATH.iter().map(PathBuf::from).collect(),
            extensions: keywords::FILE_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            max_depth: 128,
            preload: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct OutputConfig {
    pub target: Target,
}

/// Builds a [`ComtextConfig`] from `defaults/comtext.default.toml`, any
/// project files and the settings given on the command line, later layers
/// winning.
#[derive(Debug, Clone)]
pub struct Loader {
    builder: ConfigBuilder<DefaultState>,
}

impl Loader {
    pub fn new() -> Self {
        let defaults = File::from_str(DEFAULT_TOML, FileFormat::Toml);
        Self {
            builder: Config::builder().add_source(defaults),
        }
    }

    /// Layer a TOML file given explicitly, e.g. with `--config`
    pub fn with_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), true)
    }

    /// Layer a project file such as `./comtext.toml` if it exists
    pub fn with_optional_file(self, path: impl AsRef<Path>) -> Self {
        self.layer(path.as_ref(), false)
    }

    fn layer(mut self, path: &Path, required: bool) -> Self {
        let file = File::from(path).format(FileFormat::Toml).required(required);
        self.builder = self.builder.add_source(file);
        self
    }

    /// Set one dotted key such as `output.target` or `compile.preload`
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<ComtextConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Compile and output settings with no file or override applied
pub fn load_defaults() -> Result<ComtextConfig, ConfigError> {
    Loader::new().build()
}
