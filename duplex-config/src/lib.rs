//! Shared configuration loader for the duplex toolchain.
//!
//! `defaults/duplex.default.toml` is embedded into every binary so that docs
//! and runtime behavior stay in sync. Applications layer user-specific files
//! on top of those defaults via [`Loader`] before deserializing into
//! [`DuplexConfig`].

use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use duplex_babel::decorations::CaptionScanner;
use duplex_babel::formats::markdown::{MarkdownOptions, ParserSettings};
use serde::Deserialize;
use std::path::Path;

const DEFAULT_TOML: &str = include_str!("../defaults/duplex.default.toml");

/// Top-level configuration consumed by duplex applications.
#[derive(Debug, Clone, Deserialize)]
pub struct DuplexConfig {
    pub markdown: MarkdownConfig,
    pub decorations: DecorationsConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct MarkdownConfig {
    pub serialize: SerializeConfig,
    pub parse: ParseConfig,
}

/// Mirrors the knobs exposed by the Markdown serializer.
#[derive(Debug, Clone, Deserialize)]
pub struct SerializeConfig {
    pub bullet_marker: char,
    pub emphasis_delimiter: String,
    pub strong_delimiter: String,
    pub normalize_quotes: bool,
    pub keep_tags: Vec<String>,
}

impl From<SerializeConfig> for MarkdownOptions {
    fn from(config: SerializeConfig) -> Self {
        MarkdownOptions {
            bullet_marker: config.bullet_marker,
            emphasis_delimiter: config.emphasis_delimiter,
            strong_delimiter: config.strong_delimiter,
            normalize_quotes: config.normalize_quotes,
            keep_tags: config.keep_tags,
        }
    }
}

impl From<&SerializeConfig> for MarkdownOptions {
    fn from(config: &SerializeConfig) -> Self {
        config.clone().into()
    }
}

/// Parser strategies.
#[derive(Debug, Clone, Deserialize)]
pub struct ParseConfig {
    pub permissive_strong: bool,
    pub highlight: bool,
    pub literal_task_items: bool,
}

impl From<&ParseConfig> for ParserSettings {
    fn from(config: &ParseConfig) -> Self {
        ParserSettings {
            permissive_strong: config.permissive_strong,
            highlight: config.highlight,
            literal_task_items: config.literal_task_items,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct DecorationsConfig {
    pub caption: CaptionConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CaptionConfig {
    pub enabled: bool,
    pub marker: String,
}

impl CaptionConfig {
    /// The configured scanner, or `None` when captions are disabled.
    pub fn scanner(&self) -> Option<CaptionScanner> {
        (self.enabled && !self.marker.is_empty()).then(|| CaptionScanner::new(self.marker.clone()))
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
    pub fn build(self) -> Result<DuplexConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<DuplexConfig, ConfigError> {
    Loader::new().build()
}
