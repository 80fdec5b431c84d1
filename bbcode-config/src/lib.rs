//! Shared configuration loader for the BBCode renderer.
//!
//! `defaults/bbcode.default.toml` is embedded into every binary so that docs and
//! runtime behavior stay in sync. Applications layer user-specific files on top
//! of those defaults via [`Loader`] before deserializing into [`BbcodeConfig`].

use bbcode_parser::bbcode::{
    MaterializeOptions, PollOptions, Registry, RegistryError, RegistryOptions, Renderer,
};
use config::builder::DefaultState;
use config::{Config, ConfigBuilder, ConfigError, File, FileFormat, ValueKind};
use serde::Deserialize;
use std::path::Path;
use std::sync::Arc;

const DEFAULT_TOML: &str = include_str!("../defaults/bbcode.default.toml");

/// Top-level configuration consumed by BBCode applications.
#[derive(Debug, Clone, Deserialize)]
pub struct BbcodeConfig {
    pub poll: PollConfig,
    pub render: RenderConfig,
    pub emoticons: EmoticonConfig,
}

/// Where poll tags link to.
#[derive(Debug, Clone, Deserialize)]
pub struct PollConfig {
    pub base_url: String,
    pub link_label: String,
    pub device: String,
}

/// Materializer switches and extra tags.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderConfig {
    pub merge_adjacent_text: bool,
    pub linkify_urls: bool,
    pub linkify_mentions: bool,
    #[serde(default)]
    pub passthrough_tags: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct EmoticonConfig {
    pub enabled: bool,
}

impl BbcodeConfig {
    pub fn registry_options(&self) -> RegistryOptions {
        RegistryOptions {
            poll: PollOptions {
                base_url: self.poll.base_url.clone(),
                link_label: self.poll.link_label.clone(),
                device: self.poll.device.clone(),
            },
            passthrough_tags: self.render.passthrough_tags.clone(),
        }
    }

    pub fn materialize_options(&self) -> MaterializeOptions {
        MaterializeOptions {
            merge_adjacent_text: self.render.merge_adjacent_text,
            linkify_urls: self.render.linkify_urls,
            linkify_mentions: self.render.linkify_mentions,
        }
    }

    /// Build a renderer with its own registry configured from this file.
    pub fn renderer(&self) -> Result<Renderer, RegistryError> {
        let registry = Registry::with_options(&self.registry_options())?;
        Ok(Renderer::new(Arc::new(registry), self.materialize_options()))
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

    /// Layer a configuration file if it exists.
    pub fn with_optional_file(mut self, path: impl AsRef<Path>) -> Self {
        let source = File::from(path.as_ref())
            .format(FileFormat::Toml)
            .required(false);
        self.builder = self.builder.add_source(source);
        self
    }

    /// Apply a single key/value override, e.g. from a CLI flag.
    pub fn set_override<I>(mut self, key: &str, value: I) -> Result<Self, ConfigError>
    where
        I: Into<ValueKind>,
    {
        self.builder = self.builder.set_override(key, value)?;
        Ok(self)
    }

    pub fn build(self) -> Result<BbcodeConfig, ConfigError> {
        self.builder.build()?.try_deserialize()
    }
}

impl Default for Loader {
    fn default() -> Self {
        Self::new()
    }
}

/// Convenience helper for callers that only need the defaults.
pub fn load_defaults() -> Result<BbcodeConfig, ConfigError> {
    Loader::new().build()
}
