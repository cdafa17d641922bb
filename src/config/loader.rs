// hoard: GitHub to archive.org mirroring tool
//
// SPDX-FileCopyrightText: 2026 Romeo Ahmed
// SPDX-License-Identifier: GPL-3.0-or-later

//! Layered configuration sources.
//!
//! ```text
//! defaults < hoard.toml < --config files < HOARD_<SECTION>__<KEY> < CLI flags
//! ```
//!
//! Files are merged in the order they were added; the environment and the
//! command-line overrides always come last, whatever order the calls are in.

use std::fmt;
use std::path::{Path, PathBuf};

use config::{Environment, File, FileFormat};

use super::Config;
use crate::error::Result;

/// A TOML layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Layer {
    /// Must exist.
    File(PathBuf),
    /// Skipped silently when absent.
    OptionalFile(PathBuf),
    /// TOML text, mostly for tests.
    Inline(String),
}

impl Layer {
    /// Whether this layer contributes anything right now.
    #[must_use]
    pub fn is_present(&self) -> bool {
        match self {
            Self::File(_) | Self::Inline(_) => true,
            Self::OptionalFile(path) => path.is_file(),
        }
    }
}

impl fmt::Display for Layer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::File(path) => write!(f, "{}", path.display()),
            Self::OptionalFile(path) => write!(f, "{} (default location)", path.display()),
            Self::Inline(_) => f.write_str("<inline>"),
        }
    }
}

/// Collects layers, then merges them into a validated [`Config`].
#[derive(Debug, Default)]
pub struct ConfigLoader {
    layers: Vec<Layer>,
    env_prefix: Option<String>,
    overrides: Vec<(String, config::Value)>,
}

impl ConfigLoader {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a TOML file that must exist when [`build`](Self::build) runs.
    #[must_use]
    pub fn add_toml_file(mut self, path: impl AsRef<Path>) -> Self {
        self.layers.push(Layer::File(path.as_ref().to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_file_optional(mut self, path: impl AsRef<Path>) -> Self {
        self.layers
            .push(Layer::OptionalFile(path.as_ref().to_path_buf()));
        self
    }

    #[must_use]
    pub fn add_toml_str(mut self, content: &str) -> Self {
        self.layers.push(Layer::Inline(content.to_string()));
        self
    }

    /// Reads `<PREFIX>_<SECTION>__<KEY>` variables. The double underscore
    /// keeps keys with underscores (`HOARD_GITHUB__API_URL`) unambiguous;
    /// `HOARD_FILTER__ONLY` takes a comma-separated list.
    #[must_use]
    pub fn with_env_prefix(mut self, prefix: &str) -> Self {
        self.env_prefix = Some(prefix.to_string());
        self
    }

    /// Sets `key` (dotted, `section.key`) above every other layer.
    #[must_use]
    pub fn set(mut self, key: &str, value: impl Into<config::Value>) -> Self {
        self.overrides.push((key.to_string(), value.into()));
        self
    }

    /// Layers that exist, in merge order.
    pub fn present_layers(&self) -> impl Iterator<Item = &Layer> {
        self.layers.iter().filter(|layer| layer.is_present())
    }

    /// Merges every layer.
    ///
    /// # Errors
    ///
    /// A required file is missing or not valid TOML, a value has the wrong
    /// type, or [`Config::validate`] rejects the result.
    pub fn build(self) -> Result<Config> {
        let mut builder = config::Config::builder();
        for layer in &self.layers {
            builder = match layer {
                Layer::File(path) => builder.add_source(
                    File::from(path.as_path())
                        .format(FileFormat::Toml)
                        .required(true),
                ),
                Layer::OptionalFile(path) => builder.add_source(
                    File::from(path.as_path())
                        .format(FileFormat::Toml)
                        .required(false),
                ),
                Layer::Inline(text) => builder.add_source(File::from_str(text, FileFormat::Toml)),
            };
        }
        if let Some(prefix) = &self.env_prefix {
            builder = builder.add_source(
                Environment::with_prefix(prefix)
                    .prefix_separator("_")
                    .separator("__")
                    .list_separator(",")
                    .with_list_parse_key("filter.only")
                    .try_parsing(true),
            );
        }
        for (key, value) in self.overrides {
            builder = builder.set_override(key, value)?;
        }

        let config: Config = builder.build()?.try_deserialize()?;
        config.validate()?;
        Ok(config)
    }
}
