//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rstree/rstree.toml`
//! 3. Explicit config file passed to [`Settings::load`]
//! 4. Environment variables: `RSTREE_*` prefix, `__` between sections
//!    (e.g. `RSTREE_JSON__PRETTY=true`)

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment, File};
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::errors::{TreeError, TreeResult};

/// JSON output settings.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct JsonSettings {
    /// Multi-line output instead of a single line
    pub pretty: bool,
    /// Spaces per nesting level, only used when `pretty`
    pub indent: usize,
}

impl Default for JsonSettings {
    fn default() -> Self {
        Self {
            pretty: false,
            indent: 2,
        }
    }
}

/// Unified configuration for rstree.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    pub json: JsonSettings,
}

/// Get the XDG config directory for rstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rstree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rstree.toml"))
}

fn config_error(e: ConfigError) -> TreeError {
    TreeError::Config {
        message: e.to_string(),
    }
}

impl Settings {
    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `config_file` - Optional TOML file layered over the global config
    ///
    /// # Errors
    /// [`TreeError::Config`] if `config_file` does not exist or any layer fails
    /// to parse.
    #[instrument(level = "debug")]
    pub fn load(config_file: Option<&Path>) -> TreeResult<Self> {
        let mut builder =
            Config::builder().add_source(Config::try_from(&Self::default()).map_err(config_error)?);

        if let Some(global_path) = global_config_path() {
            debug!("global config: {}", global_path.display());
            builder = builder.add_source(File::from(global_path).required(false));
        }

        if let Some(path) = config_file {
            if !path.exists() {
                return Err(TreeError::Config {
                    message: format!("config file not found: {}", path.display()),
                });
            }
            builder = builder.add_source(File::from(path).required(true));
        }

        builder = builder.add_source(
            Environment::with_prefix("RSTREE")
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

        builder
            .build()
            .and_then(Config::try_deserialize)
            .map_err(config_error)
    }
}
