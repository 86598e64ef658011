//! User configuration file.
//!
//! Every key is optional; command-line flags override file values, which
//! override built-in defaults.
//!
//! # Example YAML
//!
//! ```yaml
//! shell: fish
//! ai:
//!   backend: ollama
//!   model: llama3
//!   ollama_url: http://localhost:11434
//! discovery:
//!   max_depth: 3
//!   timeout_secs: 5
//!   jobs: 4
//! ```

use std::path::{Path, PathBuf};

use autocompletor_ai::Backend;
use autocompletor_shell::Shell;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },
}

/// AI fallback settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AiConfig {
    /// Backend used when discovery finds nothing, without passing `--ai`.
    pub backend: Option<Backend>,
    pub model: Option<String>,
    pub ollama_url: Option<String>,
}

/// Tree discovery settings.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DiscoveryConfig {
    pub max_depth: Option<usize>,
    pub timeout_secs: Option<u64>,
    pub jobs: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    pub shell: Option<Shell>,
    pub ai: AiConfig,
    pub discovery: DiscoveryConfig,
}

impl Config {
    /// Loads configuration from a YAML file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        if text.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(&text).map_err(|source| ConfigError::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Loads the default config file if it exists, else returns defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match default_path() {
            Some(path) if path.is_file() => {
                debug!(path = %path.display(), "Loading config file");
                Self::load(path)
            }
            _ => Ok(Self::default()),
        }
    }
}

/// `<config_dir>/autocompletor/config.yml`.
pub fn default_path() -> Option<PathBuf> {
    directories::ProjectDirs::from("", "", "autocompletor")
        .map(|dirs| dirs.config_dir().join("config.yml"))
}
