//! Config entry parsing and structures.
//!
//! A config entry ties a set of entity adapters to one user configuration. It
//! is stored by the host as TOML:
//!
//! ```toml
//! entry_id = "01JHW3K8"
//! title = "Home"
//!
//! [options]
//! s18_base_url = "https://api.s18.myenergi.net"
//! ```
//!
//! Credentials are deliberately absent: they live in the vendor client's
//! connection.

use std::path::Path;
use std::path::PathBuf;
use std::str::FromStr;

use serde::Deserialize;

use crate::s18::S18_BASE_URL;

fn default_s18_base_url() -> String {
    S18_BASE_URL.to_string()
}

/// A user configuration of the integration
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigEntry {
    pub entry_id: String,

    /// Human-readable name shown by the host
    pub title: String,

    #[serde(default)]
    pub options: Options,
}

/// Integration options
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct Options {
    /// Base host of the s18 cloud API (default: "https://api.s18.myenergi.net")
    #[serde(default = "default_s18_base_url")]
    pub s18_base_url: String,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            s18_base_url: default_s18_base_url(),
        }
    }
}

impl ConfigEntry {
    pub fn new(entry_id: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            entry_id: entry_id.into(),
            title: title.into(),
            options: Options::default(),
        }
    }

    /// Load a config entry from a TOML file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::Io(path.as_ref().to_path_buf(), e))?;

        contents.parse()
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.options.s18_base_url).map_err(|e| {
            ConfigError::Invalid(format!(
                "options.s18_base_url {:?} is not a valid URL: {}",
                self.options.s18_base_url, e
            ))
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid(format!(
                "options.s18_base_url must use http or https, got {:?}",
                url.scheme()
            )));
        }

        Ok(())
    }
}

impl FromStr for ConfigEntry {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let entry: ConfigEntry = toml::from_str(s)?;
        entry.validate()?;
        Ok(entry)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file {0}: {1}")]
    Io(PathBuf, #[source] std::io::Error),

    #[error("Failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
