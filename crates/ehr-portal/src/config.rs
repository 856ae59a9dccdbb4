//! Portal configuration
//!
//! Layered with the `config` crate: built-in defaults, then an optional
//! TOML file, then `EHR_*` environment variables.

use crate::error::Result;
use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Backend base URL used when nothing else is configured
pub const DEFAULT_API_URL: &str = "http://localhost:3000/api";

/// Config file looked up in the working directory (extension inferred)
pub const DEFAULT_CONFIG_NAME: &str = "ehr-portal";

/// Environment variable prefix, e.g. `EHR_API_URL`
pub const ENV_PREFIX: &str = "EHR";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct PortalConfig {
    /// Base URL of the backend REST API, including the `/api` prefix
    pub api_url: String,
    /// Directory holding the persisted session
    pub storage_dir: PathBuf,
}

impl Default for PortalConfig {
    fn default() -> Self {
        PortalConfig {
            api_url: DEFAULT_API_URL.to_string(),
            storage_dir: default_storage_dir(),
        }
    }
}

impl PortalConfig {
    /// Load configuration from defaults, a file and the environment.
    ///
    /// An explicit `path` must exist; the default file is optional.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let defaults = PortalConfig::default();

        let mut builder = Config::builder()
            .set_default("api_url", defaults.api_url)?
            .set_default("storage_dir", defaults.storage_dir.to_string_lossy().to_string())?;

        builder = match path {
            Some(path) => builder.add_source(File::from(path).required(true)),
            None => builder.add_source(File::with_name(DEFAULT_CONFIG_NAME).required(false)),
        };

        let config = builder
            .add_source(Environment::with_prefix(ENV_PREFIX))
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    pub fn with_api_url(mut self, api_url: impl Into<String>) -> Self {
        self.api_url = api_url.into();
        self
    }

    pub fn with_storage_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.storage_dir = dir.into();
        self
    }
}

fn default_storage_dir() -> PathBuf {
    match std::env::var_os("HOME") {
        Some(home) => PathBuf::from(home).join(".ehr-portal"),
        None => PathBuf::from(".ehr-portal"),
    }
}
