//! savectl configuration
//!
//! Loaded from `~/.savectl/config.toml`. Every section is optional and a
//! missing file means defaults. Environment variables override the file:
//! - `DATABASE_URL` → `server.database_url`
//! - `SAVECTL_ENDPOINT` → `client.endpoint`
//! - `SAVECTL_USER` → `client.user`

use std::env;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::toggle::MixedMembership;

/// Default HTTP endpoint for client commands
pub const DEFAULT_ENDPOINT: &str = "http://127.0.0.1:3030";

/// Default bind address for `savectl serve`
pub const DEFAULT_BIND: &str = "127.0.0.1:3030";

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavectlConfig {
    pub server: ServerSection,
    pub client: ClientSection,
    pub saves: SavesSection,
    /// tracing filter used when RUST_LOG is unset
    #[serde(skip_serializing_if = "Option::is_none")]
    pub log_level: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerSection {
    pub bind: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    pub cors_permissive: bool,
    pub max_connections: u32,
}

impl Default for ServerSection {
    fn default() -> Self {
        Self {
            bind: DEFAULT_BIND.to_string(),
            database_url: None,
            cors_permissive: false,
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClientSection {
    pub endpoint: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<String>,
}

impl Default for ClientSection {
    fn default() -> Self {
        Self {
            endpoint: DEFAULT_ENDPOINT.to_string(),
            user: None,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SavesSection {
    pub mixed_membership: MixedMembership,
}

impl SavectlConfig {
    /// Config file path: ~/.savectl/config.toml
    pub fn config_path() -> Result<PathBuf, ConfigError> {
        dirs::home_dir()
            .map(|home| home.join(".savectl").join("config.toml"))
            .ok_or(ConfigError::NoHome)
    }

    /// Load from the default path, then apply environment overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let mut config = Self::load_from(&Self::config_path()?)?;
        config.apply_env();
        Ok(config)
    }

    /// Load from an explicit path. A missing file yields defaults.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "no config file, using defaults");
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Write this config as TOML, creating parent directories.
    pub fn save_to(&self, path: &Path) -> Result<(), ConfigError> {
        let content = toml::to_string_pretty(self)?;
        let write_err = |source| ConfigError::Write {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(write_err)?;
        }
        fs::write(path, content).map_err(write_err)
    }

    fn apply_env(&mut self) {
        if let Ok(url) = env::var("DATABASE_URL") {
            self.server.database_url = Some(url);
        }
        if let Ok(endpoint) = env::var("SAVECTL_ENDPOINT") {
            self.client.endpoint = endpoint;
        }
        if let Ok(user) = env::var("SAVECTL_USER") {
            self.client.user = Some(user);
        }
    }
}
