//! Configuration file handling.
//!
//! Settings come from an optional `dashboard.toml`; the binaries then
//! override individual fields from command-line flags.

use crate::error::{DashboardError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "dashboard.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardConfig {
    #[serde(default)]
    pub data: DataConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub cards: CardsConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataConfig {
    /// Comments CSV with `Name`, `Year` and optionally `sentiment` columns.
    #[serde(default = "default_csv_path")]
    pub csv_path: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            csv_path: default_csv_path(),
        }
    }
}

fn default_csv_path() -> PathBuf {
    PathBuf::from("Commentsentiment.csv")
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_addr")]
    pub addr: String,

    /// Directory served under `/static`.
    #[serde(default = "default_static_dir")]
    pub static_dir: PathBuf,

    /// Idle minutes before a pagination session is forgotten.
    #[serde(default = "default_session_ttl")]
    pub session_ttl_minutes: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            addr: default_addr(),
            static_dir: default_static_dir(),
            session_ttl_minutes: default_session_ttl(),
        }
    }
}

fn default_addr() -> String {
    "127.0.0.1:8050".to_string()
}

fn default_static_dir() -> PathBuf {
    PathBuf::from("web")
}

fn default_session_ttl() -> u64 {
    60
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardsConfig {
    #[serde(default = "default_page_size")]
    pub page_size: usize,
}

impl Default for CardsConfig {
    fn default() -> Self {
        Self {
            page_size: default_page_size(),
        }
    }
}

fn default_page_size() -> usize {
    crate::cards::DEFAULT_PAGE_SIZE
}

impl DashboardConfig {
    /// Load configuration from a file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|source| DashboardError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let config: DashboardConfig = toml::from_str(&content).map_err(|e| {
            DashboardError::Config(format!("{}: {}", path.display(), e))
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Load an explicit config file, or `dashboard.toml` if present, or the defaults.
    ///
    /// An explicit path that does not exist is an error; a missing default file is not.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::load(path),
            None => {
                let default_path = Path::new(DEFAULT_CONFIG_FILE);
                if default_path.exists() {
                    Self::load(default_path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.cards.page_size == 0 {
            return Err(DashboardError::Config(
                "cards.page_size must be at least 1".to_string(),
            ));
        }
        if self.server.session_ttl_minutes == 0 {
            return Err(DashboardError::Config(
                "server.session_ttl_minutes must be at least 1".to_string(),
            ));
        }
        Ok(())
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        let minutes = i64::try_from(self.server.session_ttl_minutes).unwrap_or(i64::MAX);
        chrono::Duration::try_minutes(minutes).unwrap_or(chrono::Duration::MAX)
    }
}
