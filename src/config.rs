use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{NoteSyncError, Result};
use crate::search::DEFAULT_PAGE_LIMIT;

/// Config file looked up in the working directory when `--config` is absent.
pub const DEFAULT_CONFIG_FILE: &str = "notesync.yaml";

/// Runtime configuration, read from YAML.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Identity used for every note operation.
    pub user_id: String,
    /// Remote notesync server. When unset, notes live in `data_file`.
    pub server_url: Option<String>,
    pub data_file: PathBuf,
    pub page_limit: usize,
    pub request_timeout_secs: u64,
    /// Listen address for `serve`.
    pub bind: String,
    /// Tracing filter used when `RUST_LOG` is not set.
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            user_id: "1".to_string(),
            server_url: None,
            data_file: PathBuf::from(".notesync/notes.json"),
            page_limit: DEFAULT_PAGE_LIMIT,
            request_timeout_secs: 10,
            bind: "127.0.0.1:3000".to_string(),
            log_filter: "notesync=warn".to_string(),
        }
    }
}

impl Config {
    /// Load from `path`, or from `notesync.yaml` in the working directory if
    /// it exists, or fall back to defaults.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let fallback = Path::new(DEFAULT_CONFIG_FILE);
                if fallback.exists() {
                    Self::from_file(fallback)?
                } else {
                    Self::default()
                }
            }
        };
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path).map_err(|e| {
            NoteSyncError::Config(format!("cannot read {}: {}", path.display(), e))
        })?;
        Self::from_yaml(&raw)
    }

    pub fn from_yaml(raw: &str) -> Result<Self> {
        // An empty file deserializes to unit, not a mapping.
        if raw.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(serde_yaml::from_str(raw)?)
    }

    pub fn validate(&self) -> Result<()> {
        if self.page_limit == 0 {
            return Err(NoteSyncError::Config("page_limit must be at least 1".to_string()));
        }
        if self.request_timeout_secs == 0 {
            return Err(NoteSyncError::Config(
                "request_timeout_secs must be at least 1".to_string(),
            ));
        }
        if self.user_id.trim().is_empty() {
            return Err(NoteSyncError::Config("user_id must not be empty".to_string()));
        }
        Ok(())
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}
