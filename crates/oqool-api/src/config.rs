//! Server configuration: optional YAML file, then environment overrides.
use oqool_classify::ClassifierMode;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

pub const DEFAULT_ADDR: &str = "0.0.0.0:8787";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", path.display())]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("invalid config: {0}")]
    Parse(#[from] serde_yaml::Error),

    #[error("invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Listen address
    pub addr: String,
    /// Directory file commands are confined to
    pub workspace_root: PathBuf,
    /// Secret mixed into key hashes
    #[serde(skip_serializing)]
    pub key_pepper: Option<String>,
    /// Bootstrap secret accepted in place of a `keys:manage` key
    #[serde(skip_serializing)]
    pub admin_secret: Option<String>,
    pub classifier_mode: ClassifierMode,
    /// Sweep expired keys this often. Unset disables the sweeper.
    pub cleanup_interval_secs: Option<u64>,
    /// Permissions granted when a key request names none
    pub default_permissions: Vec<String>,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            addr: DEFAULT_ADDR.to_string(),
            workspace_root: PathBuf::from("."),
            key_pepper: None,
            admin_secret: None,
            classifier_mode: ClassifierMode::default(),
            cleanup_interval_secs: None,
            default_permissions: vec![oqool_keys::WILDCARD_PERMISSION.to_string()],
        }
    }
}

impl ApiConfig {
    pub fn from_yaml(text: &str) -> Result<Self, ConfigError> {
        Ok(serde_yaml::from_str(text)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&text)
    }

    /// File named by `OQOOL_CONFIG` (or defaults), then `OQOOL_*` overrides.
    pub fn load() -> Result<Self, ConfigError> {
        let base = match std::env::var("OQOOL_CONFIG") {
            Ok(path) => Self::from_file(Path::new(&path))?,
            Err(_) => Self::default(),
        };
        base.with_overrides(|name| std::env::var(name).ok())
    }

    /// Apply overrides from `lookup`, which maps a variable name to its value.
    pub fn with_overrides<F>(mut self, lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        if let Some(addr) = lookup("OQOOL_ADDR") {
            self.addr = addr;
        }
        if let Some(root) = lookup("OQOOL_WORKSPACE_ROOT") {
            self.workspace_root = PathBuf::from(root);
        }
        if let Some(pepper) = lookup("OQOOL_KEY_PEPPER") {
            self.key_pepper = Some(pepper);
        }
        if let Some(secret) = lookup("OQOOL_ADMIN_SECRET") {
            self.admin_secret = Some(secret);
        }
        if let Some(mode) = lookup("OQOOL_CLASSIFIER_MODE") {
            self.classifier_mode = mode.parse().map_err(|reason| ConfigError::InvalidEnv {
                var: "OQOOL_CLASSIFIER_MODE",
                reason,
            })?;
        }
        if let Some(secs) = lookup("OQOOL_CLEANUP_INTERVAL_SECS") {
            let secs: u64 = secs.trim().parse().map_err(|e: std::num::ParseIntError| {
                ConfigError::InvalidEnv {
                    var: "OQOOL_CLEANUP_INTERVAL_SECS",
                    reason: e.to_string(),
                }
            })?;
            self.cleanup_interval_secs = (secs > 0).then_some(secs);
        }
        Ok(self)
    }
}
