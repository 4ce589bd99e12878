//! Service configuration
//!
//! Precedence, lowest first: built-in defaults, an optional TOML file,
//! then command-line flags (each with an environment fallback).

use crate::inference::LoadPolicy;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file could not be read
    #[error("cannot read config {path}: {source}")]
    Read {
        /// File path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: std::io::Error,
    },
    /// Config file is not valid TOML for `ServiceConfig`
    #[error("cannot parse config {path}: {source}")]
    Parse {
        /// File path
        path: PathBuf,
        /// Underlying failure
        #[source]
        source: toml::de::Error,
    },
}

/// Risk service configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ServiceConfig {
    /// Listen address
    pub host: String,
    /// Listen port
    pub port: u16,
    /// XGBoost JSON model artifact
    pub model_path: PathBuf,
    /// When the model is read from disk
    pub load_policy: LoadPolicy,
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".into(),
            port: 8000,
            model_path: PathBuf::from("accident_model.json"),
            load_policy: LoadPolicy::PerRequest,
        }
    }
}

/// Values given on the command line or through the environment.
#[derive(Debug, Clone, Default, clap::Args)]
pub struct ConfigOverrides {
    /// Listen address
    #[arg(long, env = "RISK_HOST")]
    pub host: Option<String>,

    /// Listen port
    #[arg(long, env = "RISK_PORT")]
    pub port: Option<u16>,

    /// Path to the XGBoost JSON model
    #[arg(long, env = "RISK_MODEL_PATH")]
    pub model_path: Option<PathBuf>,

    /// Model load policy
    #[arg(long, env = "RISK_LOAD_POLICY", value_enum)]
    pub load_policy: Option<LoadPolicy>,
}

impl ServiceConfig {
    /// Load from a TOML file. Missing keys keep their defaults.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })
    }

    /// Defaults, then `file` if given, then `overrides`.
    pub fn resolve(file: Option<&Path>, overrides: ConfigOverrides) -> Result<Self, ConfigError> {
        let mut config = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        config.apply(overrides);
        Ok(config)
    }

    /// Apply the overrides that are set.
    pub fn apply(&mut self, overrides: ConfigOverrides) {
        if let Some(host) = overrides.host {
            self.host = host;
        }
        if let Some(port) = overrides.port {
            self.port = port;
        }
        if let Some(model_path) = overrides.model_path {
            self.model_path = model_path;
        }
        if let Some(load_policy) = overrides.load_policy {
            self.load_policy = load_policy;
        }
    }

    /// `host:port` for the listener
    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = ServiceConfig::resolve(None, ConfigOverrides::default()).unwrap();
        assert_eq!(config, ServiceConfig::default());
        assert_eq!(config.bind_addr(), "127.0.0.1:8000");
        assert_eq!(config.load_policy, LoadPolicy::PerRequest);
    }

    #[test]
    fn test_file_then_overrides() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "port = 9100\nmodel_path = \"models/risk.json\"\nload_policy = \"cached\"").unwrap();

        let overrides = ConfigOverrides {
            port: Some(9200),
            ..Default::default()
        };
        let config = ServiceConfig::resolve(Some(file.path()), overrides).unwrap();

        assert_eq!(config.host, "127.0.0.1");
        assert_eq!(config.port, 9200);
        assert_eq!(config.model_path, PathBuf::from("models/risk.json"));
        assert_eq!(config.load_policy, LoadPolicy::Cached);
    }

    #[test]
    fn test_missing_file_is_an_error() {
        let err = ServiceConfig::resolve(Some(Path::new("/nonexistent/risk.toml")), ConfigOverrides::default())
            .unwrap_err();
        assert!(matches!(err, ConfigError::Read { .. }));
    }

    #[test]
    fn test_bad_file_is_an_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "load_policy = \"sometimes\"").unwrap();

        let err = ServiceConfig::load(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
