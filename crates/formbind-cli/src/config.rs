//! Configuration management for the Formbind CLI
//!
//! A configuration file is JSON or YAML. The `binder` section is a
//! [`BinderConfig`] and is applied to every bind; the other sections only
//! affect the CLI itself.
//!
//! Copyright (c) 2025 Formbind Team
//! Licensed under the Apache-2.0 license

use crate::error::{Error, Result};
use crate::logging::LoggingConfig;
use formbind_core::BinderConfig;
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Main configuration structure
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Object name used in message codes when `--name` is not given
    pub object_name: String,
    pub output: OutputConfig,
    pub logging: LoggingConfig,
    pub binder: BinderConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// human, json, json-pretty or yaml
    pub format: String,
    pub color: bool,
    /// Redact rejected values of sensitive fields
    pub redact: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            object_name: "target".to_string(),
            output: OutputConfig::default(),
            logging: LoggingConfig::default(),
            binder: BinderConfig::default(),
        }
    }
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            format: "human".to_string(),
            color: true,
            redact: true,
        }
    }
}

impl Config {
    /// Load configuration from a file
    pub fn from_file(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Err(Error::FileNotFound {
                path: path.to_path_buf(),
            });
        }
        let content = std::fs::read_to_string(path)?;

        let config: Config = match path.extension().and_then(|s| s.to_str()) {
            Some("yaml") | Some("yml") => serde_yaml::from_str(&content)?,
            Some("json") => serde_json::from_str(&content)?,
            _ => {
                return Err(Error::InvalidFormat {
                    path: path.to_path_buf(),
                    expected: "JSON or YAML".to_string(),
                })
            }
        };
        config.check()?;
        Ok(config)
    }

    /// Load from an explicit file, or the first default location that exists
    pub fn load_with_file(file: Option<&Path>) -> Result<Self> {
        if let Some(path) = file {
            return Self::from_file(path);
        }
        for path in Self::default_config_paths() {
            if path.exists() {
                tracing::debug!(path = %path.display(), "Using configuration file");
                return Self::from_file(&path);
            }
        }
        Ok(Self::default())
    }

    /// Default configuration files, looked up in the working directory
    fn default_config_paths() -> Vec<PathBuf> {
        [".formbind.yaml", ".formbind.yml", ".formbind.json", "formbind.yaml", "formbind.json"]
            .into_iter()
            .map(PathBuf::from)
            .collect()
    }

    fn check(&self) -> Result<()> {
        if self.object_name.trim().is_empty() {
            return Err(Error::config("object_name must not be empty"));
        }
        Ok(())
    }
}
