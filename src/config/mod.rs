//! Configuration management for CodeQuest
//!
//! This module provides the configuration for the sandbox, the outcome
//! evaluator, persistent storage and the console, along with discovery
//! of the configuration file through [`loader::ConfigLoader`].

pub mod loader;

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::console::DEFAULT_MAX_ENTRIES;
use crate::error::{Error, Result};
use crate::store::DEFAULT_KEY_PREFIX;

/// Main configuration structure for CodeQuest
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Sandbox configuration
    pub sandbox: SandboxConfig,

    /// Run evaluation and XP rewards
    pub evaluation: EvaluationConfig,

    /// Persistent storage
    pub storage: StorageConfig,

    /// Console log
    pub console: ConsoleConfig,
}

impl Config {
    /// Load and validate a configuration file, picking the format from its
    /// extension
    pub fn load_from_file(path: &Path) -> Result<Self> {
        let config = Self::read_file(path)?;
        loader::validate_config(&config)?;
        Ok(config)
    }

    /// Parse a configuration file without validating it
    pub(crate) fn read_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::ConfigLoadFailed {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Config = match path.extension().and_then(|ext| ext.to_str()) {
            Some("json") => serde_json::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: "JSON".to_string(),
                reason: e.to_string(),
            })?,
            _ => toml::from_str(&content).map_err(|e| Error::ConfigParseFailed {
                format: "TOML".to_string(),
                reason: e.to_string(),
            })?,
        };
        Ok(config)
    }

    /// Directory holding the store and the preview document
    pub fn data_dir(&self) -> PathBuf {
        self.storage.data_dir.clone().unwrap_or_else(default_data_dir)
    }
}

/// Sandbox execution settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SandboxConfig {
    /// JavaScript runtime executable
    pub runtime_path: PathBuf,

    /// Arguments making the runtime read its program from stdin
    pub runtime_args: Vec<String>,

    /// Working directory for sandbox processes (system temp dir if unset)
    pub working_directory: Option<PathBuf>,

    /// Pass the host environment to sandbox processes
    pub inherit_env: bool,

    /// Hard lifetime of one sandbox process in milliseconds
    pub max_runtime_ms: u64,

    /// Mirror the preview document to this file
    pub preview_path: Option<PathBuf>,
}

impl Default for SandboxConfig {
    fn default() -> Self {
        Self {
            runtime_path: PathBuf::from("node"),
            runtime_args: vec!["-".to_string()],
            working_directory: None,
            inherit_env: false,
            max_runtime_ms: 5_000,
            preview_path: None,
        }
    }
}

/// Run evaluation settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EvaluationConfig {
    /// Observation window after a run is triggered, in milliseconds
    pub window_ms: u64,

    /// XP granted for a successful run
    pub xp_per_run: u32,

    /// Only count errors tagged with the evaluated run
    pub isolate_runs: bool,
}

impl Default for EvaluationConfig {
    fn default() -> Self {
        Self {
            window_ms: 500,
            xp_per_run: 20,
            isolate_runs: true,
        }
    }
}

/// Persistent storage settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Data directory (platform data dir if unset)
    pub data_dir: Option<PathBuf>,

    /// Prefix of every stored key
    pub key_prefix: String,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            data_dir: None,
            key_prefix: DEFAULT_KEY_PREFIX.to_string(),
        }
    }
}

/// Console log settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConsoleConfig {
    /// Maximum entries kept before the oldest are dropped
    pub max_entries: usize,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            max_entries: DEFAULT_MAX_ENTRIES,
        }
    }
}

/// Platform data directory for CodeQuest
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .or_else(dirs::home_dir)
        .unwrap_or_else(|| PathBuf::from("."))
        .join("codequest")
}
