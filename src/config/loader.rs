//! Configuration File Discovery
//!
//! Looks for `config.toml` / `config.json` in the standard locations and
//! falls back to built-in defaults when none is usable.

use super::Config;
use crate::error::{Error, Result};
use std::env;
use std::path::{Path, PathBuf};

/// Longest accepted observation window
const MAX_WINDOW_MS: u64 = 60_000;

/// Accepted extensions, in preference order
const CONFIG_EXTENSIONS: [&str; 2] = ["toml", "json"];

/// Configuration file loader
#[derive(Debug)]
pub struct ConfigLoader {
    /// Candidate files, without extension
    search_paths: Vec<PathBuf>,
    /// File the last load used, if any
    current_path: Option<PathBuf>,
}

impl ConfigLoader {
    pub fn new() -> Self {
        Self {
            search_paths: Self::default_search_paths(),
            current_path: None,
        }
    }

    /// Search only `path` (without extension)
    pub fn with_search_path(path: PathBuf) -> Self {
        Self {
            search_paths: vec![path],
            current_path: None,
        }
    }

    /// Load the first readable configuration, or the defaults
    ///
    /// Unreadable or unparsable files are skipped with a warning; a file
    /// that parses but fails validation is an error.
    pub fn load(&mut self) -> Result<Config> {
        let Some((path, config)) = self.find() else {
            debug!("No configuration file found, using defaults");
            return Ok(Config::default());
        };

        validate_config(&config)?;
        debug!("Configuration loaded from {}", path.display());
        self.current_path = Some(path);
        Ok(config)
    }

    fn find(&self) -> Option<(PathBuf, Config)> {
        for base in &self.search_paths {
            for ext in CONFIG_EXTENSIONS {
                let path = base.with_extension(ext);
                if !path.exists() {
                    continue;
                }
                match Config::read_file(&path) {
                    Ok(config) => return Some((path, config)),
                    Err(e) => warn!("Skipping config {}: {}", path.display(), e),
                }
            }
        }
        None
    }

    fn default_search_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("codequest").join("config"));
        }

        if let Ok(xdg_config) = env::var("XDG_CONFIG_HOME") {
            paths.push(PathBuf::from(xdg_config).join("codequest").join("config"));
        }

        if let Some(home) = dirs::home_dir() {
            paths.push(home.join(".codequest").join("config"));
            paths.push(home.join(".config").join("codequest").join("config"));
        }

        if let Ok(cwd) = env::current_dir() {
            paths.push(cwd.join(".codequest"));
        }

        paths
    }

    /// File the last successful load used
    pub fn current_path(&self) -> Option<&Path> {
        self.current_path.as_deref()
    }
}

impl Default for ConfigLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// Validate configuration
pub fn validate_config(config: &Config) -> Result<()> {
    let invalid = |field: &str, reason: &str| Error::ConfigValidationFailed {
        field: field.to_string(),
        reason: reason.to_string(),
    };

    // Evaluation validation
    if config.evaluation.window_ms == 0 {
        return Err(invalid(
            "evaluation.window_ms",
            "Observation window must be greater than 0",
        ));
    }

    if config.evaluation.window_ms > MAX_WINDOW_MS {
        return Err(invalid(
            "evaluation.window_ms",
            "Observation window cannot exceed 60 seconds",
        ));
    }

    if config.evaluation.xp_per_run == 0 {
        return Err(invalid(
            "evaluation.xp_per_run",
            "XP per run must be greater than 0",
        ));
    }

    // Sandbox validation
    if config.sandbox.runtime_path.as_os_str().is_empty() {
        return Err(invalid("sandbox.runtime_path", "Runtime path cannot be empty"));
    }

    if config.sandbox.max_runtime_ms < config.evaluation.window_ms {
        return Err(invalid(
            "sandbox.max_runtime_ms",
            "Sandbox lifetime cannot be shorter than the observation window",
        ));
    }

    // Storage validation
    if config.storage.key_prefix.trim().is_empty() {
        return Err(invalid("storage.key_prefix", "Key prefix cannot be empty"));
    }

    // Console validation
    if config.console.max_entries == 0 {
        return Err(invalid(
            "console.max_entries",
            "Console must keep at least one entry",
        ));
    }

    Ok(())
}
