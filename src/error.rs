//! Error types and Result aliases for CodeQuest

use std::fmt;
use std::path::PathBuf;

/// Result type alias for CodeQuest operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for CodeQuest
#[derive(Debug)]
pub enum Error {
    // === Sandbox errors ===
    /// The configured JavaScript runtime could not be found or started
    RuntimeUnavailable {
        runtime: PathBuf,
        reason: String,
    },

    /// Spawning the sandbox process failed after the runtime was found
    SandboxLaunchFailed {
        run_id: u64,
        reason: String,
    },

    /// Writing the program into the sandbox failed
    SandboxProgramWriteFailed {
        run_id: u64,
        reason: String,
    },

    /// A stdio pipe of the sandbox process was not available
    SandboxPipeMissing {
        pipe: String,
    },

    /// Writing the preview document failed
    PreviewWriteFailed {
        path: PathBuf,
        reason: String,
    },

    // === Storage errors ===
    /// Reading the key-value store failed
    StoreReadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Writing the key-value store failed
    StoreWriteFailed {
        path: PathBuf,
        reason: String,
    },

    /// The shared store lock was poisoned by a panicking holder
    StorePoisoned,

    // === Project errors ===
    /// Refused to save a project with no content
    EmptyProject,

    /// Project name was empty or whitespace
    InvalidProjectName,

    /// Project id not present in the library
    ProjectNotFound {
        id: i64,
    },

    // === Editor errors ===
    /// Unknown editor language name
    UnknownLanguage {
        name: String,
    },

    // === Configuration errors ===
    /// Failed to load configuration file
    ConfigLoadFailed {
        path: PathBuf,
        reason: String,
    },

    /// Configuration validation failed
    ConfigValidationFailed {
        field: String,
        reason: String,
    },

    /// Failed to parse configuration
    ConfigParseFailed {
        format: String,
        reason: String,
    },

    // === I/O and serialization errors ===
    /// I/O errors
    Io(std::io::Error),

    /// Serialization errors
    Serde(serde_json::Error),

    /// TOML parsing errors
    Toml(toml::de::Error),

    /// Regex compilation errors
    Regex(regex::Error),

    // === Generic fallback (use sparingly) ===
    /// Generic errors
    Other(String),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            // Sandbox errors
            Error::RuntimeUnavailable { runtime, reason } => {
                write!(
                    f,
                    "JavaScript runtime '{}' is not available: {}",
                    runtime.display(),
                    reason
                )
            }
            Error::SandboxLaunchFailed { run_id, reason } => {
                write!(f, "Failed to launch sandbox for run #{}: {}", run_id, reason)
            }
            Error::SandboxProgramWriteFailed { run_id, reason } => {
                write!(f, "Failed to hand program to sandbox for run #{}: {}", run_id, reason)
            }
            Error::SandboxPipeMissing { pipe } => {
                write!(f, "Sandbox {} pipe is not available", pipe)
            }
            Error::PreviewWriteFailed { path, reason } => {
                write!(f, "Failed to write preview to '{}': {}", path.display(), reason)
            }

            // Storage errors
            Error::StoreReadFailed { path, reason } => {
                write!(f, "Failed to read store '{}': {}", path.display(), reason)
            }
            Error::StoreWriteFailed { path, reason } => {
                write!(f, "Failed to write store '{}': {}", path.display(), reason)
            }
            Error::StorePoisoned => {
                write!(f, "Store lock poisoned")
            }

            // Project errors
            Error::EmptyProject => {
                write!(f, "Cannot save empty project")
            }
            Error::InvalidProjectName => {
                write!(f, "Project name cannot be empty")
            }
            Error::ProjectNotFound { id } => {
                write!(f, "Project {} not found", id)
            }

            // Editor errors
            Error::UnknownLanguage { name } => {
                write!(f, "Unknown editor language: '{}'", name)
            }

            // Configuration errors
            Error::ConfigLoadFailed { path, reason } => {
                write!(f, "Failed to load config from '{}': {}", path.display(), reason)
            }
            Error::ConfigValidationFailed { field, reason } => {
                write!(f, "Configuration validation failed for '{}': {}", field, reason)
            }
            Error::ConfigParseFailed { format, reason } => {
                write!(f, "Failed to parse {} config: {}", format, reason)
            }

            // I/O and serialization errors
            Error::Io(err) => write!(f, "I/O error: {}", err),
            Error::Serde(err) => write!(f, "Serialization error: {}", err),
            Error::Toml(err) => write!(f, "TOML parsing error: {}", err),
            Error::Regex(err) => write!(f, "Regex compilation error: {}", err),

            // Generic fallback
            Error::Other(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Io(err) => Some(err),
            Error::Serde(err) => Some(err),
            Error::Toml(err) => Some(err),
            Error::Regex(err) => Some(err),
            _ => None,
        }
    }
}

impl Error {
    /// Whether this error is a user-input problem that should become a
    /// warning notification instead of a hard failure
    pub fn is_user_input(&self) -> bool {
        matches!(
            self,
            Error::EmptyProject | Error::InvalidProjectName | Error::ProjectNotFound { .. }
        )
    }
}

impl From<std::io::Error> for Error {
    fn from(err: std::io::Error) -> Self {
        Error::Io(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Error::Serde(err)
    }
}

impl From<toml::de::Error> for Error {
    fn from(err: toml::de::Error) -> Self {
        Error::Toml(err)
    }
}

impl From<anyhow::Error> for Error {
    fn from(err: anyhow::Error) -> Self {
        Error::Other(err.to_string())
    }
}

impl From<regex::Error> for Error {
    fn from(err: regex::Error) -> Self {
        Error::Regex(err)
    }
}

impl From<String> for Error {
    fn from(err: String) -> Self {
        Error::Other(err)
    }
}

impl From<&str> for Error {
    fn from(err: &str) -> Self {
        Error::Other(err.to_string())
    }
}
