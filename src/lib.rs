//! CodeQuest - learn-to-code playground core
//!
//! This library runs untrusted HTML/CSS/JS snippets in a sandbox, watches
//! their console output for a short observation window, and turns clean
//! runs into XP and levels that persist across sessions.
//!
//! ## Module Organization
//!
//! ### Core Functionality
//!
//! - [`sandbox`] - Document composition, realms, run-tagged message relay
//! - [`evaluator`] - Observation-window judging of a run
//! - [`progression`] - XP awards, level-up rollover, persistence
//! - [`session`] - Orchestration of runs, editor state and projects
//! - [`models`] - Data structures (SourceBundle, RuntimeMessage, ProgressState)
//!
//! ### Supporting Modules
//!
//! - [`store`] - Key-value persistence (JSON file or memory)
//! - [`console`] - User-visible message log
//! - [`projects`] - Saved project library
//! - [`beautify`] - Naive re-indentation of the three languages
//! - [`config`] - Configuration loading and validation
//! - [`mod@error`] - Error types and Result aliases
//!
//! ## Quick Start
//!
//! ```no_run
//! use codequest::{Config, SessionController, SourceBundle};
//!
//! # async fn demo() -> codequest::Result<()> {
//! let config = Config::default();
//! let mut session = SessionController::open(&config)?;
//!
//! let report = session
//!     .run_bundle(SourceBundle::new("<h1>hi</h1>", "", "console.log('ok')"))
//!     .await?;
//! println!("level {} ({} XP)", report.progress.level, report.progress.xp);
//! # Ok(())
//! # }
//! ```
//!
//! ## Architecture
//!
//! Everything on the host side runs on one task. Sandboxes execute in a
//! separate JavaScript runtime process and talk back only through an
//! unbounded `tokio::mpsc` channel whose messages carry the id of the run
//! that produced them.

#[macro_use]
extern crate tracing;

pub mod beautify;
pub mod config;
pub mod console;
pub mod error;
pub mod evaluator;
pub mod models;
pub mod progression;
pub mod projects;
pub mod sandbox;
pub mod session;
pub mod store;

// Re-exports for core functionality
pub use config::loader::ConfigLoader;
pub use config::Config;
pub use console::{ConsoleEntry, ConsoleKind, MessageLog};
pub use error::{Error, Result};
pub use evaluator::OutcomeEvaluator;
pub use models::{Language, ProgressState, RunOutcome, RuntimeMessage, SourceBundle};
pub use progression::{Award, ProgressionEngine};
pub use sandbox::{ProcessRealm, Realm, SandboxRunner};
pub use session::{RunReport, SessionController};
pub use store::{FileStore, KeyValueStore, MemoryStore, StoreHandle};

/// The current version of CodeQuest from Cargo.toml
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// The crate name from Cargo.toml
pub const NAME: &str = env!("CARGO_PKG_NAME");

/// Load configuration from the default locations, falling back to defaults
///
/// # Errors
///
/// Returns an error only when a configuration file was found and parsed but
/// failed validation.
pub fn init() -> Result<Config> {
    info!("🚀 Initializing {} v{}", NAME, VERSION);

    let config = match ConfigLoader::new().load() {
        Ok(config) => config,
        Err(e @ Error::ConfigValidationFailed { .. }) => return Err(e),
        Err(e) => {
            warn!("Failed to load configuration: {}. Using defaults", e);
            Config::default()
        }
    };

    let realm = ProcessRealm::from_config(&config.sandbox);
    if !realm.is_available() {
        warn!(
            "⚠️  JavaScript runtime '{}' not found; runs will fail until it is installed",
            realm.runtime_path().display()
        );
    }

    Ok(config)
}

/// Load configuration from an explicit file
pub fn init_with_config(config_path: &std::path::Path) -> Result<Config> {
    info!(
        "🚀 Initializing {} v{} with config: {}",
        NAME,
        VERSION,
        config_path.display()
    );

    if !config_path.exists() {
        return Err(Error::ConfigLoadFailed {
            path: config_path.to_path_buf(),
            reason: "Configuration file does not exist".to_string(),
        });
    }

    Config::load_from_file(config_path)
}
