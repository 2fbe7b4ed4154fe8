//! Core data models for CodeQuest
//!
//! This module contains the domain entities shared by the sandbox,
//! the evaluator and the progression engine.

pub mod progress_state;
pub mod project;
pub mod run_outcome;
pub mod runtime_message;
pub mod source_bundle;

// Re-exports for convenience
pub use progress_state::{required_xp_for, ProgressState, XP_PER_LEVEL};
pub use project::Project;
pub use run_outcome::RunOutcome;
pub use runtime_message::RuntimeMessage;
pub use source_bundle::{Language, SourceBundle};
