//! Run Outcome Model

use serde::{Deserialize, Serialize};

use super::SourceBundle;

/// Verdict of one run, computed once when its observation window closes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RunOutcome {
    /// At least one Error message arrived inside the window
    pub errored: bool,
    /// At least one fragment had non-whitespace content
    pub had_any_content: bool,
}

impl RunOutcome {
    pub fn evaluate(errored: bool, bundle: &SourceBundle) -> Self {
        Self {
            errored,
            had_any_content: bundle.has_content(),
        }
    }

    /// Whether this run earns XP
    pub fn is_success(&self) -> bool {
        !self.errored && self.had_any_content
    }
}
