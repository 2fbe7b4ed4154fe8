//! Progress State Model
//!
//! Level and XP of the learner. `required_xp` is always derived from the
//! level and is never stored on its own.

use serde::{Deserialize, Serialize};

/// XP needed per level step; level `n` requires `n * XP_PER_LEVEL`
pub const XP_PER_LEVEL: u64 = 100;

/// Level/XP snapshot
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressState {
    /// Current level, starting at 1
    pub level: u32,
    /// XP accumulated toward the next level
    pub xp: u64,
    /// XP needed to leave the current level
    pub required_xp: u64,
}

impl ProgressState {
    /// Build a state for `level`/`xp`, deriving `required_xp`
    pub fn new(level: u32, xp: u64) -> Self {
        let level = level.max(1);
        Self {
            level,
            xp,
            required_xp: required_xp_for(level),
        }
    }

    /// Whether `0 <= xp < required_xp` holds
    pub fn is_settled(&self) -> bool {
        self.level >= 1 && self.xp < self.required_xp && self.required_xp == required_xp_for(self.level)
    }

    /// Fill of the XP bar, in percent
    pub fn progress_percent(&self) -> f64 {
        if self.required_xp == 0 {
            return 0.0;
        }
        (self.xp as f64 / self.required_xp as f64) * 100.0
    }
}

impl Default for ProgressState {
    fn default() -> Self {
        Self::new(1, 0)
    }
}

/// XP required to complete `level`
pub fn required_xp_for(level: u32) -> u64 {
    u64::from(level.max(1)) * XP_PER_LEVEL
}
