//! XP and Level Progression
//!
//! [`ProgressionEngine`] is the only owner of [`ProgressState`]. It applies
//! XP awards with level-up rollover and writes the result to the store
//! after every award and reset.
//!
//! Store writes are best effort: a failed write is logged and the in-memory
//! state stays authoritative for the rest of the session.

use serde::{Deserialize, Serialize};

use crate::error::Result;
use crate::models::{required_xp_for, ProgressState};
use crate::store::{StoreHandle, StoreKeys};

/// Most levels a stored xp may roll over on load
pub const MAX_LOAD_ROLLOVER: u32 = 1_000;

/// Result of one award
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Award {
    /// State after the award
    pub state: ProgressState,
    /// Levels reached, ascending, one per rollover
    pub level_ups: Vec<u32>,
}

/// Owner of the learner's level/XP state
#[derive(Debug)]
pub struct ProgressionEngine {
    store: StoreHandle,
    keys: StoreKeys,
    state: ProgressState,
}

impl ProgressionEngine {
    /// Create an engine and load persisted progress
    pub fn new(store: StoreHandle, keys: StoreKeys) -> Self {
        let mut engine = Self {
            store,
            keys,
            state: ProgressState::default(),
        };
        engine.load();
        engine
    }

    /// Current state
    pub fn state(&self) -> ProgressState {
        self.state
    }

    /// Reload state from the store
    ///
    /// Missing, unreadable or non-numeric values fall back to defaults.
    /// `required_xp` is always derived from the level; a stored xp at or
    /// above it is rolled over without emitting level-ups. An xp that would
    /// roll over more than [`MAX_LOAD_ROLLOVER`] levels is treated as
    /// corrupt and reset to 0.
    pub fn load(&mut self) -> ProgressState {
        let level = self
            .read_number::<u32>(&self.keys.level)
            .filter(|level| *level >= 1)
            .unwrap_or(1);
        let xp = self.read_number::<u64>(&self.keys.xp).unwrap_or(0);

        let state = settle(ProgressState::new(level, xp), MAX_LOAD_ROLLOVER).unwrap_or_else(|| {
            warn!(
                "Ignoring implausible stored xp {} for level {}, starting the level over",
                xp, level
            );
            ProgressState::new(level, 0)
        });
        self.state = state;
        debug!(
            "Loaded progress: level {} ({}/{} XP)",
            state.level, state.xp, state.required_xp
        );
        state
    }

    /// Add `amount` XP, rolling over into as many levels as it covers
    pub fn award(&mut self, amount: u32) -> Award {
        let mut state = self.state;
        state.xp = state.xp.saturating_add(u64::from(amount));
        let level_ups = roll_over(&mut state);

        for level in &level_ups {
            info!("🎉 Level up: now level {}", level);
        }

        self.state = state;
        self.persist();
        Award { state, level_ups }
    }

    /// Restore defaults and delete the persisted copy
    pub fn reset(&mut self) -> ProgressState {
        self.state = ProgressState::default();
        for key in [&self.keys.level, &self.keys.xp] {
            if let Err(e) = self.store.remove(key) {
                warn!("Failed to clear persisted '{}': {}", key, e);
            }
        }
        info!("Progress reset");
        self.state
    }

    fn persist(&self) {
        if let Err(e) = self.try_persist() {
            warn!("Failed to persist progress: {}", e);
        }
    }

    fn try_persist(&self) -> Result<()> {
        self.store.set(&self.keys.level, &self.state.level.to_string())?;
        self.store.set(&self.keys.xp, &self.state.xp.to_string())?;
        Ok(())
    }

    fn read_number<T: std::str::FromStr>(&self, key: &str) -> Option<T> {
        match self.store.get(key) {
            Ok(Some(raw)) => {
                let parsed = raw.trim().parse::<T>().ok();
                if parsed.is_none() {
                    warn!("Ignoring non-numeric stored '{}': {:?}", key, raw);
                }
                parsed
            }
            Ok(None) => None,
            Err(e) => {
                warn!("Failed to read '{}': {}", key, e);
                None
            }
        }
    }
}

/// Settle a loaded state, giving up after `limit` rollovers
fn settle(mut state: ProgressState, limit: u32) -> Option<ProgressState> {
    let mut steps = 0;
    while state.xp >= state.required_xp {
        if steps == limit {
            return None;
        }
        state.xp -= state.required_xp;
        state.level = state.level.saturating_add(1);
        state.required_xp = required_xp_for(state.level);
        steps += 1;
    }
    Some(state)
}

/// Apply rollover until `xp < required_xp`; returns the levels reached
fn roll_over(state: &mut ProgressState) -> Vec<u32> {
    let mut level_ups = Vec::new();
    while state.xp >= state.required_xp {
        state.xp -= state.required_xp;
        state.level = state.level.saturating_add(1);
        state.required_xp = required_xp_for(state.level);
        level_ups.push(state.level);
    }
    level_ups
}
