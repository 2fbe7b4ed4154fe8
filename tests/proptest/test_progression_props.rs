//! Property-based tests for XP progression
//!
//! Random award sequences must keep the level/XP state settled and never
//! lose or invent XP.

use codequest::models::{required_xp_for, ProgressState};
use codequest::progression::{ProgressionEngine, MAX_LOAD_ROLLOVER};
use codequest::store::{MemoryStore, StoreHandle, StoreKeys};
use proptest::prelude::*;

/// Total XP earned to reach `state` from level 1 with 0 XP
fn lifetime_xp(state: &ProgressState) -> u64 {
    (1..state.level).map(required_xp_for).sum::<u64>() + state.xp
}

fn fresh_engine() -> (ProgressionEngine, StoreHandle) {
    let store = StoreHandle::in_memory();
    (ProgressionEngine::new(store.clone(), StoreKeys::default()), store)
}

proptest! {
    #[test]
    fn test_awards_keep_state_settled(awards in prop::collection::vec(0u32..500, 0..40)) {
        let (mut engine, _) = fresh_engine();
        let mut previous_level = 1;

        for amount in awards {
            let award = engine.award(amount);
            prop_assert!(award.state.is_settled());
            prop_assert!(award.state.level >= previous_level);
            prop_assert_eq!(award.state.required_xp, u64::from(award.state.level) * 100);
            previous_level = award.state.level;
        }
    }

    #[test]
    fn test_awards_conserve_xp(awards in prop::collection::vec(0u32..500, 0..40)) {
        let (mut engine, _) = fresh_engine();
        let total: u64 = awards.iter().map(|a| u64::from(*a)).sum();

        for amount in &awards {
            engine.award(*amount);
        }

        prop_assert_eq!(lifetime_xp(&engine.state()), total);
    }

    #[test]
    fn test_level_ups_are_consecutive(start in 0u64..100, amount in 0u32..5_000) {
        let (mut engine, _) = fresh_engine();
        engine.award(start as u32);
        let before = engine.state().level;

        let award = engine.award(amount);

        let expected: Vec<u32> = ((before + 1)..=award.state.level).collect();
        prop_assert_eq!(award.level_ups, expected);
    }

    #[test]
    fn test_reload_matches_memory(awards in prop::collection::vec(0u32..300, 1..20)) {
        let (mut engine, store) = fresh_engine();
        for amount in awards {
            engine.award(amount);
        }

        let reloaded = ProgressionEngine::new(store, StoreKeys::default());
        prop_assert_eq!(reloaded.state(), engine.state());
    }

    #[test]
    fn test_any_stored_values_load_settled(level in ".{0,8}", xp in ".{0,8}") {
        let store = StoreHandle::new(MemoryStore::with_entries([
            ("codequest_level", level.as_str()),
            ("codequest_xp", xp.as_str()),
        ]));
        let engine = ProgressionEngine::new(store, StoreKeys::default());
        prop_assert!(engine.state().is_settled());
    }

    #[test]
    fn test_numeric_stored_values_keep_lifetime_xp(level in 1u32..50, xp in 0u64..10_000) {
        let store = StoreHandle::new(MemoryStore::with_entries([
            ("codequest_level", level.to_string()),
            ("codequest_xp", xp.to_string()),
        ]));
        let engine = ProgressionEngine::new(store, StoreKeys::default());
        let stored = ProgressState { level, xp, required_xp: required_xp_for(level) };
        prop_assert_eq!(lifetime_xp(&engine.state()), lifetime_xp(&stored));
    }

    #[test]
    fn test_any_stored_xp_loads_bounded(level in 1u32..1_000_000, xp in any::<u64>()) {
        let store = StoreHandle::new(MemoryStore::with_entries([
            ("codequest_level", level.to_string()),
            ("codequest_xp", xp.to_string()),
        ]));
        let engine = ProgressionEngine::new(store, StoreKeys::default());
        let state = engine.state();
        prop_assert!(state.is_settled());
        prop_assert!(state.level >= level);
        prop_assert!(state.level - level <= MAX_LOAD_ROLLOVER);
    }
}
