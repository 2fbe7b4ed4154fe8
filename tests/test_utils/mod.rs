//! Test Utilities and Mocks
//!
//! Scripted realms and fixtures shared by the integration tests.

#![allow(dead_code)]

pub mod fixtures;

// Re-exports for convenience
pub use fixtures::{broken_bundle, create_test_config, failing_store, hello_bundle};
pub use mock_realm::{LeakyRealm, ScriptedRealm, ScriptedStep};
