//! Test Fixtures
//!
//! Ready-made configurations, bundles and stores.

use codequest::config::Config;
use codequest::error::{Error, Result};
use codequest::models::SourceBundle;
use codequest::store::{KeyValueStore, StoreHandle};
use std::path::PathBuf;

/// Observation window used by tests, short enough to keep runs quick
pub const TEST_WINDOW_MS: u64 = 60;

/// Default configuration with a short observation window
pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.evaluation.window_ms = TEST_WINDOW_MS;
    config.sandbox.max_runtime_ms = 2_000;
    config
}

/// A bundle that runs cleanly
pub fn hello_bundle() -> SourceBundle {
    SourceBundle::new("<h1>Hello</h1>", "h1 { color: teal; }", "console.log('ok');")
}

/// A bundle whose script references an undefined function
pub fn broken_bundle() -> SourceBundle {
    SourceBundle::new("<h1>Hello</h1>", "", "undefinedFn();")
}

/// Store that can be read but rejects every write
struct FailingStore;

impl KeyValueStore for FailingStore {
    fn get(&self, _key: &str) -> Result<Option<String>> {
        Ok(None)
    }

    fn set(&mut self, key: &str, _value: &str) -> Result<()> {
        Err(Error::StoreWriteFailed {
            path: PathBuf::from(key),
            reason: "quota exceeded".to_string(),
        })
    }

    fn remove(&mut self, key: &str) -> Result<()> {
        Err(Error::StoreWriteFailed {
            path: PathBuf::from(key),
            reason: "quota exceeded".to_string(),
        })
    }
}

pub fn failing_store() -> StoreHandle {
    StoreHandle::new(FailingStore)
}
