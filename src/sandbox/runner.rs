//! Sandbox Runner
//!
//! Owns the single live sandbox. Each `execute` replaces whatever was
//! running before: the previous sandbox is discarded first, so two runs
//! never share a live sandbox.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use super::document::{SandboxDocument, SandboxProgram};
use super::realm::{Realm, SandboxHandle};
use super::relay::{RelaySender, RunId};
use crate::error::{Error, Result};
use crate::models::SourceBundle;

/// Drives a [`Realm`] and keeps the current preview document
pub struct SandboxRunner {
    /// Where sandboxes execute
    realm: Arc<dyn Realm>,
    /// Optional file mirror of the preview document
    preview_path: Option<PathBuf>,
    /// Most recent preview document
    preview: SandboxDocument,
    /// Live sandbox, if any
    live: Option<SandboxHandle>,
}

impl SandboxRunner {
    pub fn new(realm: Arc<dyn Realm>) -> Self {
        Self {
            realm,
            preview_path: None,
            preview: SandboxDocument::blank(),
            live: None,
        }
    }

    /// Mirror every preview document to `path`
    pub fn with_preview_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.preview_path = Some(path.into());
        self
    }

    /// Execute `bundle`, relaying its messages through `relay`
    ///
    /// Returns once the sandbox is launched; messages arrive asynchronously.
    pub async fn execute(&mut self, bundle: &SourceBundle, relay: RelaySender) -> Result<()> {
        let run_id = relay.run_id();
        self.discard();

        let document = SandboxDocument::compose(bundle);
        if let Err(e) = self.write_preview(document.as_str()) {
            warn!("Preview for run {} not mirrored: {}", run_id, e);
        }
        self.preview = document;

        let program = SandboxProgram::compose(bundle);
        let handle = self.realm.launch(&program, relay).await?;
        info!("▶️  Run {} launched in {} realm", run_id, self.realm.name());
        self.live = Some(handle);
        Ok(())
    }

    /// Drop the live sandbox, if any
    pub fn discard(&mut self) {
        if let Some(handle) = self.live.take() {
            handle.discard();
        }
    }

    /// Discard the live sandbox and blank the preview
    pub fn clear_preview(&mut self) -> Result<()> {
        self.discard();
        self.preview = SandboxDocument::blank();
        self.write_preview("")
    }

    /// Run whose sandbox is currently live
    pub fn live_run(&self) -> Option<RunId> {
        self.live.as_ref().map(|h| h.run_id())
    }

    /// Current preview document
    pub fn preview(&self) -> &SandboxDocument {
        &self.preview
    }

    pub fn preview_path(&self) -> Option<&Path> {
        self.preview_path.as_deref()
    }

    fn write_preview(&self, html: &str) -> Result<()> {
        let Some(path) = &self.preview_path else {
            return Ok(());
        };
        let write_err = |e: std::io::Error| Error::PreviewWriteFailed {
            path: path.clone(),
            reason: e.to_string(),
        };
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent).map_err(write_err)?;
            }
        }
        fs::write(path, html).map_err(write_err)
    }
}

impl std::fmt::Debug for SandboxRunner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SandboxRunner")
            .field("realm", &self.realm.name())
            .field("preview_path", &self.preview_path)
            .field("live", &self.live_run())
            .finish()
    }
}
