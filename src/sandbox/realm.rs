//! Sandbox Realms
//!
//! A realm executes a [`SandboxProgram`] in isolation and relays its
//! console traffic through a [`RelaySender`]. The host never touches realm
//! internals; it only sees relayed messages.
//!
//! [`ProcessRealm`] runs the program in a separate JavaScript runtime
//! process (Node.js by default) with a cleared environment, piped stdio and
//! a hard lifetime limit.

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::process::Stdio;
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, Command};
use tokio::task::JoinHandle;
use tokio::time::timeout;

use super::document::{relay_payload, SandboxProgram};
use super::relay::{RelaySender, RunId};
use crate::config::SandboxConfig;
use crate::error::{Error, Result};
use crate::models::RuntimeMessage;

/// Isolated execution context for sandbox programs
#[async_trait]
pub trait Realm: Send + Sync {
    /// Start `program`; messages flow through `relay` until the returned
    /// handle is dropped or the program finishes
    async fn launch(&self, program: &SandboxProgram, relay: RelaySender) -> Result<SandboxHandle>;

    /// Short name for logs
    fn name(&self) -> &str {
        "realm"
    }
}

/// Live sandbox of one run
///
/// Dropping the handle discards the sandbox: its background tasks are
/// aborted, and a task owning a child process takes the process down with
/// it.
#[derive(Debug)]
pub struct SandboxHandle {
    run_id: RunId,
    tasks: Vec<JoinHandle<()>>,
}

impl SandboxHandle {
    pub fn new(run_id: RunId) -> Self {
        Self {
            run_id,
            tasks: Vec::new(),
        }
    }

    /// Tie a background task to the sandbox lifetime
    pub fn attach(&mut self, task: JoinHandle<()>) {
        self.tasks.push(task);
    }

    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Whether every attached task has completed
    pub fn is_finished(&self) -> bool {
        self.tasks.iter().all(|t| t.is_finished())
    }

    /// Explicitly discard the sandbox
    pub fn discard(self) {
        debug!("Discarding sandbox for run {}", self.run_id);
        drop(self);
    }
}

impl Drop for SandboxHandle {
    fn drop(&mut self) {
        for task in &self.tasks {
            task.abort();
        }
    }
}

/// Realm backed by a JavaScript runtime child process
#[derive(Debug, Clone)]
pub struct ProcessRealm {
    /// Runtime executable
    runtime_path: PathBuf,
    /// Arguments making the runtime read the program from stdin
    runtime_args: Vec<String>,
    /// Working directory of the child
    working_directory: PathBuf,
    /// Pass the host environment through
    inherit_env: bool,
    /// Hard lifetime limit
    max_runtime: Duration,
}

impl ProcessRealm {
    pub fn from_config(config: &SandboxConfig) -> Self {
        Self {
            runtime_path: config.runtime_path.clone(),
            runtime_args: config.runtime_args.clone(),
            working_directory: config
                .working_directory
                .clone()
                .unwrap_or_else(std::env::temp_dir),
            inherit_env: config.inherit_env,
            max_runtime: Duration::from_millis(config.max_runtime_ms),
        }
    }

    pub fn runtime_path(&self) -> &Path {
        &self.runtime_path
    }

    /// Resolve the runtime executable, searching `PATH` for bare names
    pub fn locate_runtime(&self) -> Option<PathBuf> {
        locate_executable(&self.runtime_path)
    }

    /// Whether the runtime can be found
    pub fn is_available(&self) -> bool {
        self.locate_runtime().is_some()
    }

    fn build_command(&self) -> Command {
        let mut command = Command::new(&self.runtime_path);
        command
            .args(&self.runtime_args)
            .current_dir(&self.working_directory)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true);

        if !self.inherit_env {
            command.env_clear();
            if let Ok(path) = std::env::var("PATH") {
                command.env("PATH", path);
            }
        }
        command
    }
}

#[async_trait]
impl Realm for ProcessRealm {
    async fn launch(&self, program: &SandboxProgram, relay: RelaySender) -> Result<SandboxHandle> {
        let run_id = relay.run_id();
        let mut child = self.build_command().spawn().map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                Error::RuntimeUnavailable {
                    runtime: self.runtime_path.clone(),
                    reason: e.to_string(),
                }
            } else {
                Error::SandboxLaunchFailed {
                    run_id: run_id.0,
                    reason: e.to_string(),
                }
            }
        })?;
        debug!(
            "Spawned {} for run {} (pid {:?})",
            self.runtime_path.display(),
            run_id,
            child.id()
        );

        let mut stdin = child.stdin.take().ok_or_else(|| Error::SandboxPipeMissing {
            pipe: "stdin".to_string(),
        })?;
        let stdout = child.stdout.take().ok_or_else(|| Error::SandboxPipeMissing {
            pipe: "stdout".to_string(),
        })?;
        let stderr = child.stderr.take().ok_or_else(|| Error::SandboxPipeMissing {
            pipe: "stderr".to_string(),
        })?;

        let write_err = |e: std::io::Error| Error::SandboxProgramWriteFailed {
            run_id: run_id.0,
            reason: e.to_string(),
        };
        stdin.write_all(program.as_bytes()).await.map_err(write_err)?;
        stdin.shutdown().await.map_err(write_err)?;
        drop(stdin);

        let mut handle = SandboxHandle::new(run_id);

        handle.attach(tokio::spawn(async move {
            let mut lines = BufReader::new(stdout).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                match relay_payload(&line) {
                    Some(payload) => match RuntimeMessage::from_wire(payload) {
                        Ok(message) => {
                            if !relay.send(message) {
                                debug!("Host inbox closed, stopping relay for run {}", run_id);
                                break;
                            }
                        }
                        Err(e) => warn!("Dropping malformed relay line from run {}: {}", run_id, e),
                    },
                    None => debug!("sandbox {} stdout: {}", run_id, line),
                }
            }
        }));

        handle.attach(tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                debug!("sandbox {} stderr: {}", run_id, line);
            }
        }));

        handle.attach(tokio::spawn(supervise(child, run_id, self.max_runtime)));

        Ok(handle)
    }

    fn name(&self) -> &str {
        "process"
    }
}

/// Wait for the child, killing it once `max_runtime` has passed
async fn supervise(mut child: Child, run_id: RunId, max_runtime: Duration) {
    match timeout(max_runtime, child.wait()).await {
        Ok(Ok(status)) => debug!("Sandbox for run {} exited with {}", run_id, status),
        Ok(Err(e)) => warn!("Waiting on sandbox for run {} failed: {}", run_id, e),
        Err(_) => {
            warn!(
                "Sandbox for run {} exceeded {:?}, killing it",
                run_id, max_runtime
            );
            if let Err(e) = child.kill().await {
                warn!("Failed to kill sandbox for run {}: {}", run_id, e);
            }
        }
    }
}

/// Find an executable by path or on `PATH`
pub fn locate_executable(program: &Path) -> Option<PathBuf> {
    if program.components().count() > 1 || program.is_absolute() {
        return program.is_file().then(|| program.to_path_buf());
    }

    let path_var = std::env::var_os("PATH")?;
    std::env::split_paths(&path_var)
        .map(|dir| dir.join(program))
        .find(|candidate| candidate.is_file())
}
