//! Session Controller
//!
//! Orchestrates one learner session:
//!
//! ```text
//! run() ──▶ SandboxRunner::execute ──▶ relayed messages ──▶ OutcomeEvaluator::judge
//!                                                                 │
//!                                   ProgressionEngine::award ◀────┘ (success only)
//! ```
//!
//! The controller owns the editor fragments, the console and every
//! component above. It is driven from a single task; nothing here needs
//! locking beyond the shared store handle.

use std::sync::Arc;

use serde::Serialize;

use crate::beautify;
use crate::config::Config;
use crate::console::{MessageLog, MessageSink};
use crate::error::Result;
use crate::evaluator::{OutcomeEvaluator, RunTicket};
use crate::models::{Language, ProgressState, Project, RunOutcome, SourceBundle};
use crate::progression::ProgressionEngine;
use crate::projects::ProjectLibrary;
use crate::sandbox::{MessageChannel, MessageInbox, ProcessRealm, Realm, RunId, SandboxRunner};
use crate::store::{FileStore, StoreHandle, StoreKeys};

/// What one run produced
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub run_id: u64,
    pub outcome: RunOutcome,
    /// XP granted by this run (0 unless it succeeded)
    pub awarded_xp: u32,
    /// Levels reached by this run, ascending
    pub level_ups: Vec<u32>,
    /// Progress after the run
    pub progress: ProgressState,
}

/// Orchestrator of runs, progression and editor state
pub struct SessionController {
    sources: SourceBundle,
    runner: SandboxRunner,
    evaluator: OutcomeEvaluator,
    progression: ProgressionEngine,
    projects: ProjectLibrary,
    channel: MessageChannel,
    inbox: MessageInbox,
    console: MessageLog,
    last_run: RunId,
    xp_per_run: u32,
}

impl SessionController {
    /// Build a controller from explicit parts
    pub fn new(config: &Config, realm: Arc<dyn Realm>, store: StoreHandle) -> Self {
        let keys = StoreKeys::with_prefix(&config.storage.key_prefix);
        let (channel, inbox) = MessageChannel::new();

        let mut runner = SandboxRunner::new(realm);
        if let Some(path) = &config.sandbox.preview_path {
            runner = runner.with_preview_path(path);
        }

        Self {
            sources: SourceBundle::default(),
            runner,
            evaluator: OutcomeEvaluator::from_config(&config.evaluation),
            progression: ProgressionEngine::new(store.clone(), keys.clone()),
            projects: ProjectLibrary::open(store, keys.projects),
            channel,
            inbox,
            console: MessageLog::with_capacity(config.console.max_entries),
            last_run: RunId::default(),
            xp_per_run: config.evaluation.xp_per_run,
        }
    }

    /// Build a controller with the process realm and the on-disk store
    pub fn open(config: &Config) -> Result<Self> {
        let store = FileStore::in_dir(&config.data_dir())?;
        let realm = Arc::new(ProcessRealm::from_config(&config.sandbox));
        info!("Session store at {}", store.path().display());
        Ok(Self::new(config, realm, StoreHandle::new(store)))
    }

    // === Runs ===

    /// Run the current fragments
    pub async fn run(&mut self) -> Result<RunReport> {
        let bundle = self.sources.clone();
        self.execute(bundle).await
    }

    /// Replace the fragments with `bundle`, then run them
    pub async fn run_bundle(&mut self, bundle: SourceBundle) -> Result<RunReport> {
        self.sources = bundle;
        self.run().await
    }

    async fn execute(&mut self, bundle: SourceBundle) -> Result<RunReport> {
        self.pump_messages();
        self.console.info("Running code...");

        let run_id = self.last_run.next();
        self.last_run = run_id;
        let ticket = RunTicket::start(run_id);

        if let Err(e) = self
            .runner
            .execute(&bundle, self.channel.sender_for(run_id))
            .await
        {
            error!("Run {} could not start: {}", run_id, e);
            self.console.error(format!("Sandbox could not start: {}", e));
            return Err(e);
        }

        let outcome = self
            .evaluator
            .judge(ticket, &bundle, &mut self.inbox, &mut self.console)
            .await;

        let mut report = RunReport {
            run_id: run_id.0,
            outcome,
            awarded_xp: 0,
            level_ups: Vec::new(),
            progress: self.progression.state(),
        };

        if outcome.is_success() {
            let award = self.progression.award(self.xp_per_run);
            self.console.log(format!(
                "✅ Code executed successfully! +{} XP",
                self.xp_per_run
            ));
            for level in &award.level_ups {
                self.console
                    .log(format!("🎉 LEVEL UP! You are now Level {}!", level));
            }
            report.awarded_xp = self.xp_per_run;
            report.level_ups = award.level_ups;
            report.progress = award.state;
        } else if outcome.errored {
            self.console
                .error("❌ Errors detected. Fix them to earn XP.");
        }

        info!(
            "Run {} finished: success={} level={} xp={}/{}",
            run_id,
            outcome.is_success(),
            report.progress.level,
            report.progress.xp,
            report.progress.required_xp
        );
        Ok(report)
    }

    /// Move messages that arrived after their window into the console
    pub fn pump_messages(&mut self) -> usize {
        let late = self.inbox.drain();
        for relayed in &late {
            self.console.record(&relayed.message);
        }
        late.len()
    }

    /// Reset progression, fragments, the live sandbox and the console
    pub fn end_session(&mut self) -> ProgressState {
        let state = self.progression.reset();
        self.sources.clear();
        self.runner.discard();
        self.inbox.drain();
        self.console.clear();
        self.console.info("Session ended. Progress reset.");
        info!("👋 Session ended");
        state
    }

    // === Editor ===

    pub fn sources(&self) -> &SourceBundle {
        &self.sources
    }

    pub fn fragment(&self, lang: Language) -> &str {
        self.sources.fragment(lang)
    }

    pub fn set_fragment(&mut self, lang: Language, code: impl Into<String>) {
        *self.sources.fragment_mut(lang) = code.into();
    }

    pub fn set_sources(&mut self, bundle: SourceBundle) {
        self.sources = bundle;
    }

    /// Empty one fragment
    pub fn clear_fragment(&mut self, lang: Language) {
        self.sources.fragment_mut(lang).clear();
        self.console.log(format!("{} editor cleared.", lang.label()));
    }

    /// Re-indent one fragment; returns false when there was nothing to do
    pub fn beautify(&mut self, lang: Language) -> bool {
        let code = self.sources.fragment(lang);
        if code.trim().is_empty() {
            self.console.warn("No code to beautify.");
            return false;
        }
        let formatted = beautify::beautify(lang, code);
        *self.sources.fragment_mut(lang) = formatted;
        self.console.log(format!("{} code beautified.", lang.label()));
        true
    }

    // === Projects ===

    pub fn projects(&self) -> &[Project] {
        self.projects.projects()
    }

    pub fn default_project_name(&self) -> String {
        self.projects.default_name()
    }

    /// Save the current fragments as a project named `name`
    ///
    /// Empty fragments or a blank name are reported as warnings and
    /// return `None`.
    pub fn save_project(&mut self, name: &str) -> Result<Option<Project>> {
        match self.projects.save(name, &self.sources) {
            Ok(project) => {
                self.console
                    .log(format!("Project \"{}\" saved successfully!", project.name));
                Ok(Some(project))
            }
            Err(e) if e.is_user_input() => {
                self.console.warn(format!("{}.", e));
                Ok(None)
            }
            Err(e) => {
                self.console.error(format!("Project could not be saved: {}", e));
                Err(e)
            }
        }
    }

    /// Replace the fragments with a saved project
    pub fn load_project(&mut self, id: i64) -> Result<Option<Project>> {
        match self.projects.get(id) {
            Ok(project) => {
                let project = project.clone();
                self.sources = project.to_bundle();
                self.console
                    .log(format!("Project \"{}\" loaded.", project.name));
                Ok(Some(project))
            }
            Err(e) if e.is_user_input() => {
                self.console.warn(format!("{}.", e));
                Ok(None)
            }
            Err(e) => Err(e),
        }
    }

    /// Delete a saved project
    pub fn delete_project(&mut self, id: i64) -> Result<Option<Project>> {
        match self.projects.delete(id) {
            Ok(project) => {
                self.console.log("Project deleted.");
                Ok(Some(project))
            }
            Err(e) if e.is_user_input() => {
                self.console.warn(format!("{}.", e));
                Ok(None)
            }
            Err(e) => {
                self.console.error(format!("Project could not be deleted: {}", e));
                Err(e)
            }
        }
    }

    // === Console and preview ===

    pub fn console(&self) -> &MessageLog {
        &self.console
    }

    pub fn clear_console(&mut self) {
        self.console.clear();
        self.console.info("Console cleared.");
    }

    /// Discard the live sandbox and blank the preview
    pub fn clear_preview(&mut self) -> Result<()> {
        self.runner.clear_preview()?;
        self.console.log("Preview cleared.");
        Ok(())
    }

    pub fn preview_html(&self) -> &str {
        self.runner.preview().as_str()
    }

    // === Progress ===

    pub fn progress(&self) -> ProgressState {
        self.progression.state()
    }

    /// Id of the most recent run (0 before the first run)
    pub fn last_run(&self) -> u64 {
        self.last_run.0
    }
}

impl std::fmt::Debug for SessionController {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionController")
            .field("runner", &self.runner)
            .field("progress", &self.progression.state())
            .field("last_run", &self.last_run)
            .field("console_entries", &self.console.len())
            .finish()
    }
}
