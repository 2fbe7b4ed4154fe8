//! Execution Outcome Evaluation
//!
//! Decides whether a run earned XP by watching relayed messages for a fixed
//! observation window that starts when the run is triggered. There is no
//! explicit "script finished" signal; the window is a heuristic, and
//! messages arriving after it closes are still displayed but no longer
//! affect the verdict.

use std::time::Duration;
use tokio::time::{timeout_at, Instant};

use crate::config::EvaluationConfig;
use crate::console::MessageSink;
use crate::models::{RunOutcome, SourceBundle};
use crate::sandbox::{MessageInbox, RunId};

/// Identity and trigger time of a run under evaluation
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunTicket {
    pub run_id: RunId,
    pub started_at: Instant,
}

impl RunTicket {
    /// Ticket for a run triggered now
    pub fn start(run_id: RunId) -> Self {
        Self {
            run_id,
            started_at: Instant::now(),
        }
    }
}

/// Judges runs over a bounded observation window
#[derive(Debug, Clone)]
pub struct OutcomeEvaluator {
    window: Duration,
    isolate_runs: bool,
}

impl OutcomeEvaluator {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            isolate_runs: true,
        }
    }

    pub fn from_config(config: &EvaluationConfig) -> Self {
        Self {
            window: Duration::from_millis(config.window_ms),
            isolate_runs: config.isolate_runs,
        }
    }

    /// Count errors from any run, not only the one being judged
    pub fn with_shared_errors(mut self) -> Self {
        self.isolate_runs = false;
        self
    }

    pub fn window(&self) -> Duration {
        self.window
    }

    /// Watch `inbox` until the window of `ticket` closes
    ///
    /// Every message received meanwhile goes to `sink` in arrival order.
    /// Error messages belonging to the ticket's run (or to any run when
    /// isolation is off) mark the outcome as errored.
    pub async fn judge(
        &self,
        ticket: RunTicket,
        bundle: &SourceBundle,
        inbox: &mut MessageInbox,
        sink: &mut dyn MessageSink,
    ) -> RunOutcome {
        let deadline = ticket.started_at + self.window;
        let mut errored = false;
        let mut received = 0usize;
        let mut stale = 0usize;

        loop {
            match timeout_at(deadline, inbox.recv()).await {
                Ok(Some(relayed)) => {
                    received += 1;
                    sink.record(&relayed.message);

                    let own = relayed.run_id == ticket.run_id;
                    if !own {
                        stale += 1;
                    }
                    if relayed.message.is_error() && (own || !self.isolate_runs) {
                        errored = true;
                    }
                }
                Ok(None) => {
                    debug!("Message channel closed while judging run {}", ticket.run_id);
                    break;
                }
                Err(_) => break,
            }
        }

        let outcome = RunOutcome::evaluate(errored, bundle);
        debug!(
            "Run {} judged: errored={} content={} ({} messages, {} from other runs)",
            ticket.run_id, outcome.errored, outcome.had_any_content, received, stale
        );
        outcome
    }
}

impl Default for OutcomeEvaluator {
    fn default() -> Self {
        Self::from_config(&EvaluationConfig::default())
    }
}
