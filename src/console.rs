//! Console Message Log
//!
//! The user-visible notification sink. Relayed sandbox messages and
//! controller notifications are appended here in arrival order; the only
//! removal is an explicit [`MessageLog::clear`] or dropping the oldest
//! entry once `max_entries` is reached.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

use crate::models::RuntimeMessage;

/// Default maximum number of console entries
pub const DEFAULT_MAX_ENTRIES: usize = 10_000;

/// Display category of a console entry
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ConsoleKind {
    Info,
    Log,
    Warn,
    Error,
}

impl fmt::Display for ConsoleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ConsoleKind::Info => "info",
            ConsoleKind::Log => "log",
            ConsoleKind::Warn => "warn",
            ConsoleKind::Error => "error",
        };
        write!(f, "{}", name)
    }
}

impl From<&RuntimeMessage> for ConsoleKind {
    fn from(message: &RuntimeMessage) -> Self {
        match message {
            RuntimeMessage::Log(_) => ConsoleKind::Log,
            RuntimeMessage::Warn(_) => ConsoleKind::Warn,
            RuntimeMessage::Error(_) => ConsoleKind::Error,
        }
    }
}

/// One line in the console
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ConsoleEntry {
    pub kind: ConsoleKind,
    pub text: String,
    pub timestamp: DateTime<Utc>,
}

impl ConsoleEntry {
    pub fn new(kind: ConsoleKind, text: impl Into<String>) -> Self {
        Self {
            kind,
            text: text.into(),
            timestamp: Utc::now(),
        }
    }
}

impl fmt::Display for ConsoleEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind, self.text)
    }
}

/// Receiver of relayed sandbox messages
pub trait MessageSink {
    fn record(&mut self, message: &RuntimeMessage);
}

/// Append-only console log
#[derive(Debug, Clone)]
pub struct MessageLog {
    entries: VecDeque<ConsoleEntry>,
    max_entries: usize,
}

impl MessageLog {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_MAX_ENTRIES)
    }

    /// Create a log holding at most `max_entries` lines
    pub fn with_capacity(max_entries: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            max_entries: max_entries.max(1),
        }
    }

    /// Append an entry
    pub fn push(&mut self, kind: ConsoleKind, text: impl Into<String>) {
        let entry = ConsoleEntry::new(kind, text);
        debug!("console {}", entry);
        self.entries.push_back(entry);
        while self.entries.len() > self.max_entries {
            self.entries.pop_front();
        }
    }

    pub fn info(&mut self, text: impl Into<String>) {
        self.push(ConsoleKind::Info, text);
    }

    pub fn log(&mut self, text: impl Into<String>) {
        self.push(ConsoleKind::Log, text);
    }

    pub fn warn(&mut self, text: impl Into<String>) {
        self.push(ConsoleKind::Warn, text);
    }

    pub fn error(&mut self, text: impl Into<String>) {
        self.push(ConsoleKind::Error, text);
    }

    /// Remove every entry
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn entries(&self) -> impl Iterator<Item = &ConsoleEntry> {
        self.entries.iter()
    }

    pub fn last(&self) -> Option<&ConsoleEntry> {
        self.entries.back()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Entries of one kind, oldest first
    pub fn of_kind(&self, kind: ConsoleKind) -> Vec<&ConsoleEntry> {
        self.entries.iter().filter(|e| e.kind == kind).collect()
    }
}

impl Default for MessageLog {
    fn default() -> Self {
        Self::new()
    }
}

impl MessageSink for MessageLog {
    fn record(&mut self, message: &RuntimeMessage) {
        self.push(ConsoleKind::from(message), message.text());
    }
}

impl MessageSink for Vec<RuntimeMessage> {
    fn record(&mut self, message: &RuntimeMessage) {
        self.push(message.clone());
    }
}
