//! Runtime Message Model
//!
//! Messages relayed out of a running sandbox. The wire shape is
//! `{"type": "log" | "warn" | "error", "message": "<text>"}`.

use serde::{Deserialize, Serialize};
use std::fmt;

/// One console call or fault observed inside the sandbox
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "message", rename_all = "lowercase")]
pub enum RuntimeMessage {
    /// `console.log` / `console.info`
    Log(String),
    /// `console.warn`
    Warn(String),
    /// `console.error`, uncaught faults and caught script exceptions
    Error(String),
}

impl RuntimeMessage {
    /// Parse a relayed wire payload
    pub fn from_wire(payload: &str) -> crate::error::Result<Self> {
        Ok(serde_json::from_str(payload)?)
    }

    /// Message text
    pub fn text(&self) -> &str {
        match self {
            RuntimeMessage::Log(text) | RuntimeMessage::Warn(text) | RuntimeMessage::Error(text) => {
                text
            }
        }
    }

    /// Wire tag of this message
    pub fn kind(&self) -> &'static str {
        match self {
            RuntimeMessage::Log(_) => "log",
            RuntimeMessage::Warn(_) => "warn",
            RuntimeMessage::Error(_) => "error",
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, RuntimeMessage::Error(_))
    }
}

impl fmt::Display for RuntimeMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.kind(), self.text())
    }
}
