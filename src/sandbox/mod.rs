//! Sandboxed code execution
//!
//! - [`document`] - composes the preview document and the executable program
//! - [`relay`] - run-tagged message channel from sandboxes to the host
//! - [`realm`] - isolation seam and the process-backed realm
//! - [`runner`] - owns the single live sandbox

pub mod document;
pub mod realm;
pub mod relay;
pub mod runner;

pub use document::{SandboxDocument, SandboxProgram, RELAY_MARKER};
pub use realm::{ProcessRealm, Realm, SandboxHandle};
pub use relay::{MessageChannel, MessageInbox, RelaySender, RelayedMessage, RunId};
pub use runner::SandboxRunner;
