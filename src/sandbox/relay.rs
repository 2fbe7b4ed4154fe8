//! Sandbox Message Relay
//!
//! The channel between sandboxes (producers) and the host (one consumer).
//! Every message is stamped with the [`RunId`] of the run that produced it,
//! so an evaluation can tell its own traffic from a previous run's late
//! output.
//!
//! ```text
//! run #1 sandbox ──RelaySender(#1)──┐
//!                                   ├──▶ MessageInbox ──▶ evaluator / console
//! run #2 sandbox ──RelaySender(#2)──┘
//! ```

use std::fmt;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tokio::time::Instant;

use crate::models::RuntimeMessage;

/// Identifier of one run, increasing per controller
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct RunId(pub u64);

impl RunId {
    /// The id following this one
    pub fn next(self) -> RunId {
        RunId(self.0.wrapping_add(1))
    }
}

impl fmt::Display for RunId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A message together with the run it belongs to
#[derive(Debug, Clone, PartialEq)]
pub struct RelayedMessage {
    pub run_id: RunId,
    pub message: RuntimeMessage,
    pub received_at: Instant,
}

/// Producer side, bound to one run
#[derive(Debug, Clone)]
pub struct RelaySender {
    run_id: RunId,
    tx: UnboundedSender<RelayedMessage>,
}

impl RelaySender {
    pub fn run_id(&self) -> RunId {
        self.run_id
    }

    /// Forward a message; returns false once the host has gone away
    pub fn send(&self, message: RuntimeMessage) -> bool {
        let relayed = RelayedMessage {
            run_id: self.run_id,
            message,
            received_at: Instant::now(),
        };
        self.tx.send(relayed).is_ok()
    }
}

/// Consumer side
#[derive(Debug)]
pub struct MessageInbox {
    rx: UnboundedReceiver<RelayedMessage>,
}

impl MessageInbox {
    /// Wait for the next message
    pub async fn recv(&mut self) -> Option<RelayedMessage> {
        self.rx.recv().await
    }

    /// Take a message if one is already queued
    pub fn try_recv(&mut self) -> Option<RelayedMessage> {
        self.rx.try_recv().ok()
    }

    /// Take every queued message
    pub fn drain(&mut self) -> Vec<RelayedMessage> {
        let mut drained = Vec::new();
        while let Ok(message) = self.rx.try_recv() {
            drained.push(message);
        }
        drained
    }
}

/// Host-owned channel; hands out one sender per run
#[derive(Debug)]
pub struct MessageChannel {
    tx: UnboundedSender<RelayedMessage>,
}

impl MessageChannel {
    /// Create the channel and its single inbox
    pub fn new() -> (Self, MessageInbox) {
        let (tx, rx) = mpsc::unbounded_channel();
        (Self { tx }, MessageInbox { rx })
    }

    /// Sender stamping messages with `run_id`
    pub fn sender_for(&self, run_id: RunId) -> RelaySender {
        RelaySender {
            run_id,
            tx: self.tx.clone(),
        }
    }
}
