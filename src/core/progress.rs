//! Progress reporting from a running export to a presentation task
//!
//! The orchestrator and whatever displays progress share no state; they
//! talk over an unbounded channel of [`ProgressEnvelope`]s. Every envelope
//! carries a one-shot reply slot that the receiver fills with [`Ack`].
//!
//! Delivery is best effort. [`ProgressSink::emit`] never fails and never
//! waits longer than the configured acknowledgment timeout; the outcome is
//! reported as a [`Delivery`] value that callers are free to ignore.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};

/// Heading shown with every event
pub const PROGRESS_TITLE: &str = "WeRead note export";

/// Severity of a progress event
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProgressKind {
    Info,
    Success,
    Error,
}

/// One status message
///
/// `key` groups the events of one run so a presenter can update a single
/// status line in place.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressEvent {
    #[serde(rename = "type")]
    pub kind: ProgressKind,
    pub key: String,
    pub title: String,
    #[serde(rename = "content")]
    pub body: String,
}

impl ProgressEvent {
    fn new(kind: ProgressKind, key: &str, body: impl Into<String>) -> Self {
        Self {
            kind,
            key: key.to_string(),
            title: PROGRESS_TITLE.to_string(),
            body: body.into(),
        }
    }

    /// Creates an `Info` event
    pub fn info(key: &str, body: impl Into<String>) -> Self {
        Self::new(ProgressKind::Info, key, body)
    }

    /// Creates a `Success` event
    pub fn success(key: &str, body: impl Into<String>) -> Self {
        Self::new(ProgressKind::Success, key, body)
    }

    /// Creates an `Error` event
    pub fn error(key: &str, body: impl Into<String>) -> Self {
        Self::new(ProgressKind::Error, key, body)
    }

    /// Whether this event ends a run
    pub fn is_terminal(&self) -> bool {
        matches!(self.kind, ProgressKind::Success | ProgressKind::Error)
    }
}

/// Receipt sent back by the presenter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ack {
    pub succ: u8,
}

impl Ack {
    /// The only acknowledgment a presenter sends
    pub const RECEIVED: Ack = Ack { succ: 1 };
}

/// What happened to an emitted event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Delivery {
    /// The presenter acknowledged the event
    Acknowledged,
    /// Sent, but no acknowledgment arrived in time
    Unacknowledged,
    /// Nobody is listening
    NoListener,
}

/// Destination for progress events
#[async_trait]
pub trait ProgressSink: Send + Sync {
    /// Delivers one event; never fails
    async fn emit(&self, event: ProgressEvent) -> Delivery;
}

/// An event in transit together with its reply slot
#[derive(Debug)]
pub struct ProgressEnvelope {
    event: ProgressEvent,
    reply: oneshot::Sender<Ack>,
}

impl ProgressEnvelope {
    /// The carried event
    pub fn event(&self) -> &ProgressEvent {
        &self.event
    }

    /// Acknowledges receipt and hands back the event
    pub fn acknowledge(self) -> ProgressEvent {
        // The sender may already have stopped waiting
        let _ = self.reply.send(Ack::RECEIVED);
        self.event
    }
}

/// Sending half, held by the orchestrator
#[derive(Debug, Clone)]
pub struct ProgressChannel {
    sender: mpsc::UnboundedSender<ProgressEnvelope>,
    ack_timeout: Duration,
}

/// Receiving half, held by the presenter
#[derive(Debug)]
pub struct ProgressReceiver {
    receiver: mpsc::UnboundedReceiver<ProgressEnvelope>,
}

impl ProgressReceiver {
    /// Next envelope; `None` once every sender is gone
    pub async fn recv(&mut self) -> Option<ProgressEnvelope> {
        self.receiver.recv().await
    }
}

/// Creates a connected channel pair
pub fn progress_channel(ack_timeout: Duration) -> (ProgressChannel, ProgressReceiver) {
    let (sender, receiver) = mpsc::unbounded_channel();
    (
        ProgressChannel {
            sender,
            ack_timeout,
        },
        ProgressReceiver { receiver },
    )
}

#[async_trait]
impl ProgressSink for ProgressChannel {
    async fn emit(&self, event: ProgressEvent) -> Delivery {
        let (reply, ack) = oneshot::channel();
        let kind = event.kind;

        if self.sender.send(ProgressEnvelope { event, reply }).is_err() {
            tracing::debug!(kind = ?kind, "Progress event dropped, no listener");
            return Delivery::NoListener;
        }

        match tokio::time::timeout(self.ack_timeout, ack).await {
            Ok(Ok(Ack { succ: 1 })) => Delivery::Acknowledged,
            Ok(Ok(other)) => {
                tracing::debug!(succ = other.succ, "Unexpected progress acknowledgment");
                Delivery::Unacknowledged
            }
            Ok(Err(_)) => {
                tracing::debug!(kind = ?kind, "Progress event dropped without acknowledgment");
                Delivery::Unacknowledged
            }
            Err(_) => {
                tracing::debug!(
                    kind = ?kind,
                    timeout_ms = self.ack_timeout.as_millis() as u64,
                    "Progress acknowledgment timed out"
                );
                Delivery::Unacknowledged
            }
        }
    }
}
