//! Transport contract.
//!
//! A transport delivers discrete records over a reliable, ordered channel per
//! connection and reports the lifecycle events open/data/close/error.

use async_trait::async_trait;
use tokio::sync::mpsc;

/// A structured message record as carried by the transport.
pub type Record = serde_json::Value;

/// Lifecycle and data events of an outbound link.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkEvent {
    Open,
    Data(Record),
    Close,
    Error(String),
}

/// Transport errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransportError {
    #[error("Address already in use: {0}")]
    AddressInUse(String),

    #[error("Invalid address: {0}")]
    InvalidAddress(String),

    #[error("Connect failed: {0}")]
    ConnectFailed(String),
}

/// Outbound connection from a remote to a host.
///
/// Returned by [`Transport::connect`] before the channel is open; the
/// `Open` event arrives on the event stream once it is.
#[derive(Debug)]
pub struct PeerLink {
    outbound: Option<mpsc::UnboundedSender<Record>>,
    events: mpsc::UnboundedReceiver<LinkEvent>,
}

impl PeerLink {
    pub fn new(
        outbound: mpsc::UnboundedSender<Record>,
        events: mpsc::UnboundedReceiver<LinkEvent>,
    ) -> Self {
        Self {
            outbound: Some(outbound),
            events,
        }
    }

    /// Send a record. Returns `false` once the link is closed.
    pub fn send(&self, record: Record) -> bool {
        self.outbound
            .as_ref()
            .is_some_and(|tx| tx.send(record).is_ok())
    }

    /// Next event, or `None` when the transport has gone away.
    pub async fn next_event(&mut self) -> Option<LinkEvent> {
        self.events.recv().await
    }

    /// Close the link from this side. Pending events are discarded.
    pub fn close(&mut self) {
        self.outbound = None;
        self.events.close();
    }
}

/// Inbound connection as seen by the host.
#[derive(Debug)]
pub struct InboundLink {
    /// Transport-provided description of the remote.
    pub label: String,
    /// Records sent to the remote.
    pub outbound: mpsc::UnboundedSender<Record>,
    /// Records received from the remote; ends when the remote closes.
    pub inbound: mpsc::UnboundedReceiver<Record>,
}

/// Address-based connection establishment.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Start connecting to the endpoint named `peer_id`.
    async fn connect(&self, peer_id: &str) -> Result<PeerLink, TransportError>;
}
