//! Remote connection entity.
//!
//! One `Connection` exists per remote attached to the host. The host's
//! registry owns it exclusively; the handle is the outbound record sender.

use chrono::{DateTime, Utc};
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::services::transport::Record;
use crate::domain::value_objects::PeerMessage;

/// A remote attached to the host.
#[derive(Debug, Clone)]
pub struct Connection {
    id: Uuid,
    label: String,
    opened_at: DateTime<Utc>,
    outbound: mpsc::UnboundedSender<Record>,
}

impl Connection {
    pub fn new(id: Uuid, label: impl Into<String>, outbound: mpsc::UnboundedSender<Record>) -> Self {
        Self {
            id,
            label: label.into(),
            opened_at: Utc::now(),
            outbound,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    /// Transport-provided description of the peer (e.g. its address).
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn opened_at(&self) -> DateTime<Utc> {
        self.opened_at
    }

    /// The channel reports itself open while the transport side still reads.
    pub fn is_open(&self) -> bool {
        !self.outbound.is_closed()
    }

    /// Send a message. Returns `false` if the channel has gone away.
    pub fn send(&self, message: &PeerMessage) -> bool {
        self.outbound.send(message.to_record()).is_ok()
    }
}
