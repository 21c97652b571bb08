//! In-process transport.
//!
//! Hosts listen on a peer id; remotes connect to it by name. Connecting to a
//! peer id nobody listens on never opens, the same way an unreachable peer
//! behaves on a real network.

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;
use tokio::sync::mpsc;
use uuid::Uuid;

use crate::domain::{InboundLink, LinkEvent, PeerLink, Transport, TransportError};

/// Accepts inbound links for one peer id.
#[derive(Debug)]
pub struct Listener {
    peer_id: String,
    incoming: mpsc::UnboundedReceiver<InboundLink>,
}

impl Listener {
    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    pub async fn accept(&mut self) -> Option<InboundLink> {
        self.incoming.recv().await
    }

    pub fn into_receiver(self) -> mpsc::UnboundedReceiver<InboundLink> {
        self.incoming
    }
}

/// Address registry connecting remotes to hosts in the same process.
#[derive(Debug, Default)]
pub struct InMemoryNetwork {
    listeners: DashMap<String, mpsc::UnboundedSender<InboundLink>>,
    /// Event senders of links to unreachable peers, held so they stay
    /// pending instead of closing.
    unanswered: Mutex<Vec<mpsc::UnboundedSender<LinkEvent>>>,
}

impl InMemoryNetwork {
    pub fn new() -> Self {
        Self::default()
    }

    /// Start accepting connections for `peer_id`.
    pub fn listen(&self, peer_id: &str) -> Result<Listener, TransportError> {
        if let Some(existing) = self.listeners.get(peer_id) {
            if !existing.is_closed() {
                return Err(TransportError::AddressInUse(peer_id.to_string()));
            }
        }

        let (tx, rx) = mpsc::unbounded_channel();
        self.listeners.insert(peer_id.to_string(), tx);
        tracing::debug!(peer_id = %peer_id, "Listening on in-memory network");

        Ok(Listener {
            peer_id: peer_id.to_string(),
            incoming: rx,
        })
    }

    fn leave_unanswered(&self, events: mpsc::UnboundedSender<LinkEvent>) {
        let mut unanswered = self.unanswered.lock();
        unanswered.retain(|tx| !tx.is_closed());
        unanswered.push(events);
    }
}

#[async_trait]
impl Transport for InMemoryNetwork {
    async fn connect(&self, peer_id: &str) -> Result<PeerLink, TransportError> {
        let (event_tx, event_rx) = mpsc::unbounded_channel();
        let (to_host_tx, to_host_rx) = mpsc::unbounded_channel();
        let link = PeerLink::new(to_host_tx, event_rx);

        let listener = self
            .listeners
            .get(peer_id)
            .map(|tx| tx.value().clone())
            .filter(|tx| !tx.is_closed());

        let Some(listener) = listener else {
            tracing::debug!(peer_id = %peer_id, "No listener for peer id");
            self.leave_unanswered(event_tx);
            return Ok(link);
        };

        let (to_remote_tx, mut to_remote_rx) = mpsc::unbounded_channel();
        let inbound = InboundLink {
            label: format!("memory:{}", Uuid::new_v4()),
            outbound: to_remote_tx,
            inbound: to_host_rx,
        };

        if listener.send(inbound).is_err() {
            tracing::debug!(peer_id = %peer_id, "Listener went away during connect");
            self.leave_unanswered(event_tx);
            return Ok(link);
        }

        tokio::spawn(async move {
            if event_tx.send(LinkEvent::Open).is_err() {
                return;
            }
            loop {
                tokio::select! {
                    record = to_remote_rx.recv() => match record {
                        Some(record) => {
                            if event_tx.send(LinkEvent::Data(record)).is_err() {
                                break;
                            }
                        }
                        None => {
                            let _ = event_tx.send(LinkEvent::Close);
                            break;
                        }
                    },
                    _ = event_tx.closed() => break,
                }
            }
        });

        Ok(link)
    }
}
