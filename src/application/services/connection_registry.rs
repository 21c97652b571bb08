//! Connection registry owned by the host event loop.

use std::collections::HashMap;

use uuid::Uuid;

use crate::domain::{Connection, PeerMessage};

/// Remotes attached to the host, keyed by connection id.
#[derive(Debug, Default)]
pub struct ConnectionRegistry {
    connections: HashMap<Uuid, Connection>,
}

impl ConnectionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, connection: Connection) {
        self.connections.insert(connection.id(), connection);
    }

    pub fn remove(&mut self, id: Uuid) -> Option<Connection> {
        self.connections.remove(&id)
    }

    pub fn len(&self) -> usize {
        self.connections.len()
    }

    pub fn is_empty(&self) -> bool {
        self.connections.is_empty()
    }

    /// Send to every connection that reports itself open.
    ///
    /// Closed connections are skipped, not removed; their own close event
    /// prunes them. Returns how many sends succeeded.
    pub fn broadcast(&self, message: &PeerMessage) -> usize {
        self.connections
            .values()
            .filter(|c| c.is_open())
            .filter(|c| c.send(message))
            .count()
    }

    /// Drop every connection, closing their channels.
    pub fn clear(&mut self) {
        self.connections.clear();
    }
}
