//! Remote Synchronizer
//!
//! Holds one outbound link to a host. The remote never computes time itself:
//! it renders whatever snapshot the host last sent and forgets it as soon as
//! the link goes away.

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use crate::config::Settings;
use crate::domain::{
    LinkEvent, PairingCode, PairingCodeError, PeerLink, PeerMessage, SessionSnapshot, Transport,
};

/// Connection phase of a remote
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum RemotePhase {
    #[default]
    Disconnected,
    Connecting,
    Connected,
}

impl RemotePhase {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Disconnected => "DISCONNECTED",
            Self::Connecting => "CONNECTING",
            Self::Connected => "CONNECTED",
        }
    }
}

impl fmt::Display for RemotePhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors surfaced to the remote user
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RemoteError {
    #[error(transparent)]
    InvalidPairingCode(#[from] PairingCodeError),

    #[error("Cannot connect while {0}")]
    InvalidState(RemotePhase),

    #[error("Connection failed: {0}")]
    ConnectionFailed(String),

    #[error("Connection timed out")]
    Timeout,
}

/// What the remote observed on its link.
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteUpdate {
    /// The host sent a new snapshot; it replaced the local view.
    Snapshot(SessionSnapshot),
    /// The link closed; the local view was discarded.
    Disconnected,
    /// The link failed; the error is also kept in `last_error`.
    Failed(RemoteError),
}

/// Remote controller endpoint
pub struct RemoteSynchronizer {
    transport: Arc<dyn Transport>,
    peer_id_prefix: String,
    connect_timeout: Duration,
    phase: RemotePhase,
    pairing_code: Option<PairingCode>,
    link: Option<PeerLink>,
    snapshot: Option<SessionSnapshot>,
    last_error: Option<RemoteError>,
}

impl RemoteSynchronizer {
    pub fn new(
        transport: Arc<dyn Transport>,
        peer_id_prefix: impl Into<String>,
        connect_timeout: Duration,
    ) -> Self {
        Self {
            transport,
            peer_id_prefix: peer_id_prefix.into(),
            connect_timeout,
            phase: RemotePhase::Disconnected,
            pairing_code: None,
            link: None,
            snapshot: None,
            last_error: None,
        }
    }

    pub fn from_settings(settings: &Settings, transport: Arc<dyn Transport>) -> Self {
        Self::new(
            transport,
            settings.peer.id_prefix.clone(),
            settings.remote.connect_timeout(),
        )
    }

    pub fn phase(&self) -> RemotePhase {
        self.phase
    }

    pub fn is_connected(&self) -> bool {
        self.phase == RemotePhase::Connected
    }

    /// Latest snapshot received from the host.
    pub fn snapshot(&self) -> Option<&SessionSnapshot> {
        self.snapshot.as_ref()
    }

    pub fn pairing_code(&self) -> Option<&PairingCode> {
        self.pairing_code.as_ref()
    }

    pub fn last_error(&self) -> Option<&RemoteError> {
        self.last_error.as_ref()
    }

    pub fn connect_timeout(&self) -> Duration {
        self.connect_timeout
    }

    /// Connect to the host named by `code` and request its state.
    ///
    /// Returns once the link is open, or fails with a timeout if it does not
    /// open within the connect timeout.
    pub async fn connect(&mut self, code: &str) -> Result<(), RemoteError> {
        if self.phase != RemotePhase::Disconnected {
            return Err(RemoteError::InvalidState(self.phase));
        }
        let code = PairingCode::parse(code)?;
        let peer_id = code.peer_id(&self.peer_id_prefix);

        self.last_error = None;
        self.snapshot = None;
        self.pairing_code = Some(code);
        self.phase = RemotePhase::Connecting;
        tracing::info!(peer_id = %peer_id, "Connecting to host");

        let link = match self.transport.connect(&peer_id).await {
            Ok(link) => link,
            Err(e) => return Err(self.fail(RemoteError::ConnectionFailed(e.to_string()))),
        };
        self.link = Some(link);

        let timeout = self.connect_timeout;
        let opened = tokio::time::timeout(timeout, self.wait_for_open()).await;
        match opened {
            Ok(Ok(())) => {
                self.phase = RemotePhase::Connected;
                tracing::info!(peer_id = %peer_id, "Connected to host");
                self.send_command(PeerMessage::GetState);
                Ok(())
            }
            Ok(Err(e)) => Err(self.fail(e)),
            Err(_) => Err(self.fail(RemoteError::Timeout)),
        }
    }

    async fn wait_for_open(&mut self) -> Result<(), RemoteError> {
        let Some(link) = self.link.as_mut() else {
            return Err(RemoteError::ConnectionFailed("no link".into()));
        };
        loop {
            match link.next_event().await {
                Some(LinkEvent::Open) => return Ok(()),
                Some(LinkEvent::Error(e)) => return Err(RemoteError::ConnectionFailed(e)),
                Some(LinkEvent::Close) | None => {
                    return Err(RemoteError::ConnectionFailed(
                        "closed before opening".into(),
                    ))
                }
                Some(LinkEvent::Data(_)) => {}
            }
        }
    }

    /// Wait for the next snapshot or link change. `None` when not connected.
    pub async fn next_update(&mut self) -> Option<RemoteUpdate> {
        if self.phase != RemotePhase::Connected {
            return None;
        }
        loop {
            let event = self.link.as_mut()?.next_event().await;
            match event {
                Some(LinkEvent::Data(record)) => match PeerMessage::from_record(&record) {
                    Ok(PeerMessage::SyncState(snapshot)) => {
                        tracing::trace!(
                            status = %snapshot.status,
                            seconds_remaining = snapshot.seconds_remaining,
                            "Snapshot received"
                        );
                        self.snapshot = Some(snapshot.clone());
                        return Some(RemoteUpdate::Snapshot(snapshot));
                    }
                    Ok(other) => {
                        tracing::debug!(kind = %other.kind(), "Ignoring non-snapshot record");
                    }
                    Err(e) => {
                        tracing::debug!(error = %e, "Dropping record");
                    }
                },
                Some(LinkEvent::Open) => {}
                Some(LinkEvent::Close) | None => {
                    tracing::info!("Host closed the connection");
                    self.reset_link();
                    return Some(RemoteUpdate::Disconnected);
                }
                Some(LinkEvent::Error(e)) => {
                    let error = self.fail(RemoteError::ConnectionFailed(e));
                    return Some(RemoteUpdate::Failed(error));
                }
            }
        }
    }

    /// Send a command to the host. Dropped unless connected.
    pub fn send_command(&self, message: PeerMessage) -> bool {
        if self.phase != RemotePhase::Connected {
            tracing::debug!(kind = %message.kind(), phase = %self.phase, "Command dropped");
            return false;
        }
        self.link
            .as_ref()
            .is_some_and(|link| link.send(message.to_record()))
    }

    /// Close the link and go back to `Disconnected` immediately.
    pub fn disconnect(&mut self) {
        if self.phase != RemotePhase::Disconnected {
            tracing::info!("Disconnecting from host");
        }
        self.reset_link();
    }

    fn reset_link(&mut self) {
        if let Some(mut link) = self.link.take() {
            link.close();
        }
        self.snapshot = None;
        self.phase = RemotePhase::Disconnected;
    }

    fn fail(&mut self, error: RemoteError) -> RemoteError {
        tracing::warn!(error = %error, "Connection to host failed");
        self.reset_link();
        self.last_error = Some(error.clone());
        error
    }
}

impl Drop for RemoteSynchronizer {
    fn drop(&mut self) {
        self.reset_link();
    }
}
