//! Host Synchronizer
//!
//! Owns the authoritative session, the clock, and the connection registry.
//! Everything that can change the session (connection lifecycle, inbound
//! records, local commands, clock ticks) arrives on one event loop, so each
//! mutation is applied atomically and followed by an explicit broadcast of
//! the full snapshot.

use std::ops::ControlFlow;
use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use tokio::sync::{mpsc, watch};
use tokio::task::JoinHandle;
use uuid::Uuid;

use super::clock_engine::ClockEngine;
use super::connection_registry::ConnectionRegistry;
use crate::config::Settings;
use crate::domain::{
    CommandOutcome, CommandProcessor, Connection, DeviceControl, InboundLink, MessageKind,
    PairingCode, PeerMessage, Record, SessionSnapshot, SessionState,
};
use crate::infrastructure::metrics;

/// Events processed by the host event loop
#[derive(Debug)]
pub enum HostEvent {
    /// A remote attached
    Connected(Connection),
    /// A record arrived from a remote
    Data { connection_id: Uuid, record: Record },
    /// A remote's channel closed
    Disconnected { connection_id: Uuid },
    /// Command issued from the host's own controls
    Local(PeerMessage),
    /// Host page visibility changed
    VisibilityChanged { visible: bool },
    /// Fullscreen button on the host screen
    ToggleFullscreen,
    /// Stop the loop and close every connection
    Shutdown,
}

/// What the host currently publishes to observers.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HostView {
    pub snapshot: SessionSnapshot,
    pub connections: usize,
    pub fullscreen: bool,
}

/// Authoritative timer host
pub struct HostSynchronizer {
    pairing_code: PairingCode,
    peer_id: String,
    state: SessionState,
    clock: ClockEngine,
    connections: ConnectionRegistry,
    device: Arc<dyn DeviceControl>,
    fullscreen: bool,
    view_tx: watch::Sender<HostView>,
}

enum Step {
    Event(Option<HostEvent>),
    Tick,
}

impl HostSynchronizer {
    pub fn new(
        pairing_code: PairingCode,
        peer_id_prefix: &str,
        tick_interval: Duration,
        device: Arc<dyn DeviceControl>,
    ) -> Self {
        let state = SessionState::idle();
        let (view_tx, _) = watch::channel(HostView {
            snapshot: state.snapshot(),
            connections: 0,
            fullscreen: false,
        });
        let peer_id = pairing_code.peer_id(peer_id_prefix);

        Self {
            pairing_code,
            peer_id,
            state,
            clock: ClockEngine::new(tick_interval),
            connections: ConnectionRegistry::new(),
            device,
            fullscreen: false,
            view_tx,
        }
    }

    /// Host with a freshly generated pairing code.
    pub fn from_settings(settings: &Settings, device: Arc<dyn DeviceControl>) -> Self {
        Self::new(
            PairingCode::generate(),
            &settings.peer.id_prefix,
            settings.clock.tick_interval(),
            device,
        )
    }

    pub fn pairing_code(&self) -> &PairingCode {
        &self.pairing_code
    }

    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    pub fn state(&self) -> &SessionState {
        &self.state
    }

    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }

    pub fn is_clock_running(&self) -> bool {
        self.clock.is_running()
    }

    /// Run the event loop on a new task.
    pub fn spawn(self) -> (HostHandle, JoinHandle<()>) {
        let (events_tx, events_rx) = mpsc::unbounded_channel();
        let handle = HostHandle {
            events: events_tx,
            view: self.view_tx.subscribe(),
            pairing_code: self.pairing_code.clone(),
            peer_id: Arc::from(self.peer_id.as_str()),
        };
        let task = tokio::spawn(self.run(events_rx));
        (handle, task)
    }

    /// Process events and clock ticks until shutdown.
    pub async fn run(mut self, mut events: mpsc::UnboundedReceiver<HostEvent>) {
        tracing::info!(peer_id = %self.peer_id, pairing_code = %self.pairing_code, "Host started");

        loop {
            let step = tokio::select! {
                event = events.recv() => Step::Event(event),
                _ = self.clock.ticked() => Step::Tick,
            };

            match step {
                Step::Event(Some(event)) => {
                    if self.handle(event).is_break() {
                        break;
                    }
                }
                Step::Event(None) => break,
                Step::Tick => self.on_tick(),
            }
        }

        self.teardown();
        tracing::info!(peer_id = %self.peer_id, "Host stopped");
    }

    /// Apply one event.
    pub fn handle(&mut self, event: HostEvent) -> ControlFlow<()> {
        match event {
            HostEvent::Connected(connection) => self.on_connected(connection),
            HostEvent::Data {
                connection_id,
                record,
            } => self.on_data(connection_id, record),
            HostEvent::Disconnected { connection_id } => self.on_disconnected(connection_id),
            HostEvent::Local(message) => {
                self.apply(message);
            }
            HostEvent::VisibilityChanged { visible } => self.on_visibility(visible),
            HostEvent::ToggleFullscreen => self.toggle_fullscreen(),
            HostEvent::Shutdown => return ControlFlow::Break(()),
        }
        ControlFlow::Continue(())
    }

    fn on_connected(&mut self, connection: Connection) {
        tracing::info!(
            connection_id = %connection.id(),
            label = %connection.label(),
            "Remote connected"
        );
        self.connections.insert(connection);
        metrics::set_peer_connections(self.connections.len());
        self.broadcast();
    }

    fn on_disconnected(&mut self, connection_id: Uuid) {
        if self.connections.remove(connection_id).is_some() {
            tracing::info!(connection_id = %connection_id, "Remote disconnected");
            metrics::set_peer_connections(self.connections.len());
            self.publish();
        }
    }

    fn on_data(&mut self, connection_id: Uuid, record: Record) {
        match PeerMessage::from_record(&record) {
            Ok(message) => {
                tracing::debug!(
                    connection_id = %connection_id,
                    kind = %message.kind(),
                    "Command received"
                );
                self.apply(message);
            }
            Err(e) => {
                tracing::debug!(connection_id = %connection_id, error = %e, "Dropping record");
                metrics::record_command("invalid", "dropped");
            }
        }
    }

    /// Apply a command, drive the clock and device from the resulting status,
    /// then broadcast if anything needs sending.
    pub fn apply(&mut self, message: PeerMessage) -> CommandOutcome {
        let kind = message.kind();
        let was_running = self.state.is_running();

        let outcome = CommandProcessor::apply(&mut self.state, message);
        metrics::record_command(kind.as_str(), outcome.as_str());

        if outcome == CommandOutcome::Applied {
            match kind {
                MessageKind::Start => {
                    self.clock.stop();
                    self.set_fullscreen(true);
                }
                MessageKind::Reset => {
                    self.set_fullscreen(false);
                }
                _ => {}
            }
            self.sync_clock(was_running);
            tracing::debug!(
                kind = %kind,
                status = %self.state.status(),
                seconds_remaining = self.state.seconds_remaining(),
                "Session updated"
            );
        }

        if outcome.broadcasts() {
            self.broadcast();
        }
        outcome
    }

    /// Advance the session by one second.
    pub fn on_tick(&mut self) {
        if self.state.tick() {
            metrics::record_tick();
            self.broadcast();
        }
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Flip fullscreen. Never touches the session.
    pub fn toggle_fullscreen(&mut self) {
        self.set_fullscreen(!self.fullscreen);
        self.publish();
    }

    /// The tracked mode only changes when the device accepts the request.
    fn set_fullscreen(&mut self, on: bool) {
        let (operation, result) = if on {
            ("enter_fullscreen", self.device.enter_fullscreen())
        } else {
            ("exit_fullscreen", self.device.exit_fullscreen())
        };
        match result {
            Ok(()) => self.fullscreen = on,
            Err(e) => {
                tracing::warn!(operation = operation, error = %e, "Device request failed")
            }
        }
    }

    fn on_visibility(&mut self, visible: bool) {
        if visible && self.state.is_running() {
            self.device_call("acquire_wake_lock", |d| d.acquire_wake_lock());
        }
    }

    /// Install or remove the clock driver to match the session status.
    fn sync_clock(&mut self, was_running: bool) {
        let running = self.state.is_running();
        if running && !self.clock.is_running() {
            self.clock.start();
            self.device_call("acquire_wake_lock", |d| d.acquire_wake_lock());
        } else if !running && was_running {
            self.clock.stop();
            self.device_call("release_wake_lock", |d| d.release_wake_lock());
        }
    }

    /// Send the current snapshot to every open connection.
    pub fn broadcast(&mut self) {
        let message = PeerMessage::SyncState(self.state.snapshot());
        let sent = self.connections.broadcast(&message);
        metrics::record_snapshots_sent(sent);
        tracing::trace!(sent = sent, "Snapshot broadcast");
        self.publish();
    }

    fn publish(&self) {
        self.view_tx.send_replace(HostView {
            snapshot: self.state.snapshot(),
            connections: self.connections.len(),
            fullscreen: self.fullscreen,
        });
    }

    fn device_call<F>(&self, operation: &'static str, call: F)
    where
        F: FnOnce(&dyn DeviceControl) -> Result<(), crate::domain::DeviceError>,
    {
        if let Err(e) = call(self.device.as_ref()) {
            tracing::warn!(operation = operation, error = %e, "Device request failed");
        }
    }

    fn teardown(&mut self) {
        self.clock.stop();
        self.connections.clear();
        metrics::set_peer_connections(0);
        if self.state.is_running() {
            self.device_call("release_wake_lock", |d| d.release_wake_lock());
        }
        self.publish();
    }
}

/// Cloneable handle to a running host
#[derive(Debug, Clone)]
pub struct HostHandle {
    events: mpsc::UnboundedSender<HostEvent>,
    view: watch::Receiver<HostView>,
    pairing_code: PairingCode,
    peer_id: Arc<str>,
}

impl HostHandle {
    pub fn pairing_code(&self) -> &PairingCode {
        &self.pairing_code
    }

    pub fn peer_id(&self) -> &str {
        &self.peer_id
    }

    pub fn view(&self) -> HostView {
        self.view.borrow().clone()
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        self.view.borrow().snapshot.clone()
    }

    /// Watch every published view.
    pub fn subscribe(&self) -> watch::Receiver<HostView> {
        self.view.clone()
    }

    pub fn is_alive(&self) -> bool {
        !self.events.is_closed()
    }

    /// Submit a command from the host's own controls.
    pub fn submit(&self, message: PeerMessage) -> bool {
        self.events.send(HostEvent::Local(message)).is_ok()
    }

    pub fn set_visibility(&self, visible: bool) -> bool {
        self.events
            .send(HostEvent::VisibilityChanged { visible })
            .is_ok()
    }

    pub fn toggle_fullscreen(&self) -> bool {
        self.events.send(HostEvent::ToggleFullscreen).is_ok()
    }

    pub fn shutdown(&self) {
        let _ = self.events.send(HostEvent::Shutdown);
    }

    /// Attach an inbound link. Its records are fed to the event loop until
    /// the remote closes, then a disconnect is reported.
    pub fn attach(&self, link: InboundLink) -> Option<Uuid> {
        let connection_id = Uuid::new_v4();
        let InboundLink {
            label,
            outbound,
            mut inbound,
        } = link;

        let connection = Connection::new(connection_id, label, outbound);
        if self.events.send(HostEvent::Connected(connection)).is_err() {
            tracing::debug!("Host stopped, rejecting link");
            return None;
        }

        let events = self.events.clone();
        tokio::spawn(async move {
            while let Some(record) = inbound.recv().await {
                if events
                    .send(HostEvent::Data {
                        connection_id,
                        record,
                    })
                    .is_err()
                {
                    return;
                }
            }
            let _ = events.send(HostEvent::Disconnected { connection_id });
        });

        Some(connection_id)
    }

    /// Attach every link arriving on `incoming`.
    pub fn serve(&self, mut incoming: mpsc::UnboundedReceiver<InboundLink>) -> JoinHandle<()> {
        let handle = self.clone();
        tokio::spawn(async move {
            while let Some(link) = incoming.recv().await {
                if handle.attach(link).is_none() {
                    break;
                }
            }
        })
    }
}
