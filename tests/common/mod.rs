//! Common Test Utilities
//!
//! Shared helpers, fixtures, and test infrastructure.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use axum::{body::Body, http::Request, Router};
use serde_json::Value;
use tokio::task::JoinHandle;
use tower::ServiceExt;

use stage_timer::application::{
    HostHandle, HostSynchronizer, RemoteSynchronizer, RemoteUpdate,
};
use stage_timer::config::Settings;
use stage_timer::domain::{PairingCode, SessionSnapshot};
use stage_timer::infrastructure::device::HeadlessDevice;
use stage_timer::infrastructure::transport::InMemoryNetwork;
use stage_timer::startup::{build_router, AppState};

pub const PEER_ID_PREFIX: &str = "ppt-timer";

/// Pairing code used by every fixture host
pub const TEST_CODE: &str = "TEST";

/// Test application builder
pub struct TestApp {
    pub router: Router,
    pub host: HostHandle,
    pub host_task: JoinHandle<()>,
}

impl TestApp {
    /// Router over a live host whose clock ticks once an hour, so HTTP
    /// assertions never race a tick.
    pub fn new() -> Self {
        let settings = Settings::defaults().expect("default settings");
        let host = HostSynchronizer::new(
            PairingCode::parse(TEST_CODE).unwrap(),
            &settings.peer.id_prefix,
            Duration::from_secs(3600),
            Arc::new(HeadlessDevice::new()),
        );
        let (host, host_task) = host.spawn();

        let router = build_router(AppState {
            host: host.clone(),
            settings: Arc::new(settings),
        });

        Self {
            router,
            host,
            host_task,
        }
    }

    /// Make a GET request to the application
    pub async fn get(&self, uri: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("GET")
                    .uri(uri)
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    /// Make a POST request with JSON body
    pub async fn post_json(&self, uri: &str, body: &str) -> axum::response::Response {
        self.router
            .clone()
            .oneshot(
                Request::builder()
                    .method("POST")
                    .uri(uri)
                    .header("Content-Type", "application/json")
                    .body(Body::from(body.to_string()))
                    .unwrap(),
            )
            .await
            .unwrap()
    }

    pub fn server(&self) -> axum_test::TestServer {
        axum_test::TestServer::new(self.router.clone()).expect("test server")
    }

    /// Wait until the host publishes a view matching `predicate`.
    pub async fn wait_for_snapshot<F>(&self, predicate: F) -> SessionSnapshot
    where
        F: Fn(&SessionSnapshot) -> bool,
    {
        let mut views = self.host.subscribe();
        let view = tokio::time::timeout(
            Duration::from_secs(5),
            views.wait_for(|v| predicate(&v.snapshot)),
        )
        .await
        .expect("timed out waiting for host")
        .expect("host stopped");
        view.snapshot.clone()
    }
}

/// Collect a response body as JSON
pub async fn body_json(response: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

/// Host listening on an in-memory network
pub struct TestHost {
    pub handle: HostHandle,
    pub task: JoinHandle<()>,
    pub network: Arc<InMemoryNetwork>,
}

impl TestHost {
    pub fn spawn() -> Self {
        let network = Arc::new(InMemoryNetwork::new());
        let host = HostSynchronizer::new(
            PairingCode::parse(TEST_CODE).unwrap(),
            PEER_ID_PREFIX,
            Duration::from_secs(1),
            Arc::new(HeadlessDevice::new()),
        );
        let listener = network.listen(host.peer_id()).unwrap();
        let (handle, task) = host.spawn();
        handle.serve(listener.into_receiver());

        Self {
            handle,
            task,
            network,
        }
    }

    pub fn remote(&self) -> RemoteSynchronizer {
        RemoteSynchronizer::new(self.network.clone(), PEER_ID_PREFIX, Duration::from_secs(5))
    }

    /// A remote already connected to this host.
    pub async fn connected_remote(&self) -> RemoteSynchronizer {
        let mut remote = self.remote();
        remote.connect(TEST_CODE).await.expect("connect");
        remote
    }
}

/// Read updates until a snapshot matches `predicate`.
pub async fn wait_for_snapshot<F>(remote: &mut RemoteSynchronizer, predicate: F) -> SessionSnapshot
where
    F: Fn(&SessionSnapshot) -> bool,
{
    loop {
        match remote.next_update().await {
            Some(RemoteUpdate::Snapshot(snapshot)) if predicate(&snapshot) => return snapshot,
            Some(RemoteUpdate::Snapshot(_)) => continue,
            other => panic!("expected a snapshot, got {:?}", other),
        }
    }
}

/// Read updates until the link reports it closed.
pub async fn wait_for_disconnect(remote: &mut RemoteSynchronizer) {
    loop {
        match remote.next_update().await {
            Some(RemoteUpdate::Snapshot(_)) => continue,
            Some(RemoteUpdate::Disconnected) => return,
            other => panic!("expected a disconnect, got {:?}", other),
        }
    }
}
