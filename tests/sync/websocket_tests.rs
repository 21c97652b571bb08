//! Synchronization over a real WebSocket server

use std::sync::Arc;
use std::time::Duration;

use tokio::time::timeout;

use stage_timer::application::{HostHandle, RemoteError, RemotePhase, RemoteSynchronizer};
use stage_timer::config::Settings;
use stage_timer::domain::{PeerMessage, SessionConfig, TimerStatus};
use stage_timer::infrastructure::transport::WebSocketTransport;
use stage_timer::startup::Application;

use crate::common::wait_for_snapshot;

const WAIT: Duration = Duration::from_secs(10);

async fn spawn_app() -> (String, HostHandle) {
    let mut settings = Settings::defaults().unwrap();
    settings.server.host = "127.0.0.1".into();
    settings.server.port = 0;

    let app = Application::build(settings).await.unwrap();
    let base_url = format!("ws://{}", app.local_addr().unwrap());
    let host = app.host().clone();
    tokio::spawn(app.run_until_stopped());

    (base_url, host)
}

fn remote(base_url: &str) -> RemoteSynchronizer {
    RemoteSynchronizer::new(
        Arc::new(WebSocketTransport::new(base_url)),
        "ppt-timer",
        Duration::from_secs(5),
    )
}

#[tokio::test]
async fn test_remote_controls_host_over_websocket() {
    let (base_url, host) = spawn_app().await;
    let mut remote = remote(&base_url);

    remote
        .connect(&host.pairing_code().as_str().to_lowercase())
        .await
        .unwrap();
    assert_eq!(remote.phase(), RemotePhase::Connected);

    let initial = timeout(WAIT, wait_for_snapshot(&mut remote, |_| true))
        .await
        .unwrap();
    assert!(initial.is_idle());

    remote.send_command(PeerMessage::Start(SessionConfig::minutes(10)));
    let running = timeout(
        WAIT,
        wait_for_snapshot(&mut remote, |s| s.status == TimerStatus::Running),
    )
    .await
    .unwrap();
    assert_eq!(running.total_seconds, 600);
    assert_eq!(host.snapshot().status, TimerStatus::Running);
}

#[tokio::test]
async fn test_unknown_peer_id_is_refused() {
    let (base_url, host) = spawn_app().await;
    let mut remote = remote(&base_url);

    let code = if host.pairing_code().as_str() == "QQQQ" {
        "QQQR"
    } else {
        "QQQQ"
    };
    let err = remote.connect(code).await.unwrap_err();

    assert!(matches!(err, RemoteError::ConnectionFailed(_)));
    assert_eq!(remote.phase(), RemotePhase::Disconnected);
    assert_eq!(host.view().connections, 0);
}

#[tokio::test]
async fn test_disconnect_detaches_from_host() {
    let (base_url, host) = spawn_app().await;
    let mut views = host.subscribe();
    let mut remote = remote(&base_url);

    remote.connect(host.pairing_code().as_str()).await.unwrap();
    timeout(WAIT, views.wait_for(|v| v.connections == 1))
        .await
        .unwrap()
        .unwrap();

    remote.disconnect();
    timeout(WAIT, views.wait_for(|v| v.connections == 0))
        .await
        .unwrap()
        .unwrap();
}
