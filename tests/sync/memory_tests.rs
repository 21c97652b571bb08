//! Synchronization over the in-memory transport
//!
//! Clock time is paused and auto-advanced, so ticks and connect timeouts run
//! instantly and deterministically.

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::time::Instant;

use stage_timer::application::{RemoteError, RemotePhase};
use stage_timer::domain::{PeerMessage, Segment, SessionConfig, SessionSnapshot, TimerStatus};

use crate::common::{wait_for_disconnect, wait_for_snapshot, TestHost};

fn consumed(snapshot: &SessionSnapshot) -> i64 {
    snapshot.seconds_remaining + snapshot.seconds_elapsed as i64
}

#[tokio::test(start_paused = true)]
async fn test_remote_receives_state_on_connect() {
    let host = TestHost::spawn();
    let mut remote = host.connected_remote().await;

    let snapshot = wait_for_snapshot(&mut remote, |_| true).await;
    assert!(snapshot.is_idle());
    assert_eq!(remote.phase(), RemotePhase::Connected);
    assert_eq!(remote.snapshot(), Some(&snapshot));
}

#[tokio::test(start_paused = true)]
async fn test_add_minute_reaches_every_remote() {
    let host = TestHost::spawn();
    let mut first = host.connected_remote().await;

    assert!(first.send_command(PeerMessage::Start(SessionConfig::minutes(15))));
    wait_for_snapshot(&mut first, |s| s.status == TimerStatus::Running).await;

    let mut second = host.connected_remote().await;
    wait_for_snapshot(&mut second, |s| s.status == TimerStatus::Running).await;

    assert!(first.send_command(PeerMessage::AddMinute));

    for remote in [&mut first, &mut second] {
        let snapshot = wait_for_snapshot(remote, |s| consumed(s) == 960).await;
        assert_eq!(snapshot.status, TimerStatus::Running);
        assert_eq!(snapshot.total_seconds, 900);
    }
}

#[tokio::test(start_paused = true)]
async fn test_reset_while_running_clears_session() {
    let host = TestHost::spawn();
    let mut remote = host.connected_remote().await;

    remote.send_command(PeerMessage::Start(SessionConfig::minutes(10)));
    wait_for_snapshot(&mut remote, |s| s.seconds_elapsed >= 3).await;

    remote.send_command(PeerMessage::Reset);
    let snapshot = wait_for_snapshot(&mut remote, |s| s.is_idle()).await;

    assert_eq!(snapshot.config, None);
    assert_eq!(snapshot.seconds_remaining, 0);
    assert_eq!(snapshot.seconds_elapsed, 0);
    assert_eq!(snapshot.total_seconds, 0);
}

#[tokio::test(start_paused = true)]
async fn test_unreachable_host_times_out() {
    let host = TestHost::spawn();
    let mut remote = host.remote();

    let started = Instant::now();
    let err = remote.connect("ZZZZ").await.unwrap_err();

    assert_eq!(err, RemoteError::Timeout);
    assert_eq!(started.elapsed(), Duration::from_secs(5));
    assert_eq!(remote.phase(), RemotePhase::Disconnected);
    assert!(remote.snapshot().is_none());
    assert_eq!(remote.last_error(), Some(&RemoteError::Timeout));
}

#[tokio::test]
async fn test_short_code_never_touches_transport() {
    let host = TestHost::spawn();
    let mut remote = host.remote();

    let err = tokio_test::assert_err!(remote.connect("AB1").await);
    assert!(matches!(err, RemoteError::InvalidPairingCode(_)));
    assert_eq!(host.handle.view().connections, 0);

    tokio_test::assert_ok!(remote.connect("test").await);
}

#[tokio::test(start_paused = true)]
async fn test_pause_stops_time_for_everyone() {
    let host = TestHost::spawn();
    let mut first = host.connected_remote().await;
    let mut second = host.connected_remote().await;

    first.send_command(PeerMessage::Start(SessionConfig::minutes(1)));
    wait_for_snapshot(&mut second, |s| s.seconds_elapsed == 3).await;

    second.send_command(PeerMessage::PauseToggle);
    let a = wait_for_snapshot(&mut first, |s| s.status == TimerStatus::Paused).await;
    let b = wait_for_snapshot(&mut second, |s| s.status == TimerStatus::Paused).await;
    assert_eq!(a, b);

    tokio::time::sleep(Duration::from_secs(30)).await;
    let held = host.handle.snapshot();
    assert_eq!(held.seconds_elapsed, a.seconds_elapsed);
    assert_eq!(held.seconds_remaining, a.seconds_remaining);

    first.send_command(PeerMessage::PauseToggle);
    let resumed = wait_for_snapshot(&mut second, |s| {
        s.status == TimerStatus::Running && s.seconds_elapsed == a.seconds_elapsed + 1
    })
    .await;
    assert_eq!(resumed.seconds_remaining, a.seconds_remaining - 1);
}

#[tokio::test(start_paused = true)]
async fn test_countdown_runs_into_overtime() {
    let host = TestHost::spawn();
    let mut remote = host.connected_remote().await;

    remote.send_command(PeerMessage::Start(SessionConfig::minutes(1)));
    let snapshot = wait_for_snapshot(&mut remote, |s| s.seconds_remaining == -5).await;

    assert_eq!(snapshot.status, TimerStatus::Running);
    assert_eq!(snapshot.seconds_elapsed, 65);
    assert!(snapshot.is_overtime());
    assert_eq!(snapshot.clock_display(), "-00:05");
}

#[tokio::test(start_paused = true)]
async fn test_agenda_follows_elapsed_time() {
    let host = TestHost::spawn();
    let mut remote = host.connected_remote().await;

    let config = SessionConfig::minutes(15).with_segments(vec![
        Segment::new("Intro", 5),
        Segment::new("Main", 10),
    ]);
    remote.send_command(PeerMessage::Start(config));

    let snapshot = wait_for_snapshot(&mut remote, |s| s.seconds_elapsed == 250).await;
    let active = snapshot.active_segment().unwrap();
    assert_eq!(active.current.title, "Intro");
    assert_eq!(active.next.map(|s| s.title), Some("Main".to_string()));

    let snapshot = wait_for_snapshot(&mut remote, |s| s.seconds_elapsed == 900).await;
    assert!(snapshot.active_segment().unwrap().is_wrap_up);
}

#[tokio::test(start_paused = true)]
async fn test_get_state_resends_snapshot() {
    let host = TestHost::spawn();
    let mut remote = host.connected_remote().await;
    let first = wait_for_snapshot(&mut remote, |_| true).await;

    assert!(remote.send_command(PeerMessage::GetState));
    let again = wait_for_snapshot(&mut remote, |_| true).await;
    assert_eq!(first, again);
}

#[tokio::test(start_paused = true)]
async fn test_remote_disconnect_removes_connection() {
    let host = TestHost::spawn();
    let mut views = host.handle.subscribe();
    let mut remote = host.connected_remote().await;
    views.wait_for(|v| v.connections == 1).await.unwrap();

    remote.disconnect();
    assert_eq!(remote.phase(), RemotePhase::Disconnected);
    assert!(!remote.send_command(PeerMessage::AddMinute));

    views.wait_for(|v| v.connections == 0).await.unwrap();
}

#[tokio::test(start_paused = true)]
async fn test_host_shutdown_disconnects_remotes() {
    let host = TestHost::spawn();
    let mut remote = host.connected_remote().await;
    wait_for_snapshot(&mut remote, |_| true).await;

    host.handle.shutdown();
    wait_for_disconnect(&mut remote).await;

    assert_eq!(remote.phase(), RemotePhase::Disconnected);
    assert!(remote.snapshot().is_none());
    assert!(remote.last_error().is_none());
}
