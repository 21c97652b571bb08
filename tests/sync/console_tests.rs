//! Console remote driving an in-memory host

use std::time::Duration;

use pretty_assertions::assert_eq;
use tokio::io::BufReader;

use stage_timer::application::RemotePhase;
use stage_timer::domain::TimerStatus;
use stage_timer::presentation::console::run_console;

use crate::common::TestHost;

#[tokio::test(start_paused = true)]
async fn test_console_lines_reach_host() {
    let host = TestHost::spawn();
    let mut remote = host.connected_remote().await;
    let mut views = host.handle.subscribe();

    let input: &[u8] = b"start 2 Standup\n\nwarp\nadd\nquit\n";
    run_console(&mut remote, input).await.unwrap();

    let view = views
        .wait_for(|v| {
            v.snapshot.status == TimerStatus::Running
                && v.snapshot.seconds_remaining + v.snapshot.seconds_elapsed as i64 == 180
        })
        .await
        .unwrap()
        .clone();
    let config = view.snapshot.config.unwrap();
    assert_eq!(config.total_minutes, 2);
    assert_eq!(config.topic.as_deref(), Some("Standup"));
    assert_eq!(remote.phase(), RemotePhase::Disconnected);
}

#[tokio::test(start_paused = true)]
async fn test_console_stops_when_host_shuts_down() {
    let host = TestHost::spawn();
    let mut remote = host.connected_remote().await;
    let (_writer, reader) = tokio::io::duplex(64);

    host.handle.shutdown();
    tokio::time::timeout(
        Duration::from_secs(5),
        run_console(&mut remote, BufReader::new(reader)),
    )
    .await
    .expect("console kept running")
    .unwrap();

    assert_eq!(remote.phase(), RemotePhase::Disconnected);
    assert!(remote.snapshot().is_none());
}
