//! Session API Tests

use axum::http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{json, Value};
use test_case::test_case;

use stage_timer::domain::TimerStatus;

use crate::common::{body_json, TestApp};

#[tokio::test]
async fn test_get_session_when_idle() {
    let app = TestApp::new();
    let server = app.server();

    let response = server.get("/session").await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["pairingCode"], "TEST");
    assert_eq!(body["peerId"], "ppt-timer-TEST");
    assert_eq!(body["connections"], 0);
    assert_eq!(body["fullscreen"], false);
    assert_eq!(body["clock"], "00:00");
    assert_eq!(body["overtime"], false);
    assert_eq!(body["activeSegment"], Value::Null);
    assert_eq!(
        body["snapshot"],
        json!({
            "status": "IDLE",
            "secondsRemaining": 0,
            "secondsElapsed": 0,
            "totalSeconds": 0,
            "config": null
        })
    );
}

#[tokio::test]
async fn test_start_command_is_applied() {
    let app = TestApp::new();
    let server = app.server();

    let response = server
        .post("/session/commands")
        .json(&json!({
            "type": "START",
            "payload": {
                "totalMinutes": 15,
                "topic": "Quarterly review",
                "segments": [
                    { "title": "Intro", "durationMinutes": 5 },
                    { "title": "Main", "durationMinutes": 10 }
                ]
            }
        }))
        .await;

    response.assert_status(StatusCode::ACCEPTED);
    response.assert_json(&json!({ "accepted": "START" }));

    app.wait_for_snapshot(|s| s.status == TimerStatus::Running)
        .await;

    let body: Value = server.get("/session").await.json();
    assert_eq!(body["clock"], "15:00");
    assert_eq!(body["snapshot"]["secondsRemaining"], 900);
    assert_eq!(body["snapshot"]["totalSeconds"], 900);
    assert_eq!(body["snapshot"]["config"]["topic"], "Quarterly review");
    assert_eq!(body["activeSegment"]["current"]["title"], "Intro");
    assert_eq!(body["activeSegment"]["next"]["title"], "Main");
}

#[tokio::test]
async fn test_minute_adjustments_go_negative() {
    let app = TestApp::new();
    let server = app.server();

    for _ in 0..2 {
        server
            .post("/session/commands")
            .json(&json!({ "type": "SUB_MINUTE" }))
            .await
            .assert_status(StatusCode::ACCEPTED);
    }
    app.wait_for_snapshot(|s| s.seconds_remaining == -120).await;

    let body: Value = server.get("/session").await.json();
    assert_eq!(body["clock"], "-02:00");
    assert_eq!(body["overtime"], true);
}

#[tokio::test]
async fn test_restart_and_reset() {
    let app = TestApp::new();
    let server = app.server();

    for command in [
        json!({ "type": "START", "payload": { "totalMinutes": 2 } }),
        json!({ "type": "SUB_MINUTE" }),
        json!({ "type": "RESTART" }),
    ] {
        server
            .post("/session/commands")
            .json(&command)
            .await
            .assert_status(StatusCode::ACCEPTED);
    }
    let snapshot = app
        .wait_for_snapshot(|s| s.status == TimerStatus::Paused)
        .await;
    assert_eq!(snapshot.seconds_remaining, 120);
    assert_eq!(snapshot.seconds_elapsed, 0);

    server
        .post("/session/commands")
        .json(&json!({ "type": "RESET" }))
        .await
        .assert_status(StatusCode::ACCEPTED);
    let snapshot = app.wait_for_snapshot(|s| s.is_idle()).await;
    assert_eq!(snapshot.config, None);
    assert_eq!(snapshot.seconds_remaining, 0);
}

#[test_case(json!({ "type": "START" }) ; "start without payload")]
#[test_case(json!({ "type": "START", "payload": { "totalMinutes": 0 } }) ; "start with zero minutes")]
#[test_case(json!({ "type": "WARP_SPEED" }) ; "unknown kind")]
#[test_case(json!({ "payload": {} }) ; "missing type")]
#[test_case(json!({ "type": "SYNC_STATE", "payload": { "status": "IDLE", "secondsRemaining": 0, "config": null } }) ; "host only kind")]
#[tokio::test]
async fn test_invalid_commands_are_rejected(record: Value) {
    let app = TestApp::new();
    let server = app.server();

    let response = server.post("/session/commands").json(&record).await;

    response.assert_status(StatusCode::BAD_REQUEST);
    let body: Value = response.json();
    assert!(body["message"].is_string());
    assert_eq!(app.host.snapshot().status, TimerStatus::Idle);
}

#[tokio::test]
async fn test_commands_after_shutdown_are_unavailable() {
    let app = TestApp::new();
    let server = app.server();
    app.host.shutdown();
    app.host_task.await.unwrap();

    server
        .post("/session/commands")
        .json(&json!({ "type": "ADD_MINUTE" }))
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_fullscreen_toggle_leaves_session_alone() {
    let app = TestApp::new();
    let server = app.server();
    server
        .post("/session/commands")
        .json(&json!({ "type": "START", "payload": { "totalMinutes": 3 } }))
        .await
        .assert_status(StatusCode::ACCEPTED);
    app.wait_for_snapshot(|s| s.status == TimerStatus::Running)
        .await;
    let mut views = app.host.subscribe();
    views.wait_for(|v| v.fullscreen).await.unwrap();

    let response = server.post("/session/fullscreen").await;

    response.assert_status(StatusCode::ACCEPTED);
    response.assert_json(&json!({ "accepted": "TOGGLE_FULLSCREEN" }));
    views.wait_for(|v| !v.fullscreen).await.unwrap();
    let body: Value = server.get("/session").await.json();
    assert_eq!(body["fullscreen"], false);
    assert_eq!(body["snapshot"]["status"], "RUNNING");
    assert_eq!(body["clock"], "03:00");
}

#[tokio::test]
async fn test_fullscreen_after_shutdown_is_unavailable() {
    let app = TestApp::new();
    let server = app.server();
    app.host.shutdown();
    app.host_task.await.unwrap();

    server
        .post("/session/fullscreen")
        .await
        .assert_status(StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn test_non_json_body_is_rejected() {
    let app = TestApp::new();

    let response = app.post_json("/session/commands", "not json").await;

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_pause_toggle_while_idle_is_accepted_but_ignored() {
    let app = TestApp::new();

    let response = app
        .post_json("/session/commands", r#"{"type":"PAUSE_TOGGLE"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);

    let response = app
        .post_json("/session/commands", r#"{"type":"ADD_MINUTE"}"#)
        .await;
    assert_eq!(response.status(), StatusCode::ACCEPTED);
    app.wait_for_snapshot(|s| s.seconds_remaining == 60).await;

    let body = body_json(app.get("/session").await).await;
    assert_eq!(body["snapshot"]["status"], "IDLE");
}
