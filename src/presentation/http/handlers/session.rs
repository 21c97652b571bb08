//! Session Handlers
//!
//! # Endpoints
//! - `GET /session` - Pairing details and the current snapshot
//! - `POST /session/commands` - Issue a command from the host's own controls
//! - `POST /session/fullscreen` - Toggle fullscreen on the host screen

use axum::{extract::State, http::StatusCode, Json};
use serde::Serialize;

use crate::domain::{ActiveSegment, PeerMessage, Record, SessionSnapshot};
use crate::shared::error::AppError;
use crate::startup::AppState;

/// Current host session as shown on the host screen.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionResponse {
    pub pairing_code: String,
    pub peer_id: String,
    pub connections: usize,
    pub fullscreen: bool,
    pub clock: String,
    pub overtime: bool,
    pub active_segment: Option<ActiveSegment>,
    pub snapshot: SessionSnapshot,
}

/// Accepted command
#[derive(Debug, Serialize)]
pub struct CommandAccepted {
    pub accepted: &'static str,
}

pub async fn get_session(State(state): State<AppState>) -> Json<SessionResponse> {
    let view = state.host.view();
    let snapshot = view.snapshot;

    Json(SessionResponse {
        pairing_code: state.host.pairing_code().to_string(),
        peer_id: state.host.peer_id().to_string(),
        connections: view.connections,
        fullscreen: view.fullscreen,
        clock: snapshot.clock_display(),
        overtime: snapshot.is_overtime(),
        active_segment: snapshot.active_segment(),
        snapshot,
    })
}

/// Decode a wire record and queue it on the host event loop.
pub async fn submit_command(
    State(state): State<AppState>,
    Json(record): Json<Record>,
) -> Result<(StatusCode, Json<CommandAccepted>), AppError> {
    let message = PeerMessage::from_record(&record)?;
    if let PeerMessage::SyncState(_) = message {
        return Err(AppError::BadRequest(
            "SYNC_STATE is only sent by the host".into(),
        ));
    }

    let kind = message.kind();
    if !state.host.submit(message) {
        return Err(AppError::HostStopped);
    }
    tracing::debug!(kind = %kind, "Local command queued");

    Ok((
        StatusCode::ACCEPTED,
        Json(CommandAccepted {
            accepted: kind.as_str(),
        }),
    ))
}

pub async fn toggle_fullscreen(
    State(state): State<AppState>,
) -> Result<(StatusCode, Json<CommandAccepted>), AppError> {
    if !state.host.toggle_fullscreen() {
        return Err(AppError::HostStopped);
    }

    Ok((
        StatusCode::ACCEPTED,
        Json(CommandAccepted {
            accepted: "TOGGLE_FULLSCREEN",
        }),
    ))
}
