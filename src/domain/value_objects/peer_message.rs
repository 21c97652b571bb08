//! Peer wire messages.
//!
//! Every record on the wire is `{ "type": <KIND>, "payload": <optional> }`.
//! Remotes send commands; the host only ever sends `SYNC_STATE`.

use serde::Deserialize;
use serde_json::{json, Value};
use validator::Validate;

use crate::domain::entities::{SessionConfig, SessionSnapshot};

/// Message kinds understood by this protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MessageKind {
    GetState,
    Start,
    PauseToggle,
    Reset,
    Restart,
    AddMinute,
    SubMinute,
    SyncState,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::GetState => "GET_STATE",
            Self::Start => "START",
            Self::PauseToggle => "PAUSE_TOGGLE",
            Self::Reset => "RESET",
            Self::Restart => "RESTART",
            Self::AddMinute => "ADD_MINUTE",
            Self::SubMinute => "SUB_MINUTE",
            Self::SyncState => "SYNC_STATE",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        Some(match s {
            "GET_STATE" => Self::GetState,
            "START" => Self::Start,
            "PAUSE_TOGGLE" => Self::PauseToggle,
            "RESET" => Self::Reset,
            "RESTART" => Self::Restart,
            "ADD_MINUTE" => Self::AddMinute,
            "SUB_MINUTE" => Self::SubMinute,
            "SYNC_STATE" => Self::SyncState,
            _ => return None,
        })
    }
}

impl std::fmt::Display for MessageKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Record decoding errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ProtocolError {
    #[error("Invalid envelope: {0}")]
    InvalidEnvelope(String),

    #[error("Unknown message kind: {0}")]
    UnknownKind(String),

    #[error("Malformed {kind} payload: {reason}")]
    MalformedPayload { kind: MessageKind, reason: String },
}

/// A decoded peer message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PeerMessage {
    GetState,
    Start(SessionConfig),
    PauseToggle,
    Reset,
    Restart,
    AddMinute,
    SubMinute,
    SyncState(SessionSnapshot),
}

/// Incoming envelope, payload decoded per kind afterwards.
#[derive(Debug, Deserialize)]
struct Envelope {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default)]
    payload: Option<Value>,
}

impl PeerMessage {
    pub fn kind(&self) -> MessageKind {
        match self {
            Self::GetState => MessageKind::GetState,
            Self::Start(_) => MessageKind::Start,
            Self::PauseToggle => MessageKind::PauseToggle,
            Self::Reset => MessageKind::Reset,
            Self::Restart => MessageKind::Restart,
            Self::AddMinute => MessageKind::AddMinute,
            Self::SubMinute => MessageKind::SubMinute,
            Self::SyncState(_) => MessageKind::SyncState,
        }
    }

    /// Encode as a wire record.
    pub fn to_record(&self) -> Value {
        let payload = match self {
            Self::Start(config) => Some(serde_json::to_value(config).unwrap_or_default()),
            Self::SyncState(snapshot) => Some(serde_json::to_value(snapshot).unwrap_or_default()),
            _ => None,
        };

        match payload {
            Some(payload) => json!({ "type": self.kind().as_str(), "payload": payload }),
            None => json!({ "type": self.kind().as_str() }),
        }
    }

    /// Decode a wire record.
    pub fn from_record(record: &Value) -> Result<Self, ProtocolError> {
        let envelope = Envelope::deserialize(record)
            .map_err(|e| ProtocolError::InvalidEnvelope(e.to_string()))?;

        let kind = MessageKind::parse(&envelope.kind)
            .ok_or_else(|| ProtocolError::UnknownKind(envelope.kind.clone()))?;

        Ok(match kind {
            MessageKind::GetState => Self::GetState,
            MessageKind::PauseToggle => Self::PauseToggle,
            MessageKind::Reset => Self::Reset,
            MessageKind::Restart => Self::Restart,
            MessageKind::AddMinute => Self::AddMinute,
            MessageKind::SubMinute => Self::SubMinute,
            MessageKind::Start => {
                let config: SessionConfig = decode_payload(kind, envelope.payload)?;
                config
                    .validate()
                    .map_err(|e| ProtocolError::MalformedPayload {
                        kind,
                        reason: e.to_string(),
                    })?;
                Self::Start(config)
            }
            MessageKind::SyncState => Self::SyncState(decode_payload(kind, envelope.payload)?),
        })
    }

    /// Decode a JSON text frame.
    pub fn decode(text: &str) -> Result<Self, ProtocolError> {
        let record: Value = serde_json::from_str(text)
            .map_err(|e| ProtocolError::InvalidEnvelope(e.to_string()))?;
        Self::from_record(&record)
    }

    /// Encode as a JSON text frame.
    pub fn encode(&self) -> String {
        self.to_record().to_string()
    }
}

fn decode_payload<T: serde::de::DeserializeOwned>(
    kind: MessageKind,
    payload: Option<Value>,
) -> Result<T, ProtocolError> {
    let payload = payload.ok_or_else(|| ProtocolError::MalformedPayload {
        kind,
        reason: "missing payload".into(),
    })?;
    serde_json::from_value(payload).map_err(|e| ProtocolError::MalformedPayload {
        kind,
        reason: e.to_string(),
    })
}
