//! Console command parsing
//!
//! One line per command:
//! - `start <minutes> [topic...]`
//! - `pause` / `p`
//! - `reset`, `restart`
//! - `add` / `+`, `sub` / `-`
//! - `state`
//! - `quit` / `exit`

use crate::domain::{PeerMessage, SessionConfig};

/// What a console line asks the remote to do
#[derive(Debug, Clone, PartialEq)]
pub enum RemoteInput {
    Send(PeerMessage),
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CommandParseError {
    #[error("Unknown command: {0}")]
    Unknown(String),

    #[error("start needs a duration in minutes")]
    MissingMinutes,

    #[error("Invalid duration: {0}")]
    InvalidMinutes(String),
}

/// Parse one console line. Blank lines yield `None`.
pub fn parse_command(line: &str) -> Result<Option<RemoteInput>, CommandParseError> {
    let mut words = line.split_whitespace();
    let Some(command) = words.next() else {
        return Ok(None);
    };

    let message = match command.to_ascii_lowercase().as_str() {
        "start" => {
            let minutes = words.next().ok_or(CommandParseError::MissingMinutes)?;
            let total_minutes = match minutes.parse::<u32>() {
                Ok(m) if m > 0 => m,
                _ => return Err(CommandParseError::InvalidMinutes(minutes.to_string())),
            };
            let topic = words.collect::<Vec<_>>().join(" ");
            let config = SessionConfig::minutes(total_minutes);
            if topic.is_empty() {
                PeerMessage::Start(config)
            } else {
                PeerMessage::Start(config.with_topic(topic))
            }
        }
        "pause" | "p" => PeerMessage::PauseToggle,
        "reset" => PeerMessage::Reset,
        "restart" => PeerMessage::Restart,
        "add" | "+" => PeerMessage::AddMinute,
        "sub" | "-" => PeerMessage::SubMinute,
        "state" => PeerMessage::GetState,
        "quit" | "exit" => return Ok(Some(RemoteInput::Quit)),
        other => return Err(CommandParseError::Unknown(other.to_string())),
    };

    Ok(Some(RemoteInput::Send(message)))
}
