//! Command transition function.

use crate::domain::entities::{SessionState, MINUTE_ADJUSTMENT_SECS};
use crate::domain::value_objects::PeerMessage;

/// What applying a command did to the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// State changed; snapshot must be broadcast.
    Applied,
    /// Nothing changed but a fresh snapshot was requested.
    Resend,
    /// Precondition not met; nothing changes and nothing is sent.
    NoOp,
    /// Not a command the host accepts (host-to-remote kinds).
    Ignored,
}

impl CommandOutcome {
    pub fn broadcasts(&self) -> bool {
        matches!(self, Self::Applied | Self::Resend)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Applied => "applied",
            Self::Resend => "resend",
            Self::NoOp => "noop",
            Self::Ignored => "ignored",
        }
    }
}

/// Domain service applying remote commands to session state.
pub struct CommandProcessor;

impl CommandProcessor {
    /// Apply one command atomically.
    pub fn apply(state: &mut SessionState, message: PeerMessage) -> CommandOutcome {
        match message {
            PeerMessage::GetState => CommandOutcome::Resend,
            PeerMessage::Start(config) => {
                state.start(config);
                CommandOutcome::Applied
            }
            PeerMessage::PauseToggle => applied_if(state.toggle_pause()),
            PeerMessage::Reset => {
                state.reset();
                CommandOutcome::Applied
            }
            PeerMessage::Restart => applied_if(state.restart()),
            PeerMessage::AddMinute => {
                state.adjust(MINUTE_ADJUSTMENT_SECS);
                CommandOutcome::Applied
            }
            PeerMessage::SubMinute => {
                state.adjust(-MINUTE_ADJUSTMENT_SECS);
                CommandOutcome::Applied
            }
            PeerMessage::SyncState(_) => CommandOutcome::Ignored,
        }
    }
}

fn applied_if(changed: bool) -> CommandOutcome {
    if changed {
        CommandOutcome::Applied
    } else {
        CommandOutcome::NoOp
    }
}
