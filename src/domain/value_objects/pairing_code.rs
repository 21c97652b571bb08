//! Pairing codes.
//!
//! A pairing code is a short, human-presentable string drawn from the base-36
//! alphabet. It is not a credential; it only names the host's endpoint.

use std::fmt;
use std::str::FromStr;

use rand::Rng;
use serde::Serialize;

/// Number of characters in a generated code, and the minimum accepted.
pub const PAIRING_CODE_LEN: usize = 4;

const ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Pairing code parse errors
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PairingCodeError {
    #[error("Pairing code must be at least {PAIRING_CODE_LEN} characters, got {0}")]
    TooShort(usize),

    #[error("Pairing code contains invalid character {0:?}")]
    InvalidCharacter(char),
}

/// An uppercase alphanumeric pairing code.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
#[serde(transparent)]
pub struct PairingCode(String);

impl PairingCode {
    /// Generate a random code using the thread-local RNG.
    pub fn generate() -> Self {
        Self::generate_with(&mut rand::rng())
    }

    pub fn generate_with<R: Rng + ?Sized>(rng: &mut R) -> Self {
        let code = (0..PAIRING_CODE_LEN)
            .map(|_| ALPHABET[rng.random_range(0..ALPHABET.len())] as char)
            .collect();
        Self(code)
    }

    /// Parse user input. Surrounding whitespace is ignored and letters are
    /// uppercased.
    pub fn parse(input: &str) -> Result<Self, PairingCodeError> {
        let trimmed = input.trim();
        let len = trimmed.chars().count();
        if len < PAIRING_CODE_LEN {
            return Err(PairingCodeError::TooShort(len));
        }
        if let Some(c) = trimmed.chars().find(|c| !c.is_ascii_alphanumeric()) {
            return Err(PairingCodeError::InvalidCharacter(c));
        }
        Ok(Self(trimmed.to_ascii_uppercase()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Addressable endpoint name: `<prefix>-<CODE>`.
    pub fn peer_id(&self, prefix: &str) -> String {
        format!("{}-{}", prefix, self.0)
    }
}

impl FromStr for PairingCode {
    type Err = PairingCodeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for PairingCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
