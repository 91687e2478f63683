//! Agent record type

use serde::{Deserialize, Serialize};

/// Backend-assigned identifier; zero means "not yet persisted".
pub type AgentId = u64;

/// Parses a lookup token into an [`AgentId`].
///
/// Only canonical decimal text is accepted: ASCII digits, no sign, no
/// surrounding whitespace, no leading zeros, and a value that fits the
/// backend's signed 64-bit key. Every store resolves ids through this, so
/// tokens like `"1.0"`, `" 1"` or `"01"` never name a record.
pub fn parse_id(token: &str) -> Option<AgentId> {
    let canonical = match token.as_bytes() {
        [] => false,
        [b'0'] => true,
        [first, rest @ ..] => {
            (b'1'..=b'9').contains(first) && rest.iter().all(u8::is_ascii_digit)
        }
    };
    if !canonical {
        return None;
    }

    token
        .parse::<AgentId>()
        .ok()
        .filter(|id| i64::try_from(*id).is_ok())
}

/// Valid range for a generated agent age
pub const AGE_RANGE: std::ops::RangeInclusive<u16> = 20..=80;

/// Valid range for generated speed and strength ratings
pub const RATING_RANGE: std::ops::RangeInclusive<u16> = 0..=9;

/// A persisted agent record.
///
/// `strength` is exposed on the wire as `damage`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub id: AgentId,
    pub name: String,
    pub age: u16,
    pub gender: String,
    pub speed: u16,
    #[serde(rename = "damage")]
    pub strength: u16,
    pub busy: bool,
    pub created_at: u64,
    pub updated_at: u64,
}

impl Agent {
    /// Returns the agent carrying the backend-assigned id
    pub fn with_id(mut self, id: AgentId) -> Self {
        self.id = id;
        self
    }
}
