//! Core types for the vote ledger
//!
//! All hashed types implement [`Canonical`] so their fingerprint input is a
//! fixed byte layout rather than whatever a serde format happens to emit.

use crate::canonical::{Canonical, CanonicalSerializer};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;

/// Payload marker stored in the genesis record
pub const GENESIS_MARKER: &str = "Genesis Block";

/// Previous fingerprint of the genesis record
pub const SENTINEL_FINGERPRINT: &str = "0";

/// Hex-encoded SHA-256 fingerprint of a record
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Fingerprint(String);

impl Fingerprint {
    /// Reserved predecessor of the genesis record
    pub fn sentinel() -> Self {
        Self(SENTINEL_FINGERPRINT.to_string())
    }

    /// Encode a raw digest
    pub fn from_digest(digest: [u8; 32]) -> Self {
        Self(hex::encode(digest))
    }

    /// Whether this is the genesis sentinel
    pub fn is_sentinel(&self) -> bool {
        self.0 == SENTINEL_FINGERPRINT
    }

    /// Get as string
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for Fingerprint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// A single vote as recorded in the chain
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Ballot {
    /// Voter display name
    pub voter_name: String,
    /// Voter identifier
    pub voter_id: String,
    /// Candidate voted for
    pub candidate: String,
}

impl Ballot {
    /// Create new ballot
    pub fn new(
        voter_name: impl Into<String>,
        voter_id: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        Self {
            voter_name: voter_name.into(),
            voter_id: voter_id.into(),
            candidate: candidate.into(),
        }
    }
}

impl Canonical for Ballot {
    fn write_canonical(&self, ser: &mut CanonicalSerializer) {
        ser.write_str(&self.voter_name);
        ser.write_str(&self.voter_id);
        ser.write_str(&self.candidate);
    }
}

/// Record content
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum Payload {
    /// Fixed marker of the first record
    Genesis(String),
    /// A cast vote
    Vote(Ballot),
}

impl Payload {
    /// Genesis payload with the standard marker
    pub fn genesis() -> Self {
        Payload::Genesis(GENESIS_MARKER.to_string())
    }

    /// Ballot carried by this payload, if any
    pub fn ballot(&self) -> Option<&Ballot> {
        match self {
            Payload::Vote(ballot) => Some(ballot),
            Payload::Genesis(_) => None,
        }
    }
}

impl Canonical for Payload {
    fn write_canonical(&self, ser: &mut CanonicalSerializer) {
        match self {
            Payload::Genesis(marker) => {
                ser.write_tag(0);
                ser.write_str(marker);
            }
            Payload::Vote(ballot) => {
                ser.write_tag(1);
                ballot.write_canonical(ser);
            }
        }
    }
}

impl From<Ballot> for Payload {
    fn from(ballot: Ballot) -> Self {
        Payload::Vote(ballot)
    }
}

/// Vote submitted by a front end
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoteRequest {
    /// Ballot to record
    pub ballot: Ballot,
    /// Optional voter photo; never hashed into the chain
    pub photo_path: Option<PathBuf>,
}

impl VoteRequest {
    /// Create request without a photo
    pub fn new(
        voter_name: impl Into<String>,
        voter_id: impl Into<String>,
        candidate: impl Into<String>,
    ) -> Self {
        Self {
            ballot: Ballot::new(voter_name, voter_id, candidate),
            photo_path: None,
        }
    }

    /// Attach a photo path
    pub fn with_photo(mut self, path: impl Into<PathBuf>) -> Self {
        self.photo_path = Some(path.into());
        self
    }
}

/// Receipt for an accepted vote
///
/// Kept in the session's vote list for display and export. The chain, not
/// this list, is the source of truth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vote {
    /// Position of the vote's record in the chain
    pub sequence_number: u64,
    /// Fingerprint of that record
    pub fingerprint: Fingerprint,
    /// Recorded ballot
    pub ballot: Ballot,
    /// Optional voter photo
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub photo_path: Option<PathBuf>,
    /// Record timestamp
    pub recorded_at: DateTime<Utc>,
}
