//! Error types for the vote ledger

use std::fmt;
use thiserror::Error;

/// Result type for ledger and session operations
pub type Result<T> = std::result::Result<T, Error>;

/// Which chain check a record failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TamperKind {
    /// Stored fingerprint no longer matches the record's fields
    ContentAltered,
    /// Stored previous fingerprint does not match the predecessor
    LinkBroken,
    /// Genesis record is not self-consistent or lost its sentinel
    GenesisAltered,
    /// Sequence number differs from the record's position
    SequenceGap,
}

impl fmt::Display for TamperKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            TamperKind::ContentAltered => "content altered",
            TamperKind::LinkBroken => "link broken",
            TamperKind::GenesisAltered => "genesis altered",
            TamperKind::SequenceGap => "sequence gap",
        };
        f.write_str(s)
    }
}

/// Vote ledger errors
#[derive(Error, Debug)]
pub enum Error {
    /// Vote cast for a candidate that was never registered
    #[error("Invalid candidate: {0}")]
    InvalidCandidate(String),

    /// Candidate registration with an empty name
    #[error("Candidate name must not be empty")]
    EmptyCandidateName,

    /// Chain verification found a violation
    #[error("Chain tampered at record {index}: {kind}")]
    ChainTampered {
        /// Position of the first offending record
        index: usize,
        /// Which check failed
        kind: TamperKind,
    },

    /// Tally disagrees with a recount of the chain
    #[error("Tally mismatch for {candidate}: tally {tally}, recount {recount}")]
    TallyMismatch {
        /// Candidate name
        candidate: String,
        /// Count held by the tally
        tally: u64,
        /// Count derived from the chain
        recount: u64,
    },

    /// Ledger built from an empty record list
    #[error("Ledger chain is empty")]
    EmptyChain,

    /// Concurrency error (actor mailbox closed, etc.)
    #[error("Concurrency error: {0}")]
    Concurrency(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
