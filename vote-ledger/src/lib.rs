//! Vote Ledger
//!
//! Append-only, tamper-evident vote ledger with per-candidate tallies.
//!
//! # Architecture
//!
//! - **Record**: immutable entry fingerprinted over its own fields and its
//!   predecessor's fingerprint
//! - **Ledger**: hash-linked chain of records starting at a genesis record
//! - **Session**: the only validation boundary; keeps tally and vote list in
//!   lockstep with the chain
//! - **Single Writer**: a session actor serializes appends for concurrent
//!   callers
//!
//! # Invariants
//!
//! - Self-consistency: every record's fingerprint matches its fields
//! - Linkage: every record after genesis names its predecessor's fingerprint
//! - Append-only: records are never modified, removed or reordered

#![forbid(unsafe_code)]
#![warn(
    missing_docs,
    rust_2018_idioms,
    missing_debug_implementations,
    clippy::all
)]

pub mod types;
pub mod canonical;
pub mod record;
pub mod ledger;
pub mod tally;
pub mod session;
pub mod error;
pub mod actor;
pub mod config;
pub mod metrics;

// Re-exports
pub use error::{Error, Result, TamperKind};
pub use types::{Ballot, Fingerprint, Payload, Vote, VoteRequest};
pub use record::Record;
pub use ledger::Ledger;
pub use tally::Tally;
pub use session::VotingSession;
pub use actor::{spawn_session_actor, SessionHandle};
pub use config::Config;
pub use metrics::Metrics;
