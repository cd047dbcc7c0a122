//! Voting session: ledger, tally and vote list behind one owner
//!
//! The session is the only validation boundary. The ledger accepts any
//! payload; the session refuses votes for candidates that were never
//! registered and keeps the tally in lockstep with successful appends.

use crate::{
    ledger::Ledger,
    tally::Tally,
    types::{Payload, Vote, VoteRequest},
    Config, Error, Result,
};

/// Explicitly owned voting state
#[derive(Debug, Clone, Default)]
pub struct VotingSession {
    ledger: Ledger,
    tally: Tally,
    votes: Vec<Vote>,
    strict_validation: bool,
}

impl VotingSession {
    /// Create session with an empty candidate list
    pub fn new() -> Self {
        Self::default()
    }

    /// Create session from configuration, registering its candidates
    pub fn from_config(config: &Config) -> Result<Self> {
        let mut session = Self::new().with_strict_validation(config.strict_validation);
        for name in &config.candidates {
            session.register_candidate(name)?;
        }
        tracing::info!(
            candidates = session.tally.len(),
            strict_validation = session.strict_validation,
            "Voting session created"
        );
        Ok(session)
    }

    /// Select strict or lenient chain validation
    pub fn with_strict_validation(mut self, strict: bool) -> Self {
        self.strict_validation = strict;
        self
    }

    /// Register a candidate; registering a known name is a no-op
    pub fn register_candidate(&mut self, name: &str) -> Result<()> {
        if name.trim().is_empty() {
            return Err(Error::EmptyCandidateName);
        }
        if self.tally.register(name) {
            tracing::info!(candidate = name, "Registered candidate");
        }
        Ok(())
    }

    /// Record a vote and return its receipt
    ///
    /// Fails with [`Error::InvalidCandidate`] and leaves the session
    /// untouched when the candidate is not registered.
    pub fn submit(&mut self, request: VoteRequest) -> Result<Vote> {
        let VoteRequest { ballot, photo_path } = request;

        if !self.tally.contains(&ballot.candidate) {
            tracing::warn!(candidate = %ballot.candidate, "Rejected vote for unknown candidate");
            return Err(Error::InvalidCandidate(ballot.candidate));
        }

        let candidate = ballot.candidate.clone();
        let record = self.ledger.append(Payload::Vote(ballot.clone()));
        let vote = Vote {
            sequence_number: record.sequence_number(),
            fingerprint: record.fingerprint().clone(),
            ballot,
            photo_path,
            recorded_at: record.timestamp(),
        };

        self.tally.increment(&candidate);
        self.votes.push(vote.clone());

        tracing::info!(
            sequence_number = vote.sequence_number,
            candidate = %candidate,
            "Vote recorded"
        );
        Ok(vote)
    }

    /// Record a vote; false if the candidate is not registered
    pub fn cast_vote(&mut self, voter_name: &str, voter_id: &str, candidate: &str) -> bool {
        self.submit(VoteRequest::new(voter_name, voter_id, candidate))
            .is_ok()
    }

    /// `(candidate, votes)` in registration order
    pub fn candidates(&self) -> Vec<(String, u64)> {
        self.tally.snapshot()
    }

    /// Current tally
    pub fn tally(&self) -> &Tally {
        &self.tally
    }

    /// Accepted votes in order
    pub fn votes(&self) -> &[Vote] {
        &self.votes
    }

    /// Underlying ledger
    pub fn ledger(&self) -> &Ledger {
        &self.ledger
    }

    /// Whether strict validation is selected
    pub fn strict_validation(&self) -> bool {
        self.strict_validation
    }

    /// Verify the chain with the selected mode
    pub fn verify(&self) -> Result<()> {
        if self.strict_validation {
            self.ledger.verify_strict()
        } else {
            self.ledger.verify()
        }
    }

    /// Whether the chain passes the selected validation mode
    pub fn validate(&self) -> bool {
        if self.strict_validation {
            self.ledger.validate_strict()
        } else {
            self.ledger.validate()
        }
    }

    /// Recount ballots from the chain and compare with the tally
    pub fn audit(&self) -> Result<()> {
        let recount = self.tally.recount(self.ledger.ballots());
        for entry in recount.entries() {
            let tally = self.tally.get(&entry.name).unwrap_or(0);
            if tally != entry.votes {
                return Err(Error::TallyMismatch {
                    candidate: entry.name.clone(),
                    tally,
                    recount: entry.votes,
                });
            }
        }
        Ok(())
    }
}
