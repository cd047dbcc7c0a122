//! Append-only, hash-linked ledger
//!
//! The chain always starts with a genesis record whose previous fingerprint
//! is the sentinel `"0"`. Every append links to the current tail, so after
//! any number of appends:
//!
//! - each record's fingerprint matches its own fields
//! - each non-genesis record's previous fingerprint equals its
//!   predecessor's fingerprint
//!
//! [`Ledger::validate`] re-checks both properties from index 1 onward.
//! It does not re-derive the genesis record; [`Ledger::validate_strict`]
//! does, and also checks sequence numbers against positions.
//!
//! # Example
//!
//! ```
//! use vote_ledger::{types::{Ballot, Payload}, Ledger};
//!
//! let mut ledger = Ledger::new();
//! ledger.append(Payload::Vote(Ballot::new("Alice", "V1", "A")));
//! assert_eq!(ledger.len(), 2);
//! assert!(ledger.validate());
//! ```

use crate::{
    error::TamperKind,
    record::Record,
    types::{Ballot, Payload},
    Error, Result,
};
use chrono::Utc;

/// Ordered chain of records
#[derive(Debug, Clone)]
pub struct Ledger {
    chain: Vec<Record>,
}

impl Ledger {
    /// Create a ledger holding only the genesis record
    pub fn new() -> Self {
        let genesis = Record::genesis(Utc::now());
        tracing::debug!(fingerprint = %genesis.fingerprint(), "Created genesis record");
        Self {
            chain: vec![genesis],
        }
    }

    /// Rebuild a ledger from exported records
    ///
    /// Records are taken as-is; nothing is re-linked or re-hashed. Call
    /// [`verify`](Self::verify) afterwards to check the imported chain.
    pub fn from_records(records: Vec<Record>) -> Result<Self> {
        if records.is_empty() {
            return Err(Error::EmptyChain);
        }
        Ok(Self { chain: records })
    }

    /// Last record in the chain
    pub fn tail(&self) -> &Record {
        self.chain
            .last()
            .expect("ledger chain always holds the genesis record")
    }

    /// First record in the chain
    pub fn genesis(&self) -> &Record {
        &self.chain[0]
    }

    /// Append a payload, linking it to the current tail
    ///
    /// The record is built with its final predecessor in a single step, so
    /// no partially linked record is ever visible.
    pub fn append(&mut self, payload: Payload) -> &Record {
        let sequence_number = self.chain.len() as u64;
        let previous = self.tail().fingerprint().clone();
        let record = Record::new(sequence_number, Utc::now(), payload, previous);

        tracing::debug!(
            sequence_number,
            fingerprint = %record.fingerprint(),
            "Appended record"
        );

        self.chain.push(record);
        self.tail()
    }

    /// Check content and linkage of every record after genesis
    ///
    /// Returns the first violation found.
    pub fn verify(&self) -> Result<()> {
        for (offset, pair) in self.chain.windows(2).enumerate() {
            let index = offset + 1;
            let (previous, current) = (&pair[0], &pair[1]);

            if !current.is_self_consistent() {
                return Err(Error::ChainTampered {
                    index,
                    kind: TamperKind::ContentAltered,
                });
            }

            if current.previous_fingerprint() != previous.fingerprint() {
                return Err(Error::ChainTampered {
                    index,
                    kind: TamperKind::LinkBroken,
                });
            }
        }

        Ok(())
    }

    /// [`verify`](Self::verify) plus genesis self-consistency and sequence
    /// numbers
    pub fn verify_strict(&self) -> Result<()> {
        let genesis = self.genesis();
        let genesis_ok = genesis.sequence_number() == 0
            && genesis.previous_fingerprint().is_sentinel()
            && matches!(genesis.payload(), Payload::Genesis(_))
            && genesis.is_self_consistent();
        if !genesis_ok {
            return Err(Error::ChainTampered {
                index: 0,
                kind: TamperKind::GenesisAltered,
            });
        }

        self.verify()?;

        if let Some(index) = self
            .chain
            .iter()
            .enumerate()
            .position(|(i, r)| r.sequence_number() != i as u64)
        {
            return Err(Error::ChainTampered {
                index,
                kind: TamperKind::SequenceGap,
            });
        }

        Ok(())
    }

    /// Whether [`verify`](Self::verify) passes
    pub fn validate(&self) -> bool {
        log_outcome(self.verify())
    }

    /// Whether [`verify_strict`](Self::verify_strict) passes
    pub fn validate_strict(&self) -> bool {
        log_outcome(self.verify_strict())
    }

    /// All records, genesis first
    pub fn records(&self) -> &[Record] {
        &self.chain
    }

    /// Number of records including genesis
    pub fn len(&self) -> usize {
        self.chain.len()
    }

    /// Always false: the chain holds at least the genesis record
    pub fn is_empty(&self) -> bool {
        self.chain.is_empty()
    }

    /// Ballots in chain order
    pub fn ballots(&self) -> impl Iterator<Item = &Ballot> + '_ {
        self.chain.iter().filter_map(|r| r.payload().ballot())
    }
}

impl Default for Ledger {
    fn default() -> Self {
        Self::new()
    }
}

fn log_outcome(outcome: Result<()>) -> bool {
    match outcome {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!(error = %e, "Ledger validation failed");
            false
        }
    }
}
