//! Hash-linked ledger record

use crate::canonical::{Canonical, CanonicalSerializer};
use crate::types::{Fingerprint, Payload};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Immutable unit of ledger data
///
/// The fingerprint is derived once at construction from the sequence
/// number, timestamp, payload and previous fingerprint. Fields are only
/// readable; a record with altered content can only enter a ledger through
/// [`Ledger::from_records`](crate::Ledger::from_records), where verification
/// will catch it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Record {
    sequence_number: u64,
    timestamp: DateTime<Utc>,
    payload: Payload,
    previous_fingerprint: Fingerprint,
    fingerprint: Fingerprint,
}

impl Record {
    /// Build a record and derive its fingerprint
    pub fn new(
        sequence_number: u64,
        timestamp: DateTime<Utc>,
        payload: Payload,
        previous_fingerprint: Fingerprint,
    ) -> Self {
        debug_assert!(
            sequence_number == 0 || !previous_fingerprint.is_sentinel(),
            "non-genesis record {} linked to the sentinel",
            sequence_number
        );

        let fingerprint = derive(sequence_number, &timestamp, &payload, &previous_fingerprint);
        Self {
            sequence_number,
            timestamp,
            payload,
            previous_fingerprint,
            fingerprint,
        }
    }

    /// Genesis record at sequence 0
    pub fn genesis(timestamp: DateTime<Utc>) -> Self {
        Self::new(0, timestamp, Payload::genesis(), Fingerprint::sentinel())
    }

    /// Recompute the fingerprint from the current fields
    pub fn derive_fingerprint(&self) -> Fingerprint {
        derive(
            self.sequence_number,
            &self.timestamp,
            &self.payload,
            &self.previous_fingerprint,
        )
    }

    /// Whether the stored fingerprint matches the fields
    pub fn is_self_consistent(&self) -> bool {
        self.fingerprint == self.derive_fingerprint()
    }

    /// Position in the chain
    pub fn sequence_number(&self) -> u64 {
        self.sequence_number
    }

    /// Creation time
    pub fn timestamp(&self) -> DateTime<Utc> {
        self.timestamp
    }

    /// Record content
    pub fn payload(&self) -> &Payload {
        &self.payload
    }

    /// Fingerprint of the predecessor
    pub fn previous_fingerprint(&self) -> &Fingerprint {
        &self.previous_fingerprint
    }

    /// Stored fingerprint
    pub fn fingerprint(&self) -> &Fingerprint {
        &self.fingerprint
    }
}

fn derive(
    sequence_number: u64,
    timestamp: &DateTime<Utc>,
    payload: &Payload,
    previous_fingerprint: &Fingerprint,
) -> Fingerprint {
    let mut ser = CanonicalSerializer::new();
    ser.write_u64(sequence_number);
    // Seconds and subsecond nanos cover the full chrono range without loss
    ser.write_i64(timestamp.timestamp());
    ser.write_u32(timestamp.timestamp_subsec_nanos());
    payload.write_canonical(&mut ser);
    ser.write_str(previous_fingerprint.as_str());
    ser.fingerprint()
}
