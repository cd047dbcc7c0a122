//! Metrics collection for observability
//!
//! This module provides Prometheus metrics for a voting session.
//!
//! # Metrics
//!
//! - `vote_ledger_votes_cast_total` - Votes appended to the chain
//! - `vote_ledger_votes_rejected_total` - Votes refused for unknown candidates
//! - `vote_ledger_validations_total` - Chain validation runs
//! - `vote_ledger_validation_failures_total` - Validation runs that found tampering
//! - `vote_ledger_chain_length` - Records in the chain, genesis included
//! - `vote_ledger_validate_duration_seconds` - Histogram of validation latencies

use prometheus::{Encoder, Histogram, HistogramOpts, IntCounter, IntGauge, Registry, TextEncoder};
use std::sync::Arc;

/// Metrics collector
///
/// Each collector owns its registry, so several sessions (or tests) can
/// coexist in one process.
#[derive(Clone, Debug)]
pub struct Metrics {
    /// Votes appended
    pub votes_cast: IntCounter,

    /// Votes rejected
    pub votes_rejected: IntCounter,

    /// Validation runs
    pub validations: IntCounter,

    /// Failed validation runs
    pub validation_failures: IntCounter,

    /// Chain length
    pub chain_length: IntGauge,

    /// Validation duration histogram
    pub validate_duration: Histogram,

    /// Prometheus registry
    pub registry: Arc<Registry>,
}

impl Metrics {
    /// Create new metrics collector
    pub fn new() -> prometheus::Result<Self> {
        let registry = Arc::new(Registry::new());

        let votes_cast = IntCounter::new(
            "vote_ledger_votes_cast_total",
            "Total number of votes appended to the chain",
        )?;
        registry.register(Box::new(votes_cast.clone()))?;

        let votes_rejected = IntCounter::new(
            "vote_ledger_votes_rejected_total",
            "Total number of votes rejected for unknown candidates",
        )?;
        registry.register(Box::new(votes_rejected.clone()))?;

        let validations = IntCounter::new(
            "vote_ledger_validations_total",
            "Total number of chain validation runs",
        )?;
        registry.register(Box::new(validations.clone()))?;

        let validation_failures = IntCounter::new(
            "vote_ledger_validation_failures_total",
            "Total number of validation runs that detected tampering",
        )?;
        registry.register(Box::new(validation_failures.clone()))?;

        let chain_length = IntGauge::new(
            "vote_ledger_chain_length",
            "Number of records in the chain, genesis included",
        )?;
        registry.register(Box::new(chain_length.clone()))?;

        let validate_duration = Histogram::with_opts(
            HistogramOpts::new(
                "vote_ledger_validate_duration_seconds",
                "Histogram of chain validation latencies",
            )
            .buckets(vec![0.0001, 0.0005, 0.001, 0.005, 0.010, 0.050, 0.100, 0.500, 1.0]),
        )?;
        registry.register(Box::new(validate_duration.clone()))?;

        Ok(Self {
            votes_cast,
            votes_rejected,
            validations,
            validation_failures,
            chain_length,
            validate_duration,
            registry,
        })
    }

    /// Record an accepted vote
    pub fn record_vote_cast(&self, chain_length: usize) {
        self.votes_cast.inc();
        self.chain_length.set(chain_length as i64);
    }

    /// Record a rejected vote
    pub fn record_vote_rejected(&self) {
        self.votes_rejected.inc();
    }

    /// Record a validation run
    pub fn record_validation(&self, passed: bool, duration_seconds: f64) {
        self.validations.inc();
        if !passed {
            self.validation_failures.inc();
        }
        self.validate_duration.observe(duration_seconds);
    }

    /// Set chain length directly
    pub fn update_chain_length(&self, chain_length: usize) {
        self.chain_length.set(chain_length as i64);
    }

    /// Prometheus text exposition of all metrics
    pub fn render(&self) -> prometheus::Result<String> {
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&self.registry.gather(), &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }
}
