//! Actor-based concurrency for a voting session
//!
//! Appending reads the chain tail and then pushes; two appends racing on the
//! same tail would fork the chain. The session actor owns the
//! [`VotingSession`] outright and handles one message at a time, so every
//! append and every validation runs against a whole chain.
//!
//! # Architecture
//!
//! ```text
//! ┌───────────────────────────────────────────┐
//! │     Front ends (CLI, tests, services)      │
//! └──────────────────────┬────────────────────┘
//!                        │
//!                        ▼
//! ┌───────────────────────────────────────────┐
//! │          SessionHandle (Clone)             │
//! │     Sends messages to actor mailbox        │
//! └──────────────────────┬────────────────────┘
//!                        │ mpsc::channel (bounded)
//!                        ▼
//! ┌───────────────────────────────────────────┐
//! │        SessionActor (Single Task)          │
//! │   VotingSession: ledger + tally + votes    │
//! │   Metrics: counters, chain length gauge    │
//! └───────────────────────────────────────────┘
//! ```

use crate::metrics::Metrics;
use crate::record::Record;
use crate::session::VotingSession;
use crate::types::{Vote, VoteRequest};
use crate::{Error, Result};
use std::time::Instant;
use tokio::sync::{mpsc, oneshot};

/// Message sent to the session actor
#[derive(Debug)]
pub enum SessionMessage {
    /// Register a candidate
    RegisterCandidate {
        /// Candidate name as entered
        name: String,
        /// Registration outcome
        response: oneshot::Sender<Result<()>>,
    },

    /// Submit a vote
    Submit {
        /// Ballot and optional photo path
        request: VoteRequest,
        /// Receipt, or the rejection
        response: oneshot::Sender<Result<Vote>>,
    },

    /// Snapshot of the tally
    Candidates {
        /// Names and counts in registration order
        response: oneshot::Sender<Vec<(String, u64)>>,
    },

    /// Snapshot of the vote list
    Votes {
        /// Accepted votes in order
        response: oneshot::Sender<Vec<Vote>>,
    },

    /// Snapshot of the chain
    Records {
        /// Copy of every record, genesis first
        response: oneshot::Sender<Vec<Record>>,
    },

    /// Validate the chain
    Validate {
        /// Whether the chain passed
        response: oneshot::Sender<bool>,
    },

    /// Recount the chain against the tally
    Audit {
        /// Recount outcome
        response: oneshot::Sender<Result<()>>,
    },

    /// Stop the actor and hand the session back
    Shutdown {
        /// Session as it stood when the actor stopped
        response: oneshot::Sender<VotingSession>,
    },
}

/// Actor that owns a voting session
#[derive(Debug)]
pub struct SessionActor {
    /// Owned session
    session: VotingSession,

    /// Mailbox for incoming messages
    mailbox: mpsc::Receiver<SessionMessage>,

    /// Metrics, if enabled
    metrics: Option<Metrics>,
}

impl SessionActor {
    /// Create new actor
    pub fn new(
        session: VotingSession,
        mailbox: mpsc::Receiver<SessionMessage>,
        metrics: Option<Metrics>,
    ) -> Self {
        if let Some(ref metrics) = metrics {
            metrics.update_chain_length(session.ledger().len());
        }
        Self {
            session,
            mailbox,
            metrics,
        }
    }

    /// Run the actor event loop
    pub async fn run(mut self) {
        while let Some(msg) = self.mailbox.recv().await {
            if let SessionMessage::Shutdown { response } = msg {
                tracing::info!(
                    chain_length = self.session.ledger().len(),
                    "Session actor shutting down"
                );
                let _ = response.send(self.session);
                return;
            }
            self.handle_message(msg);
        }

        tracing::debug!("Session mailbox closed");
    }

    /// Handle a single message
    fn handle_message(&mut self, msg: SessionMessage) {
        match msg {
            SessionMessage::RegisterCandidate { name, response } => {
                let _ = response.send(self.session.register_candidate(&name));
            }

            SessionMessage::Submit { request, response } => {
                let result = self.session.submit(request);
                if let Some(ref metrics) = self.metrics {
                    match &result {
                        Ok(_) => metrics.record_vote_cast(self.session.ledger().len()),
                        Err(_) => metrics.record_vote_rejected(),
                    }
                }
                let _ = response.send(result);
            }

            SessionMessage::Candidates { response } => {
                let _ = response.send(self.session.candidates());
            }

            SessionMessage::Votes { response } => {
                let _ = response.send(self.session.votes().to_vec());
            }

            SessionMessage::Records { response } => {
                let _ = response.send(self.session.ledger().records().to_vec());
            }

            SessionMessage::Validate { response } => {
                let started = Instant::now();
                let valid = self.session.validate();
                if let Some(ref metrics) = self.metrics {
                    metrics.record_validation(valid, started.elapsed().as_secs_f64());
                }
                let _ = response.send(valid);
            }

            SessionMessage::Audit { response } => {
                let _ = response.send(self.session.audit());
            }

            SessionMessage::Shutdown { .. } => {
                // Handled in run loop
            }
        }
    }
}

/// Handle for sending messages to the actor
#[derive(Clone, Debug)]
pub struct SessionHandle {
    sender: mpsc::Sender<SessionMessage>,
}

impl SessionHandle {
    /// Create new handle
    pub fn new(sender: mpsc::Sender<SessionMessage>) -> Self {
        Self { sender }
    }

    async fn request<T>(
        &self,
        build: impl FnOnce(oneshot::Sender<T>) -> SessionMessage,
    ) -> Result<T> {
        let (tx, rx) = oneshot::channel();
        self.sender
            .send(build(tx))
            .await
            .map_err(|_| Error::Concurrency("Actor mailbox closed".to_string()))?;

        rx.await
            .map_err(|_| Error::Concurrency("Response channel closed".to_string()))
    }

    /// Register a candidate
    pub async fn register_candidate(&self, name: impl Into<String>) -> Result<()> {
        let name = name.into();
        self.request(|response| SessionMessage::RegisterCandidate { name, response })
            .await?
    }

    /// Submit a vote and return its receipt
    pub async fn submit(&self, request: VoteRequest) -> Result<Vote> {
        self.request(|response| SessionMessage::Submit { request, response })
            .await?
    }

    /// Cast a vote; `Ok(false)` if the candidate is not registered
    pub async fn cast_vote(
        &self,
        voter_name: &str,
        voter_id: &str,
        candidate: &str,
    ) -> Result<bool> {
        match self
            .submit(VoteRequest::new(voter_name, voter_id, candidate))
            .await
        {
            Ok(_) => Ok(true),
            Err(Error::InvalidCandidate(_)) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Snapshot of `(candidate, votes)` in registration order
    pub async fn candidates(&self) -> Result<Vec<(String, u64)>> {
        self.request(|response| SessionMessage::Candidates { response })
            .await
    }

    /// Snapshot of accepted votes
    pub async fn votes(&self) -> Result<Vec<Vote>> {
        self.request(|response| SessionMessage::Votes { response })
            .await
    }

    /// Snapshot of the chain
    pub async fn records(&self) -> Result<Vec<Record>> {
        self.request(|response| SessionMessage::Records { response })
            .await
    }

    /// Validate the chain
    pub async fn validate(&self) -> Result<bool> {
        self.request(|response| SessionMessage::Validate { response })
            .await
    }

    /// Recount the chain against the tally
    pub async fn audit(&self) -> Result<()> {
        self.request(|response| SessionMessage::Audit { response })
            .await?
    }

    /// Stop the actor and take the session back
    pub async fn shutdown(&self) -> Result<VotingSession> {
        self.request(|response| SessionMessage::Shutdown { response })
            .await
    }
}

/// Spawn the session actor
pub fn spawn_session_actor(
    session: VotingSession,
    mailbox_capacity: usize,
    metrics: Option<Metrics>,
) -> SessionHandle {
    let (tx, rx) = mpsc::channel(mailbox_capacity); // Bounded channel for backpressure
    let actor = SessionActor::new(session, rx, metrics);

    tokio::spawn(async move {
        actor.run().await;
    });

    SessionHandle::new(tx)
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn spawn_with(candidates: &[&str]) -> SessionHandle {
        let handle = spawn_session_actor(VotingSession::new(), 16, None);
        for name in candidates {
            handle.register_candidate(*name).await.unwrap();
        }
        handle
    }

    #[tokio::test]
    async fn test_actor_spawn_and_shutdown() {
        let handle = spawn_with(&[]).await;
        let session = handle.shutdown().await.unwrap();
        assert_eq!(session.ledger().len(), 1);

        // Further requests fail once the actor is gone
        assert!(matches!(
            handle.validate().await,
            Err(Error::Concurrency(_))
        ));
    }

    #[tokio::test]
    async fn test_actor_cast_vote() {
        let handle = spawn_with(&["A", "B"]).await;

        assert!(handle.cast_vote("n1", "id1", "A").await.unwrap());
        assert!(!handle.cast_vote("n2", "id2", "Ghost").await.unwrap());

        assert_eq!(
            handle.candidates().await.unwrap(),
            vec![("A".to_string(), 1), ("B".to_string(), 0)]
        );
        assert_eq!(handle.votes().await.unwrap().len(), 1);
        assert_eq!(handle.records().await.unwrap().len(), 2);
        assert!(handle.validate().await.unwrap());
        handle.audit().await.unwrap();

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_concurrent_votes_stay_linked() {
        let handle = spawn_with(&["A", "B"]).await;

        let mut tasks = Vec::new();
        for i in 0..50 {
            let handle = handle.clone();
            tasks.push(tokio::spawn(async move {
                let candidate = if i % 2 == 0 { "A" } else { "B" };
                handle
                    .cast_vote(&format!("voter{}", i), &format!("id{}", i), candidate)
                    .await
                    .unwrap()
            }));
        }
        for task in tasks {
            assert!(task.await.unwrap());
        }

        let records = handle.records().await.unwrap();
        assert_eq!(records.len(), 51);
        for (i, record) in records.iter().enumerate() {
            assert_eq!(record.sequence_number(), i as u64);
        }
        assert!(handle.validate().await.unwrap());
        assert_eq!(
            handle.candidates().await.unwrap(),
            vec![("A".to_string(), 25), ("B".to_string(), 25)]
        );

        handle.shutdown().await.unwrap();
    }

    #[tokio::test]
    async fn test_actor_records_metrics() {
        let metrics = Metrics::new().unwrap();
        let handle = spawn_session_actor(VotingSession::new(), 16, Some(metrics.clone()));
        handle.register_candidate("A").await.unwrap();

        handle.cast_vote("n1", "id1", "A").await.unwrap();
        handle.cast_vote("n2", "id2", "Nope").await.unwrap();
        handle.validate().await.unwrap();

        assert_eq!(metrics.votes_cast.get(), 1);
        assert_eq!(metrics.votes_rejected.get(), 1);
        assert_eq!(metrics.chain_length.get(), 2);
        assert_eq!(metrics.validations.get(), 1);
        assert_eq!(metrics.validation_failures.get(), 0);

        handle.shutdown().await.unwrap();
    }
}
