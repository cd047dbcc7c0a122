//! Per-candidate vote counts in registration order

use crate::types::Ballot;
use serde::Serialize;
use std::collections::HashMap;

/// Vote count for one candidate
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CandidateTally {
    /// Candidate name (case-sensitive)
    pub name: String,
    /// Votes received
    pub votes: u64,
}

/// Insertion-ordered mapping from candidate name to vote count
#[derive(Debug, Clone, Default)]
pub struct Tally {
    entries: Vec<CandidateTally>,
    index: HashMap<String, usize>,
}

impl Tally {
    /// Create empty tally
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a candidate with zero votes; returns false if already present
    pub fn register(&mut self, name: &str) -> bool {
        if self.index.contains_key(name) {
            return false;
        }
        self.index.insert(name.to_string(), self.entries.len());
        self.entries.push(CandidateTally {
            name: name.to_string(),
            votes: 0,
        });
        true
    }

    /// Whether the candidate is registered
    pub fn contains(&self, name: &str) -> bool {
        self.index.contains_key(name)
    }

    /// Add one vote; returns false for an unknown candidate
    pub fn increment(&mut self, name: &str) -> bool {
        match self.index.get(name) {
            Some(&i) => {
                self.entries[i].votes += 1;
                true
            }
            None => false,
        }
    }

    /// Votes for a candidate
    pub fn get(&self, name: &str) -> Option<u64> {
        self.index.get(name).map(|&i| self.entries[i].votes)
    }

    /// Entries in registration order
    pub fn entries(&self) -> &[CandidateTally] {
        &self.entries
    }

    /// Owned `(name, votes)` snapshot in registration order
    pub fn snapshot(&self) -> Vec<(String, u64)> {
        self.entries
            .iter()
            .map(|e| (e.name.clone(), e.votes))
            .collect()
    }

    /// Number of candidates
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no candidate is registered
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total votes across all candidates
    pub fn total(&self) -> u64 {
        self.entries.iter().map(|e| e.votes).sum()
    }

    /// Count ballots per candidate, keeping this tally's candidate order
    ///
    /// Ballots naming a candidate outside this tally are counted under
    /// their own entries, appended in first-seen order.
    pub fn recount<'a>(&self, ballots: impl IntoIterator<Item = &'a Ballot>) -> Tally {
        let mut recount = Tally::new();
        for entry in &self.entries {
            recount.register(&entry.name);
        }
        for ballot in ballots {
            recount.register(&ballot.candidate);
            recount.increment(&ballot.candidate);
        }
        recount
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_register_idempotent() {
        let mut tally = Tally::new();
        assert!(tally.register("A"));
        tally.increment("A");
        assert!(!tally.register("A"));

        assert_eq!(tally.len(), 1);
        assert_eq!(tally.get("A"), Some(1));
    }

    #[test]
    fn test_registration_order_preserved() {
        let mut tally = Tally::new();
        for name in ["Zed", "Amy", "Mo"] {
            tally.register(name);
        }
        let names: Vec<_> = tally.entries().iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Zed", "Amy", "Mo"]);
    }

    #[test]
    fn test_case_sensitive() {
        let mut tally = Tally::new();
        tally.register("alice");
        assert!(!tally.contains("Alice"));
        assert!(!tally.increment("Alice"));
        assert_eq!(tally.total(), 0);
    }

    #[test]
    fn test_recount() {
        let mut tally = Tally::new();
        tally.register("A");
        tally.register("B");

        let ballots = vec![
            Ballot::new("n1", "id1", "B"),
            Ballot::new("n2", "id2", "B"),
            Ballot::new("n3", "id3", "C"),
        ];
        let recount = tally.recount(&ballots);

        assert_eq!(
            recount.snapshot(),
            vec![
                ("A".to_string(), 0),
                ("B".to_string(), 2),
                ("C".to_string(), 1)
            ]
        );
    }
}
