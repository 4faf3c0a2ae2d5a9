//! # Step journal
//!
//! A bounded FIFO of executed steps. The transcript is embedded in planning
//! prompts so the oracle can see what was already tried; only the most
//! recent entries are kept so prompts stay small.

use crate::environment::RoomState;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::fmt;

/// How many records the journal retains; oldest entries drop first.
pub const JOURNAL_LIMIT: usize = 5;

/// One executed step: the state observed after the effect, the raw step
/// text, and the actuator's outcome message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepRecord {
    pub observation: RoomState,
    pub step: String,
    pub outcome: String,
}

impl fmt::Display for StepRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Observation: {}, Action: {}, Outcome: {}",
            self.observation, self.step, self.outcome
        )
    }
}

/// Bounded memory of past observations, actions, and outcomes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Journal {
    entries: VecDeque<StepRecord>,
    limit: usize,
}

impl Default for Journal {
    fn default() -> Self {
        Self {
            entries: VecDeque::new(),
            limit: JOURNAL_LIMIT,
        }
    }
}

impl Journal {
    /// Create a journal with the default retention limit
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a journal retaining at most `limit` records
    pub fn with_limit(limit: usize) -> Self {
        Self {
            entries: VecDeque::new(),
            limit,
        }
    }

    /// Append a record, dropping the oldest entries past the limit
    pub fn record(&mut self, observation: RoomState, step: &str, outcome: &str) {
        self.entries.push_back(StepRecord {
            observation,
            step: step.to_string(),
            outcome: outcome.to_string(),
        });
        while self.entries.len() > self.limit {
            self.entries.pop_front();
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Records in append order, oldest first
    pub fn iter(&self) -> impl Iterator<Item = &StepRecord> {
        self.entries.iter()
    }

    /// Render the journal for prompt embedding, one record per line.
    pub fn transcript(&self) -> String {
        if self.entries.is_empty() {
            return "No memory available.".to_string();
        }
        self.entries
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_transcript() {
        assert_eq!(Journal::new().transcript(), "No memory available.");
    }

    #[test]
    fn test_record_and_transcript() {
        let mut journal = Journal::new();
        journal.record(RoomState::Clean, "clean the room", "You cleaned the room.");

        let transcript = journal.transcript();
        assert_eq!(
            transcript,
            "Observation: clean, Action: clean the room, Outcome: You cleaned the room."
        );
    }

    #[test]
    fn test_bounded_to_most_recent_five() {
        let mut journal = Journal::new();
        for i in 0..8 {
            journal.record(RoomState::Messy, &format!("step {}", i), "outcome");
        }

        assert_eq!(journal.len(), JOURNAL_LIMIT);
        let steps: Vec<&str> = journal.iter().map(|r| r.step.as_str()).collect();
        assert_eq!(steps, ["step 3", "step 4", "step 5", "step 6", "step 7"]);
    }

    #[test]
    fn test_custom_limit() {
        let mut journal = Journal::with_limit(2);
        journal.record(RoomState::Messy, "a", "x");
        journal.record(RoomState::Dusty, "b", "y");
        journal.record(RoomState::Clean, "c", "z");

        assert_eq!(journal.len(), 2);
        assert_eq!(journal.iter().next().unwrap().step, "b");
    }
}
