//! # Plans
//!
//! An ordered sequence of step strings produced by the planner. Plans are
//! never mutated in place; filtering, truncation, and splicing all return a
//! fresh plan, so the runner can hold an immutable snapshot per iteration.

use serde::{Deserialize, Serialize};

/// The phrases a plan line must contain to survive filtering.
pub const ACTION_VOCABULARY: [&str; 3] = ["clean the room", "dust the room", "do nothing"];

/// The single step of the sentinel plan returned when the oracle fails.
pub const SENTINEL_STEP: &str = "unknown state";

/// Default cap on executable plan length.
///
/// Oracle output is untrusted; without the cap a chatty model could keep the
/// runner busy indefinitely.
pub const DEFAULT_MAX_PLAN_LEN: usize = 5;

/// An ordered sequence of action steps.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Plan {
    steps: Vec<String>,
}

impl Plan {
    /// Create a plan from explicit steps
    pub fn new(steps: Vec<String>) -> Self {
        Self { steps }
    }

    /// The sentinel plan signalling an oracle failure
    pub fn sentinel() -> Self {
        Self {
            steps: vec![SENTINEL_STEP.to_string()],
        }
    }

    /// Build the unfiltered plan from raw oracle output: non-empty lines,
    /// surrounding whitespace trimmed, order preserved.
    pub fn from_response(text: &str) -> Self {
        let steps = text
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .map(str::to_string)
            .collect();
        Self { steps }
    }

    /// Retain only steps containing a recognized vocabulary phrase
    /// (case-insensitive substring). Everything else - commentary,
    /// numbering artifacts, unrecognized tool calls - is dropped.
    pub fn filtered(&self) -> Plan {
        let steps = self
            .steps
            .iter()
            .filter(|step| {
                let lowered = step.to_lowercase();
                ACTION_VOCABULARY.iter().any(|phrase| lowered.contains(phrase))
            })
            .cloned()
            .collect();
        Plan { steps }
    }

    /// Keep only the first `max` steps
    pub fn truncated(mut self, max: usize) -> Plan {
        self.steps.truncate(max);
        self
    }

    /// Replace everything after `index` with `replacement`: the result is
    /// `steps[..=index]` followed by the replacement's steps.
    pub fn splice_after(&self, index: usize, replacement: &Plan) -> Plan {
        let mut steps: Vec<String> = self.steps[..=index].to_vec();
        steps.extend(replacement.steps.iter().cloned());
        Plan { steps }
    }

    /// The steps after `index` (the not-yet-executed suffix)
    pub fn suffix_after(&self, index: usize) -> &[String] {
        &self.steps[index + 1..]
    }

    /// All steps in order
    pub fn steps(&self) -> &[String] {
        &self.steps
    }

    pub fn len(&self) -> usize {
        self.steps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.steps.is_empty()
    }

    /// True when any step is the sentinel
    pub fn contains_sentinel(&self) -> bool {
        self.steps.iter().any(|s| s == SENTINEL_STEP)
    }
}
