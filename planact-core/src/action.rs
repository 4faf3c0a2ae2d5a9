//! # Action vocabulary and actuator
//!
//! The actuator routes a free-text step to an effect on the environment.
//! Interpretation is split in two: a classification step mapping text to a
//! recognized [`Action`], and an effect step applying it. Classification is
//! an explicit ordered priority list of case-insensitive substring rules;
//! the first matching rule wins, so a step containing both "clean" and
//! "dust" is always routed to [`Action::Clean`].

use crate::environment::{Environment, RoomState};
use crate::journal::Journal;
use serde::{Deserialize, Serialize};

/// A recognized action, produced by classifying a raw step string.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Clean the room; the room becomes clean
    Clean,
    /// Dust the room; the room becomes less messy
    Dust,
    /// Do nothing (also "relax"); no state change
    NoOp,
    /// The planner signalled it does not know what to do
    Unknown,
}

/// Classification rules in priority order. First keyword match wins.
const CLASSIFICATION_ORDER: &[(&[&str], Action)] = &[
    (&["clean"], Action::Clean),
    (&["dust"], Action::Dust),
    (&["nothing", "relax"], Action::NoOp),
    (&["unknown"], Action::Unknown),
];

/// Classify a raw step string against the recognized vocabulary.
///
/// Matching is case-insensitive substring containment. Returns `None` when
/// no rule matches; the actuator answers those with a templated outcome.
pub fn classify(step: &str) -> Option<Action> {
    let lowered = step.to_lowercase();
    for (keywords, action) in CLASSIFICATION_ORDER {
        if keywords.iter().any(|k| lowered.contains(k)) {
            return Some(*action);
        }
    }
    None
}

/// Applies steps to the environment and records them in the journal.
#[derive(Debug, Clone, Copy, Default)]
pub struct Actuator {
    debug: bool,
}

impl Actuator {
    /// Create an actuator with debug printing disabled
    pub fn new() -> Self {
        Self::default()
    }

    /// Enable or disable printing of the raw step string
    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Apply a single step.
    ///
    /// Mutates the environment according to the classified action, appends a
    /// `(state-after, step, outcome)` record to the journal, and returns the
    /// human-readable outcome. Unrecognized steps are a no-op with an
    /// informational outcome, never an error.
    pub fn apply(&self, step: &str, env: &mut Environment, journal: &mut Journal) -> String {
        if self.debug {
            println!("Raw LLM Output: {}", step);
        }

        let outcome = match classify(step) {
            Some(Action::Clean) => {
                env.set_state(RoomState::Clean);
                "You cleaned the room. It is now clean.".to_string()
            }
            Some(Action::Dust) => {
                env.set_state(RoomState::LessMessy);
                "You dusted the room. It is now less messy, but still needs cleaning."
                    .to_string()
            }
            Some(Action::NoOp) => "You did nothing.".to_string(),
            Some(Action::Unknown) => "I don't know what to do in this state.".to_string(),
            None => format!("I don't know how to do '{}'.", step),
        };

        journal.record(env.state(), step, &outcome);
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn room(initial: RoomState) -> Environment {
        Environment::new(initial, RoomState::Clean)
    }

    #[test]
    fn test_classify_vocabulary() {
        assert_eq!(classify("clean the room"), Some(Action::Clean));
        assert_eq!(classify("Dust the shelves"), Some(Action::Dust));
        assert_eq!(classify("do nothing"), Some(Action::NoOp));
        assert_eq!(classify("just relax"), Some(Action::NoOp));
        assert_eq!(classify("unknown state"), Some(Action::Unknown));
        assert_eq!(classify("paint the walls"), None);
    }

    #[test]
    fn test_classify_first_match_wins() {
        // Contains both "clean" and "dust"; "clean" is checked first.
        assert_eq!(classify("clean then dust the room"), Some(Action::Clean));
        assert_eq!(classify("dust after you clean"), Some(Action::Clean));
    }

    #[test]
    fn test_apply_clean() {
        let mut env = room(RoomState::Messy);
        let mut journal = Journal::new();
        let outcome = Actuator::new().apply("clean the room", &mut env, &mut journal);

        assert_eq!(env.state(), RoomState::Clean);
        assert_eq!(outcome, "You cleaned the room. It is now clean.");
    }

    #[test]
    fn test_apply_dust() {
        let mut env = room(RoomState::Messy);
        let mut journal = Journal::new();
        let outcome = Actuator::new().apply("dust the room", &mut env, &mut journal);

        assert_eq!(env.state(), RoomState::LessMessy);
        assert!(outcome.contains("less messy"));
    }

    #[test]
    fn test_apply_noop_keeps_state() {
        let mut env = room(RoomState::Dusty);
        let mut journal = Journal::new();
        let outcome = Actuator::new().apply("do nothing", &mut env, &mut journal);

        assert_eq!(env.state(), RoomState::Dusty);
        assert_eq!(outcome, "You did nothing.");
    }

    #[test]
    fn test_apply_unrecognized_echoes_step() {
        let mut env = room(RoomState::Messy);
        let mut journal = Journal::new();
        let outcome = Actuator::new().apply("paint the walls", &mut env, &mut journal);

        assert_eq!(env.state(), RoomState::Messy);
        assert_eq!(outcome, "I don't know how to do 'paint the walls'.");
    }

    #[test]
    fn test_apply_records_state_after_the_effect() {
        let mut env = room(RoomState::Messy);
        let mut journal = Journal::new();
        Actuator::new().apply("clean the room", &mut env, &mut journal);

        let record = journal.iter().next().unwrap();
        assert_eq!(record.observation, RoomState::Clean);
        assert_eq!(record.step, "clean the room");
    }
}
