//! # Room environment
//!
//! A single symbolic state plus a goal predicate. States are an explicit
//! enum rather than free-form strings; the only place a label enters from
//! the outside is [`Environment::change_state`], which validates it.

use crate::error::{self, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The symbolic states a room can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RoomState {
    #[serde(rename = "messy")]
    Messy,
    #[serde(rename = "dusty")]
    Dusty,
    #[serde(rename = "less messy")]
    LessMessy,
    #[serde(rename = "clean")]
    Clean,
}

impl RoomState {
    /// All states, in the order the original tutorial enumerates them
    pub const ALL: [RoomState; 4] = [
        RoomState::Messy,
        RoomState::Clean,
        RoomState::Dusty,
        RoomState::LessMessy,
    ];

    /// The human-readable label for this state
    pub fn as_str(&self) -> &'static str {
        match self {
            RoomState::Messy => "messy",
            RoomState::Dusty => "dusty",
            RoomState::LessMessy => "less messy",
            RoomState::Clean => "clean",
        }
    }
}

impl fmt::Display for RoomState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for RoomState {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "messy" => Ok(RoomState::Messy),
            "dusty" => Ok(RoomState::Dusty),
            "less messy" => Ok(RoomState::LessMessy),
            "clean" => Ok(RoomState::Clean),
            _ => Err(error::invalid_state(s).with_operation("environment::parse_state")),
        }
    }
}

/// A simple environment with a current state and a goal state.
#[derive(Debug, Clone)]
pub struct Environment {
    current: RoomState,
    goal: RoomState,
}

impl Environment {
    /// Create an environment with an initial and a goal state
    pub fn new(initial: RoomState, goal: RoomState) -> Self {
        Self {
            current: initial,
            goal,
        }
    }

    /// The current state; no side effect
    pub fn state(&self) -> RoomState {
        self.current
    }

    /// The goal state
    pub fn goal(&self) -> RoomState {
        self.goal
    }

    /// Overwrite the current state with a typed value
    pub fn set_state(&mut self, state: RoomState) {
        self.current = state;
    }

    /// Overwrite the current state from an external label.
    ///
    /// This is the validation boundary: unrecognized labels are rejected
    /// instead of being stored silently.
    pub fn change_state(&mut self, label: &str) -> Result<RoomState> {
        let state: RoomState = label
            .parse()
            .map_err(|e: crate::Error| e.with_operation("environment::change_state"))?;
        self.current = state;
        Ok(state)
    }

    /// True iff the current state equals the goal state
    pub fn is_goal_state(&self) -> bool {
        self.current == self.goal
    }
}
