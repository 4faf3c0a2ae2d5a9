//! # Rule-based baseline
//!
//! The oracle-free ReAct loop: a fixed observation -> action table stands
//! in for the planner. Useful as a smoke test of the environment and
//! actuator, and as the baseline the LLM-driven loop is compared against.

use crate::runner::{RunOutcome, RunReport};
use planact_core::{Actuator, Environment, Journal, RoomState};

/// The fixed rule table: what to do in each observed state.
pub fn rule_think(observation: RoomState) -> &'static str {
    match observation {
        RoomState::Messy => "clean the room",
        RoomState::Dusty => "dust the room",
        // If less messy, clean the room.
        RoomState::LessMessy => "clean the room",
        RoomState::Clean => "do nothing",
    }
}

/// A ReAct agent driven by the rule table instead of an oracle.
pub struct RuleAgent {
    actuator: Actuator,
    journal: Journal,
    cycles: usize,
    quiet: bool,
}

impl RuleAgent {
    pub fn new(cycles: usize) -> Self {
        Self {
            actuator: Actuator::new(),
            journal: Journal::new(),
            cycles,
            quiet: false,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn log(&self, line: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", line.as_ref());
        }
    }

    /// Run observe -> think -> act cycles until the goal is reached or the
    /// cycle budget runs out.
    pub fn run(&mut self, env: &mut Environment) -> RunReport {
        for cycle in 1..=self.cycles {
            self.log(format!("--- ReAct Cycle {} ---", cycle));

            let observation = env.state();
            self.log(format!("Observation: The room is {}", observation));

            let thought = rule_think(observation);
            self.log(format!("Thought: {}", thought));

            let outcome = self.actuator.apply(thought, env, &mut self.journal);
            self.log(format!("Action Result: {}", outcome));
            self.log(format!(
                "Cycle Complete: The room's current state is {}",
                env.state()
            ));

            if env.is_goal_state() {
                self.log("Goal achieved!");
                return RunReport {
                    outcome: RunOutcome::GoalAchieved,
                    cycles_run: cycle,
                    final_state: env.state(),
                };
            }
            self.log("--------------------");
        }

        self.log(format!("Goal not achieved. Final state: {}", env.state()));
        RunReport {
            outcome: RunOutcome::GoalNotAchieved,
            cycles_run: self.cycles,
            final_state: env.state(),
        }
    }
}
