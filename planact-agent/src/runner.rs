//! # Plan runner
//!
//! The dynamic re-planning loop. Each outer cycle observes the environment,
//! asks the planner for a plan, filters and truncates it, then executes it
//! step by step: goal check before every step, actuate, re-observe, ask the
//! planner to revise the remaining suffix, and splice the revision in when
//! it differs. The run ends when the goal is reached or the cycle budget is
//! exhausted; both are normal terminations.
//!
//! The plan is snapshotted per iteration: every update produces a fresh
//! plan value, so splicing never shifts indices under an iterator. A splice
//! may lengthen the plan, so each cycle executes at most `max_plan_len`
//! steps; that budget is what keeps oracle-driven step counts from looping
//! indefinitely.

use crate::planner::{PlanMode, Planner};
use planact_core::{
    Actuator, Environment, Journal, LlmProvider, RoomState, DEFAULT_MAX_PLAN_LEN,
};
use serde::{Deserialize, Serialize};

/// Configuration for a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// How many outer ReAct cycles to attempt
    pub cycles: usize,
    /// Cap on executable plan length per cycle
    pub max_plan_len: usize,
    /// Print raw steps as they reach the actuator
    pub debug: bool,
    /// Suppress the console transcript
    pub quiet: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            cycles: 3,
            max_plan_len: DEFAULT_MAX_PLAN_LEN,
            debug: false,
            quiet: false,
        }
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunOutcome {
    GoalAchieved,
    GoalNotAchieved,
}

/// Final report of a run
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunReport {
    pub outcome: RunOutcome,
    pub cycles_run: usize,
    pub final_state: RoomState,
}

impl RunReport {
    pub fn goal_achieved(&self) -> bool {
        self.outcome == RunOutcome::GoalAchieved
    }
}

/// Executes plans against an environment, re-planning after every step.
pub struct PlanRunner<P> {
    planner: Planner<P>,
    actuator: Actuator,
    journal: Journal,
    config: RunnerConfig,
}

impl<P: LlmProvider> PlanRunner<P> {
    pub fn new(planner: Planner<P>) -> Self {
        Self::with_config(planner, RunnerConfig::default())
    }

    pub fn with_config(planner: Planner<P>, config: RunnerConfig) -> Self {
        Self {
            planner,
            actuator: Actuator::new().with_debug(config.debug),
            journal: Journal::new(),
            config,
        }
    }

    pub fn planner(&self) -> &Planner<P> {
        &self.planner
    }

    /// The bounded memory of executed steps across all cycles
    pub fn journal(&self) -> &Journal {
        &self.journal
    }

    fn log(&self, line: impl AsRef<str>) {
        if !self.config.quiet {
            println!("{}", line.as_ref());
        }
    }

    /// Run the ReAct loop until the goal is reached or the cycle budget is
    /// exhausted. Never fails: oracle errors become the sentinel plan inside
    /// the planner, and everything else is a pure in-memory transformation.
    pub async fn run(&mut self, env: &mut Environment, goal: &str) -> RunReport {
        for cycle in 1..=self.config.cycles {
            self.log(format!("--- ReAct Cycle {} ---", cycle));

            let observation = env.state();
            self.log(format!("Observation: The room is {}", observation));

            let raw = self
                .planner
                .plan(observation, goal, PlanMode::Initial, &self.journal)
                .await;
            let plan = raw.filtered();
            self.log(format!(
                "Filtered Plan: {:?} (Retaining only valid actions)",
                plan.steps()
            ));

            if plan.is_empty() || plan.contains_sentinel() {
                self.log(
                    "No valid plan generated. This could be due to unexpected LLM output \
                     or no suitable action. Skipping cycle.",
                );
                continue;
            }

            self.log("Generated Plan:");
            for (i, step) in plan.steps().iter().enumerate() {
                self.log(format!("  {}. {}", i + 1, step));
            }

            let mut plan = plan.truncated(self.config.max_plan_len);
            let mut index = 0;
            let mut executed = 0;

            while index < plan.len() && index < self.config.max_plan_len {
                if env.is_goal_state() {
                    self.log("Goal already achieved. Skipping remaining actions.");
                    break;
                }

                let step = plan.steps()[index].clone();
                let outcome = self.actuator.apply(&step, env, &mut self.journal);
                self.log(format!("Step {}: {}", index + 1, outcome));
                self.log(format!("Updated Environment State: {}", env.state()));
                executed = index + 1;

                let new_observation = env.state();
                let replanned = self
                    .planner
                    .plan(new_observation, goal, PlanMode::Replan, &self.journal)
                    .await
                    .filtered();

                // Decision rule, in priority order. The "redundant" branch is
                // only reachable when the revision equals the remaining
                // suffix; it is kept in this order on purpose.
                if !replanned.is_empty() && replanned.steps() != plan.suffix_after(index) {
                    plan = plan.splice_after(index, &replanned);
                    self.log("Replanning Triggered!");
                    self.log(format!("Plan updated dynamically: {:?}", plan.steps()));
                } else if !replanned.is_empty() && replanned.steps()[0] == step {
                    self.log("Replanned action matches the current step. No need to re-execute.");
                } else if !replanned.is_empty() {
                    self.log(
                        "Replanning did not result in any changes. \
                         Continuing with the current plan.",
                    );
                } else {
                    self.log(
                        "Replanning resulted in no valid actions. \
                         Continuing with the current plan.",
                    );
                }

                index += 1;
            }

            if !env.is_goal_state() {
                self.log(
                    "This cycle's plan execution is complete, but the goal is not yet achieved.",
                );
            }

            self.log(format!(
                "Cycle {} Summary: Executed = {:?}, Remaining = {:?}, State = {}",
                cycle,
                &plan.steps()[..executed],
                &plan.steps()[executed..],
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
            cycles_run: self.config.cycles,
            final_state: env.state(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planact_core::{ScriptedProvider, JOURNAL_LIMIT};

    fn quiet_config(cycles: usize) -> RunnerConfig {
        RunnerConfig {
            cycles,
            quiet: true,
            ..RunnerConfig::default()
        }
    }

    fn runner(script: &[&str], cycles: usize) -> PlanRunner<ScriptedProvider> {
        PlanRunner::with_config(
            Planner::new(ScriptedProvider::from_lines(script)),
            quiet_config(cycles),
        )
    }

    #[tokio::test]
    async fn test_run_reaches_goal() {
        let mut env = Environment::new(RoomState::Messy, RoomState::Clean);
        let mut runner = runner(&["1. clean the room", "1. do nothing"], 3);

        let report = runner.run(&mut env, "Make the room clean.").await;

        assert!(report.goal_achieved());
        assert_eq!(report.final_state, RoomState::Clean);
        assert_eq!(report.cycles_run, 1);
        assert_eq!(env.state(), RoomState::Clean);
        // One planning call, plus at most one replanning call after the
        // only executed step.
        assert!(runner.planner().provider().calls() <= 2);
    }

    #[tokio::test]
    async fn test_run_fails_when_output_has_no_vocabulary() {
        let mut env = Environment::new(RoomState::Messy, RoomState::Clean);
        let mut runner = runner(&["I have no idea what you are talking about"], 3);

        let report = runner.run(&mut env, "Make the room clean.").await;

        assert!(!report.goal_achieved());
        assert_eq!(report.cycles_run, 3);
        assert_eq!(report.final_state, RoomState::Messy);
        // Every cycle is abandoned before execution, so only the three
        // initial planning calls happen.
        assert_eq!(runner.planner().provider().calls(), 3);
        assert!(runner.journal().is_empty());
    }

    #[tokio::test]
    async fn test_oracle_failure_is_soft() {
        let mut env = Environment::new(RoomState::Dusty, RoomState::Clean);
        let mut runner = PlanRunner::with_config(
            Planner::new(ScriptedProvider::failing("socket closed")),
            quiet_config(3),
        );

        let report = runner.run(&mut env, "Make the room clean.").await;

        assert!(!report.goal_achieved());
        assert_eq!(report.final_state, RoomState::Dusty);
    }

    #[tokio::test]
    async fn test_replanning_splices_and_goal_short_circuits() {
        let mut env = Environment::new(RoomState::Messy, RoomState::Clean);
        // Initial plan has three steps; the replanning call after the first
        // step revises the remainder down to a single "do nothing", which
        // the goal pre-check then skips entirely.
        let mut runner = runner(
            &[
                "1. clean the room\n2. dust the room\n3. do nothing",
                "1. do nothing",
            ],
            3,
        );

        let report = runner.run(&mut env, "Make the room clean.").await;

        assert!(report.goal_achieved());
        // Only "clean the room" was actually executed.
        assert_eq!(runner.journal().len(), 1);
        assert_eq!(runner.journal().iter().next().unwrap().step, "1. clean the room");
        assert_eq!(runner.planner().provider().calls(), 2);
    }

    #[tokio::test]
    async fn test_identical_revision_does_not_splice() {
        // Goal can never be reached: nothing makes a room messy again.
        let mut env = Environment::new(RoomState::Clean, RoomState::Messy);
        // After the first step the revision equals the remaining suffix and
        // matches the step just executed; after the second the revision has
        // no recognized vocabulary. Neither splices.
        let mut runner = runner(
            &["do nothing\ndo nothing", "do nothing", "no further suggestions"],
            1,
        );

        let report = runner.run(&mut env, "Make the room messy.").await;

        assert!(!report.goal_achieved());
        // Both original steps executed; no splice grew the plan.
        assert_eq!(runner.journal().len(), 2);
        // One initial call plus one replanning call per executed step.
        assert_eq!(runner.planner().provider().calls(), 3);
    }

    #[tokio::test]
    async fn test_step_budget_bounds_growing_plans() {
        let mut env = Environment::new(RoomState::Messy, RoomState::Clean);
        // Every replanning call returns a non-empty revision that differs
        // from the (eventually empty) suffix, so the plan keeps growing;
        // the per-cycle step budget has to stop it.
        let mut runner = runner(
            &["1. dust the room\n2. dust the room\n3. dust the room", "1. do nothing"],
            1,
        );

        let report = runner.run(&mut env, "Make the room clean.").await;

        assert!(!report.goal_achieved());
        assert_eq!(report.final_state, RoomState::LessMessy);
        // Exactly max_plan_len steps executed, and the journal is full.
        assert_eq!(runner.journal().len(), JOURNAL_LIMIT);
        // One initial plan plus one replanning call per executed step.
        assert_eq!(runner.planner().provider().calls(), 1 + DEFAULT_MAX_PLAN_LEN);
    }

    #[test]
    fn test_report_serialization() {
        let report = RunReport {
            outcome: RunOutcome::GoalAchieved,
            cycles_run: 1,
            final_state: RoomState::Clean,
        };
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["outcome"], "goal_achieved");
        assert_eq!(json["final_state"], "clean");
    }
}
