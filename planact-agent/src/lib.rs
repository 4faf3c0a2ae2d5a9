//! # planact agent
//!
//! Agent loops built on planact-core: an LLM planner with dynamic
//! re-planning, a rule-table baseline that needs no oracle, and a
//! tool-dispatch session for search/calculator style capabilities.

pub mod planner;
pub mod rules;
pub mod runner;
pub mod tools;

pub use planner::{PlanMode, Planner};
pub use rules::{rule_think, RuleAgent};
pub use runner::{PlanRunner, RunOutcome, RunReport, RunnerConfig};
pub use tools::{CalculatorTool, Dispatch, SearchTool, Tool, ToolAgent, ToolRegistry};
