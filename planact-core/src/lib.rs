//! # planact core
//!
//! Domain types for a ReAct agent that plans with an LLM and re-plans
//! after every executed step.
//!
//! ## Core Concepts
//! - **Environment**: a symbolic room state plus a goal predicate
//! - **Action**: the recognized action vocabulary and its effects
//! - **Plan**: an ordered sequence of step strings produced by the planner
//! - **Journal**: a bounded memory of executed steps and their outcomes
//! - **Provider**: trait-based LLM communication (OpenAI, Anthropic, scripted)

pub mod action;
pub mod environment;
pub mod error;
pub mod journal;
pub mod plan;
pub mod provider;

pub use action::{Action, Actuator};
pub use environment::{Environment, RoomState};
pub use error::{Error, ErrorKind, ErrorStatus, Result};
pub use journal::{Journal, StepRecord, JOURNAL_LIMIT};
pub use plan::{Plan, ACTION_VOCABULARY, DEFAULT_MAX_PLAN_LEN, SENTINEL_STEP};
pub use provider::{
    AnthropicProvider, ChatMessage, CompletionRequest, CompletionResponse, FinishReason,
    LlmProvider, OpenAIProvider, ProviderConfig, ProviderError, ProviderType, Role,
    ScriptedProvider, Usage,
};
