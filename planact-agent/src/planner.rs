//! # Planner
//!
//! Builds the planning prompt and asks the reasoning oracle for a plan.
//! The oracle gets exactly one attempt per call: any provider error is
//! logged and converted to the sentinel plan, never propagated. Vocabulary
//! filtering is the runner's job; the planner returns the raw line split.

use planact_core::{
    ChatMessage, CompletionRequest, Journal, LlmProvider, Plan, RoomState,
};

/// Whether the oracle is asked to create a fresh plan or to revise one
/// mid-execution. The two framings must be distinguishable to the oracle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PlanMode {
    Initial,
    Replan,
}

impl PlanMode {
    fn directive(&self) -> &'static str {
        match self {
            PlanMode::Initial => "Create a plan",
            PlanMode::Replan => "Replan",
        }
    }
}

/// Asks the provider for plans.
pub struct Planner<P> {
    provider: P,
    model: Option<String>,
}

impl<P: LlmProvider> Planner<P> {
    pub fn new(provider: P) -> Self {
        Self {
            provider,
            model: None,
        }
    }

    /// Override the provider's default model
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = Some(model.into());
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    /// The planning prompt: goal, observation, memory transcript, and the
    /// mode-specific directive.
    pub fn build_prompt(
        observation: RoomState,
        goal: &str,
        mode: PlanMode,
        journal: &Journal,
    ) -> String {
        format!(
            "You are an agent in a simple environment. Your current goal is: {goal}\n\
             You have observed: the room is {observation}\n\n\
             Here is your memory of past observations, actions, and outcomes:\n\
             {transcript}\n\n\
             {directive} (a sequence of actions) to achieve your goal. \
             List the actions as numbered steps.\n\n\
             Plan:\n",
            goal = goal,
            observation = observation,
            transcript = journal.transcript(),
            directive = mode.directive(),
        )
    }

    /// Ask the oracle for a plan.
    ///
    /// Returns the unfiltered plan: the oracle's response split into
    /// non-empty trimmed lines. On any provider failure (or an empty
    /// response) the sentinel plan is returned instead; no error escapes.
    pub async fn plan(
        &self,
        observation: RoomState,
        goal: &str,
        mode: PlanMode,
        journal: &Journal,
    ) -> Plan {
        let prompt = Self::build_prompt(observation, goal, mode, journal);

        let mut request =
            CompletionRequest::new(vec![ChatMessage::user(prompt)]).with_temperature(0.0);
        if let Some(model) = &self.model {
            request = request.with_model(model.clone());
        }

        match self.provider.complete(request).await {
            Ok(response) => match response.content {
                Some(content) => Plan::from_response(&content),
                None => {
                    eprintln!("Error during LLM call: empty response");
                    Plan::sentinel()
                }
            },
            Err(e) => {
                eprintln!("Error during LLM call: {}", e);
                Plan::sentinel()
            }
        }
    }
}
