//! # Tool dispatch
//!
//! Capabilities the agent can use from a plan line. A step is routed to a
//! tool when it contains the marker `Use <ToolName>:`; everything after the
//! marker is the tool's query. The registry remembers the most recent
//! result so a later step can reference it with the literal placeholder
//! `[Result from SearchTool]`. Tools answer with strings; a tool that
//! cannot handle its query answers with an informational message, never an
//! error.

use planact_core::{ChatMessage, CompletionRequest, LlmProvider, Plan};

/// The placeholder a step may use to reference the previous tool result.
pub const RESULT_PLACEHOLDER: &str = "[Result from SearchTool]";

/// A capability callable from a plan step.
pub trait Tool {
    /// The name matched against the `Use <ToolName>:` marker
    fn name(&self) -> &str;

    /// Run the tool on a query string
    fn invoke(&self, query: &str) -> String;
}

/// A simulated web search with canned answers.
#[derive(Debug, Clone, Copy, Default)]
pub struct SearchTool;

impl Tool for SearchTool {
    fn name(&self) -> &str {
        "SearchTool"
    }

    fn invoke(&self, query: &str) -> String {
        if query.to_lowercase().contains("population of london") {
            "8.982 million".to_string()
        } else {
            "Information not found.".to_string()
        }
    }
}

/// A calculator over `+ - * /`, parentheses, and unary minus.
#[derive(Debug, Clone, Copy, Default)]
pub struct CalculatorTool;

impl Tool for CalculatorTool {
    fn name(&self) -> &str {
        "Calculator"
    }

    fn invoke(&self, query: &str) -> String {
        match eval_expression(query) {
            Some(value) => format_number(value),
            None => "Invalid calculation.".to_string(),
        }
    }
}

/// A dispatched step: which tool ran and what it answered.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatch {
    pub tool: String,
    pub result: String,
}

/// Maps capability names to tools and routes plan steps to them.
#[derive(Default)]
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool + Send + Sync>>,
    last_result: Option<String>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool; later lookups check tools in registration order
    pub fn register(mut self, tool: impl Tool + Send + Sync + 'static) -> Self {
        self.tools.push(Box::new(tool));
        self
    }

    /// The registered capability names
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// The most recent tool result, if any
    pub fn last_result(&self) -> Option<&str> {
        self.last_result.as_deref()
    }

    /// Route a step to the first tool whose marker it contains.
    ///
    /// Returns `None` when no marker matches. The query is the text after
    /// the marker, trimmed; the result placeholder is substituted with the
    /// previous result before the tool runs.
    pub fn dispatch(&mut self, step: &str) -> Option<Dispatch> {
        for tool in &self.tools {
            let marker = format!("Use {}:", tool.name());
            let Some(position) = step.find(&marker) else {
                continue;
            };

            let mut query = step[position + marker.len()..].trim().to_string();
            if query.contains(RESULT_PLACEHOLDER) {
                match &self.last_result {
                    Some(previous) => {
                        query = query.replace(RESULT_PLACEHOLDER, previous);
                    }
                    None => {
                        return Some(Dispatch {
                            tool: tool.name().to_string(),
                            result: "Error: No previous result in memory for calculation."
                                .to_string(),
                        });
                    }
                }
            }

            let result = tool.invoke(&query);
            self.last_result = Some(result.clone());
            return Some(Dispatch {
                tool: tool.name().to_string(),
                result,
            });
        }
        None
    }
}

/// A ReAct session that plans with the oracle and executes via tools.
///
/// The environment here is the original's loose free-text holder: each step
/// result becomes the next observation.
pub struct ToolAgent<P> {
    provider: P,
    registry: ToolRegistry,
    state: String,
    quiet: bool,
}

impl<P: LlmProvider> ToolAgent<P> {
    pub fn new(provider: P, registry: ToolRegistry) -> Self {
        Self {
            provider,
            registry,
            state: String::new(),
            quiet: false,
        }
    }

    pub fn with_quiet(mut self, quiet: bool) -> Self {
        self.quiet = quiet;
        self
    }

    /// The current free-text observation (the latest step result)
    pub fn state(&self) -> &str {
        &self.state
    }

    fn log(&self, line: impl AsRef<str>) {
        if !self.quiet {
            println!("{}", line.as_ref());
        }
    }

    fn build_prompt(&self, goal: &str) -> String {
        format!(
            "Tools Available: {:?}\n\
             Goal: {goal}\n\
             Observation: {observation}\n\n\
             Plan:\n",
            self.registry.names(),
            goal = goal,
            observation = self.state,
        )
    }

    /// Plan for one goal and execute every step, returning the step results
    /// in order. Oracle failures end the session for this goal with no
    /// results; they are logged, not propagated.
    pub async fn run_goal(&mut self, goal: &str) -> Vec<String> {
        let prompt = self.build_prompt(goal);
        let request =
            CompletionRequest::new(vec![ChatMessage::user(prompt)]).with_temperature(0.0);

        let content = match self.provider.complete(request).await {
            Ok(response) => response.content.unwrap_or_default(),
            Err(e) => {
                eprintln!("Error during LLM call: {}", e);
                return Vec::new();
            }
        };

        let plan = Plan::from_response(&content);
        self.log(format!("Plan: {:?}", plan.steps()));

        let mut results = Vec::with_capacity(plan.len());
        for step in plan.steps() {
            let result = match self.registry.dispatch(step) {
                Some(dispatch) => {
                    self.log(format!("{} Result: {}", dispatch.tool, dispatch.result));
                    dispatch.result
                }
                None => {
                    self.log(format!("Executing action: {}", step));
                    "Action completed.".to_string()
                }
            };
            self.state = result.clone();
            results.push(result);
        }

        self.log(format!("Final Environment State: {}", self.state));
        results
    }
}

// ============================================================================
// Expression evaluation
// ============================================================================

/// Evaluate an arithmetic expression; `None` on any syntax error or a
/// non-finite result (division by zero).
fn eval_expression(input: &str) -> Option<f64> {
    let mut parser = ExprParser {
        chars: input.chars().collect(),
        pos: 0,
    };
    let value = parser.expr()?;
    parser.skip_whitespace();
    if parser.pos != parser.chars.len() {
        return None;
    }
    value.is_finite().then_some(value)
}

struct ExprParser {
    chars: Vec<char>,
    pos: usize,
}

impl ExprParser {
    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn eat(&mut self, expected: char) -> bool {
        self.skip_whitespace();
        if self.peek() == Some(expected) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expr(&mut self) -> Option<f64> {
        let mut value = self.term()?;
        loop {
            if self.eat('+') {
                value += self.term()?;
            } else if self.eat('-') {
                value -= self.term()?;
            } else {
                return Some(value);
            }
        }
    }

    fn term(&mut self) -> Option<f64> {
        let mut value = self.factor()?;
        loop {
            if self.eat('*') {
                value *= self.factor()?;
            } else if self.eat('/') {
                value /= self.factor()?;
            } else {
                return Some(value);
            }
        }
    }

    fn factor(&mut self) -> Option<f64> {
        self.skip_whitespace();
        if self.eat('(') {
            let value = self.expr()?;
            if !self.eat(')') {
                return None;
            }
            return Some(value);
        }
        if self.eat('-') {
            return Some(-self.factor()?);
        }
        self.number()
    }

    fn number(&mut self) -> Option<f64> {
        self.skip_whitespace();
        let start = self.pos;
        while self.peek().is_some_and(|c| c.is_ascii_digit() || c == '.') {
            self.pos += 1;
        }
        if self.pos == start {
            return None;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        text.parse().ok()
    }
}

fn format_number(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{}", value as i64)
    } else {
        format!("{}", value)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use planact_core::ScriptedProvider;

    fn registry() -> ToolRegistry {
        ToolRegistry::new().register(SearchTool).register(CalculatorTool)
    }

    #[test]
    fn test_calculator_arithmetic() {
        let calc = CalculatorTool;
        assert_eq!(calc.invoke("20 * 3"), "60");
        assert_eq!(calc.invoke("(2 + 3) * 4"), "20");
        assert_eq!(calc.invoke("1 + (2 * 3)"), "7");
        assert_eq!(calc.invoke("(10 + 5) / (2 + 1)"), "5");
        assert_eq!(calc.invoke("2.5 * 4"), "10");
        assert_eq!(calc.invoke("10 - 7"), "3");
        assert_eq!(calc.invoke("-3 + 10"), "7");
    }

    #[test]
    fn test_calculator_rejects_bad_input() {
        let calc = CalculatorTool;
        assert_eq!(calc.invoke("10 / 0"), "Invalid calculation.");
        assert_eq!(calc.invoke("what is math"), "Invalid calculation.");
        assert_eq!(calc.invoke("2 +"), "Invalid calculation.");
        assert_eq!(calc.invoke("(1 + 2"), "Invalid calculation.");
        assert_eq!(calc.invoke(""), "Invalid calculation.");
    }

    #[test]
    fn test_search_canned_answers() {
        let search = SearchTool;
        assert_eq!(search.invoke("What is the population of London?"), "8.982 million");
        assert_eq!(search.invoke("population of New York"), "Information not found.");
    }

    #[test]
    fn test_dispatch_matches_marker() {
        let mut registry = registry();

        let dispatch = registry.dispatch("1. Use Calculator: 20 * 3").unwrap();
        assert_eq!(dispatch.tool, "Calculator");
        assert_eq!(dispatch.result, "60");
        assert_eq!(registry.last_result(), Some("60"));

        assert!(registry.dispatch("tidy up the desk").is_none());
    }

    #[test]
    fn test_placeholder_substitution() {
        let mut registry = registry();
        registry.dispatch("Use Calculator: 10").unwrap();

        let dispatch = registry
            .dispatch("Use Calculator: [Result from SearchTool] * 3")
            .unwrap();
        assert_eq!(dispatch.result, "30");
    }

    #[test]
    fn test_placeholder_without_memory_is_an_error_message() {
        let mut registry = registry();
        let dispatch = registry
            .dispatch("Use Calculator: [Result from SearchTool] / 2")
            .unwrap();
        assert_eq!(
            dispatch.result,
            "Error: No previous result in memory for calculation."
        );
    }

    #[tokio::test]
    async fn test_tool_session() {
        let provider = ScriptedProvider::from_lines(&[
            "1. Use SearchTool: population of London\n2. Use Calculator: 20 * 3",
        ]);
        let mut agent = ToolAgent::new(provider, registry()).with_quiet(true);

        let results = agent.run_goal("Look things up and multiply").await;

        assert_eq!(results, ["8.982 million", "60"]);
        assert_eq!(agent.state(), "60");
    }

    #[tokio::test]
    async fn test_tool_session_survives_oracle_failure() {
        let provider = ScriptedProvider::failing("quota exceeded");
        let mut agent = ToolAgent::new(provider, registry()).with_quiet(true);

        let results = agent.run_goal("What is 20 * 3?").await;
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn test_unmatched_steps_fall_through() {
        let provider = ScriptedProvider::from_lines(&["1. Think very hard about the goal"]);
        let mut agent = ToolAgent::new(provider, registry()).with_quiet(true);

        let results = agent.run_goal("Ponder").await;
        assert_eq!(results, ["Action completed."]);
    }
}
