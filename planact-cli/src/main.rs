//! # planact CLI
//!
//! Command-line interface for the planact agents.
//!
//! Usage:
//!   planact run [--provider openai|anthropic|scripted] [--initial-state messy]
//!   planact rule [--initial-state dusty]
//!   planact tools "What is 20 * 3?" "What is the population of London?"
//!   planact vocab
//!
//! Examples:
//!   planact run --provider openai --cycles 3
//!   planact run --provider scripted --initial-state messy
//!   planact rule --initial-state dusty --cycles 5
//!   planact tools --provider anthropic "What is (2 + 3) * 4?"

use clap::{Parser, Subcommand};
use planact_agent::{
    CalculatorTool, PlanRunner, Planner, RuleAgent, RunnerConfig, SearchTool, ToolAgent,
    ToolRegistry,
};
use planact_core::{
    AnthropicProvider, Environment, LlmProvider, OpenAIProvider, ProviderConfig, RoomState,
    ScriptedProvider, ACTION_VOCABULARY,
};
use rand::Rng;

#[derive(Parser)]
#[command(name = "planact")]
#[command(author, version, about = "ReAct agents with LLM-driven dynamic re-planning")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Quiet mode - suppress the cycle transcript, print the report as JSON
    #[arg(short, long, global = true)]
    quiet: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the dynamic re-planning loop
    Run {
        /// Initial room state (random when omitted)
        #[arg(long)]
        initial_state: Option<String>,

        /// Goal room state
        #[arg(long, default_value = "clean")]
        goal_state: String,

        /// Outer ReAct cycle budget
        #[arg(long, default_value_t = 3)]
        cycles: usize,

        /// Maximum executable plan length per cycle
        #[arg(long, default_value_t = 5)]
        max_plan_len: usize,

        /// Reasoning oracle: openai, anthropic, or scripted
        #[arg(long, default_value = "scripted")]
        provider: String,

        /// Model override for the chosen provider
        #[arg(long)]
        model: Option<String>,

        /// Print raw steps as they reach the actuator
        #[arg(short, long)]
        debug: bool,
    },
    /// Run the rule-table baseline (no oracle)
    Rule {
        /// Initial room state (random when omitted)
        #[arg(long)]
        initial_state: Option<String>,

        /// Goal room state
        #[arg(long, default_value = "clean")]
        goal_state: String,

        /// Cycle budget
        #[arg(long, default_value_t = 5)]
        cycles: usize,
    },
    /// Run a tool-dispatch session over one or more goals
    Tools {
        /// Goals to plan and execute
        #[arg(required = true)]
        goals: Vec<String>,

        /// Reasoning oracle: openai, anthropic, or scripted
        #[arg(long, default_value = "scripted")]
        provider: String,

        /// Model override for the chosen provider
        #[arg(long)]
        model: Option<String>,
    },
    /// Show the recognized action vocabulary and classification order
    Vocab,
}

fn parse_state(label: &str) -> RoomState {
    match label.parse() {
        Ok(state) => state,
        Err(e) => {
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}

fn pick_initial_state(arg: Option<&str>) -> RoomState {
    match arg {
        Some(label) => parse_state(label),
        None => {
            let index = rand::thread_rng().gen_range(0..RoomState::ALL.len());
            RoomState::ALL[index]
        }
    }
}

fn env_key_or_exit(var: &str) -> String {
    match std::env::var(var) {
        Ok(key) if !key.is_empty() => key,
        _ => {
            eprintln!("Error: {} is not set.", var);
            std::process::exit(1);
        }
    }
}

fn openai_provider(model: Option<&str>) -> OpenAIProvider {
    let mut config = ProviderConfig::openai(env_key_or_exit("OPENAI_API_KEY"));
    if let Some(model) = model {
        config = config.with_model(model);
    }
    OpenAIProvider::new(config)
}

fn anthropic_provider(model: Option<&str>) -> AnthropicProvider {
    let mut config = ProviderConfig::anthropic(env_key_or_exit("ANTHROPIC_API_KEY"));
    if let Some(model) = model {
        config = config.with_model(model);
    }
    AnthropicProvider::new(config)
}

/// The offline demo oracle: cleans on the first plan, then idles.
fn demo_oracle() -> ScriptedProvider {
    ScriptedProvider::from_lines(&["1. clean the room\n2. do nothing", "1. do nothing"])
}

/// The offline demo oracle for tool sessions.
fn demo_tool_oracle() -> ScriptedProvider {
    ScriptedProvider::from_lines(&[
        "1. Use SearchTool: population of London\n2. Use Calculator: 20 * 3",
    ])
}

fn unknown_provider(name: &str) -> ! {
    eprintln!(
        "Error: unknown provider '{}'. Use openai, anthropic, or scripted.",
        name
    );
    std::process::exit(1);
}

async fn run_loop<P: LlmProvider>(
    provider: P,
    initial: RoomState,
    goal_state: RoomState,
    config: RunnerConfig,
) {
    let goal = format!("Make the room {}.", goal_state);
    let quiet = config.quiet;

    if !quiet {
        println!("Initial State: {}", initial);
        println!("Goal: {}", goal);
    }

    let mut env = Environment::new(initial, goal_state);
    let mut runner = PlanRunner::with_config(Planner::new(provider), config);
    let report = runner.run(&mut env, &goal).await;

    if quiet {
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
    } else if report.goal_achieved() {
        println!("\nGoal achieved!");
    } else {
        println!("\nGoal not achieved. Final state: {}", report.final_state);
    }
}

async fn run_tools<P: LlmProvider>(provider: P, goals: Vec<String>, quiet: bool) {
    let registry = ToolRegistry::new().register(SearchTool).register(CalculatorTool);
    let mut agent = ToolAgent::new(provider, registry).with_quiet(quiet);

    for goal in goals {
        println!("\nGoal: {}", goal);
        let results = agent.run_goal(&goal).await;
        for result in &results {
            println!("Result: {}", result);
        }
        println!("--------------------");
    }
}

fn run_rule(initial: RoomState, goal_state: RoomState, cycles: usize, quiet: bool) {
    if !quiet {
        println!("Initial State: {}", initial);
        println!("Goal: Make the room {}.", goal_state);
    }

    let mut env = Environment::new(initial, goal_state);
    let report = RuleAgent::new(cycles).with_quiet(quiet).run(&mut env);

    if quiet {
        println!("{}", serde_json::to_string_pretty(&report).unwrap_or_default());
    } else if report.goal_achieved() {
        println!("\nGoal achieved!");
    } else {
        println!("\nGoal not achieved. Final state: {}", report.final_state);
    }
}

fn show_vocab() {
    println!("Recognized action vocabulary:");
    for phrase in ACTION_VOCABULARY {
        println!("  - {}", phrase);
    }
    println!();
    println!("Classification order (first match wins):");
    println!("  1. \"clean\"             -> room becomes clean");
    println!("  2. \"dust\"              -> room becomes less messy");
    println!("  3. \"nothing\"/\"relax\"   -> no effect");
    println!("  4. \"unknown\"           -> no effect, unknown-state reply");
    println!("  anything else          -> \"I don't know how to do '<step>'.\"");
}

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            initial_state,
            goal_state,
            cycles,
            max_plan_len,
            provider,
            model,
            debug,
        } => {
            let initial = pick_initial_state(initial_state.as_deref());
            let goal = parse_state(&goal_state);
            let config = RunnerConfig {
                cycles,
                max_plan_len,
                debug,
                quiet: cli.quiet,
            };

            match provider.as_str() {
                "openai" => {
                    run_loop(openai_provider(model.as_deref()), initial, goal, config).await
                }
                "anthropic" => {
                    run_loop(anthropic_provider(model.as_deref()), initial, goal, config).await
                }
                "scripted" => run_loop(demo_oracle(), initial, goal, config).await,
                other => unknown_provider(other),
            }
        }
        Commands::Rule {
            initial_state,
            goal_state,
            cycles,
        } => {
            let initial = pick_initial_state(initial_state.as_deref());
            let goal = parse_state(&goal_state);
            run_rule(initial, goal, cycles, cli.quiet);
        }
        Commands::Tools {
            goals,
            provider,
            model,
        } => match provider.as_str() {
            "openai" => run_tools(openai_provider(model.as_deref()), goals, cli.quiet).await,
            "anthropic" => {
                run_tools(anthropic_provider(model.as_deref()), goals, cli.quiet).await
            }
            "scripted" => run_tools(demo_tool_oracle(), goals, cli.quiet).await,
            other => unknown_provider(other),
        },
        Commands::Vocab => show_vocab(),
    }
}
