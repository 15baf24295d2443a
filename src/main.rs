mod agents;
mod catalog;
mod config;
mod console;
mod deals;
mod openai;
mod orchestrator;
mod query;
mod types;

use anyhow::Result;
use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt};

use crate::config::Config;
use crate::console::Console;
use crate::orchestrator::Orchestrator;
use crate::query::QueryStrategy;
use crate::types::TriageOutcome;

#[derive(Debug, Parser)]
struct Args {
    /// Question to triage. If omitted, a demo question is used
    #[arg(long)]
    question: Option<String>,

    /// How the deal query is produced; overrides QUERY_STRATEGY
    #[arg(long, value_enum)]
    query_strategy: Option<QueryStrategy>,

    /// Run an interactive console loop instead of a single question
    #[arg(long, default_value_t = false)]
    interactive: bool,
}

#[tokio::main(flavor = "multi_thread")]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();
    let args = Args::parse();

    // logging
    let filter_layer = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    fmt().with_env_filter(filter_layer).init();

    // startup information
    tracing::info!("Starting supermarket deal agents application");

    // base config from env, with CLI overrides
    let mut config = Config::load()?;
    if let Some(strategy) = args.query_strategy {
        config.query_strategy = strategy;
    }
    tracing::info!("Query strategy: {}", config.query_strategy);

    let orchestrator = Orchestrator::new(config)?;

    if args.interactive {
        orchestrator.run_console().await?;
        return Ok(());
    }

    let question = args.question.unwrap_or_else(|| {
        tracing::info!("No --question provided. Using demo question");
        "what is the best deal for vegetables this week in the supermarkets?".to_string()
    });

    match orchestrator.run(&question).await {
        Ok(outcome) => {
            Console::display_outcome(&outcome);
            if let TriageOutcome::Answered { reply, .. } = &outcome {
                println!("{reply}");
            }
        }
        Err(e) => {
            Console::display_error(&e);
            return Err(e);
        }
    }

    Ok(())
}
