use anyhow::Error;
use colored::*;

use crate::agents::AgentError;
use crate::openai::OpenAiError;
use crate::types::TriageOutcome;

pub fn display_welcome() {
    println!(
        "{}",
        "🛒 Supermarket Deal Agents".bright_blue().bold()
    );
    println!(
        "{}",
        "Ask about supermarket deals: the best deal for a category, or a comparison across stores."
            .blue()
    );
    println!(
        "{}",
        "Off-topic questions are blocked by an input guardrail.".blue()
    );
    println!(
        "{}",
        "Make sure OPENAI_API_KEY and DATABASE_URL are set.".blue()
    );
    println!("{}", "Type '/quit' or '/exit' to stop.\n".blue());
}

pub fn display_loading() {
    println!("{}", "🔄 Triaging your question...".blue().italic());
}

pub fn display_outcome(outcome: &TriageOutcome) {
    match outcome {
        TriageOutcome::Answered { role, reply } => {
            println!("\n{}", format!("💬 {}", role.name()).bright_green().bold());
            println!(
                "{}",
                "┌─────────────────────────────────────────────────────────────".green()
            );
            for line in reply.lines() {
                println!("{} {}", "│".green(), line.white());
            }
            println!(
                "{}",
                "└─────────────────────────────────────────────────────────────\n".green()
            );
        }
        TriageOutcome::Blocked { reasoning } => {
            println!(
                "\n{}",
                "🛑 Guardrail blocked this input".bright_yellow().bold()
            );
            println!("{} {}", "Reason:".yellow(), reasoning.white());
            println!(
                "{}",
                "This assistant only answers questions about supermarket deals.\n".yellow()
            );
        }
    }
}

pub fn display_error(error: &Error) {
    if let Some(AgentError::Llm(openai_error)) = error.downcast_ref::<AgentError>() {
        display_openai_error(openai_error);
    } else if let Some(openai_error) = error.downcast_ref::<OpenAiError>() {
        display_openai_error(openai_error);
    } else {
        println!(
            "{} {}",
            "❌ Error:".bright_red().bold(),
            error.to_string().red()
        );
        println!(
            "{}",
            "Please check your configuration and try again.\n".red()
        );
    }
}

pub fn display_openai_error(error: &OpenAiError) {
    let user_message = error.user_message();
    match error {
        OpenAiError::ServerBusy => {
            println!("{}", user_message.bright_yellow().bold());
            println!(
                "{}",
                "💡 Tip: Try again in a few minutes when server load is lower.".yellow()
            );
        }
        OpenAiError::NetworkError { .. } => {
            println!("{}", user_message.bright_red().bold());
            println!(
                "{}",
                "💡 Tip: Check your internet connection and firewall settings.".red()
            );
        }
        OpenAiError::Timeout { .. } => {
            println!("{}", user_message.bright_yellow().bold());
            println!(
                "{}",
                "💡 Tip: The server might be overloaded. Try again later.".yellow()
            );
        }
        OpenAiError::ApiError { status, .. } => {
            println!("{}", user_message.bright_red().bold());
            match *status {
                401 => println!(
                    "{}",
                    "💡 Tip: Check your OPENAI_API_KEY environment variable.".red()
                ),
                403 => println!(
                    "{}",
                    "💡 Tip: Your API key may not have sufficient permissions.".red()
                ),
                429 => println!(
                    "{}",
                    "💡 Tip: You've hit the rate limit. Wait before trying again.".red()
                ),
                _ => println!(
                    "{}",
                    "💡 Tip: Check the API documentation for more details.".red()
                ),
            }
        }
        OpenAiError::ParseError { .. } => {
            println!("{}", user_message.bright_magenta().bold());
            println!(
                "{}",
                "💡 Tip: The server response was unexpected. Try rephrasing your question."
                    .magenta()
            );
        }
        OpenAiError::ConfigError { .. } => {
            println!("{}", user_message.bright_red().bold());
            println!(
                "{}",
                "💡 Tip: Check your environment variables and configuration.".red()
            );
        }
    }
    println!();
}

pub fn display_goodbye() {
    println!("{}", "👋 Goodbye!".bright_yellow().bold());
}
