use anyhow::{Error, Result};

use crate::types::TriageOutcome;

mod input;
mod render;

/// Console interface for the supermarket agents application
pub struct Console;

impl Console {
    /// Display a welcome banner
    pub fn display_welcome() {
        render::display_welcome();
    }

    /// Prompt the user with a custom message and return the entered line (trimmed)
    pub async fn prompt_user(prompt_text: &str) -> Result<String> {
        input::prompt_user(prompt_text).await
    }

    /// Check if the input is a quit command
    pub fn is_quit_command(input_text: &str) -> bool {
        input::is_quit_command(input_text)
    }

    /// Display a loading message
    pub fn display_loading() {
        render::display_loading();
    }

    /// Display the outcome of a triaged question
    pub fn display_outcome(outcome: &TriageOutcome) {
        render::display_outcome(outcome);
    }

    /// Display an error message with context-aware messaging
    pub fn display_error(error: &Error) {
        render::display_error(error);
    }

    /// Display a goodbye message
    pub fn display_goodbye() {
        render::display_goodbye();
    }
}
