use anyhow::Result;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader};

pub async fn prompt_user(prompt_text: &str) -> Result<String> {
    let mut stdout = io::stdout();
    stdout
        .write_all(format!("{prompt_text}: ").as_bytes())
        .await?;
    stdout.flush().await?;

    let mut line = String::new();
    let mut reader = BufReader::new(io::stdin());
    reader.read_line(&mut line).await?;
    Ok(line.trim().to_string())
}

pub fn is_quit_command(input_text: &str) -> bool {
    matches!(
        input_text.trim().to_ascii_lowercase().as_str(),
        "/quit" | "/exit"
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quit_commands_are_recognized() {
        assert!(is_quit_command("/quit"));
        assert!(is_quit_command(" /EXIT "));
        assert!(!is_quit_command("quit"));
        assert!(!is_quit_command("what is the best deal for meat?"));
    }
}
