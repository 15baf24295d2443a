use async_trait::async_trait;
use tracing::info;

use super::{Agent, AgentError};
use crate::openai::{ChatMessage, OpenAiClient};

/// Comparison persona: instructions only, no tools.
#[derive(Debug, Clone)]
pub struct ComparisonAgent {
    client: OpenAiClient,
}

impl ComparisonAgent {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Agent for ComparisonAgent {
    type Input = String;
    type Output = String;

    async fn execute(&self, question: &Self::Input) -> Result<Self::Output, AgentError> {
        let system_prompt = "You are a supermarket deals expert. You provide assistance with \
             comparing deals in different supermarkets. Compare prices, quality, and value \
             across various supermarkets.";

        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: question.clone(),
            },
        ];

        info!("ComparisonAgent: answering comparison question");
        let reply = self.client.send_messages_raw(messages).await?;
        Ok(reply)
    }
}
