use async_trait::async_trait;
use tracing::info;

use super::{Agent, AgentError};
use crate::openai::{ChatMessage, OpenAiClient};
use crate::types::SupermarketCheck;

/// Input guardrail: classifies whether a question is about supermarket
/// deals before any persona is invoked.
#[derive(Debug, Clone)]
pub struct GuardrailAgent {
    client: OpenAiClient,
}

impl GuardrailAgent {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Agent for GuardrailAgent {
    type Input = String;
    type Output = SupermarketCheck;

    async fn execute(&self, question: &Self::Input) -> Result<Self::Output, AgentError> {
        let system_prompt = r#"
You are a guardrail check. Decide whether the user is asking about supermarket deals. Output ONLY a JSON object matching the schema below. Do not add commentary or markdown.

Descriptions in the schema indicate expected data and type; replace them with actual values in your output.

Schema (SupermarketCheck):
{
  "is_supermarket_deal": "Whether the question is about supermarket deals (boolean)",
  "reasoning": "Short explanation for the classification (string)"
}
"#;

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

        info!("GuardrailAgent: classifying question");
        let raw = self.client.send_messages_json(messages).await?;
        let check: SupermarketCheck = serde_json::from_str(&raw)?;
        info!(
            "GuardrailAgent: on_topic={} ({})",
            check.is_supermarket_deal, check.reasoning
        );
        Ok(check)
    }
}
