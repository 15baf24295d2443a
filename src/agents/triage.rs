use async_trait::async_trait;
use tracing::info;

use super::{Agent, AgentError};
use crate::openai::{ChatMessage, OpenAiClient};
use crate::types::TriageDecision;

/// Triage step: selects which persona handles an on-topic question.
#[derive(Debug, Clone)]
pub struct TriageAgent {
    client: OpenAiClient,
}

impl TriageAgent {
    pub fn new(client: OpenAiClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Agent for TriageAgent {
    type Input = String;
    type Output = TriageDecision;

    async fn execute(&self, question: &Self::Input) -> Result<Self::Output, AgentError> {
        let system_prompt = r#"
You are a triage agent. You determine which specialist should handle the user's supermarket related question. Output ONLY a JSON object matching the schema below. Do not add commentary or markdown.

Routes:
- "best_deal": specialist agent for the best deal in a specific product category.
- "comparison": specialist agent for comparing deals across different supermarkets.

Schema (TriageDecision):
{
  "route": "Selected specialist: 'best_deal' | 'comparison' (string)",
  "reasoning": "Short explanation for the routing decision (string)"
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

        info!("TriageAgent: routing question");
        let raw = self.client.send_messages_json(messages).await?;
        let decision: TriageDecision = serde_json::from_str(&raw)?;
        info!(
            "TriageAgent: route={} ({})",
            decision.route, decision.reasoning
        );
        Ok(decision)
    }
}
