use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use super::{Agent, AgentError};
use crate::catalog::Category;
use crate::deals::DealFinder;
use crate::openai::{ChatMessage, OpenAiClient};
use crate::types::CategoryPick;

/// Best-deal persona: extracts the product category from the question, runs
/// the deal lookup tool and answers grounded in the tool result.
#[derive(Debug, Clone)]
pub struct BestDealAgent {
    client: OpenAiClient,
    deals: DealFinder,
}

impl BestDealAgent {
    pub fn new(client: OpenAiClient, deals: DealFinder) -> Self {
        Self { client, deals }
    }

    async fn pick_category(&self, question: &str) -> Result<CategoryPick, AgentError> {
        let known = Category::ALL.map(|c| c.label()).join(", ");
        let system_prompt = format!(
            r#"
Extract the single product category the user is asking about. Output ONLY a JSON object matching the schema below. Do not add commentary or markdown.

Prefer one of: {known}. If none of them fits, use the user's own word.

Schema (CategoryPick):
{{
  "category": "The product category from the question (string)"
}}
"#
        );

        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_prompt,
            },
            ChatMessage {
                role: "user".to_string(),
                content: question.to_string(),
            },
        ];

        let raw = self.client.send_messages_json(messages).await?;
        let pick: CategoryPick = serde_json::from_str(&raw)?;
        Ok(pick)
    }
}

#[async_trait]
impl Agent for BestDealAgent {
    type Input = String;
    type Output = String;

    async fn execute(&self, question: &Self::Input) -> Result<Self::Output, AgentError> {
        info!("BestDealAgent: extracting category from question");
        let pick = self.pick_category(question).await?;
        info!("BestDealAgent: category '{}'", pick.category);

        // Tool call; never fails, errors arrive as "Error: ..." text.
        let deal_data = self.deals.get_best_deal_data(&pick.category).await;
        info!("BestDealAgent: tool result: {}", deal_data);

        let system_prompt = "You are an expert for best deals in the German supermarkets. \
             You will provide help with the question about what is best deal for a specific \
             category. Give specific product recommendations and reason for recommending the \
             product. Ground your answer in the deal lookup result provided with the question; \
             if it starts with 'Error:', tell the user that live deal data is unavailable and \
             relay the reason.";

        let user_payload = json!({
            "question": question,
            "deal_lookup_result": deal_data,
        });

        let messages = vec![
            ChatMessage {
                role: "system".to_string(),
                content: system_prompt.to_string(),
            },
            ChatMessage {
                role: "user".to_string(),
                content: user_payload.to_string(),
            },
        ];

        info!("BestDealAgent: asking for a recommendation");
        let reply = self.client.send_messages_raw(messages).await?;
        Ok(reply)
    }
}
