use async_trait::async_trait;

#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    #[error(transparent)]
    Llm(#[from] crate::openai::OpenAiError),
    #[error(transparent)]
    Serde(#[from] serde_json::Error),
}

#[async_trait]
pub trait Agent {
    type Input: Send + Sync;
    type Output: Send + Sync;
    async fn execute(&self, input: &Self::Input) -> Result<Self::Output, AgentError>;
}

pub mod best_deal;
pub mod comparison;
pub mod guardrail;
pub mod triage;

pub use best_deal::BestDealAgent;
pub use comparison::ComparisonAgent;
pub use guardrail::GuardrailAgent;
pub use triage::TriageAgent;
