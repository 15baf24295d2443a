use anyhow::Result;
use tracing::info;
use uuid::Uuid;

use crate::agents::{Agent, BestDealAgent, ComparisonAgent, GuardrailAgent, TriageAgent};
use crate::config::Config;
use crate::console::Console;
use crate::deals::DealFinder;
use crate::openai::OpenAiClient;
use crate::types::{DialogueRole, TriageOutcome};

/// Wires guardrail → triage → persona dispatch. Each request is
/// independent; no state is shared between runs.
pub struct Orchestrator {
    guardrail: GuardrailAgent,
    triage: TriageAgent,
    best_deal: BestDealAgent,
    comparison: ComparisonAgent,
}

impl Orchestrator {
    pub fn new(config: Config) -> Result<Self> {
        let client = OpenAiClient::new(config.clone())?;
        let deals = DealFinder::new(&config, client.clone());

        Ok(Self {
            guardrail: GuardrailAgent::new(client.clone()),
            triage: TriageAgent::new(client.clone()),
            best_deal: BestDealAgent::new(client.clone(), deals),
            comparison: ComparisonAgent::new(client),
        })
    }

    /// Triage a single question. A guardrail rejection blocks only this
    /// request and is returned as `Blocked`, not as an error.
    pub async fn run(&self, question: &str) -> Result<TriageOutcome> {
        let request_id = Uuid::new_v4();
        let question = question.to_string();
        info!(%request_id, "Guardrail: checking question");

        let check = self.guardrail.execute(&question).await?;
        if !check.is_supermarket_deal {
            info!(%request_id, "Guardrail blocked this input: {}", check.reasoning);
            return Ok(TriageOutcome::Blocked {
                reasoning: check.reasoning,
            });
        }

        let decision = self.triage.execute(&question).await?;
        info!(%request_id, "Triage: handing off to {}", decision.route.name());

        let reply = match decision.route {
            DialogueRole::BestDeal => self.best_deal.execute(&question).await?,
            DialogueRole::Comparison => self.comparison.execute(&question).await?,
        };
        info!(%request_id, "{}: answer ready", decision.route.name());

        Ok(TriageOutcome::Answered {
            role: decision.route,
            reply,
        })
    }

    /// Interactive loop: prompt for questions until a quit command.
    pub async fn run_console(&self) -> Result<()> {
        Console::display_welcome();
        loop {
            let question = Console::prompt_user("Your question").await?;
            if Console::is_quit_command(&question) {
                Console::display_goodbye();
                return Ok(());
            }
            if question.is_empty() {
                continue;
            }

            Console::display_loading();
            match self.run(&question).await {
                Ok(outcome) => Console::display_outcome(&outcome),
                Err(e) => Console::display_error(&e),
            }
        }
    }
}
