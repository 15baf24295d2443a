use serde::{Deserialize, Serialize};

/// Guardrail classification of a user question.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SupermarketCheck {
    pub is_supermarket_deal: bool,
    pub reasoning: String,
}

/// The closed set of dialogue personas a question can be handed off to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DialogueRole {
    BestDeal,
    Comparison,
}

impl DialogueRole {
    /// Persona display name, used in console output and logs.
    pub fn name(&self) -> &'static str {
        match self {
            DialogueRole::BestDeal => "Best Deal expert",
            DialogueRole::Comparison => "Compare Supermarket deals",
        }
    }
}

impl std::fmt::Display for DialogueRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            DialogueRole::BestDeal => "best_deal",
            DialogueRole::Comparison => "comparison",
        };
        f.write_str(s)
    }
}

/// Triage verdict: which persona handles the question and why.
#[derive(Debug, Clone, Deserialize)]
pub struct TriageDecision {
    pub route: DialogueRole,
    pub reasoning: String,
}

/// Category the best-deal persona extracted from the question.
#[derive(Debug, Clone, Deserialize)]
pub struct CategoryPick {
    pub category: String,
}

/// Outcome of one triaged request. A guardrail rejection is expected
/// control flow, so it is a variant here rather than an error.
#[derive(Debug, Clone)]
pub enum TriageOutcome {
    Answered { role: DialogueRole, reply: String },
    Blocked { reasoning: String },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn triage_decision_parses_snake_case_routes() {
        let decision: TriageDecision =
            serde_json::from_str(r#"{"route": "best_deal", "reasoning": "category question"}"#)
                .unwrap();
        assert_eq!(decision.route, DialogueRole::BestDeal);

        let decision: TriageDecision =
            serde_json::from_str(r#"{"route": "comparison", "reasoning": "store question"}"#)
                .unwrap();
        assert_eq!(decision.route, DialogueRole::Comparison);
    }

    #[test]
    fn unknown_routes_fail_to_parse() {
        let result = serde_json::from_str::<TriageDecision>(
            r#"{"route": "weather", "reasoning": "off-topic"}"#,
        );
        assert!(result.is_err());
    }

    #[test]
    fn supermarket_check_round_trips() {
        let check: SupermarketCheck = serde_json::from_str(
            r#"{"is_supermarket_deal": false, "reasoning": "asks about the weather"}"#,
        )
        .unwrap();
        assert!(!check.is_supermarket_deal);
        assert_eq!(check.reasoning, "asks about the weather");
    }
}
