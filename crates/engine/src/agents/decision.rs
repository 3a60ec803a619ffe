//! Routing decision: direct answer or retrieval-augmented generation.

use crate::generator::StructuredGenerator;
use serde::{Deserialize, Serialize};
use triage_core::AppResult;

/// The processing strategy chosen for a query.
///
/// `Unknown` absorbs any strategy value outside the schema so the
/// orchestrator can answer with a structured error instead of failing to
/// parse the whole decision.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Direct,
    Rag,
    #[serde(other)]
    Unknown,
}

/// Routing decision produced once per request.
///
/// `search_terms` is only meaningful for `Strategy::Rag`; when empty, the
/// caller falls back to the effective query as the sole term.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoutingDecision {
    /// The strategy to use
    pub decision: Strategy,

    /// Explanation for the decision
    pub reason: String,

    /// Normalized search phrases when RAG is chosen
    #[serde(default)]
    pub search_terms: Vec<String>,
}

const DECISION_SYSTEM_PROMPT: &str = "\
You are the **Decision Authority** of this multi-agent system.
Route the user's query to the correct processing strategy: **direct** or **rag**
(retrieval-augmented generation).

### DECISION CRITERIA

**1. USE 'direct' IF:**
- The query is a greeting, pleasantry, or social conversation.
- The query matches general world knowledge (generic coding questions, simple
  math, definitions) that does NOT require private organization data.
- The user asks for creative writing or simple logic without external context.

**2. USE 'rag' IF:**
- The query asks about the organization, a project, policies, or internal
  documentation.
- The query implies looking up a file, rule, or specific entity not known to
  the general public.
- You are unsure whether the answer is general or private (err on the side
  of rag).

When choosing rag, also emit a short ordered list of normalized search
phrases capturing the query's informational need.

### OUTPUT FORMAT
Output a single valid JSON object ONLY.

Example for direct:
{
    \"decision\": \"direct\",
    \"reason\": \"The user is simply greeting the system.\",
    \"search_terms\": []
}

Example for rag:
{
    \"decision\": \"rag\",
    \"reason\": \"The user is asking about internal deployment policy.\",
    \"search_terms\": [\"deployment policy\", \"release process\"]
}";

/// The decision agent.
pub struct DecisionAgent {
    generator: StructuredGenerator,
}

impl DecisionAgent {
    /// Create a decision agent.
    pub fn new(generator: StructuredGenerator) -> Self {
        Self { generator }
    }

    /// Classify a (safe, effective) query into a strategy.
    pub async fn route(&self, query: &str) -> AppResult<RoutingDecision> {
        let user_prompt = format!(
            "Input to Analyze:\n\"\"\"\n{}\n\"\"\"\n\nAnalyze the input above. JSON Output:",
            query
        );

        self.generator
            .structured(DECISION_SYSTEM_PROMPT, &user_prompt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use triage_llm::MockClient;

    #[test]
    fn test_strategy_parses_known_values() {
        let decision: RoutingDecision = serde_json::from_str(
            r#"{"decision": "direct", "reason": "greeting"}"#,
        )
        .unwrap();
        assert_eq!(decision.decision, Strategy::Direct);
        assert!(decision.search_terms.is_empty());

        let decision: RoutingDecision = serde_json::from_str(
            r#"{"decision": "rag", "reason": "internal", "search_terms": ["a", "b"]}"#,
        )
        .unwrap();
        assert_eq!(decision.decision, Strategy::Rag);
        assert_eq!(decision.search_terms, vec!["a", "b"]);
    }

    #[test]
    fn test_strategy_absorbs_unknown_values() {
        let decision: RoutingDecision = serde_json::from_str(
            r#"{"decision": "hybrid", "reason": "made up"}"#,
        )
        .unwrap();
        assert_eq!(decision.decision, Strategy::Unknown);
    }

    #[tokio::test]
    async fn test_route_parses_generator_reply() {
        let reply = r#"{"decision": "rag", "reason": "policy lookup", "search_terms": ["vacation policy"]}"#;
        let mock = Arc::new(MockClient::scripted([reply]));
        let agent = DecisionAgent::new(StructuredGenerator::new(mock.clone(), "mock-model"));

        let decision = agent.route("What is our vacation policy?").await.unwrap();
        assert_eq!(decision.decision, Strategy::Rag);
        assert_eq!(decision.search_terms, vec!["vacation policy"]);

        // The query text reaches the generator verbatim.
        let request = &mock.requests()[0];
        assert!(request.prompt.contains("What is our vacation policy?"));
    }
}
