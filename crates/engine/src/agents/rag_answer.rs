//! RAG answer path: answers strictly from supplied retrieved context.

use crate::generator::StructuredGenerator;
use crate::retriever::NO_DOCUMENTS_SENTINEL;
use serde::{Deserialize, Serialize};
use triage_core::AppResult;

/// Answer produced from retrieved context.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RagAnswer {
    /// The answer, or a precise statement of what information is missing
    pub answer: String,

    /// Whether the supplied context was enough to answer the question
    pub context_sufficient: bool,

    /// Source identifiers directly used to support the answer
    #[serde(default)]
    pub citations: Vec<String>,
}

/// The sentinel rule is part of the policy prompt: an aggregator that found
/// nothing hands over the fixed "no relevant documents" string, and the
/// model must treat it as absent context, never as quotable content.
fn build_system_prompt() -> String {
    format!(
        "You are the **RAG Answer Agent** of this multi-agent system.\n\
         Answer the user's question using **ONLY** the provided context.\n\n\
         ### STRICT RULES\n\
         1. **NO OUTSIDE KNOWLEDGE**: Do not use your internal training data to\n\
            answer. If the answer is not in the context, do not make it up.\n\
         2. **ANTI-HALLUCINATION**: If the context does not contain the information\n\
            needed, set `context_sufficient` to false and state precisely what\n\
            information is missing in the `answer` field. Never a generic refusal.\n\
         3. **EMPTY CONTEXT**: If the context is exactly \"{sentinel}\", no documents\n\
            were found; the context is automatically insufficient.\n\
         4. **CITATIONS**: List source identifiers in `citations` only when they\n\
            directly support the answer.\n\
         5. **TONE**: Professional, concise, and direct.\n\n\
         ### OUTPUT FORMAT\n\
         Output a single valid JSON object ONLY.\n\n\
         Example (sufficient context):\n\
         {{\n\
             \"answer\": \"The service uses Rust 1.75 and Cargo workspaces.\",\n\
             \"context_sufficient\": true,\n\
             \"citations\": [\"README.md\", \"Cargo.toml\"]\n\
         }}\n\n\
         Example (insufficient context):\n\
         {{\n\
             \"answer\": \"The provided context does not describe the deployment pipeline.\",\n\
             \"context_sufficient\": false,\n\
             \"citations\": []\n\
         }}",
        sentinel = NO_DOCUMENTS_SENTINEL
    )
}

/// The RAG answer agent.
pub struct RagAnswerAgent {
    generator: StructuredGenerator,
    system_prompt: String,
}

impl RagAnswerAgent {
    /// Create a RAG answer agent.
    pub fn new(generator: StructuredGenerator) -> Self {
        Self {
            generator,
            system_prompt: build_system_prompt(),
        }
    }

    /// Answer `question` using only `context`.
    ///
    /// The context arrives exactly as the aggregator produced it, sentinel
    /// included; the policy prompt handles the distinction.
    pub async fn answer(&self, question: &str, context: &str) -> AppResult<RagAnswer> {
        let user_prompt = format!(
            "User Question:\n{}\n\nRetrieved Context:\n{}\n\n\
             Analyze the context and provide the answer in JSON format:",
            question, context
        );

        self.generator
            .structured(&self.system_prompt, &user_prompt)
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use triage_llm::MockClient;

    #[test]
    fn test_citations_default_to_empty() {
        let answer: RagAnswer = serde_json::from_str(
            r#"{"answer": "missing info", "context_sufficient": false}"#,
        )
        .unwrap();
        assert!(answer.citations.is_empty());
        assert!(!answer.context_sufficient);
    }

    #[test]
    fn test_system_prompt_names_the_sentinel() {
        let prompt = build_system_prompt();
        assert!(prompt.contains(NO_DOCUMENTS_SENTINEL));
    }

    #[tokio::test]
    async fn test_answer_forwards_question_and_context() {
        let reply = r#"{
            "answer": "Deploys go through the staging rack.",
            "context_sufficient": true,
            "citations": ["deploy.md"]
        }"#;
        let mock = Arc::new(MockClient::scripted([reply]));
        let agent = RagAnswerAgent::new(StructuredGenerator::new(mock.clone(), "mock-model"));

        let answer = agent
            .answer("How do deploys work?", "Source: deploy.md\nContent: staging rack")
            .await
            .unwrap();

        assert!(answer.context_sufficient);
        assert_eq!(answer.citations, vec!["deploy.md"]);

        let request = &mock.requests()[0];
        assert!(request.prompt.contains("How do deploys work?"));
        assert!(request.prompt.contains("staging rack"));
    }
}
