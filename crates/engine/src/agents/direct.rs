//! Direct answer path: latent knowledge only, no retrieval.

use crate::generator::StructuredGenerator;
use triage_core::AppResult;

const DIRECT_SYSTEM_PROMPT: &str = "\
You are a helpful and friendly AI assistant.
Answer the user's question directly, concisely, and politely using only your
general knowledge. You have no external tools or retrieval.

If the user greets you, greet them back warmly.
If the user asks a general question, answer it clearly.

Keep your answers helpful but concise.";

/// Conversational answers run warmer than the classifier agents.
const DIRECT_TEMPERATURE: f32 = 0.7;

/// The direct answer agent.
pub struct DirectAnswerAgent {
    generator: StructuredGenerator,
}

impl DirectAnswerAgent {
    /// Create a direct answer agent.
    pub fn new(generator: StructuredGenerator) -> Self {
        Self { generator }
    }

    /// Answer a query conversationally. No retry logic; generator failures
    /// propagate.
    pub async fn answer(&self, query: &str) -> AppResult<String> {
        self.generator
            .text(DIRECT_SYSTEM_PROMPT, query, DIRECT_TEMPERATURE)
            .await
    }
}
