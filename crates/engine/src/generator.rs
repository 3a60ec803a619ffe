//! Schema-constrained generation on top of the LLM client.
//!
//! Every agent gets a typed value out of the untyped text channel through
//! this one wrapper: it requests JSON mode from the provider, strips any
//! markdown fencing, and parses the reply exactly once. Agents never
//! re-implement parsing. Transport failures stay `Generation` errors; a
//! reply that cannot be coerced into the requested type is a
//! `SchemaValidation` error.

use serde::de::DeserializeOwned;
use std::sync::Arc;
use triage_core::{AppError, AppResult};
use triage_llm::{LlmClient, LlmRequest};

/// Structured generator shared by all agents.
#[derive(Clone)]
pub struct StructuredGenerator {
    client: Arc<dyn LlmClient>,
    model: String,
}

impl StructuredGenerator {
    /// Create a generator bound to a client and model.
    pub fn new(client: Arc<dyn LlmClient>, model: impl Into<String>) -> Self {
        Self {
            client,
            model: model.into(),
        }
    }

    /// Generate free text.
    pub async fn text(
        &self,
        system_prompt: &str,
        user_prompt: &str,
        temperature: f32,
    ) -> AppResult<String> {
        let request = LlmRequest::new(user_prompt, self.model.clone())
            .with_system(system_prompt)
            .with_temperature(temperature);

        let response = self.client.complete(&request).await?;
        Ok(response.content)
    }

    /// Generate a value conforming to `T`'s schema.
    ///
    /// Runs at temperature 0 so classification output is as deterministic
    /// as the provider allows.
    pub async fn structured<T: DeserializeOwned>(
        &self,
        system_prompt: &str,
        user_prompt: &str,
    ) -> AppResult<T> {
        let request = LlmRequest::new(user_prompt, self.model.clone())
            .with_system(system_prompt)
            .with_temperature(0.0)
            .with_json_mode();

        let response = self.client.complete(&request).await?;
        let payload = extract_json(&response.content);

        serde_json::from_str(payload).map_err(|e| {
            tracing::debug!("Unparseable generator output: {}", response.content);
            AppError::SchemaValidation(format!(
                "Generator output did not match the requested schema: {}",
                e
            ))
        })
    }
}

/// Strip a surrounding markdown code fence, if any.
///
/// Models occasionally wrap JSON in ``` fences even when asked not to.
fn extract_json(content: &str) -> &str {
    let trimmed = content.trim();

    let unfenced = trimmed
        .strip_prefix("```json")
        .or_else(|| trimmed.strip_prefix("```"))
        .and_then(|rest| rest.strip_suffix("```"))
        .unwrap_or(trimmed);

    unfenced.trim()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;
    use triage_llm::MockClient;

    #[derive(Debug, Deserialize)]
    struct Probe {
        value: u32,
    }

    #[test]
    fn test_extract_json_plain() {
        assert_eq!(extract_json(r#"{"value": 1}"#), r#"{"value": 1}"#);
    }

    #[test]
    fn test_extract_json_fenced() {
        let fenced = "```json\n{\"value\": 1}\n```";
        assert_eq!(extract_json(fenced), r#"{"value": 1}"#);

        let bare_fence = "```\n{\"value\": 2}\n```";
        assert_eq!(extract_json(bare_fence), r#"{"value": 2}"#);
    }

    #[tokio::test]
    async fn test_structured_parses_reply() {
        let mock = Arc::new(MockClient::scripted([r#"{"value": 7}"#]));
        let generator = StructuredGenerator::new(mock.clone(), "mock-model");

        let probe: Probe = generator.structured("system", "user").await.unwrap();
        assert_eq!(probe.value, 7);

        // JSON mode and temperature 0 are requested from the provider.
        let request = &mock.requests()[0];
        assert!(request.json_mode);
        assert_eq!(request.temperature, Some(0.0));
    }

    #[tokio::test]
    async fn test_structured_rejects_malformed_reply() {
        let mock = Arc::new(MockClient::scripted(["not json at all"]));
        let generator = StructuredGenerator::new(mock, "mock-model");

        let result: AppResult<Probe> = generator.structured("system", "user").await;
        assert!(matches!(result, Err(AppError::SchemaValidation(_))));
    }

    #[tokio::test]
    async fn test_transport_failure_stays_generation_error() {
        let mock = Arc::new(MockClient::failing("connection refused"));
        let generator = StructuredGenerator::new(mock, "mock-model");

        let result: AppResult<Probe> = generator.structured("system", "user").await;
        assert!(matches!(result, Err(AppError::Generation(_))));
    }

    #[tokio::test]
    async fn test_text_passes_temperature() {
        let mock = Arc::new(MockClient::scripted(["hello"]));
        let generator = StructuredGenerator::new(mock.clone(), "mock-model");

        let content = generator.text("system", "user", 0.7).await.unwrap();
        assert_eq!(content, "hello");

        let request = &mock.requests()[0];
        assert_eq!(request.temperature, Some(0.7));
        assert!(!request.json_mode);
    }
}
