//! HTTP client for an external retrieval service.
//!
//! Speaks a small JSON protocol: `POST /search` for similarity queries,
//! `POST /ingest` to trigger document ingestion, `GET /health` as a
//! liveness probe.

use crate::service::RetrievalService;
use crate::types::{IngestReport, RetrievedChunk};
use serde::{Deserialize, Serialize};
use std::path::Path;
use triage_core::{AppError, AppResult};

/// Search request wire format.
#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    k: usize,
}

/// Search response wire format.
#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<RetrievedChunk>,
}

/// Ingest request wire format.
#[derive(Debug, Serialize)]
struct IngestRequest<'a> {
    directory_path: &'a str,
}

/// Ingest response wire format.
#[derive(Debug, Deserialize)]
struct IngestResponse {
    #[serde(default)]
    message: String,
}

/// HTTP retrieval service client.
pub struct HttpRetrievalClient {
    /// Base URL of the retrieval service
    base_url: String,

    /// HTTP client
    client: reqwest::Client,
}

impl HttpRetrievalClient {
    /// Create a client against the given base URL.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            client: reqwest::Client::new(),
        }
    }

    /// Liveness probe. Best effort; callers may treat failure as a warning.
    pub async fn health(&self) -> AppResult<()> {
        let url = format!("{}/health", self.base_url);
        let response = self.client.get(&url).send().await.map_err(|e| {
            AppError::Retrieval(format!("Retrieval service unreachable: {}", e))
        })?;

        if !response.status().is_success() {
            return Err(AppError::Retrieval(format!(
                "Retrieval service unhealthy ({})",
                response.status()
            )));
        }

        Ok(())
    }
}

#[async_trait::async_trait]
impl RetrievalService for HttpRetrievalClient {
    async fn search(&self, term: &str, k: usize) -> AppResult<Vec<RetrievedChunk>> {
        tracing::info!("Retrieving for term: '{}'", term);

        let url = format!("{}/search", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&SearchRequest { query: term, k })
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Search request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Retrieval service error ({}): {}",
                status, error_text
            )));
        }

        let search_response: SearchResponse = response.json().await.map_err(|e| {
            AppError::Retrieval(format!("Failed to parse search response: {}", e))
        })?;

        tracing::debug!(
            "Retrieved {} chunks for term '{}'",
            search_response.results.len(),
            term
        );

        Ok(search_response.results)
    }

    async fn ingest(&self, directory: &Path) -> AppResult<IngestReport> {
        // Reject bad paths locally before touching the network.
        if !directory.exists() {
            return Err(AppError::InvalidInput(format!(
                "Directory {:?} not found",
                directory
            )));
        }

        let directory_path = directory.to_string_lossy();
        tracing::info!("Triggering ingestion for directory: {}", directory_path);

        let url = format!("{}/ingest", self.base_url);
        let response = self
            .client
            .post(&url)
            .json(&IngestRequest {
                directory_path: &directory_path,
            })
            .send()
            .await
            .map_err(|e| AppError::Retrieval(format!("Ingest request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let error_text = response
                .text()
                .await
                .unwrap_or_else(|_| "Unknown error".to_string());
            return Err(AppError::Retrieval(format!(
                "Retrieval service error ({}): {}",
                status, error_text
            )));
        }

        let ingest_response: IngestResponse = response.json().await.map_err(|e| {
            AppError::Retrieval(format!("Failed to parse ingest response: {}", e))
        })?;

        tracing::info!("Ingestion complete: {}", ingest_response.message);

        Ok(IngestReport {
            message: ingest_response.message,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_ingest_rejects_missing_directory() {
        let client = HttpRetrievalClient::new("http://localhost:7400");
        let result = client.ingest(Path::new("/definitely/not/a/real/dir")).await;

        match result {
            Err(AppError::InvalidInput(message)) => assert!(message.contains("not found")),
            other => panic!("Expected invalid input error, got {:?}", other.map(|_| ())),
        }
    }

    #[test]
    fn test_search_response_parsing() {
        let body = r#"{"results": [{"content": "a", "source": "x.md"}, {"content": "b"}]}"#;
        let parsed: SearchResponse = serde_json::from_str(body).unwrap();
        assert_eq!(parsed.results.len(), 2);
        assert_eq!(parsed.results[1].source, "unknown");
    }

    #[test]
    fn test_empty_search_response() {
        let parsed: SearchResponse = serde_json::from_str("{}").unwrap();
        assert!(parsed.results.is_empty());
    }
}
