//! Ask command handler.
//!
//! Submits a query to the orchestrator and prints the response as JSON on
//! stdout. This is the outermost boundary: internal failures are logged and
//! mapped to an opaque error payload so prompts, stack detail, and
//! collaborator errors never reach the caller.

use clap::Args;
use std::sync::Arc;
use triage_core::{config::AppConfig, AppResult};
use triage_engine::{Orchestrator, OrchestratorResponse};
use triage_llm::create_client;
use triage_retrieval::HttpRetrievalClient;

/// Opaque message shown to callers when the pipeline fails internally.
const INTERNAL_ERROR_MESSAGE: &str = "The request could not be completed.";

/// Submit a query to the pipeline
#[derive(Args, Debug)]
pub struct AskCommand {
    /// The query to answer
    pub query: String,

    /// Caller role tag attached to the query
    #[arg(short, long, default_value = "standard")]
    pub role: String,
}

impl AskCommand {
    /// Execute the ask command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ask command");

        let client = create_client(
            &config.provider,
            config.endpoint.as_deref(),
            config.api_key.as_deref(),
        )?;
        let retrieval = Arc::new(HttpRetrievalClient::new(config.retrieval_endpoint.clone()));

        let orchestrator = Orchestrator::new(client, retrieval, config);

        let response = match orchestrator.run(&self.query, &self.role).await {
            Ok(response) => response,
            Err(e) => {
                tracing::error!("Pipeline failed: {}", e);
                OrchestratorResponse::Error {
                    message: INTERNAL_ERROR_MESSAGE.to_string(),
                }
            }
        };

        println!("{}", serde_json::to_string_pretty(&response)?);

        Ok(())
    }
}
