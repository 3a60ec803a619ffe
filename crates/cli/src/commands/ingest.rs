//! Ingest command handler.
//!
//! Validates the target directory and triggers ingestion on the external
//! retrieval service. Loading, chunking, and indexing all happen on the
//! service side.

use clap::Args;
use std::path::PathBuf;
use triage_core::{config::AppConfig, AppError, AppResult};
use triage_retrieval::{HttpRetrievalClient, RetrievalService};

/// Trigger document ingestion on the retrieval service
#[derive(Args, Debug)]
pub struct IngestCommand {
    /// Directory of documents to ingest
    #[arg(default_value = "docs")]
    pub directory: PathBuf,
}

impl IngestCommand {
    /// Execute the ingest command.
    pub async fn execute(&self, config: &AppConfig) -> AppResult<()> {
        tracing::info!("Executing ingest command");

        if !self.directory.exists() {
            return Err(AppError::InvalidInput(format!(
                "Directory {:?} not found",
                self.directory
            )));
        }

        let retrieval = HttpRetrievalClient::new(config.retrieval_endpoint.clone());

        // Liveness probe is advisory only; the ingest call is authoritative.
        if let Err(e) = retrieval.health().await {
            tracing::warn!("Retrieval service health check failed: {}", e);
        }

        let report = retrieval.ingest(&self.directory).await?;

        println!(
            "{}",
            serde_json::to_string_pretty(&serde_json::json!({
                "status": "success",
                "message": report.message,
            }))?
        );

        Ok(())
    }
}
