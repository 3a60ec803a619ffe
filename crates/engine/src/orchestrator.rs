//! The pipeline state machine.
//!
//! Stages run strictly in sequence per request:
//! compliance gate -> routing -> {direct answer | retrieve -> rag answer}.
//! The compliance check is the only early exit. After it, every stage
//! operates on the *effective query* (the sanitized variant when the
//! verdict provides one) — the raw original is never used again.
//!
//! All state is request-local; concurrent requests never interact. Dropping
//! the `run` future cancels whichever stage is in flight, so a cancelled
//! request can never observe a partially composed response.

use crate::agents::{
    ComplianceAgent, DecisionAgent, DirectAnswerAgent, RagAnswerAgent, Strategy,
};
use crate::generator::StructuredGenerator;
use crate::response::{AnswerOutcome, OrchestratorResponse};
use crate::retriever::ContextRetriever;
use std::sync::Arc;
use triage_core::{AppConfig, AppResult};
use triage_llm::LlmClient;
use triage_retrieval::RetrievalService;

/// The request orchestrator.
pub struct Orchestrator {
    compliance: ComplianceAgent,
    decision: DecisionAgent,
    direct: DirectAnswerAgent,
    rag: RagAnswerAgent,
    retriever: ContextRetriever,
}

impl Orchestrator {
    /// Wire the pipeline from its two collaborators and the immutable
    /// process configuration.
    pub fn new(
        client: Arc<dyn LlmClient>,
        retrieval: Arc<dyn RetrievalService>,
        config: &AppConfig,
    ) -> Self {
        tracing::info!(
            "Initializing orchestrator (provider: {}, model: {})",
            client.provider_name(),
            config.model
        );

        let generator = StructuredGenerator::new(client, config.model.clone());

        Self {
            compliance: ComplianceAgent::new(generator.clone(), &config.compliance),
            decision: DecisionAgent::new(generator.clone()),
            direct: DirectAnswerAgent::new(generator.clone()),
            rag: RagAnswerAgent::new(generator),
            retriever: ContextRetriever::new(retrieval),
        }
    }

    /// Run one query through the pipeline.
    ///
    /// Returns `Ok` for every deterministic outcome (blocked, answered,
    /// unknown strategy). `Err` means an underlying collaborator failed;
    /// the outermost boundary translates that into an opaque error
    /// response.
    pub async fn run(&self, query: &str, role: &str) -> AppResult<OrchestratorResponse> {
        tracing::info!("--- New request (role: {}) ---", role);

        tracing::info!("Step 1: compliance check");
        let verdict = self.compliance.evaluate(query, role).await?;

        if !verdict.is_safe {
            tracing::warn!(
                "Compliance blocked: {}",
                verdict.reason.as_deref().unwrap_or("no reason given")
            );
            return Ok(OrchestratorResponse::blocked(verdict));
        }

        // Everything downstream sees only the effective query.
        let effective_query = verdict
            .sanitized_query
            .unwrap_or_else(|| query.to_string());
        tracing::info!("Query is safe. Proceeding with: '{}'", effective_query);

        tracing::info!("Step 2: routing decision");
        let decision = self.decision.route(&effective_query).await?;
        tracing::info!(
            "Decision: {:?} (reason: {})",
            decision.decision,
            decision.reason
        );

        match decision.decision {
            Strategy::Direct => {
                tracing::info!("Step 3: executing direct strategy");
                let answer = self.direct.answer(&effective_query).await?;

                Ok(OrchestratorResponse::success(
                    AnswerOutcome::Direct { answer },
                    decision.reason,
                ))
            }

            Strategy::Rag => {
                tracing::info!("Step 3: executing RAG strategy");

                let search_terms = if decision.search_terms.is_empty() {
                    vec![effective_query.clone()]
                } else {
                    decision.search_terms
                };

                let context = self.retriever.gather(&search_terms).await?;
                let rag_answer = self.rag.answer(&effective_query, &context).await?;

                Ok(OrchestratorResponse::success(
                    AnswerOutcome::Rag {
                        answer: rag_answer.answer,
                        context_sufficient: rag_answer.context_sufficient,
                        citations: rag_answer.citations,
                    },
                    decision.reason,
                ))
            }

            // Unreachable with a well-behaved decision schema; answered
            // structurally rather than crashing.
            Strategy::Unknown => {
                tracing::error!("Routing produced an unknown strategy");
                Ok(OrchestratorResponse::Error {
                    message: "Unknown strategy".to_string(),
                })
            }
        }
    }
}
