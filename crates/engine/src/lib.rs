//! Triage orchestration engine.
//!
//! This crate implements the multi-agent query pipeline: an incoming query
//! passes through a compliance gate, a routing decision, and then either a
//! direct-answer or retrieval-augmented path. The crate owns the stage
//! sequencing, the early exit for blocked queries, the effective-query rule
//! after sanitization, and the shaping of the final response.
//!
//! Collaborators cross two trait boundaries: `triage_llm::LlmClient` for
//! text generation and `triage_retrieval::RetrievalService` for similarity
//! search. Everything else is request-scoped value objects.

pub mod agents;
pub mod generator;
pub mod orchestrator;
pub mod response;
pub mod retriever;

// Re-export main types
pub use generator::StructuredGenerator;
pub use orchestrator::Orchestrator;
pub use response::{AnswerOutcome, OrchestratorResponse, SuccessResponse};
pub use retriever::{ContextRetriever, NO_DOCUMENTS_SENTINEL, RESULTS_PER_TERM};
