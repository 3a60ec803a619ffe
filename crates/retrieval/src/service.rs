//! The retrieval service contract.

use crate::types::{IngestReport, RetrievedChunk};
use std::path::Path;
use triage_core::AppResult;

/// Trait for retrieval service backends.
///
/// Implementations rank results by similarity descending and return at most
/// `k` chunks per search. An empty result list is a normal outcome, not an
/// error; `AppError::Retrieval` is reserved for backend unavailability.
#[async_trait::async_trait]
pub trait RetrievalService: Send + Sync {
    /// Search for chunks similar to `term`, returning at most `k` results.
    async fn search(&self, term: &str, k: usize) -> AppResult<Vec<RetrievedChunk>>;

    /// Trigger ingestion of every document under `directory`.
    ///
    /// Loading, chunking, and indexing are the service's concern; the caller
    /// only submits the path and receives a summary.
    async fn ingest(&self, directory: &Path) -> AppResult<IngestReport>;
}
