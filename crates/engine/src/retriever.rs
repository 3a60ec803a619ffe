//! Retrieval aggregation: fan search terms out, merge and format results.
//!
//! The per-term searches are independent, so they are issued concurrently;
//! the merge order is the term order of the input list, never completion
//! order. Deduplication is by exact content equality with first occurrence
//! winning. A failed term fails the whole gather — no partial context is
//! ever handed to the answer agent.

use futures::future;
use std::collections::HashSet;
use std::sync::Arc;
use triage_core::AppResult;
use triage_retrieval::{RetrievalService, RetrievedChunk};

/// Fixed string signaling "no retrievable content found". Callers treat it
/// as absent context, not as literal chunk content.
pub const NO_DOCUMENTS_SENTINEL: &str = "No relevant documents found.";

/// Ranked chunks requested per search term.
pub const RESULTS_PER_TERM: usize = 5;

/// The retrieval aggregator.
pub struct ContextRetriever {
    service: Arc<dyn RetrievalService>,
}

impl ContextRetriever {
    /// Create an aggregator over a retrieval service.
    pub fn new(service: Arc<dyn RetrievalService>) -> Self {
        Self { service }
    }

    /// Gather context for an ordered list of search terms.
    ///
    /// Returns the formatted context blob, or `NO_DOCUMENTS_SENTINEL` when
    /// every term came back empty.
    pub async fn gather(&self, search_terms: &[String]) -> AppResult<String> {
        let searches = search_terms
            .iter()
            .map(|term| self.service.search(term, RESULTS_PER_TERM));

        // try_join_all preserves input order and fails fast on any error.
        let per_term = future::try_join_all(searches).await?;

        let merged: Vec<RetrievedChunk> = per_term.into_iter().flatten().collect();
        let total = merged.len();
        let unique = dedup_by_content(merged);

        tracing::debug!(
            "Aggregated {} chunks across {} terms ({} after dedup)",
            total,
            search_terms.len(),
            unique.len()
        );

        if unique.is_empty() {
            tracing::warn!("No documents found for any search term");
            return Ok(NO_DOCUMENTS_SENTINEL.to_string());
        }

        Ok(format_records(&unique))
    }
}

/// Drop chunks whose exact content was already seen, preserving first-seen
/// order. Idempotent by construction.
fn dedup_by_content(chunks: Vec<RetrievedChunk>) -> Vec<RetrievedChunk> {
    let mut seen = HashSet::new();
    chunks
        .into_iter()
        .filter(|chunk| seen.insert(chunk.content.clone()))
        .collect()
}

/// Format surviving chunks as two-line records separated by blank lines.
fn format_records(chunks: &[RetrievedChunk]) -> String {
    chunks
        .iter()
        .map(|chunk| format!("Source: {}\nContent: {}", chunk.source, chunk.content))
        .collect::<Vec<_>>()
        .join("\n\n")
}
