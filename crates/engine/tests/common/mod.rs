//! Shared mocks for pipeline integration tests.

use std::collections::HashMap;
use std::path::Path;
use std::sync::Mutex;
use triage_core::{AppError, AppResult};
use triage_retrieval::{IngestReport, RetrievalService, RetrievedChunk};

/// Retrieval service backed by a fixed term -> chunks table. Records every
/// searched term so tests can assert on what reached the boundary.
pub struct MockRetrieval {
    table: HashMap<String, Vec<RetrievedChunk>>,
    searched_terms: Mutex<Vec<String>>,
    fail: bool,
}

impl MockRetrieval {
    /// A service that finds nothing for any term.
    pub fn empty() -> Self {
        Self {
            table: HashMap::new(),
            searched_terms: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A service with fixed results per term.
    pub fn with_results(entries: Vec<(String, Vec<RetrievedChunk>)>) -> Self {
        Self {
            table: entries.into_iter().collect(),
            searched_terms: Mutex::new(Vec::new()),
            fail: false,
        }
    }

    /// A service whose every search fails.
    pub fn failing() -> Self {
        Self {
            table: HashMap::new(),
            searched_terms: Mutex::new(Vec::new()),
            fail: true,
        }
    }

    /// Terms searched so far, in call order.
    pub fn searched_terms(&self) -> Vec<String> {
        self.searched_terms
            .lock()
            .map(|terms| terms.clone())
            .unwrap_or_default()
    }
}

#[async_trait::async_trait]
impl RetrievalService for MockRetrieval {
    async fn search(&self, term: &str, k: usize) -> AppResult<Vec<RetrievedChunk>> {
        if let Ok(mut terms) = self.searched_terms.lock() {
            terms.push(term.to_string());
        }

        if self.fail {
            return Err(AppError::Retrieval("backend unavailable".to_string()));
        }

        let mut chunks = self.table.get(term).cloned().unwrap_or_default();
        chunks.truncate(k);
        Ok(chunks)
    }

    async fn ingest(&self, _directory: &Path) -> AppResult<IngestReport> {
        Ok(IngestReport {
            message: "mock ingestion".to_string(),
        })
    }
}
