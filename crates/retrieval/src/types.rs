//! Value objects crossing the retrieval boundary.

use serde::{Deserialize, Serialize};

/// One retrieved content fragment plus its source identifier.
///
/// `source` is an opaque identifier (typically a filename); services that
/// cannot attribute a chunk report it as "unknown".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RetrievedChunk {
    /// The chunk text
    pub content: String,

    /// Source identifier
    #[serde(default = "unknown_source")]
    pub source: String,
}

fn unknown_source() -> String {
    "unknown".to_string()
}

impl RetrievedChunk {
    /// Create a chunk with an explicit source.
    pub fn new(content: impl Into<String>, source: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            source: source.into(),
        }
    }
}

/// Outcome of an ingestion trigger.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IngestReport {
    /// Human-readable summary from the retrieval service
    pub message: String,
}
