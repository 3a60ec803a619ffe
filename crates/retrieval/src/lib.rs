//! Retrieval service boundary for the triage pipeline.
//!
//! The pipeline treats similarity search and document ingestion as an
//! external capability: this crate defines the `RetrievalService` contract,
//! the value objects crossing that boundary, and an HTTP client for a
//! service implementing it. Index internals, chunking, and embeddings live
//! on the other side of the wire and are out of scope here.

pub mod http;
pub mod service;
pub mod types;

// Re-export main types
pub use http::HttpRetrievalClient;
pub use service::RetrievalService;
pub use types::{IngestReport, RetrievedChunk};
