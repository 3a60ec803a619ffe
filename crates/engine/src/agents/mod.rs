//! The pipeline's agents.
//!
//! Each agent is one generator call behind a fixed policy prompt, plus
//! whatever deterministic pre-work the stage needs (the compliance agent's
//! heuristics). Agents own their output schemas; parsing is delegated to
//! `StructuredGenerator`.

pub mod compliance;
pub mod decision;
pub mod direct;
pub mod rag_answer;

pub use compliance::{ComplianceAgent, ComplianceVerdict, RiskLevel};
pub use decision::{DecisionAgent, RoutingDecision, Strategy};
pub use direct::DirectAnswerAgent;
pub use rag_answer::{RagAnswer, RagAnswerAgent};
