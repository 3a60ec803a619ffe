//! The pipeline's externally observable response.

use crate::agents::compliance::{ComplianceVerdict, RiskLevel};
use serde::{Deserialize, Serialize};

/// The sole output of the pipeline per request.
///
/// Serializes to a `status`-tagged object; successful answers additionally
/// carry a `strategy` tag from the flattened [`AnswerOutcome`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum OrchestratorResponse {
    /// The compliance gate refused the query.
    Blocked {
        #[serde(skip_serializing_if = "Option::is_none")]
        reason: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        category: Option<String>,
        #[serde(skip_serializing_if = "Option::is_none")]
        risk_level: Option<RiskLevel>,
        /// Polite, reason-bearing refusal shown to the caller
        answer: String,
    },

    /// The query was answered.
    Success(SuccessResponse),

    /// Defensive terminal state (e.g., an unknown routing strategy).
    Error { message: String },
}

/// Body of a successful response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SuccessResponse {
    /// The strategy-specific answer payload
    #[serde(flatten)]
    pub outcome: AnswerOutcome,

    /// The routing decision's reason, for traceability
    pub decision_reason: String,
}

/// The strategy-specific payload of a successful response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "strategy", rename_all = "snake_case")]
pub enum AnswerOutcome {
    Direct {
        answer: String,
    },
    Rag {
        answer: String,
        context_sufficient: bool,
        citations: Vec<String>,
    },
}

impl OrchestratorResponse {
    /// Build the terminal blocked response from an unsafe verdict.
    pub fn blocked(verdict: ComplianceVerdict) -> Self {
        let refusal = format!(
            "I cannot answer that request. Reason: {}",
            verdict.reason.as_deref().unwrap_or("policy violation")
        );

        Self::Blocked {
            reason: verdict.reason,
            category: verdict.category,
            risk_level: verdict.risk_level,
            answer: refusal,
        }
    }

    /// Build a successful response from an answer outcome and the routing
    /// reason that led to it.
    pub fn success(outcome: AnswerOutcome, decision_reason: String) -> Self {
        Self::Success(SuccessResponse {
            outcome,
            decision_reason,
        })
    }
}
