use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::Validate;

use crate::services::groq_service::ResponseScoring;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ScoringRequest {
    #[validate(length(min = 1))]
    pub question: String,
    #[validate(length(min = 1))]
    pub answer: String,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringHistoryQuery {
    #[serde(default)]
    pub session_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringBreakdown {
    pub communication: f64,
    pub technical: f64,
    pub problem_solving: f64,
    pub confidence: f64,
    pub relevance: f64,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoringResult {
    pub overall_score: f64,
    pub breakdown: ScoringBreakdown,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
}

impl From<ResponseScoring> for ScoringResult {
    fn from(scoring: ResponseScoring) -> Self {
        ScoringResult {
            overall_score: scoring.score,
            breakdown: ScoringBreakdown {
                communication: scoring.analysis.communication_score,
                technical: scoring.analysis.technical_score,
                problem_solving: scoring.analysis.problem_solving_score,
                confidence: scoring.analysis.confidence_score,
                // Derived, the analyzer does not emit a relevance dimension.
                relevance: (scoring.score + scoring.analysis.technical_score) / 2.0,
            },
            feedback: scoring.feedback,
            strengths: scoring.strengths,
            improvements: scoring.improvements,
        }
    }
}
