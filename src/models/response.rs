use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One answered question within a session. Written once by the orchestrator
/// or the standalone scoring endpoint, never mutated afterwards.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct CandidateResponse {
    pub id: Uuid,
    pub session_id: Uuid,
    pub question: String,
    pub answer: String,
    pub score: f64,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub analysis: Json<ResponseAnalysis>,
    pub created_at: Option<DateTime<Utc>>,
}

/// The four sub-scores the analyzer attaches to every response. Nominal
/// scale 0-10, not strictly enforced.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq)]
pub struct ResponseAnalysis {
    pub communication_score: f64,
    pub technical_score: f64,
    pub problem_solving_score: f64,
    pub confidence_score: f64,
}
