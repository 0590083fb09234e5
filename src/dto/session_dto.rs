use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::response::CandidateResponse;

/// Action-dispatch request body for the session endpoint. One endpoint,
/// three actions, mirroring the client contract.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionActionRequest {
    pub action: String,
    #[serde(default)]
    pub interview_id: Option<Uuid>,
    #[serde(default)]
    pub session_data: Option<SessionData>,
    #[serde(default)]
    pub response_data: Option<ResponseData>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionData {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub candidate_name: Option<String>,
    #[serde(default)]
    pub candidate_email: Option<String>,
    #[serde(default)]
    pub call_id: Option<String>,
    #[serde(default)]
    pub duration: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResponseData {
    pub session_id: Uuid,
    pub question: String,
    pub answer: String,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionListQuery {
    #[serde(default)]
    pub session_id: Option<Uuid>,
    #[serde(default)]
    pub interview_id: Option<Uuid>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmittedResponse {
    #[serde(flatten)]
    pub response: CandidateResponse,
    pub breakdown: ScoreBreakdown,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ScoreBreakdown {
    pub communication: f64,
    pub technical: f64,
    pub problem_solving: f64,
    pub confidence: f64,
}
