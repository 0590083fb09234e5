pub mod memory;
pub mod postgres;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::Value as JsonValue;
use uuid::Uuid;

use crate::error::Result;
use crate::models::interview::Interview;
use crate::models::interviewer::Interviewer;
use crate::models::response::{CandidateResponse, ResponseAnalysis};
use crate::models::session::{Session, SessionMetadata};

pub use memory::MemoryStore;
pub use postgres::PgStore;

#[derive(Debug, Clone)]
pub struct NewInterviewer {
    pub user_id: String,
    pub org_id: Option<String>,
    pub name: String,
    pub description: String,
    pub personality: String,
    pub expertise: Vec<String>,
    pub avatar_url: Option<String>,
    pub agent_id: Option<String>,
    pub rapport: i32,
    pub exploration: i32,
    pub empathy: i32,
    pub speed: f64,
}

#[derive(Debug, Clone)]
pub struct NewInterview {
    pub user_id: String,
    pub org_id: Option<String>,
    pub name: String,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub questions: JsonValue,
    pub question_count: i32,
    pub time_duration: String,
    pub is_anonymous: bool,
    pub theme_color: Option<String>,
    pub logo_url: Option<String>,
    pub url_slug: String,
    pub interviewer_id: Option<Uuid>,
}

/// Partial update; `None` leaves the column untouched. The slug and the
/// response counter are deliberately absent: the slug is immutable and the
/// counter only moves through [`Store::finalize_session`].
#[derive(Debug, Clone, Default)]
pub struct InterviewPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub objective: Option<String>,
    pub questions: Option<JsonValue>,
    pub question_count: Option<i32>,
    pub time_duration: Option<String>,
    pub is_anonymous: Option<bool>,
    pub theme_color: Option<String>,
    pub logo_url: Option<String>,
    pub interviewer_id: Option<Uuid>,
    pub is_active: Option<bool>,
}

#[derive(Debug, Clone)]
pub struct NewSession {
    pub interview_id: Uuid,
    pub user_id: String,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub call_id: Option<String>,
}

#[derive(Debug, Clone, Default)]
pub struct SessionPatch {
    pub status: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i32>,
    pub transcript: Option<String>,
    pub feedback: Option<JsonValue>,
    pub insights: Option<JsonValue>,
    pub metadata: Option<SessionMetadata>,
}

#[derive(Debug, Clone)]
pub struct NewResponse {
    pub session_id: Uuid,
    pub question: String,
    pub answer: String,
    pub score: f64,
    pub feedback: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub analysis: ResponseAnalysis,
}

/// Aggregated per-dimension scores, already rounded.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SessionScores {
    pub overall: f64,
    pub communication: f64,
    pub technical: f64,
    pub problem_solving: f64,
    pub confidence: f64,
}

#[derive(Debug, Clone)]
pub struct SessionOutcome {
    pub end_time: DateTime<Utc>,
    pub duration_seconds: Option<i32>,
    pub scores: SessionScores,
}

/// Persistence interface shared by the Postgres store and the in-process
/// simulation store. Compound operations that the original system issued as
/// sequential independent writes are atomic here: `record_response` and
/// `finalize_session` each run in one transaction.
#[async_trait]
pub trait Store: Send + Sync {
    async fn create_interviewer(&self, new: NewInterviewer) -> Result<Interviewer>;
    async fn list_interviewers(
        &self,
        user_id: &str,
        org_id: Option<&str>,
    ) -> Result<Vec<Interviewer>>;
    async fn get_interviewer(&self, id: Uuid) -> Result<Option<Interviewer>>;

    async fn create_interview(&self, new: NewInterview) -> Result<Interview>;
    async fn list_interviews(&self, user_id: &str, org_id: Option<&str>)
        -> Result<Vec<Interview>>;
    async fn get_interview(&self, id: Uuid) -> Result<Option<Interview>>;
    async fn get_interview_by_slug(&self, slug: &str) -> Result<Option<Interview>>;
    async fn update_interview(&self, id: Uuid, patch: InterviewPatch) -> Result<Interview>;

    async fn create_session(&self, new: NewSession) -> Result<Session>;
    async fn get_session(&self, id: Uuid) -> Result<Option<Session>>;
    async fn get_session_by_call_id(&self, call_id: &str) -> Result<Option<Session>>;
    async fn list_sessions_by_user(&self, user_id: &str) -> Result<Vec<Session>>;
    async fn list_sessions_by_interview(&self, interview_id: Uuid) -> Result<Vec<Session>>;
    async fn update_session(&self, id: Uuid, patch: SessionPatch) -> Result<Session>;

    /// Insert a response without touching the owning session. Used by the
    /// standalone scoring endpoint.
    async fn create_response(&self, new: NewResponse) -> Result<CandidateResponse>;

    /// Insert a response AND overwrite the owning session's running
    /// sub-scores with the analyzer's latest values, in one transaction.
    /// The running values are display state only; `finalize_session`
    /// recomputes the authoritative aggregates from all responses.
    async fn record_response(&self, new: NewResponse) -> Result<CandidateResponse>;

    async fn list_responses(&self, session_id: Uuid) -> Result<Vec<CandidateResponse>>;

    /// Mark the session COMPLETED with its final scores and increment the
    /// parent interview's response counter, in one transaction.
    async fn finalize_session(&self, id: Uuid, outcome: SessionOutcome) -> Result<Session>;

    async fn count_interviews(&self, user_id: &str, org_id: Option<&str>) -> Result<i64>;
}
