use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::types::Json;
use sqlx::FromRow;
use uuid::Uuid;

/// One candidate's attempt at an interview.
///
/// Status is carried as a free-form string (`ACTIVE`, `COMPLETED`,
/// `CANCELLED`) rather than a closed enum; the webhook dispatcher and the
/// lifecycle orchestrator are the only writers. The five score fields stay
/// unset until the session is finalized.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Session {
    pub id: Uuid,
    pub interview_id: Uuid,
    pub user_id: String,
    pub status: String,
    pub candidate_name: Option<String>,
    pub candidate_email: Option<String>,
    pub call_id: Option<String>,
    pub start_time: Option<DateTime<Utc>>,
    pub end_time: Option<DateTime<Utc>>,
    pub duration_seconds: Option<i32>,
    pub overall_score: Option<f64>,
    pub communication_score: Option<f64>,
    pub technical_score: Option<f64>,
    pub problem_solving_score: Option<f64>,
    pub confidence_score: Option<f64>,
    pub transcript: Option<String>,
    pub feedback: Option<JsonValue>,
    pub insights: Option<JsonValue>,
    pub metadata: Option<Json<SessionMetadata>>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

impl Session {
    pub fn metadata(&self) -> SessionMetadata {
        self.metadata
            .as_ref()
            .map(|m| m.0.clone())
            .unwrap_or_default()
    }
}

/// Call-provider artifacts attached to a session. Kept as an explicit schema
/// instead of an open map so a missing or mistyped field fails at
/// deserialization, not three handlers later.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct SessionMetadata {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub recording_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub public_log_url: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub analysis: Option<JsonValue>,
}

impl SessionMetadata {
    /// Shallow-merge: fields present on `incoming` win, absent fields keep
    /// their prior value. Matches the spread semantics the call-provider
    /// webhook relies on across `call_ended` / `call_analyzed`.
    pub fn merged(&self, incoming: SessionMetadata) -> SessionMetadata {
        SessionMetadata {
            recording_url: incoming.recording_url.or_else(|| self.recording_url.clone()),
            public_log_url: incoming
                .public_log_url
                .or_else(|| self.public_log_url.clone()),
            analysis: incoming.analysis.or_else(|| self.analysis.clone()),
        }
    }
}
