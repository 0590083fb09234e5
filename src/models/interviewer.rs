use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

/// An AI persona assignable to interviews. The four numeric dials tune the
/// external voice agent (rapport/exploration/empathy on 0-10, speed as a
/// playback multiplier).
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interviewer {
    pub id: Uuid,
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
    pub created_at: Option<DateTime<Utc>>,
}
