use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Interview {
    pub id: Uuid,
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
    pub response_count: i32,
    pub is_active: bool,
    pub respondents: Vec<String>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}
