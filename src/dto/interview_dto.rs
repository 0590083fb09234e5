use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use uuid::Uuid;
use validator::Validate;

use crate::models::interview::Interview;

/// Creation body. The interview payload is nested and an optional
/// organization name switches the slug to the org-branded variant.
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewRequest {
    #[validate(nested)]
    pub interview_data: CreateInterviewPayload,
    #[serde(default)]
    pub organization_name: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub questions: Option<JsonValue>,
    #[serde(default)]
    pub question_count: Option<i32>,
    #[serde(default, alias = "time_duration")]
    pub time_duration: Option<String>,
    #[serde(default, alias = "is_anonymous")]
    pub is_anonymous: Option<bool>,
    #[serde(default, alias = "theme_color")]
    pub theme_color: Option<String>,
    #[serde(default, alias = "logo_url")]
    pub logo_url: Option<String>,
    #[serde(default, alias = "interviewer_id")]
    pub interviewer_id: Option<Uuid>,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateInterviewPayload {
    #[validate(length(min = 1))]
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub objective: Option<String>,
    #[serde(default)]
    pub questions: Option<JsonValue>,
    #[serde(default)]
    pub question_count: Option<i32>,
    #[serde(default)]
    pub time_duration: Option<String>,
    #[serde(default)]
    pub is_anonymous: Option<bool>,
    #[serde(default)]
    pub theme_color: Option<String>,
    #[serde(default)]
    pub logo_url: Option<String>,
    #[serde(default)]
    pub interviewer_id: Option<Uuid>,
    #[serde(default)]
    pub is_active: Option<bool>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewResponse {
    pub response: String,
    pub interview: Interview,
    pub url: String,
    pub url_slug: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct GenerateQuestionsPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub objective: String,
    #[validate(range(min = 1, max = 50))]
    pub number: usize,
    #[serde(default)]
    pub context: Option<String>,
    #[serde(default)]
    pub skills: Option<Vec<String>>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FeedbackPayload {
    pub interview_id: Uuid,
    #[serde(default)]
    pub satisfaction: Option<i32>,
    #[serde(default)]
    pub feedback: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}
