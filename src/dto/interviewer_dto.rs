use serde::Deserialize;
use validator::Validate;

#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct CreateInterviewerPayload {
    #[validate(length(min = 1))]
    pub name: String,
    #[validate(length(min = 1))]
    pub description: String,
    #[validate(length(min = 1))]
    pub personality: String,
    #[serde(default)]
    pub expertise: Option<Vec<String>>,
    #[serde(default)]
    pub avatar_url: Option<String>,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub rapport: Option<i32>,
    #[serde(default)]
    pub exploration: Option<i32>,
    #[serde(default)]
    pub empathy: Option<i32>,
    #[serde(default)]
    pub speed: Option<f64>,
}
