use serde::Deserialize;
use serde_json::Value as JsonValue;
use uuid::Uuid;

/// Call registration body. Field casing is preserved from the client
/// contract, which mixes snake and camel case here.
#[derive(Debug, Clone, Deserialize)]
pub struct RegisterCallRequest {
    pub interviewer_id: Uuid,
    #[serde(rename = "interviewId")]
    pub interview_id: Uuid,
    #[serde(default)]
    pub metadata: Option<JsonValue>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GetCallRequest {
    pub call_id: String,
}
