use serde::Deserialize;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateInsightsRequest {
    pub session_id: Uuid,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct AnalyzeCommunicationRequest {
    #[validate(length(min = 1))]
    pub transcript: String,
}
