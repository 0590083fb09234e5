use serde::Deserialize;

/// Envelope posted by the voice-call provider. Timestamps are epoch
/// milliseconds; unknown extra fields are ignored.
#[derive(Debug, Clone, Deserialize)]
pub struct WebhookEnvelope {
    pub event: String,
    pub call: CallPayload,
}

#[derive(Debug, Clone, Deserialize)]
pub struct CallPayload {
    pub call_id: String,
    #[serde(default)]
    pub agent_id: Option<String>,
    #[serde(default)]
    pub start_timestamp: Option<i64>,
    #[serde(default)]
    pub end_timestamp: Option<i64>,
    #[serde(default)]
    pub transcript: Option<String>,
    #[serde(default)]
    pub recording_url: Option<String>,
    #[serde(default)]
    pub public_log_url: Option<String>,
}
