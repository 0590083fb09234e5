use chrono::Utc;
use rand::{distributions::Alphanumeric, thread_rng, Rng};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;
use std::time::Duration;

use crate::error::Result;
use crate::models::interviewer::Interviewer;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RegisteredCall {
    pub call_id: String,
    pub access_token: String,
    pub agent_id: String,
    pub web_call_url: String,
    pub status: String,
}

/// Client for the external voice-call provider. Unconfigured deployments get
/// deterministic mock registrations so the rest of the flow keeps working.
#[derive(Clone)]
pub struct CallService {
    client: Client,
    api_key: Option<String>,
    base_url: String,
    public_base_url: String,
}

impl CallService {
    pub fn new(
        api_key: Option<String>,
        base_url: String,
        public_base_url: String,
        client: Client,
    ) -> Self {
        Self {
            client,
            api_key,
            base_url,
            public_base_url,
        }
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    /// Register a web call for the interviewer's voice agent. Falls back to
    /// a mock registration when the provider is unconfigured or errors.
    pub async fn register_call(
        &self,
        interviewer: &Interviewer,
        metadata: JsonValue,
    ) -> RegisteredCall {
        let (Some(api_key), Some(agent_id)) = (&self.api_key, &interviewer.agent_id) else {
            return self.mock_registration(interviewer);
        };

        let payload = serde_json::json!({
            "agent_id": agent_id,
            "audio_websocket_protocol": "web",
            "audio_encoding": "s16le",
            "sample_rate": 24000,
            "metadata": metadata,
        });

        match self.post_register(api_key, &payload).await {
            Ok(raw) => {
                let call_id = raw
                    .get("call_id")
                    .and_then(|v| v.as_str())
                    .unwrap_or_default()
                    .to_string();
                RegisteredCall {
                    web_call_url: raw
                        .get("web_call_url")
                        .and_then(|v| v.as_str())
                        .map(String::from)
                        .unwrap_or_else(|| {
                            format!("{}/call/{}", self.public_base_url, call_id)
                        }),
                    access_token: raw
                        .get("access_token")
                        .and_then(|v| v.as_str())
                        .unwrap_or_default()
                        .to_string(),
                    agent_id: raw
                        .get("agent_id")
                        .and_then(|v| v.as_str())
                        .unwrap_or(agent_id)
                        .to_string(),
                    call_id,
                    status: "registered".to_string(),
                }
            }
            Err(e) => {
                tracing::error!(error = ?e, "Call provider registration failed, using mock");
                self.mock_registration(interviewer)
            }
        }
    }

    async fn post_register(&self, api_key: &str, payload: &JsonValue) -> Result<JsonValue> {
        let res = self
            .client
            .post(format!("{}/register-call", self.base_url))
            .bearer_auth(api_key)
            .json(payload)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Call provider error {}: {}", status, text).into());
        }
        Ok(res.json().await?)
    }

    /// Fetch provider-side call details (transcript, recording, analysis).
    /// Returns `None` when the provider is not configured.
    pub async fn get_call(&self, call_id: &str) -> Result<Option<JsonValue>> {
        let Some(api_key) = &self.api_key else {
            return Ok(None);
        };
        let res = self
            .client
            .get(format!("{}/v2/get-call/{}", self.base_url, call_id))
            .bearer_auth(api_key)
            .timeout(Duration::from_secs(30))
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            return Err(anyhow::anyhow!("Call provider error {}: {}", status, text).into());
        }
        Ok(Some(res.json().await?))
    }

    fn mock_registration(&self, interviewer: &Interviewer) -> RegisteredCall {
        let now = Utc::now().timestamp_millis();
        // call_id is unique per session; a timestamp alone collides when two
        // registrations land in the same millisecond.
        let suffix: String = thread_rng()
            .sample_iter(&Alphanumeric)
            .take(8)
            .map(char::from)
            .collect::<String>()
            .to_lowercase();
        let call_id = format!("call_{}_{}", now, suffix);
        RegisteredCall {
            web_call_url: format!("{}/call/{}", self.public_base_url, call_id),
            access_token: format!("token_{}", now),
            agent_id: interviewer
                .agent_id
                .clone()
                .unwrap_or_else(|| format!("agent_{}", interviewer.id)),
            call_id,
            status: "registered".to_string(),
        }
    }
}
