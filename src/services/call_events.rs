use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::dto::webhook_dto::CallPayload;
use crate::error::Result;
use crate::models::session::SessionMetadata;
use crate::services::call_service::CallService;
use crate::store::{SessionPatch, Store};

/// Applies call-provider lifecycle events to sessions. Events for call ids
/// no session claims are dropped silently; the provider retries on non-2xx
/// and there is nothing useful to do with an unknown call.
#[derive(Clone)]
pub struct CallEventService {
    store: Arc<dyn Store>,
    calls: CallService,
}

impl CallEventService {
    pub fn new(store: Arc<dyn Store>, calls: CallService) -> Self {
        Self { store, calls }
    }

    pub async fn dispatch(&self, event: &str, call: &CallPayload) -> Result<()> {
        tracing::info!(event, call_id = %call.call_id, "Webhook event received");
        match event {
            "call_started" => self.on_call_started(call).await,
            "call_ended" => self.on_call_ended(call).await,
            "call_analyzed" => self.on_call_analyzed(call).await,
            other => {
                tracing::info!(event = other, "Ignoring unknown webhook event");
                Ok(())
            }
        }
    }

    async fn on_call_started(&self, call: &CallPayload) -> Result<()> {
        let Some(session) = self.store.get_session_by_call_id(&call.call_id).await? else {
            return Ok(());
        };
        let start_time = call
            .start_timestamp
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now);
        self.store
            .update_session(
                session.id,
                SessionPatch {
                    status: Some("ACTIVE".to_string()),
                    start_time: Some(start_time),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    async fn on_call_ended(&self, call: &CallPayload) -> Result<()> {
        let Some(session) = self.store.get_session_by_call_id(&call.call_id).await? else {
            return Ok(());
        };

        let end_time = call
            .end_timestamp
            .and_then(DateTime::from_timestamp_millis)
            .unwrap_or_else(Utc::now);
        let start_time = session.start_time.unwrap_or_else(Utc::now);
        let duration = (end_time - start_time).num_seconds().max(0) as i32;

        let metadata = session.metadata().merged(SessionMetadata {
            recording_url: call.recording_url.clone(),
            public_log_url: call.public_log_url.clone(),
            analysis: None,
        });

        self.store
            .update_session(
                session.id,
                SessionPatch {
                    status: Some("COMPLETED".to_string()),
                    end_time: Some(end_time),
                    duration_seconds: Some(duration),
                    transcript: call.transcript.clone().or(session.transcript),
                    metadata: Some(metadata),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }

    /// Attach the provider's post-call analysis. A fetch failure is logged
    /// and swallowed so the provider still gets its 204.
    async fn on_call_analyzed(&self, call: &CallPayload) -> Result<()> {
        let Some(session) = self.store.get_session_by_call_id(&call.call_id).await? else {
            return Ok(());
        };

        let details = match self.calls.get_call(&call.call_id).await {
            Ok(Some(details)) => details,
            Ok(None) => return Ok(()),
            Err(e) => {
                tracing::error!(error = ?e, call_id = %call.call_id, "Failed to fetch call analysis");
                return Ok(());
            }
        };

        let transcript = details
            .get("transcript")
            .and_then(|v| v.as_str())
            .map(String::from);
        let metadata = session.metadata().merged(analyzed_metadata(details));

        self.store
            .update_session(
                session.id,
                SessionPatch {
                    transcript,
                    metadata: Some(metadata),
                    ..Default::default()
                },
            )
            .await?;
        Ok(())
    }
}

/// Metadata carried by a post-call analysis payload. The provider may only
/// populate the recording and log URLs here, so they are lifted alongside
/// the analysis blob; absent URLs stay `None` and the merge keeps prior
/// values.
fn analyzed_metadata(details: serde_json::Value) -> SessionMetadata {
    let text = |key: &str| {
        details
            .get(key)
            .and_then(|v| v.as_str())
            .map(String::from)
    };
    SessionMetadata {
        recording_url: text("recording_url"),
        public_log_url: text("public_log_url"),
        analysis: Some(details),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn analysis_payload_urls_are_lifted_into_metadata() {
        let details = json!({
            "transcript": "Agent: hello.",
            "recording_url": "https://calls/rec-late.wav",
            "public_log_url": "https://calls/log-late",
            "call_analysis": { "sentiment": "positive" }
        });
        let metadata = analyzed_metadata(details.clone());
        assert_eq!(metadata.recording_url.as_deref(), Some("https://calls/rec-late.wav"));
        assert_eq!(metadata.public_log_url.as_deref(), Some("https://calls/log-late"));
        assert_eq!(metadata.analysis, Some(details));
    }

    #[test]
    fn analysis_without_urls_leaves_prior_urls_intact_after_merge() {
        let prior = SessionMetadata {
            recording_url: Some("https://calls/rec-1.wav".into()),
            public_log_url: Some("https://calls/log-1".into()),
            analysis: None,
        };
        let merged = prior.merged(analyzed_metadata(json!({"call_analysis": {}})));
        assert_eq!(merged.recording_url.as_deref(), Some("https://calls/rec-1.wav"));
        assert_eq!(merged.public_log_url.as_deref(), Some("https://calls/log-1"));
        assert!(merged.analysis.is_some());
    }
}
