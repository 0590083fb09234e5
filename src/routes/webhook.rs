use axum::{
    body::Bytes,
    extract::State,
    http::{HeaderMap, StatusCode},
    response::IntoResponse,
};

use crate::{
    config::get_config,
    error::{Error, Result},
    utils::signature,
    AppState,
};

/// Voice-provider event sink. The signature covers the raw body, so the body
/// is taken as bytes and parsed only after verification. Dispatch failures
/// are logged but never surfaced; the provider retries on non-2xx and a
/// retry will not fix a bad event.
#[utoipa::path(
    post,
    path = "/api/response-webhook",
    responses(
        (status = 204, description = "Event accepted"),
        (status = 401, description = "Missing or invalid signature")
    )
)]
#[axum::debug_handler]
pub async fn handle_call_event(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<impl IntoResponse> {
    let config = get_config();
    let Some(secret) = config.voice_api_key.as_deref() else {
        tracing::error!("Webhook received but no voice provider secret is configured");
        return Err(Error::Unauthorized("Webhook not configured".to_string()));
    };

    let provided = headers
        .get("x-call-signature")
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| Error::Unauthorized("Missing signature".to_string()))?;

    if !signature::verify(&body, secret, provided) {
        return Err(Error::Unauthorized("Invalid signature".to_string()));
    }

    let envelope: crate::dto::webhook_dto::WebhookEnvelope = serde_json::from_slice(&body)?;

    if let Err(e) = state
        .call_event_service
        .dispatch(&envelope.event, &envelope.call)
        .await
    {
        tracing::error!(error = ?e, event = %envelope.event, "Webhook dispatch failed");
    }

    Ok(StatusCode::NO_CONTENT)
}
