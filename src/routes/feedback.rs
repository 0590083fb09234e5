use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    dto::interview_dto::FeedbackPayload,
    error::Result,
    middleware::auth::Claims,
    store::SessionPatch,
    AppState,
};

/// Attach candidate feedback to their most recent session for the interview.
/// No dedicated feedback table; the blob lives on the session. Succeeds even
/// when no matching session exists.
#[utoipa::path(
    post,
    path = "/api/feedback",
    request_body = FeedbackPayload,
    responses((status = 200, description = "Feedback recorded"))
)]
#[axum::debug_handler]
pub async fn submit_feedback(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(payload): Json<FeedbackPayload>,
) -> Result<impl IntoResponse> {
    let sessions = state
        .store
        .list_sessions_by_interview(payload.interview_id)
        .await?;
    let target = payload.email.as_deref().and_then(|email| {
        sessions
            .iter()
            .find(|s| s.candidate_email.as_deref() == Some(email))
    });

    if let Some(session) = target {
        state
            .store
            .update_session(
                session.id,
                SessionPatch {
                    feedback: Some(json!({
                        "satisfaction": payload.satisfaction,
                        "feedback": payload.feedback,
                        "email": payload.email,
                        "submittedAt": Utc::now(),
                    })),
                    ..Default::default()
                },
            )
            .await?;
    }

    Ok(Json(json!({
        "success": true,
        "message": "Feedback submitted successfully"
    })))
}
