use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use serde_json::json;

use crate::{
    dto::call_dto::{GetCallRequest, RegisterCallRequest},
    error::{Error, Result},
    middleware::auth::Claims,
    store::NewSession,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/register-call",
    request_body = RegisterCallRequest,
    responses(
        (status = 200, description = "Call registered, session created"),
        (status = 404, description = "Interviewer or interview not found")
    )
)]
#[axum::debug_handler]
pub async fn register_call(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<RegisterCallRequest>,
) -> Result<impl IntoResponse> {
    let interviewer = state.interviewer_service.get(payload.interviewer_id).await?;
    let interview = state
        .interview_service
        .get_owned(payload.interview_id, &claims.sub, claims.org.as_deref())
        .await?;

    let metadata = payload.metadata.unwrap_or_else(|| json!({}));
    let candidate_name = metadata
        .get("candidateName")
        .and_then(|v| v.as_str())
        .map(String::from);
    let candidate_email = metadata
        .get("candidateEmail")
        .and_then(|v| v.as_str())
        .map(String::from);

    let call_metadata = json!({
        "userId": claims.sub,
        "interviewId": interview.id,
        "interviewerId": interviewer.id,
        "extra": metadata,
    });
    let registered = state
        .call_service
        .register_call(&interviewer, call_metadata)
        .await;

    state
        .store
        .create_session(NewSession {
            interview_id: interview.id,
            user_id: claims.sub.clone(),
            candidate_name,
            candidate_email,
            call_id: Some(registered.call_id.clone()),
        })
        .await?;

    Ok(Json(json!({
        "success": true,
        "registerCallResponse": registered,
    })))
}

#[utoipa::path(
    post,
    path = "/api/get-call",
    request_body = GetCallRequest,
    responses(
        (status = 200, description = "Call detail with session analytics"),
        (status = 403, description = "Call belongs to another user"),
        (status = 404, description = "No session for this call")
    )
)]
#[axum::debug_handler]
pub async fn get_call(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GetCallRequest>,
) -> Result<impl IntoResponse> {
    let session = state
        .store
        .get_session_by_call_id(&payload.call_id)
        .await?
        .ok_or_else(|| Error::NotFound("Session not found for this call ID".to_string()))?;

    if session.user_id != claims.sub {
        return Err(Error::Forbidden(
            "Unauthorized access to this call".to_string(),
        ));
    }

    // Provider-side details are a best-effort enrichment.
    let provider_data = match state.call_service.get_call(&payload.call_id).await {
        Ok(data) => data,
        Err(e) => {
            tracing::error!(error = ?e, call_id = %payload.call_id, "Failed to fetch provider call data");
            None
        }
    };

    let responses = state.store.list_responses(session.id).await?;
    let transcript = provider_data
        .as_ref()
        .and_then(|d| d.get("transcript"))
        .and_then(|v| v.as_str())
        .map(String::from)
        .or(session.transcript.clone())
        .unwrap_or_else(|| "Transcript not available".to_string());
    let recording_url = provider_data
        .as_ref()
        .and_then(|d| d.get("recording_url"))
        .cloned()
        .unwrap_or(json!(null));

    let call_response = json!({
        "call_id": payload.call_id,
        "session_id": session.id,
        "start_timestamp": session.start_time.map(|t| t.timestamp_millis()),
        "end_timestamp": session
            .end_time
            .map(|t| t.timestamp_millis())
            .unwrap_or_else(|| Utc::now().timestamp_millis()),
        "duration": session.duration_seconds.unwrap_or(0),
        "transcript": transcript,
        "status": session.status,
        "recording_url": recording_url,
    });

    let analytics = json!({
        "overall_score": session.overall_score.unwrap_or(0.0),
        "communication_score": session.communication_score.unwrap_or(0.0),
        "technical_score": session.technical_score.unwrap_or(0.0),
        "problem_solving_score": session.problem_solving_score.unwrap_or(0.0),
        "confidence_score": session.confidence_score.unwrap_or(0.0),
        "feedback": session.feedback.clone().unwrap_or(json!("No feedback available yet.")),
        "response_count": responses.len(),
        "responses": responses.iter().map(|r| json!({
            "question": r.question,
            "answer": truncate_answer(&r.answer),
            "score": r.score,
            "strengths": r.strengths,
            "improvements": r.improvements,
        })).collect::<Vec<_>>(),
    });

    Ok(Json(json!({
        "success": true,
        "callResponse": call_response,
        "analytics": analytics,
    })))
}

fn truncate_answer(answer: &str) -> String {
    if answer.chars().count() > 100 {
        let prefix: String = answer.chars().take(100).collect();
        format!("{}...", prefix)
    } else {
        answer.to_string()
    }
}
