use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;

use crate::{
    dto::session_dto::{ScoreBreakdown, SessionActionRequest, SessionListQuery, SubmittedResponse},
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};

/// Action dispatch for the session lifecycle. One endpoint, three actions,
/// matching the client contract.
#[utoipa::path(
    post,
    path = "/api/interview-session",
    request_body = SessionActionRequest,
    responses(
        (status = 200, description = "Action applied"),
        (status = 400, description = "Unknown action or missing data"),
        (status = 404, description = "Session or interview not found")
    )
)]
#[axum::debug_handler]
pub async fn session_action(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<SessionActionRequest>,
) -> Result<impl IntoResponse> {
    match payload.action.as_str() {
        "start_session" => {
            let interview_id = payload
                .interview_id
                .ok_or_else(|| Error::BadRequest("interviewId is required".to_string()))?;
            let data = payload.session_data.unwrap_or_default();
            let session = state
                .session_service
                .start_session(
                    interview_id,
                    &claims.sub,
                    data.candidate_name,
                    data.candidate_email,
                    data.call_id,
                )
                .await?;
            Ok(Json(json!({
                "success": true,
                "session": session,
                "message": "Session started successfully"
            })))
        }

        "submit_response" => {
            let data = payload
                .response_data
                .ok_or_else(|| Error::BadRequest("responseData is required".to_string()))?;
            let response = state
                .session_service
                .submit_response(data.session_id, &data.question, &data.answer)
                .await?;
            let submitted = SubmittedResponse {
                breakdown: ScoreBreakdown {
                    communication: response.analysis.communication_score,
                    technical: response.analysis.technical_score,
                    problem_solving: response.analysis.problem_solving_score,
                    confidence: response.analysis.confidence_score,
                },
                response,
            };
            Ok(Json(json!({
                "success": true,
                "response": submitted,
                "message": "Response submitted and analyzed"
            })))
        }

        "end_session" => {
            let data = payload
                .session_data
                .ok_or_else(|| Error::BadRequest("sessionData is required".to_string()))?;
            let session_id = data
                .session_id
                .ok_or_else(|| Error::BadRequest("sessionId is required".to_string()))?;
            let session = state
                .session_service
                .end_session(session_id, data.duration)
                .await?;
            let overall = session.overall_score.unwrap_or(0.0);
            Ok(Json(json!({
                "success": true,
                "session": session,
                "overallScore": overall,
                "message": "Session ended successfully"
            })))
        }

        _ => Err(Error::BadRequest("Invalid action".to_string())),
    }
}

#[utoipa::path(
    get,
    path = "/api/interview-session",
    params(
        ("sessionId" = Option<Uuid>, Query, description = "Session detail"),
        ("interviewId" = Option<Uuid>, Query, description = "Sessions for an interview")
    ),
    responses(
        (status = 200, description = "Session detail or list"),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn get_sessions(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<SessionListQuery>,
) -> Result<impl IntoResponse> {
    if let Some(session_id) = query.session_id {
        let session = state.store.get_session(session_id).await?;
        // Cross-tenant lookups read as not-found, never as forbidden.
        let session = session
            .filter(|s| s.user_id == claims.sub)
            .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;
        let responses = state.store.list_responses(session.id).await?;
        return Ok(Json(json!({ "session": session, "responses": responses })));
    }

    if let Some(interview_id) = query.interview_id {
        let sessions = state.store.list_sessions_by_interview(interview_id).await?;
        return Ok(Json(json!({ "sessions": sessions })));
    }

    let sessions = state.store.list_sessions_by_user(&claims.sub).await?;
    Ok(Json(json!({ "sessions": sessions })))
}
