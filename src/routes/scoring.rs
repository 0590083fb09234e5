use axum::{
    extract::{Query, State},
    response::{IntoResponse, Json},
    Extension,
};
use chrono::Utc;
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::scoring_dto::{ScoringHistoryQuery, ScoringRequest, ScoringResult},
    error::{Error, Result},
    middleware::auth::Claims,
    services::aggregator::round1,
    services::groq_service::fallback_analysis,
    store::NewResponse,
    AppState,
};

/// Standalone scoring. Unlike the session-submission path, an analyzer
/// failure here degrades to the deterministic heuristic, and persistence
/// (when a session id accompanies the request) is best-effort.
#[utoipa::path(
    post,
    path = "/api/scoring",
    request_body = ScoringRequest,
    responses(
        (status = 200, description = "Scoring result"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn score_response(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(payload): Json<ScoringRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let scoring = match state
        .analyzer
        .analyze(&payload.question, &payload.answer, payload.context.as_deref())
        .await
    {
        Ok(scoring) => scoring,
        Err(e) => {
            tracing::error!(error = ?e, "Analyzer failed, using heuristic fallback");
            fallback_analysis(&payload.answer)
        }
    };

    if let Some(session_id) = payload.session_id {
        let stored = state
            .store
            .create_response(NewResponse {
                session_id,
                question: payload.question.clone(),
                answer: payload.answer.clone(),
                score: scoring.score,
                feedback: scoring.feedback.clone(),
                strengths: scoring.strengths.clone(),
                improvements: scoring.improvements.clone(),
                analysis: scoring.analysis,
            })
            .await;
        if let Err(e) = stored {
            tracing::error!(error = ?e, %session_id, "Failed to store scored response");
        }
    }

    Ok(Json(json!({
        "success": true,
        "scoring": ScoringResult::from(scoring),
        "timestamp": Utc::now(),
    })))
}

#[utoipa::path(
    get,
    path = "/api/scoring",
    params(("sessionId" = Option<Uuid>, Query, description = "Session scores")),
    responses(
        (status = 200, description = "Session scores or scoring history"),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn get_scores(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Query(query): Query<ScoringHistoryQuery>,
) -> Result<impl IntoResponse> {
    if let Some(session_id) = query.session_id {
        let session = state
            .store
            .get_session(session_id)
            .await?
            .filter(|s| s.user_id == claims.sub)
            .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;
        let responses = state.store.list_responses(session.id).await?;
        let overall = session.overall_score.unwrap_or(0.0);
        return Ok(Json(json!({
            "success": true,
            "session": session,
            "responses": responses,
            "overallScore": overall,
        })));
    }

    let sessions = state.store.list_sessions_by_user(&claims.sub).await?;
    let completed: Vec<_> = sessions
        .into_iter()
        .filter(|s| s.status == "COMPLETED")
        .collect();

    let scores: Vec<_> = completed
        .iter()
        .map(|s| {
            json!({
                "id": s.id,
                "sessionId": s.id,
                "interviewId": s.interview_id,
                "timestamp": s.start_time,
                "overallScore": s.overall_score.unwrap_or(0.0),
                "breakdown": {
                    "communication": s.communication_score.unwrap_or(0.0),
                    "technical": s.technical_score.unwrap_or(0.0),
                    "problemSolving": s.problem_solving_score.unwrap_or(0.0),
                    "confidence": s.confidence_score.unwrap_or(0.0),
                    "relevance": s.overall_score.unwrap_or(0.0),
                }
            })
        })
        .collect();

    let average = if completed.is_empty() {
        0.0
    } else {
        completed
            .iter()
            .map(|s| s.overall_score.unwrap_or(0.0))
            .sum::<f64>()
            / completed.len() as f64
    };

    // The list is newest-first, so "improving" compares the oldest entry
    // against the newest. Kept as the clients expect it.
    let trend = if completed.len() > 1
        && completed.last().and_then(|s| s.overall_score)
            > completed.first().and_then(|s| s.overall_score)
    {
        "improving"
    } else {
        "stable"
    };

    Ok(Json(json!({
        "success": true,
        "scores": scores,
        "summary": {
            "averageScore": round1(average),
            "totalSessions": completed.len(),
            "improvementTrend": trend,
        }
    })))
}
