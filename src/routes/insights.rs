use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::insights_dto::{AnalyzeCommunicationRequest, GenerateInsightsRequest},
    error::{Error, Result},
    middleware::auth::Claims,
    services::groq_service::fallback_insights,
    store::SessionPatch,
    AppState,
};

/// Session-level narrative insights. Generated from the recorded responses,
/// persisted on the session, and returned together with the score breakdown.
/// Generation failure degrades to a canned summary.
#[utoipa::path(
    post,
    path = "/api/generate-insights",
    request_body = GenerateInsightsRequest,
    responses(
        (status = 200, description = "Insights generated and stored"),
        (status = 400, description = "Session has no responses yet"),
        (status = 403, description = "Session belongs to another user"),
        (status = 404, description = "Session not found")
    )
)]
#[axum::debug_handler]
pub async fn generate_insights(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<GenerateInsightsRequest>,
) -> Result<impl IntoResponse> {
    let session = state
        .store
        .get_session(payload.session_id)
        .await?
        .ok_or_else(|| Error::NotFound("Session not found".to_string()))?;
    if session.user_id != claims.sub {
        return Err(Error::Forbidden(
            "Unauthorized access to this session".to_string(),
        ));
    }

    let responses = state.store.list_responses(session.id).await?;
    if responses.is_empty() {
        return Err(Error::BadRequest(
            "No responses found for this session. Complete the interview first.".to_string(),
        ));
    }

    let overall = session.overall_score.unwrap_or_else(|| {
        responses.iter().map(|r| r.score).sum::<f64>() / responses.len() as f64
    });

    let insights = match state.analyzer.generate_insights(&responses, overall).await {
        Ok(insights) => insights,
        Err(e) => {
            tracing::error!(error = ?e, session_id = %session.id, "Insights generation failed, using canned summary");
            fallback_insights()
        }
    };

    state
        .store
        .update_session(
            session.id,
            SessionPatch {
                insights: Some(serde_json::to_value(&insights)?),
                ..Default::default()
            },
        )
        .await?;

    Ok(Json(json!({
        "success": true,
        "insights": {
            "summary": insights.summary,
            "key_strengths": insights.key_strengths,
            "areas_for_improvement": insights.areas_to_improve,
            "recommendations": insights.recommendations,
            "overall_score": overall,
            "score_breakdown": {
                "communication": session.communication_score.unwrap_or(0.0),
                "technical": session.technical_score.unwrap_or(0.0),
                "problem_solving": session.problem_solving_score.unwrap_or(0.0),
                "confidence": session.confidence_score.unwrap_or(0.0),
            }
        }
    })))
}

/// Transcript-level communication analysis. The model's JSON is returned
/// as-is; no fallback, a provider failure surfaces as an error.
#[utoipa::path(
    post,
    path = "/api/analyze-communication",
    request_body = AnalyzeCommunicationRequest,
    responses(
        (status = 200, description = "Communication analysis"),
        (status = 400, description = "Missing transcript")
    )
)]
#[axum::debug_handler]
pub async fn analyze_communication(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(payload): Json<AnalyzeCommunicationRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let analysis = state.analyzer.analyze_communication(&payload.transcript).await?;
    Ok(Json(json!({ "analysis": analysis })))
}
