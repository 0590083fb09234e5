use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::interview_dto::GenerateQuestionsPayload,
    error::Result,
    middleware::auth::Claims,
    services::groq_service::fallback_questions,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/generate-questions",
    request_body = GenerateQuestionsPayload,
    responses(
        (status = 200, description = "Generated questions"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn generate_questions(
    State(state): State<AppState>,
    Extension(_claims): Extension<Claims>,
    Json(payload): Json<GenerateQuestionsPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;

    let skills = payload.skills.unwrap_or_default();
    let questions = match state
        .analyzer
        .generate_questions(
            &payload.name,
            &payload.objective,
            payload.number,
            payload.context.as_deref(),
            &skills,
        )
        .await
    {
        Ok(questions) if !questions.is_empty() => questions,
        Ok(_) => fallback_questions(payload.number),
        Err(e) => {
            tracing::error!(error = ?e, "Question generation failed, using fallback list");
            fallback_questions(payload.number)
        }
    };

    Ok(Json(json!({
        "success": true,
        "questions": questions.iter().map(|q| json!({ "question": q })).collect::<Vec<_>>(),
        "description": format!(
            "AI-generated interview questions for {} focusing on {}",
            payload.name, payload.objective
        ),
    })))
}
