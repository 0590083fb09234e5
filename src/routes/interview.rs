use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::interview_dto::{CreateInterviewRequest, UpdateInterviewPayload},
    error::{Error, Result},
    middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    post,
    path = "/api/interviews",
    request_body = CreateInterviewRequest,
    responses(
        (status = 201, description = "Interview created with share URL"),
        (status = 400, description = "Invalid payload"),
        (status = 409, description = "Slug collision, retry")
    )
)]
#[axum::debug_handler]
pub async fn create_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateInterviewRequest>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let created = state
        .interview_service
        .create(
            &claims.sub,
            claims.org.as_deref(),
            payload.interview_data,
            payload.organization_name.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(created)))
}

#[utoipa::path(
    get,
    path = "/api/interviews",
    responses((status = 200, description = "Interviews visible to the caller"))
)]
#[axum::debug_handler]
pub async fn list_interviews(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let interviews = state
        .interview_service
        .list(&claims.sub, claims.org.as_deref())
        .await?;
    Ok(Json(json!({ "interviews": interviews })))
}

#[utoipa::path(
    get,
    path = "/api/interviews/{id}",
    params(("id" = Uuid, Path, description = "Interview ID")),
    responses(
        (status = 200, description = "Interview detail"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn get_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
) -> Result<impl IntoResponse> {
    let interview = state
        .interview_service
        .get_owned(id, &claims.sub, claims.org.as_deref())
        .await?;
    Ok(Json(json!({ "interview": interview })))
}

/// Unauthenticated lookup behind the share link. Candidates hit this from
/// the public call page, so only a client-safe subset of fields goes out.
#[utoipa::path(
    get,
    path = "/api/public/interviews/{slug}",
    params(("slug" = String, Path, description = "Interview share slug")),
    responses(
        (status = 200, description = "Public interview detail"),
        (status = 404, description = "No active interview for this slug")
    )
)]
#[axum::debug_handler]
pub async fn get_interview_by_slug(
    State(state): State<AppState>,
    Path(slug): Path<String>,
) -> Result<impl IntoResponse> {
    let interview = state.interview_service.get_by_slug(&slug).await?;
    if !interview.is_active {
        return Err(Error::NotFound("Interview not found".to_string()));
    }
    Ok(Json(json!({
        "interview": {
            "id": interview.id,
            "name": interview.name,
            "description": interview.description,
            "objective": interview.objective,
            "questions": interview.questions,
            "question_count": interview.question_count,
            "time_duration": interview.time_duration,
            "is_anonymous": interview.is_anonymous,
            "theme_color": interview.theme_color,
            "logo_url": interview.logo_url,
            "interviewer_id": interview.interviewer_id,
        }
    })))
}

#[utoipa::path(
    patch,
    path = "/api/interviews/{id}",
    params(("id" = Uuid, Path, description = "Interview ID")),
    request_body = UpdateInterviewPayload,
    responses(
        (status = 200, description = "Interview updated"),
        (status = 404, description = "Interview not found")
    )
)]
#[axum::debug_handler]
pub async fn update_interview(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateInterviewPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interview = state
        .interview_service
        .update(id, &claims.sub, claims.org.as_deref(), payload)
        .await?;
    Ok(Json(json!({ "interview": interview })))
}
