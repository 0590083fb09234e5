use axum::{
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;
use validator::Validate;

use crate::{
    dto::interviewer_dto::CreateInterviewerPayload, error::Result, middleware::auth::Claims,
    AppState,
};

#[utoipa::path(
    get,
    path = "/api/interviewers",
    responses((status = 200, description = "Interviewers visible to the caller"))
)]
#[axum::debug_handler]
pub async fn list_interviewers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let interviewers = state
        .interviewer_service
        .list(&claims.sub, claims.org.as_deref())
        .await?;
    Ok(Json(json!({ "interviewers": interviewers })))
}

#[utoipa::path(
    post,
    path = "/api/interviewers",
    request_body = CreateInterviewerPayload,
    responses(
        (status = 201, description = "Interviewer created"),
        (status = 400, description = "Invalid payload")
    )
)]
#[axum::debug_handler]
pub async fn create_interviewer(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
    Json(payload): Json<CreateInterviewerPayload>,
) -> Result<impl IntoResponse> {
    payload.validate()?;
    let interviewer = state
        .interviewer_service
        .create(&claims.sub, claims.org.as_deref(), payload)
        .await?;
    Ok((StatusCode::CREATED, Json(json!({ "interviewer": interviewer }))))
}

#[utoipa::path(
    post,
    path = "/api/interviewers/defaults",
    responses(
        (status = 201, description = "Default interviewers created"),
        (status = 200, description = "Defaults already exist")
    )
)]
#[axum::debug_handler]
pub async fn create_default_interviewers(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let created = state
        .interviewer_service
        .create_defaults(&claims.sub, claims.org.as_deref())
        .await?;

    let status = if created.is_empty() {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    let message = if created.is_empty() {
        "Default interviewers already exist".to_string()
    } else {
        format!("{} default interviewer(s) created successfully!", created.len())
    };
    Ok((
        status,
        Json(json!({ "interviewers": created, "message": message })),
    ))
}
