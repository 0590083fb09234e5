use axum::{
    extract::State,
    response::{IntoResponse, Json},
    Extension,
};
use serde_json::json;

use crate::{error::Result, middleware::auth::Claims, AppState};

#[utoipa::path(
    get,
    path = "/api/analytics",
    responses((status = 200, description = "Dashboard analytics for the caller"))
)]
#[axum::debug_handler]
pub async fn get_analytics(
    State(state): State<AppState>,
    Extension(claims): Extension<Claims>,
) -> Result<impl IntoResponse> {
    let analytics = state
        .analytics_service
        .dashboard(&claims.sub, claims.org.as_deref())
        .await?;
    Ok(Json(json!({ "success": true, "data": analytics })))
}
