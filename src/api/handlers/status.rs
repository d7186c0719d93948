//! Public status lookup by registration number.

use crate::api::doc::STATUS_TAG;
use crate::api::dto::{ErrorResponse, StatusCheckRequest, StatusCheckResponse};
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;
use axum::{Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn status_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(check_status))
}

#[utoipa::path(
    post,
    path = "/status/check",
    tag = STATUS_TAG,
    request_body = StatusCheckRequest,
    responses(
        (status = 200, description = "Current status of the request", body = StatusCheckResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "Unknown registration number", body = ErrorResponse)
    )
)]
async fn check_status(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<StatusCheckRequest>,
) -> AppResult<Json<StatusCheckResponse>> {
    let row = state
        .services
        .permohonan
        .check_status(&payload.nomor_registrasi)
        .await?;
    Ok(Json(StatusCheckResponse::from(row)))
}
