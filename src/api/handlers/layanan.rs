//! Public service category catalogue.

use crate::api::doc::LAYANAN_TAG;
use crate::api::dto::{ErrorResponse, LayananResponse};
use crate::error::AppResult;
use crate::state::AppState;
use axum::{
    Json,
    extract::{Path, State},
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn layanan_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_layanan))
        .routes(routes!(get_layanan))
}

#[utoipa::path(
    get,
    path = "/layanan",
    tag = LAYANAN_TAG,
    responses(
        (status = 200, description = "All service categories", body = Vec<LayananResponse>)
    )
)]
async fn list_layanan(State(state): State<AppState>) -> AppResult<Json<Vec<LayananResponse>>> {
    let rows = state.services.layanan.list().await?;
    Ok(Json(rows.into_iter().map(LayananResponse::from).collect()))
}

#[utoipa::path(
    get,
    path = "/layanan/{id}",
    tag = LAYANAN_TAG,
    params(("id" = i32, Path, description = "Service category ID")),
    responses(
        (status = 200, description = "The service category", body = LayananResponse),
        (status = 404, description = "No such category", body = ErrorResponse)
    )
)]
async fn get_layanan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<LayananResponse>> {
    let layanan = state.services.layanan.get(id).await?;
    Ok(Json(LayananResponse::from(layanan)))
}
