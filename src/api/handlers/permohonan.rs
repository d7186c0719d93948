//! Endpoints for service requests.
//!
//! Public:
//! - POST   /permohonan                         - Submit a request
//!
//! Staff:
//! - GET    /permohonan                         - Paginated list, newest first
//! - GET    /permohonan/{id}                    - One request
//! - PUT    /permohonan/{id}/status             - Change status and notify the requester
//! - POST   /permohonan/bulk-update-status      - Change status of many requests
//! - DELETE /permohonan/bulk-delete             - Delete many requests

use crate::api::doc::PERMOHONAN_TAG;
use crate::api::dto::{
    BulkDeleteRequest, BulkDeleteResponse, BulkStatusUpdateResponse, BulkUpdateStatusRequest,
    CreatePermohonanRequest, ErrorResponse, ListPermohonanParams, PagedResponse,
    PermohonanResponse, StatusCheckResponse, StatusUpdateResponse, UpdateStatusRequest,
};
use crate::api::middleware::StaffUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::{ValidatedJson, ValidatedQuery};
use axum::{
    Extension, Json,
    extract::{Path, State},
    http::StatusCode,
};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

/// Routes open to citizens.
pub fn permohonan_public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(create_permohonan))
}

pub fn permohonan_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_permohonan))
        .routes(routes!(get_permohonan))
        .routes(routes!(update_status))
        .routes(routes!(bulk_update_status))
        .routes(routes!(bulk_delete))
}

/// The response carries the registration number the citizen checks status with.
#[utoipa::path(
    post,
    path = "/permohonan",
    tag = PERMOHONAN_TAG,
    request_body = CreatePermohonanRequest,
    responses(
        (status = 201, description = "Request submitted", body = StatusCheckResponse),
        (status = 400, description = "Invalid request or unknown service", body = ErrorResponse)
    )
)]
async fn create_permohonan(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreatePermohonanRequest>,
) -> AppResult<(StatusCode, Json<StatusCheckResponse>)> {
    let created = state.services.permohonan.create(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(StatusCheckResponse::from(created))))
}

#[utoipa::path(
    get,
    path = "/permohonan",
    tag = PERMOHONAN_TAG,
    params(ListPermohonanParams),
    responses(
        (
            status = 200,
            description = "Paginated list of requests",
            body = PagedResponse<PermohonanResponse>
        ),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_permohonan(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListPermohonanParams>,
) -> AppResult<Json<PagedResponse<PermohonanResponse>>> {
    let pagination = params.pagination();

    let (rows, total) = state
        .services
        .permohonan
        .list(params.status, pagination.offset(), pagination.limit())
        .await?;

    let data = rows.into_iter().map(PermohonanResponse::from).collect();
    Ok(Json(PagedResponse::new(data, &pagination, total.max(0) as u64)))
}

#[utoipa::path(
    get,
    path = "/permohonan/{id}",
    tag = PERMOHONAN_TAG,
    params(("id" = i32, Path, description = "Request ID")),
    responses(
        (status = 200, description = "The request", body = PermohonanResponse),
        (status = 404, description = "No such request", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_permohonan(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<PermohonanResponse>> {
    let row = state.services.permohonan.get(id).await?;
    Ok(Json(PermohonanResponse::from(row)))
}

/// Persists the new status, then messages the requester.
///
/// A failed notification never fails the request; check `notification.delivered`.
#[utoipa::path(
    put,
    path = "/permohonan/{id}/status",
    tag = PERMOHONAN_TAG,
    params(("id" = i32, Path, description = "Request ID")),
    request_body = UpdateStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = StatusUpdateResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse),
        (status = 404, description = "No such request", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_status(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateStatusRequest>,
) -> AppResult<Json<StatusUpdateResponse>> {
    tracing::info!(
        staff_id = %staff.id,
        permohonan_id = id,
        status = %payload.status,
        "Status change requested"
    );

    let outcome = state
        .services
        .permohonan
        .update_status(id, payload.status, payload.catatan)
        .await?;

    Ok(Json(StatusUpdateResponse::from(outcome)))
}

#[utoipa::path(
    post,
    path = "/permohonan/bulk-update-status",
    tag = PERMOHONAN_TAG,
    request_body = BulkUpdateStatusRequest,
    responses(
        (status = 200, description = "Statuses updated", body = BulkStatusUpdateResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn bulk_update_status(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffUser>,
    ValidatedJson(payload): ValidatedJson<BulkUpdateStatusRequest>,
) -> AppResult<Json<BulkStatusUpdateResponse>> {
    tracing::info!(
        staff_id = %staff.id,
        count = payload.ids.len(),
        status = %payload.status,
        "Bulk status change requested"
    );

    let outcome = state
        .services
        .permohonan
        .bulk_update_status(&payload.ids, payload.status)
        .await?;

    Ok(Json(BulkStatusUpdateResponse::from(outcome)))
}

/// Unknown IDs are listed in `missing_ids` rather than failing the call.
#[utoipa::path(
    delete,
    path = "/permohonan/bulk-delete",
    tag = PERMOHONAN_TAG,
    request_body = BulkDeleteRequest,
    responses(
        (status = 200, description = "Requests deleted", body = BulkDeleteResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn bulk_delete(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffUser>,
    ValidatedJson(payload): ValidatedJson<BulkDeleteRequest>,
) -> AppResult<Json<BulkDeleteResponse>> {
    tracing::info!(
        staff_id = %staff.id,
        count = payload.ids.len(),
        "Bulk delete requested"
    );

    let outcome = state.services.permohonan.bulk_delete(&payload.ids).await?;
    Ok(Json(BulkDeleteResponse::from(outcome)))
}
