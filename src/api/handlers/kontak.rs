//! Contact form endpoints.
//!
//! Public:
//! - POST   /kontak              - Leave a message
//!
//! Staff:
//! - GET    /kontak              - Inbox, newest first
//! - GET    /kontak/{id}         - One message; unread messages become read
//! - PUT    /kontak/{id}         - Set the status
//! - DELETE /kontak/{id}         - Delete a message
//! - POST   /kontak/{id}/reply   - E-mail a reply and mark the message replied

use crate::api::doc::KONTAK_TAG;
use crate::api::dto::{
    CreateKontakRequest, ErrorResponse, KontakResponse, ListKontakParams, PagedResponse,
    ReplyKontakRequest, UpdateKontakStatusRequest,
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

pub fn kontak_public_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(create_kontak))
}

pub fn kontak_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new()
        .routes(routes!(list_kontak))
        .routes(routes!(get_kontak, update_kontak, delete_kontak))
        .routes(routes!(reply_kontak))
}

#[utoipa::path(
    post,
    path = "/kontak",
    tag = KONTAK_TAG,
    request_body = CreateKontakRequest,
    responses(
        (status = 201, description = "Message received", body = KontakResponse),
        (status = 400, description = "Invalid request", body = ErrorResponse)
    )
)]
async fn create_kontak(
    State(state): State<AppState>,
    ValidatedJson(payload): ValidatedJson<CreateKontakRequest>,
) -> AppResult<(StatusCode, Json<KontakResponse>)> {
    let kontak = state.services.kontak.submit(payload.into()).await?;
    Ok((StatusCode::CREATED, Json(KontakResponse::from(kontak))))
}

#[utoipa::path(
    get,
    path = "/kontak",
    tag = KONTAK_TAG,
    params(ListKontakParams),
    responses(
        (status = 200, description = "Paginated inbox", body = PagedResponse<KontakResponse>),
        (status = 400, description = "Invalid query", body = ErrorResponse),
        (status = 401, description = "Missing or invalid token", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn list_kontak(
    State(state): State<AppState>,
    ValidatedQuery(params): ValidatedQuery<ListKontakParams>,
) -> AppResult<Json<PagedResponse<KontakResponse>>> {
    let pagination = params.pagination();
    let filter = params.filter()?;

    let (rows, total) = state
        .services
        .kontak
        .list(&filter, pagination.offset(), pagination.limit())
        .await?;

    let data = rows.into_iter().map(KontakResponse::from).collect();
    Ok(Json(PagedResponse::new(data, &pagination, total.max(0) as u64)))
}

#[utoipa::path(
    get,
    path = "/kontak/{id}",
    tag = KONTAK_TAG,
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 200, description = "The message", body = KontakResponse),
        (status = 404, description = "No such message", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn get_kontak(
    State(state): State<AppState>,
    Path(id): Path<i32>,
) -> AppResult<Json<KontakResponse>> {
    let kontak = state.services.kontak.open(id).await?;
    Ok(Json(KontakResponse::from(kontak)))
}

#[utoipa::path(
    put,
    path = "/kontak/{id}",
    tag = KONTAK_TAG,
    params(("id" = i32, Path, description = "Message ID")),
    request_body = UpdateKontakStatusRequest,
    responses(
        (status = 200, description = "Status updated", body = KontakResponse),
        (status = 400, description = "Unknown status", body = ErrorResponse),
        (status = 404, description = "No such message", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn update_kontak(
    State(state): State<AppState>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<UpdateKontakStatusRequest>,
) -> AppResult<Json<KontakResponse>> {
    let kontak = state.services.kontak.update_status(id, payload.status).await?;
    Ok(Json(KontakResponse::from(kontak)))
}

#[utoipa::path(
    delete,
    path = "/kontak/{id}",
    tag = KONTAK_TAG,
    params(("id" = i32, Path, description = "Message ID")),
    responses(
        (status = 204, description = "Message deleted"),
        (status = 404, description = "No such message", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn delete_kontak(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffUser>,
    Path(id): Path<i32>,
) -> AppResult<StatusCode> {
    state.services.kontak.delete(id).await?;
    tracing::info!(staff_id = %staff.id, kontak_id = id, "Contact message removed by staff");
    Ok(StatusCode::NO_CONTENT)
}

/// The message is only marked `dibalas` after the mail server accepted the reply.
#[utoipa::path(
    post,
    path = "/kontak/{id}/reply",
    tag = KONTAK_TAG,
    params(("id" = i32, Path, description = "Message ID")),
    request_body = ReplyKontakRequest,
    responses(
        (status = 200, description = "Reply sent", body = KontakResponse),
        (status = 400, description = "Invalid request or mail disabled", body = ErrorResponse),
        (status = 404, description = "No such message", body = ErrorResponse),
        (status = 500, description = "Mail server refused the reply", body = ErrorResponse)
    ),
    security(("bearerAuth" = []))
)]
async fn reply_kontak(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffUser>,
    Path(id): Path<i32>,
    ValidatedJson(payload): ValidatedJson<ReplyKontakRequest>,
) -> AppResult<Json<KontakResponse>> {
    tracing::info!(staff_id = %staff.id, kontak_id = id, "Contact reply requested");

    let kontak = state.services.kontak.reply(id, &payload.balasan).await?;
    Ok(Json(KontakResponse::from(kontak)))
}
