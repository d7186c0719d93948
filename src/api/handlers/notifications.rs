//! WhatsApp notification endpoints.

use crate::api::doc::NOTIFICATION_TAG;
use crate::api::dto::{DeliveryResultResponse, ErrorResponse, SendTestMessageRequest};
use crate::api::middleware::StaffUser;
use crate::error::AppResult;
use crate::state::AppState;
use crate::utils::validate::ValidatedJson;
use axum::{Extension, Json, extract::State};
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn notification_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(send_test_message))
}

/// POST /api/notifications/whatsapp/test - Send a free-text test message
///
/// Gateway failures are reported in the body with `succeeded = false`.
#[utoipa::path(
    post,
    path = "/notifications/whatsapp/test",
    tag = NOTIFICATION_TAG,
    request_body = SendTestMessageRequest,
    responses(
        (status = 200, description = "Delivery attempt result", body = DeliveryResultResponse),
        (
            status = 400,
            description = "Invalid request or notifications disabled",
            body = ErrorResponse
        )
    ),
    security(("bearerAuth" = []))
)]
async fn send_test_message(
    State(state): State<AppState>,
    Extension(staff): Extension<StaffUser>,
    ValidatedJson(payload): ValidatedJson<SendTestMessageRequest>,
) -> AppResult<Json<DeliveryResultResponse>> {
    tracing::info!(staff_id = %staff.id, "WhatsApp test message requested");

    let result = state
        .services
        .notifications
        .send_direct(&payload.target, &payload.message)
        .await?;

    Ok(Json(DeliveryResultResponse::from(result)))
}
