//! Health check endpoint.
//!
//! Pings the database through the pool and reports whether citizen
//! notifications are switched on. The WhatsApp gateway itself is not called.

use crate::api::doc::HEALTH_TAG;
use crate::api::dto::{ComponentHealth, HealthResponse, HealthStatus};
use crate::state::AppState;
use axum::{Json, extract::State, http::StatusCode};
use jiff::Timestamp;
use std::collections::BTreeMap;
use std::time::Instant;
use utoipa_axum::router::OpenApiRouter;
use utoipa_axum::routes;

pub fn health_routes() -> OpenApiRouter<AppState> {
    OpenApiRouter::new().routes(routes!(health_check))
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Service is healthy or degraded", body = HealthResponse),
        (status = 503, description = "Service is unhealthy", body = HealthResponse)
    ),
    tag = HEALTH_TAG
)]
pub async fn health_check(State(state): State<AppState>) -> (StatusCode, Json<HealthResponse>) {
    let mut checks = BTreeMap::new();
    checks.insert("database".to_string(), check_database(&state).await);
    checks.insert("notifications".to_string(), check_notifications(&state));

    let response = HealthResponse::new(
        crate::pkg_version().to_string(),
        Timestamp::now().to_string(),
        checks,
    );

    let status = match response.status {
        HealthStatus::Unhealthy => StatusCode::SERVICE_UNAVAILABLE,
        HealthStatus::Healthy | HealthStatus::Degraded => StatusCode::OK,
    };
    (status, Json(response))
}

async fn check_database(state: &AppState) -> ComponentHealth {
    use diesel_async::RunQueryDsl;

    let start = Instant::now();
    let outcome = match state.db_pool.get().await {
        Ok(mut conn) => diesel::sql_query("SELECT 1")
            .execute(&mut conn)
            .await
            .map(|_| ())
            .map_err(|e| format!("Query failed: {}", e)),
        Err(e) => Err(format!("Connection failed: {}", e)),
    };
    let response_time_ms = Some(start.elapsed().as_millis() as u64);

    match outcome {
        Ok(()) => ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some("Connected".to_string()),
            response_time_ms,
        },
        Err(message) => {
            tracing::warn!(error = %message, "Database health check failed");
            ComponentHealth {
                status: HealthStatus::Unhealthy,
                message: Some(message),
                response_time_ms,
            }
        }
    }
}

fn check_notifications(state: &AppState) -> ComponentHealth {
    let notifications = &state.services.notifications;
    if notifications.is_enabled() {
        ComponentHealth {
            status: HealthStatus::Healthy,
            message: Some(format!("WhatsApp via {}", notifications.provider_name())),
            response_time_ms: None,
        }
    } else {
        ComponentHealth {
            status: HealthStatus::Degraded,
            message: Some("Citizen notifications are disabled".to_string()),
            response_time_ms: None,
        }
    }
}
