//! Error handler for converting AppError to HTTP responses.
//!
//! Implements `IntoResponse` for `AppError` and provides a global middleware
//! that turns bare error responses (axum rejections, unknown routes) into the
//! standard JSON body and stamps every error body with the request ID.

use axum::{
    Json,
    body::{Body, Bytes},
    extract::Request,
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::{Value, json};

use super::RequestId;
use crate::api::dto::ErrorResponse;
use crate::error::AppError;

const MAX_ERROR_BODY_BYTES: usize = 64 * 1024;

impl IntoResponse for AppError {
    /// # Status Code Mapping
    /// - NotFound → 404
    /// - Validation, ValidationErrors, BadRequest → 400
    /// - Unauthorized → 401
    /// - Forbidden → 403
    /// - ConnectionPool → 503
    /// - Database, Configuration, Internal → 500 (details are logged, not returned)
    fn into_response(self) -> Response {
        let status = error_to_status_code(&self);
        let body = match &self {
            AppError::NotFound {
                entity,
                field,
                value,
            } => ErrorResponse::not_found_error(entity, field, value),
            AppError::Validation { field, reason } => {
                ErrorResponse::validation_error(field, reason)
            }
            AppError::ValidationErrors { errors } => ErrorResponse::validation_errors(errors),
            AppError::BadRequest { message }
            | AppError::Unauthorized { message }
            | AppError::Forbidden { message } => ErrorResponse::new(error_to_code(&self), message),
            AppError::Database { operation, .. } => {
                tracing::error!(error = ?self, "Database error while handling request");
                ErrorResponse::new(
                    "DATABASE_ERROR",
                    &format!("Database operation failed: {}", operation),
                )
                .with_details(json!({ "operation": operation }))
            }
            AppError::Configuration { key, .. } => {
                tracing::error!(error = ?self, "Configuration error while handling request");
                ErrorResponse::new("CONFIGURATION_ERROR", &format!("Configuration error: {}", key))
            }
            AppError::ConnectionPool { .. } => {
                tracing::error!(error = ?self, "Connection pool error while handling request");
                ErrorResponse::new("SERVICE_UNAVAILABLE", "Database connection unavailable")
            }
            AppError::Internal { .. } => {
                tracing::error!(error = ?self, "Internal error while handling request");
                ErrorResponse::new("INTERNAL_ERROR", "An internal error occurred")
            }
        };

        (status, Json(body)).into_response()
    }
}

/// Maps an AppError variant to its HTTP status code.
pub fn error_to_status_code(error: &AppError) -> StatusCode {
    match error {
        AppError::NotFound { .. } => StatusCode::NOT_FOUND,
        AppError::Validation { .. }
        | AppError::ValidationErrors { .. }
        | AppError::BadRequest { .. } => StatusCode::BAD_REQUEST,
        AppError::Unauthorized { .. } => StatusCode::UNAUTHORIZED,
        AppError::Forbidden { .. } => StatusCode::FORBIDDEN,
        AppError::ConnectionPool { .. } => StatusCode::SERVICE_UNAVAILABLE,
        AppError::Database { .. } | AppError::Configuration { .. } | AppError::Internal { .. } => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Maps an AppError variant to its error code string.
pub fn error_to_code(error: &AppError) -> &'static str {
    match error {
        AppError::NotFound { .. } => "NOT_FOUND",
        AppError::Validation { .. } | AppError::ValidationErrors { .. } => "VALIDATION_ERROR",
        AppError::BadRequest { .. } => "BAD_REQUEST",
        AppError::Unauthorized { .. } => "UNAUTHORIZED",
        AppError::Forbidden { .. } => "FORBIDDEN",
        AppError::Database { .. } => "DATABASE_ERROR",
        AppError::Configuration { .. } => "CONFIGURATION_ERROR",
        AppError::ConnectionPool { .. } => "SERVICE_UNAVAILABLE",
        AppError::Internal { .. } => "INTERNAL_ERROR",
    }
}

fn code_for_status(status: StatusCode) -> &'static str {
    match status {
        StatusCode::BAD_REQUEST => "BAD_REQUEST",
        StatusCode::UNAUTHORIZED => "UNAUTHORIZED",
        StatusCode::FORBIDDEN => "FORBIDDEN",
        StatusCode::NOT_FOUND => "NOT_FOUND",
        StatusCode::METHOD_NOT_ALLOWED => "METHOD_NOT_ALLOWED",
        StatusCode::UNSUPPORTED_MEDIA_TYPE => "UNSUPPORTED_MEDIA_TYPE",
        StatusCode::PAYLOAD_TOO_LARGE => "PAYLOAD_TOO_LARGE",
        StatusCode::UNPROCESSABLE_ENTITY => "UNPROCESSABLE_ENTITY",
        StatusCode::SERVICE_UNAVAILABLE => "SERVICE_UNAVAILABLE",
        s if s.is_server_error() => "INTERNAL_SERVER_ERROR",
        _ => "UNKNOWN_ERROR",
    }
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|v| v.contains("application/json"))
}

/// Normalizes every 4xx/5xx response to the standard JSON error body.
///
/// Must run inside `request_id_middleware` so the request ID is available.
pub async fn global_error_handler(request: Request, next: Next) -> Response {
    let request_id = request.extensions().get::<RequestId>().map(|r| r.0.clone());
    let response = next.run(request).await;
    let status = response.status();

    if !(status.is_client_error() || status.is_server_error()) {
        return response;
    }

    let json_body = is_json(&response);
    let (mut parts, body) = response.into_parts();
    let bytes = axum::body::to_bytes(body, MAX_ERROR_BODY_BYTES)
        .await
        .unwrap_or_else(|_| Bytes::new());

    let body: Value = if json_body {
        match serde_json::from_slice::<Value>(&bytes) {
            Ok(Value::Object(mut map)) => {
                if let Some(id) = &request_id {
                    map.entry("request_id").or_insert_with(|| json!(id));
                }
                Value::Object(map)
            }
            _ => return rebuild(parts, bytes),
        }
    } else {
        let original = String::from_utf8_lossy(&bytes).trim().to_string();
        let message = if original.is_empty() {
            status
                .canonical_reason()
                .unwrap_or("Request failed")
                .to_string()
        } else {
            original
        };
        let mut error = ErrorResponse::new(code_for_status(status), &message);
        if let Some(id) = &request_id {
            error = error.with_request_id(id);
        }
        match serde_json::to_value(error) {
            Ok(value) => value,
            Err(_) => return rebuild(parts, bytes),
        }
    };

    parts.headers.remove(header::CONTENT_LENGTH);
    let mut rebuilt = (status, Json(body)).into_response();
    for (name, value) in parts.headers.drain().filter_map(|(n, v)| n.map(|n| (n, v))) {
        if name != header::CONTENT_TYPE {
            rebuilt.headers_mut().insert(name, value);
        }
    }
    rebuilt
}

fn rebuild(parts: axum::http::response::Parts, bytes: Bytes) -> Response {
    Response::from_parts(parts, Body::from(bytes))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{Router, middleware, routing::get};
    use tower::ServiceExt;

    async fn body_json(response: Response) -> Value {
        let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    fn app() -> Router {
        Router::new()
            .route(
                "/missing",
                get(|| async { AppError::not_found("permohonan", "id", 7) }),
            )
            .route(
                "/plain",
                get(|| async { (StatusCode::BAD_REQUEST, "plain text failure") }),
            )
            .layer(middleware::from_fn(global_error_handler))
            .layer(middleware::from_fn(super::super::request_id_middleware))
    }

    #[test]
    fn test_status_mapping() {
        assert_eq!(
            error_to_status_code(&AppError::not_found("permohonan", "id", 1)),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            error_to_status_code(&AppError::validation("status", "bad")),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            error_to_status_code(&AppError::Unauthorized {
                message: "no".to_string()
            }),
            StatusCode::UNAUTHORIZED
        );
        let pool = AppError::ConnectionPool {
            source: anyhow::anyhow!("pool exhausted"),
        };
        assert_eq!(error_to_status_code(&pool), StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(error_to_code(&pool), "SERVICE_UNAVAILABLE");
    }

    #[tokio::test]
    async fn test_internal_details_are_not_exposed() {
        let response = AppError::Internal {
            source: anyhow::anyhow!("secret stack trace"),
        }
        .into_response();

        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
        let body = body_json(response).await;
        assert_eq!(body["code"], "INTERNAL_ERROR");
        assert!(!body.to_string().contains("secret"));
    }

    #[tokio::test]
    async fn test_app_error_body_gets_request_id() {
        let response = app()
            .oneshot(
                Request::builder()
                    .uri("/missing")
                    .header("x-request-id", "req-123")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["details"]["field"], "id");
        assert_eq!(body["request_id"], "req-123");
    }

    #[tokio::test]
    async fn test_plain_text_errors_become_json() {
        let response = app()
            .oneshot(Request::builder().uri("/plain").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert!(response.headers().contains_key("x-request-id"));
        let body = body_json(response).await;
        assert_eq!(body["code"], "BAD_REQUEST");
        assert_eq!(body["message"], "plain text failure");
    }

    #[tokio::test]
    async fn test_unknown_route_becomes_json() {
        let response = app()
            .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        let body = body_json(response).await;
        assert_eq!(body["code"], "NOT_FOUND");
        assert_eq!(body["message"], "Not Found");
    }
}
