//! Router configuration for the API.

use axum::{Router, middleware};
use tower_http::compression::CompressionLayer;
use tower_http::cors::{Any, CorsLayer};
use utoipa::OpenApi;
use utoipa_axum::router::OpenApiRouter;
use utoipa_swagger_ui::SwaggerUi;

use crate::api::doc::ApiDoc;
use crate::api::handlers;
use crate::api::middleware::{
    auth_middleware, global_error_handler, logging_middleware, request_id_middleware,
};
use crate::state::AppState;

/// Creates the application router with all routes and middleware.
///
/// # Middleware Order
/// Layers run outermost first:
/// 1. CORS and compression
/// 2. Request ID - generates/propagates `x-request-id`
/// 3. Logging - logs requests with the request ID
/// 4. Global error handler - normalizes error bodies
///
/// # Routes
/// - `/api/health`, `/api/status/check`, `/api/layanan/**` - public
/// - `POST /api/permohonan`, `POST /api/kontak` - public
/// - other `/api/permohonan/**` and `/api/kontak/**`, `/api/notifications/**` - staff token
///   required
/// - `/swagger-ui`, `/api-docs/openapi.json` - API documentation
pub fn create_router(state: AppState) -> Router {
    let public = OpenApiRouter::new()
        .merge(handlers::health::health_routes())
        .merge(handlers::status::status_routes())
        .merge(handlers::layanan::layanan_routes())
        .merge(handlers::permohonan::permohonan_public_routes())
        .merge(handlers::kontak::kontak_public_routes());

    let staff = OpenApiRouter::new()
        .merge(handlers::permohonan::permohonan_routes())
        .merge(handlers::kontak::kontak_routes())
        .merge(handlers::notifications::notification_routes())
        .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware));

    let (router, openapi) = OpenApiRouter::with_openapi(ApiDoc::openapi())
        .nest("/api", public.merge(staff))
        .split_for_parts();

    router
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", openapi))
        .layer(middleware::from_fn(global_error_handler))
        .layer(middleware::from_fn(logging_middleware))
        .layer(middleware::from_fn(request_id_middleware))
        .layer(CompressionLayer::new())
        .layer(
            CorsLayer::new()
                .allow_origin(Any)
                .allow_methods(Any)
                .allow_headers(Any),
        )
        .with_state(state)
}
