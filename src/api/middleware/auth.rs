//! Staff JWT authentication middleware.

use axum::{
    extract::{Request, State},
    http::header,
    middleware::Next,
    response::Response,
};
use serde::{Deserialize, Serialize};

use crate::error::AppError;
use crate::state::AppState;
use crate::utils::jwt::{Claims, StaffRole, validate_token};

/// Authenticated staff member, available to handlers as `Extension<StaffUser>`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StaffUser {
    pub id: String,
    pub name: String,
    pub role: StaffRole,
}

impl From<Claims> for StaffUser {
    fn from(claims: Claims) -> Self {
        Self {
            id: claims.sub,
            name: claims.name,
            role: claims.role,
        }
    }
}

fn bearer_token(request: &Request) -> Result<&str, AppError> {
    let auth_header = request
        .headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Missing authorization header".to_string(),
        })?;

    auth_header
        .strip_prefix("Bearer ")
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or_else(|| AppError::Unauthorized {
            message: "Invalid authorization header format. Expected: Bearer <token>".to_string(),
        })
}

/// Requires a valid staff token.
///
/// # Headers
/// Expects: `Authorization: Bearer <token>`
///
/// # Example
/// ```ignore
/// OpenApiRouter::new()
///     .routes(routes!(list_permohonan))
///     .route_layer(middleware::from_fn_with_state(state.clone(), auth_middleware))
/// ```
pub async fn auth_middleware(
    State(state): State<AppState>,
    mut request: Request,
    next: Next,
) -> Result<Response, AppError> {
    let claims = validate_token(bearer_token(&request)?, &state.jwt_config.secret)?;

    let staff = StaffUser::from(claims);
    tracing::debug!(staff_id = %staff.id, role = %staff.role, "Staff authenticated");
    request.extensions_mut().insert(staff);

    Ok(next.run(request).await)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;

    fn request_with(header_value: Option<&str>) -> Request {
        let mut builder = Request::builder().uri("/api/permohonan");
        if let Some(value) = header_value {
            builder = builder.header(header::AUTHORIZATION, value);
        }
        builder.body(Body::empty()).unwrap()
    }

    #[test]
    fn test_staff_user_from_claims() {
        let staff = StaffUser::from(Claims {
            sub: "petugas-01".to_string(),
            name: "Rina".to_string(),
            role: StaffRole::Petugas,
            iat: 0,
            exp: 9_999_999_999,
        });

        assert_eq!(staff.id, "petugas-01");
        assert_eq!(staff.name, "Rina");
        assert_eq!(staff.role, StaffRole::Petugas);
    }

    #[test]
    fn test_bearer_token_extraction() {
        assert_eq!(bearer_token(&request_with(Some("Bearer abc.def"))).unwrap(), "abc.def");
        assert!(bearer_token(&request_with(None)).is_err());
        assert!(bearer_token(&request_with(Some("Basic dXNlcg=="))).is_err());
        assert!(bearer_token(&request_with(Some("Bearer   "))).is_err());
    }
}
