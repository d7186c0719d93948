use crate::error::{AppError, AppResult};
use jiff::{SignedDuration, Timestamp};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation, decode, encode};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use utoipa::ToSchema;

/// Role carried by a staff token
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum StaffRole {
    Admin,
    Petugas,
}

impl StaffRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            StaffRole::Admin => "admin",
            StaffRole::Petugas => "petugas",
        }
    }
}

impl fmt::Display for StaffRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StaffRole {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "admin" => Ok(StaffRole::Admin),
            "petugas" | "staff" => Ok(StaffRole::Petugas),
            other => Err(format!("Unknown staff role '{}'", other)),
        }
    }
}

/// JWT claims for kelurahan staff
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Claims {
    /// Staff account identifier
    pub sub: String,
    /// Display name
    pub name: String,
    pub role: StaffRole,
    /// Issued at (unix seconds)
    pub iat: i64,
    /// Expiration time (unix seconds)
    pub exp: i64,
}

impl Claims {
    pub fn new(subject: String, name: String, role: StaffRole, expiration_hours: i64) -> Self {
        let now = Timestamp::now();
        let exp = now
            .checked_add(SignedDuration::from_hours(expiration_hours))
            .unwrap_or(now);

        Self {
            sub: subject,
            name,
            role,
            iat: now.as_second(),
            exp: exp.as_second(),
        }
    }
}

/// Signs a staff token with HS256.
///
/// # Example
/// ```ignore
/// let token = generate_token("petugas-01".into(), "Rina".into(), StaffRole::Petugas, &secret, 8)?;
/// ```
pub fn generate_token(
    subject: String,
    name: String,
    role: StaffRole,
    secret: &str,
    expiration_hours: i64,
) -> AppResult<String> {
    let claims = Claims::new(subject, name, role, expiration_hours);

    encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
    .map_err(|e| AppError::Internal {
        source: anyhow::anyhow!("Failed to generate JWT token: {}", e),
    })
}

/// Validates a staff token and returns its claims.
pub fn validate_token(token: &str, secret: &str) -> AppResult<Claims> {
    decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => AppError::Unauthorized {
            message: "Token has expired".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidToken => AppError::Unauthorized {
            message: "Invalid token".to_string(),
        },
        jsonwebtoken::errors::ErrorKind::InvalidSignature => AppError::Unauthorized {
            message: "Invalid token signature".to_string(),
        },
        _ => AppError::Unauthorized {
            message: format!("Token validation failed: {}", e),
        },
    })
}
