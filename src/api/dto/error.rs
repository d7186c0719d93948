//! Error response DTOs.

use serde::Serialize;
use serde_json::Value;
use utoipa::ToSchema;

use crate::error::ValidationFieldError;

/// Standard error response format.
#[derive(Debug, Serialize, ToSchema)]
#[schema(example = json!({
    "code": "NOT_FOUND",
    "message": "permohonan with nomor_registrasi=REG-404 was not found",
    "details": { "entity": "permohonan", "field": "nomor_registrasi", "value": "REG-404" },
    "request_id": "0b6f6c1e-7c1a-4a53-9f0e-1f8f8d9b1c2a"
}))]
pub struct ErrorResponse {
    /// Machine-readable error code
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(value_type = Option<Object>)]
    pub details: Option<Value>,
    /// Correlation ID from `x-request-id`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub request_id: Option<String>,
}

impl ErrorResponse {
    pub fn new(code: &str, message: &str) -> Self {
        Self {
            code: code.to_string(),
            message: message.to_string(),
            details: None,
            request_id: None,
        }
    }

    pub fn not_found_error(entity: &str, field: &str, value: &str) -> Self {
        Self::new(
            "NOT_FOUND",
            &format!("{} with {}={} was not found", entity, field, value),
        )
        .with_details(serde_json::json!({
            "entity": entity,
            "field": field,
            "value": value,
        }))
    }

    pub fn validation_error(field: &str, reason: &str) -> Self {
        Self::new("VALIDATION_ERROR", &format!("Validation failed for {}", field))
            .with_details(serde_json::json!({
                "field": field,
                "reason": reason,
            }))
    }

    pub fn validation_errors(errors: &[ValidationFieldError]) -> Self {
        Self::new("VALIDATION_ERROR", "Request validation failed")
            .with_details(serde_json::json!({ "errors": errors }))
    }

    pub fn with_details(mut self, details: Value) -> Self {
        self.details = Some(details);
        self
    }

    /// Adds request ID to the error response for correlation.
    pub fn with_request_id(mut self, request_id: &str) -> Self {
        self.request_id = Some(request_id.to_string());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_minimal_body_omits_optional_fields() {
        let value = serde_json::to_value(ErrorResponse::new("BAD_REQUEST", "nope")).unwrap();
        assert_eq!(value, json!({ "code": "BAD_REQUEST", "message": "nope" }));
    }

    #[test]
    fn test_validation_errors_body() {
        let body = ErrorResponse::validation_errors(&[ValidationFieldError {
            field: "target".to_string(),
            message: "Target is required".to_string(),
        }])
        .with_request_id("req-1");
        let value = serde_json::to_value(body).unwrap();

        assert_eq!(value["code"], "VALIDATION_ERROR");
        assert_eq!(value["details"]["errors"][0]["field"], "target");
        assert_eq!(value["request_id"], "req-1");
    }
}
