//! WhatsApp notification DTOs.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use utoipa::ToSchema;
use validator::Validate;

use crate::services::notifications::DeliveryResult;

/// Operator test message
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "target": "081234567890",
    "message": "Tes notifikasi dari kantor kelurahan"
}))]
pub struct SendTestMessageRequest {
    /// Phone number in any common local or international format
    #[validate(length(min = 1, max = 32, message = "Target must be 1-32 characters"))]
    pub target: String,

    #[validate(length(min = 1, max = 4096, message = "Message must be 1-4096 characters"))]
    pub message: String,
}

/// Outcome of one delivery attempt
#[derive(Debug, Serialize, ToSchema)]
pub struct DeliveryResultResponse {
    /// `delivered`, `rejected` or `undelivered`
    #[schema(example = "delivered")]
    pub outcome: String,
    pub succeeded: bool,
    #[schema(example = "success! message in queue")]
    pub message: String,
    /// Raw `status` field of the gateway answer
    #[schema(value_type = Option<Object>)]
    pub provider_status: Option<Value>,
    /// Full gateway answer, absent when the gateway was unreachable
    #[schema(value_type = Option<Object>)]
    pub provider_response: Option<Value>,
}

impl From<DeliveryResult> for DeliveryResultResponse {
    fn from(result: DeliveryResult) -> Self {
        Self {
            outcome: result.outcome().to_string(),
            succeeded: result.succeeded(),
            message: result.human_message().to_string(),
            provider_status: result.provider_status().cloned(),
            provider_response: result.provider_response().cloned(),
        }
    }
}

/// Notification part of a status update response
#[derive(Debug, Serialize, ToSchema)]
pub struct NotificationSummary {
    /// Whether a message was attempted at all
    pub attempted: bool,
    pub delivered: bool,
    /// `skipped`, `delivered`, `rejected` or `undelivered`
    #[schema(example = "delivered")]
    pub outcome: String,
    pub message: Option<String>,
}

impl From<Option<&DeliveryResult>> for NotificationSummary {
    fn from(result: Option<&DeliveryResult>) -> Self {
        match result {
            Some(result) => Self {
                attempted: true,
                delivered: result.succeeded(),
                outcome: result.outcome().to_string(),
                message: Some(result.human_message().to_string()),
            },
            None => Self {
                attempted: false,
                delivered: false,
                outcome: "skipped".to_string(),
                message: None,
            },
        }
    }
}
