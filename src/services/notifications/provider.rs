//! Gateway abstraction for outbound citizen messages.
//!
//! A provider performs exactly one delivery attempt. Answers from the
//! provider (accepted or refused) come back as [`DeliveryResult`]; failing to
//! get a usable answer at all is a [`TransportError`].

use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use super::phone::NormalizedAddress;
use super::templates::OutboundMessage;
use crate::error::AppResult;

/// Outcome of one delivery attempt
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum DeliveryResult {
    /// Provider accepted the message
    Delivered {
        provider_response: Value,
        message: String,
    },
    /// Provider answered but refused the message (quota, invalid target, ...)
    Rejected {
        provider_response: Value,
        reason: String,
    },
    /// No usable answer from the provider
    Undelivered { reason: String },
}

impl DeliveryResult {
    pub fn succeeded(&self) -> bool {
        matches!(self, DeliveryResult::Delivered { .. })
    }

    /// The provider's own `status` field, when it answered.
    pub fn provider_status(&self) -> Option<&Value> {
        match self {
            DeliveryResult::Delivered {
                provider_response, ..
            }
            | DeliveryResult::Rejected {
                provider_response, ..
            } => provider_response.get("status"),
            DeliveryResult::Undelivered { .. } => None,
        }
    }

    pub fn provider_response(&self) -> Option<&Value> {
        match self {
            DeliveryResult::Delivered {
                provider_response, ..
            }
            | DeliveryResult::Rejected {
                provider_response, ..
            } => Some(provider_response),
            DeliveryResult::Undelivered { .. } => None,
        }
    }

    pub fn human_message(&self) -> &str {
        match self {
            DeliveryResult::Delivered { message, .. } => message,
            DeliveryResult::Rejected { reason, .. } | DeliveryResult::Undelivered { reason } => {
                reason
            }
        }
    }

    pub fn outcome(&self) -> &'static str {
        match self {
            DeliveryResult::Delivered { .. } => "delivered",
            DeliveryResult::Rejected { .. } => "rejected",
            DeliveryResult::Undelivered { .. } => "undelivered",
        }
    }
}

/// The provider could not be reached or did not answer usefully
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransportError {
    #[error("could not reach {provider}: {reason}")]
    Unreachable {
        provider: &'static str,
        reason: String,
    },

    #[error("{provider} did not answer within {timeout_seconds}s")]
    Timeout {
        provider: &'static str,
        timeout_seconds: u64,
    },

    #[error("{provider} responded with HTTP {status}")]
    HttpStatus {
        provider: &'static str,
        status: u16,
        body: String,
    },

    #[error("{provider} returned an unreadable response: {reason}")]
    InvalidResponse {
        provider: &'static str,
        reason: String,
    },
}

impl From<TransportError> for DeliveryResult {
    fn from(error: TransportError) -> Self {
        DeliveryResult::Undelivered {
            reason: format!("Failed to send WhatsApp message: {}", error),
        }
    }
}

/// Outbound message gateway (WhatsApp via Fonnte in production).
///
/// Uses `async_trait` for dynamic dispatch; implementations must be
/// `Send + Sync` so one instance can be shared across request tasks.
///
/// # Example Implementation
/// ```ignore
/// #[async_trait]
/// impl NotificationProvider for EchoProvider {
///     async fn send(
///         &self,
///         target: &NormalizedAddress,
///         message: &OutboundMessage,
///     ) -> Result<DeliveryResult, TransportError> {
///         Ok(DeliveryResult::Delivered {
///             provider_response: json!({ "status": true }),
///             message: format!("echoed to {}", target),
///         })
///     }
///
///     fn name(&self) -> &'static str {
///         "echo"
///     }
/// }
/// ```
#[async_trait]
pub trait NotificationProvider: Send + Sync {
    /// Performs one delivery attempt. No retries.
    async fn send(
        &self,
        target: &NormalizedAddress,
        message: &OutboundMessage,
    ) -> Result<DeliveryResult, TransportError>;

    /// Provider name for logs
    fn name(&self) -> &'static str;

    /// Checks credentials and endpoint before the provider is used.
    async fn validate_config(&self) -> AppResult<()> {
        Ok(())
    }
}
