//! Outgoing e-mail abstraction.

use async_trait::async_trait;
use thiserror::Error;

use crate::error::AppResult;

/// One plain-text e-mail to a single recipient
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutgoingMail {
    pub to_name: String,
    pub to_address: String,
    pub subject: String,
    pub body: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MailError {
    #[error("invalid e-mail address '{address}': {reason}")]
    InvalidAddress { address: String, reason: String },

    #[error("could not build e-mail: {0}")]
    Build(String),

    #[error("{provider} could not deliver the e-mail: {reason}")]
    Transport {
        provider: &'static str,
        reason: String,
    },
}

/// Mail transport (SMTP in production).
#[async_trait]
pub trait MailProvider: Send + Sync {
    /// One delivery attempt, no retries.
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError>;

    fn name(&self) -> &'static str;

    async fn validate_config(&self) -> AppResult<()> {
        Ok(())
    }
}
