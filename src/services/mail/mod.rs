//! E-mail replies to citizens who used the contact form.

mod provider;
mod smtp_provider;

pub mod templates;

pub use provider::{MailError, MailProvider, OutgoingMail};
pub use smtp_provider::SmtpMailProvider;

use std::sync::Arc;

use crate::config::MailSettings;
use crate::error::{AppError, AppResult};
use crate::models::Kontak;

#[derive(Clone)]
pub struct MailService {
    provider: Arc<dyn MailProvider>,
    organization_name: Arc<str>,
    enabled: bool,
}

impl MailService {
    pub fn new(provider: Arc<dyn MailProvider>, organization_name: &str, enabled: bool) -> Self {
        Self {
            provider,
            organization_name: Arc::from(organization_name),
            enabled,
        }
    }

    /// SMTP service signed with the organization name.
    pub fn from_settings(settings: &MailSettings, organization_name: &str) -> Self {
        Self::new(
            Arc::new(SmtpMailProvider::new(settings.clone(), organization_name)),
            organization_name,
            settings.enabled,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    pub async fn validate(&self) -> AppResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.provider.validate_config().await
    }

    /// Sends `balasan` to the author of a contact message.
    ///
    /// Unlike WhatsApp notifications, a failed reply is an error for the caller.
    pub async fn send_contact_reply(&self, kontak: &Kontak, balasan: &str) -> AppResult<()> {
        if !self.enabled {
            return Err(AppError::BadRequest {
                message: "E-mail replies are disabled".to_string(),
            });
        }

        let mail = templates::render_contact_reply(kontak, balasan, &self.organization_name);
        self.provider.send(&mail).await.map_err(|e| match e {
            MailError::InvalidAddress { .. } => AppError::validation("email", e.to_string()),
            other => AppError::Internal {
                source: anyhow::Error::from(other).context("Sending contact reply failed"),
            },
        })
    }
}
