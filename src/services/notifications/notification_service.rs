//! Citizen notification orchestration.
//!
//! Picks the template, normalizes the contact address and makes exactly one
//! provider call. Transport failures are logged and folded into
//! [`DeliveryResult::Undelivered`], so callers never see an error from the
//! notification pathway itself.

use super::fonnte_provider::FonnteProvider;
use super::phone::normalize_phone;
use super::provider::{DeliveryResult, NotificationProvider};
use super::templates::{MessageTemplates, OutboundMessage};
use crate::config::NotificationSettings;
use crate::error::{AppError, AppResult};
use crate::models::{RequestStatus, ServiceRequest};
use std::sync::Arc;

/// Sends status notifications to citizens
#[derive(Clone)]
pub struct NotificationService {
    provider: Arc<dyn NotificationProvider>,
    templates: Arc<MessageTemplates>,
    enabled: bool,
}

impl NotificationService {
    pub fn new(
        provider: Arc<dyn NotificationProvider>,
        templates: MessageTemplates,
        enabled: bool,
    ) -> Self {
        Self {
            provider,
            templates: Arc::new(templates),
            enabled,
        }
    }

    /// Builds the service with the Fonnte gateway from configuration.
    pub fn from_settings(settings: &NotificationSettings) -> Self {
        Self::new(
            Arc::new(FonnteProvider::new(settings.whatsapp.clone())),
            MessageTemplates::from_settings(settings),
            settings.enabled,
        )
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn provider_name(&self) -> &'static str {
        self.provider.name()
    }

    /// Validates the provider configuration. A disabled service is always valid.
    pub async fn validate(&self) -> AppResult<()> {
        if !self.enabled {
            return Ok(());
        }
        self.provider.validate_config().await
    }

    /// Message a citizen would receive for the request's current status
    pub fn render_for(&self, request: &ServiceRequest) -> OutboundMessage {
        match request.status {
            RequestStatus::Done => self.templates.render_completion_message(request),
            status => self.templates.render_status_message(request, status),
        }
    }

    /// Notifies the requester about the request's current status.
    ///
    /// Returns `None` when nothing was attempted (notifications disabled or
    /// no contact address on file).
    pub async fn notify_status_change(&self, request: &ServiceRequest) -> Option<DeliveryResult> {
        if !self.enabled {
            tracing::debug!(
                request_id = request.id,
                "Notifications disabled, skipping status message"
            );
            return None;
        }

        if request.contact_address.trim().is_empty() {
            tracing::info!(
                request_id = request.id,
                registration = %request.registration_code,
                "No contact address on file, skipping status message"
            );
            return None;
        }

        let message = self.render_for(request);
        Some(self.deliver(&request.contact_address, &message).await)
    }

    /// Sends free text to an arbitrary address (operator test messages).
    pub async fn send_direct(&self, raw_target: &str, text: &str) -> AppResult<DeliveryResult> {
        if raw_target.trim().is_empty() {
            return Err(AppError::validation("target", "Target number is required"));
        }
        if text.trim().is_empty() {
            return Err(AppError::validation("message", "Message must not be empty"));
        }
        if !self.enabled {
            return Err(AppError::BadRequest {
                message: "WhatsApp notifications are disabled".to_string(),
            });
        }

        Ok(self.deliver(raw_target, &OutboundMessage::new(text)).await)
    }

    async fn deliver(&self, raw_target: &str, message: &OutboundMessage) -> DeliveryResult {
        let target = normalize_phone(raw_target);
        if !target.is_plausible() {
            tracing::warn!(
                raw = raw_target,
                normalized = %target,
                "Normalized phone number has an unusual length"
            );
        }

        match self.provider.send(&target, message).await {
            Ok(result) => result,
            Err(error) => {
                tracing::error!(
                    provider = self.provider.name(),
                    target = %target,
                    error = %error,
                    "Failed to send WhatsApp message"
                );
                error.into()
            }
        }
    }
}
