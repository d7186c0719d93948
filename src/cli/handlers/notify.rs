//! `send-whatsapp` command handler
//!
//! Sends one message through the configured gateway regardless of
//! `notifications.enabled`, so operators can check credentials before
//! switching notifications on.

use std::sync::Arc;

use crate::config::NotificationSettings;
use crate::error::{AppError, AppResult};
use crate::services::notifications::{
    DeliveryResult, FonnteProvider, MessageTemplates, NotificationService,
};

pub struct SendWhatsappCommandHandler {
    service: NotificationService,
}

impl SendWhatsappCommandHandler {
    pub fn new(settings: &NotificationSettings) -> Self {
        let service = NotificationService::new(
            Arc::new(FonnteProvider::new(settings.whatsapp.clone())),
            MessageTemplates::from_settings(settings),
            true,
        );
        Self { service }
    }

    /// # Errors
    /// - Gateway configuration errors
    /// - Any outcome other than delivered, so the process exits non-zero
    pub async fn execute(&self, target: &str, message: &str) -> AppResult<DeliveryResult> {
        self.service.validate().await?;

        let result = self.service.send_direct(target, message).await?;
        if !result.succeeded() {
            return Err(AppError::Internal {
                source: anyhow::anyhow!(
                    "WhatsApp message {}: {}",
                    result.outcome(),
                    result.human_message()
                ),
            });
        }

        println!("✓ {}", result.human_message());
        Ok(result)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use httpmock::prelude::*;
    use serde_json::json;

    fn settings(url: String) -> NotificationSettings {
        let mut settings = NotificationSettings::default();
        settings.whatsapp.url = url;
        settings.whatsapp.token = "fonnte-token".to_string();
        settings
    }

    #[tokio::test]
    async fn test_sends_even_when_notifications_disabled() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/send")
                    .json_body_partial(r#"{"target":"6281234567890"}"#);
                then.status(200)
                    .json_body(json!({"status": true, "detail": "success! message in queue"}));
            })
            .await;

        let handler = SendWhatsappCommandHandler::new(&settings(server.url("/send")));
        let result = handler.execute("0812-3456-7890", "Tes koneksi").await.unwrap();

        mock.assert_async().await;
        assert!(result.succeeded());
        assert_eq!(result.human_message(), "success! message in queue");
    }

    #[tokio::test]
    async fn test_rejected_message_is_an_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/send");
                then.status(200)
                    .json_body(json!({"status": false, "reason": "invalid token"}));
            })
            .await;

        let handler = SendWhatsappCommandHandler::new(&settings(server.url("/send")));
        let err = handler.execute("081234567890", "Tes").await.unwrap_err();

        assert!(format!("{:#}", anyhow::Error::from(err)).contains("invalid token"));
    }

    #[tokio::test]
    async fn test_missing_token_fails_before_sending() {
        let mut settings = settings("http://127.0.0.1:1/send".to_string());
        settings.whatsapp.token.clear();

        let result = SendWhatsappCommandHandler::new(&settings)
            .execute("081234567890", "Tes")
            .await;
        assert!(matches!(result, Err(AppError::Validation { .. })));
    }
}
