//! Fonnte WhatsApp gateway.
//!
//! Sends one `POST` per message using the global `HTTP_CLIENT`.

use super::phone::NormalizedAddress;
use super::provider::{DeliveryResult, NotificationProvider, TransportError};
use super::templates::OutboundMessage;
use crate::config::{ConfigError, WhatsAppConfig};
use crate::error::{AppError, AppResult};
use crate::external::client::HTTP_CLIENT;
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::{Duration, Instant};

const PROVIDER: &str = "fonnte";
const DEFAULT_SUCCESS_MESSAGE: &str = "WhatsApp message sent";
const DEFAULT_REJECTION_MESSAGE: &str = "WhatsApp message was not accepted by the gateway";
const PREVIEW_CHARS: usize = 50;

/// WhatsApp delivery through the Fonnte HTTP API
///
/// # Example
/// ```ignore
/// let provider = FonnteProvider::new(settings.notifications.whatsapp.clone());
/// let result = provider.send(&normalize_phone("0812..."), &message).await?;
/// ```
#[derive(Debug, Clone)]
pub struct FonnteProvider {
    config: WhatsAppConfig,
}

impl FonnteProvider {
    pub fn new(config: WhatsAppConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &WhatsAppConfig {
        &self.config
    }

    fn timeout(&self) -> Duration {
        Duration::from_secs(self.config.timeout_seconds)
    }

    fn transport_error(&self, error: reqwest::Error) -> TransportError {
        if error.is_timeout() {
            TransportError::Timeout {
                provider: PROVIDER,
                timeout_seconds: self.config.timeout_seconds,
            }
        } else {
            TransportError::Unreachable {
                provider: PROVIDER,
                reason: error.to_string(),
            }
        }
    }
}

/// JSON truthiness of the gateway's `status` field
pub(crate) fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => {
            let s = s.trim();
            !(s.is_empty() || s == "0" || s.eq_ignore_ascii_case("false"))
        }
        Value::Array(items) => !items.is_empty(),
        Value::Object(_) => true,
    }
}

fn text_field<'a>(response: &'a Value, key: &str) -> Option<&'a str> {
    response
        .get(key)
        .and_then(Value::as_str)
        .map(str::trim)
        .filter(|s| !s.is_empty())
}

/// Classifies a 2xx gateway answer.
pub(crate) fn interpret_response(response: Value) -> DeliveryResult {
    let accepted = response.get("status").is_some_and(is_truthy);

    if accepted {
        let message = text_field(&response, "reason")
            .or_else(|| text_field(&response, "detail"))
            .unwrap_or(DEFAULT_SUCCESS_MESSAGE)
            .to_string();
        DeliveryResult::Delivered {
            provider_response: response,
            message,
        }
    } else {
        let reason = text_field(&response, "reason")
            .unwrap_or(DEFAULT_REJECTION_MESSAGE)
            .to_string();
        DeliveryResult::Rejected {
            provider_response: response,
            reason,
        }
    }
}

#[async_trait]
impl NotificationProvider for FonnteProvider {
    async fn send(
        &self,
        target: &NormalizedAddress,
        message: &OutboundMessage,
    ) -> Result<DeliveryResult, TransportError> {
        let start = Instant::now();

        let response = HTTP_CLIENT
            .post(&self.config.url)
            .timeout(self.timeout())
            .header(reqwest::header::AUTHORIZATION, &self.config.token)
            .json(&json!({
                "target": target.as_str(),
                "message": message.as_str(),
                "countryCode": self.config.country_code,
            }))
            .send()
            .await;

        let response = match response {
            Ok(resp) => resp,
            Err(e) => {
                let error = self.transport_error(e);
                tracing::error!(
                    provider = PROVIDER,
                    target = %target,
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %error,
                    "WhatsApp request failed"
                );
                return Err(error);
            }
        };

        let http_status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(e) => {
                let error = self.transport_error(e);
                tracing::error!(
                    provider = PROVIDER,
                    target = %target,
                    http_status = http_status.as_u16(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %error,
                    "Failed to read WhatsApp gateway response"
                );
                return Err(error);
            }
        };
        let duration_ms = start.elapsed().as_millis() as u64;

        if !http_status.is_success() {
            tracing::error!(
                provider = PROVIDER,
                target = %target,
                http_status = http_status.as_u16(),
                body = %body,
                duration_ms,
                "WhatsApp gateway returned an error status"
            );
            return Err(TransportError::HttpStatus {
                provider: PROVIDER,
                status: http_status.as_u16(),
                body,
            });
        }

        let parsed: Value = serde_json::from_str(&body).map_err(|e| {
            tracing::error!(
                provider = PROVIDER,
                target = %target,
                http_status = http_status.as_u16(),
                body = %body,
                "WhatsApp gateway response is not JSON"
            );
            TransportError::InvalidResponse {
                provider: PROVIDER,
                reason: e.to_string(),
            }
        })?;

        let result = interpret_response(parsed);
        match &result {
            DeliveryResult::Delivered { .. } => tracing::info!(
                provider = PROVIDER,
                target = %target,
                preview = %message.preview(PREVIEW_CHARS),
                http_status = http_status.as_u16(),
                duration_ms,
                "WhatsApp message accepted"
            ),
            DeliveryResult::Rejected { reason, .. } => tracing::warn!(
                provider = PROVIDER,
                target = %target,
                http_status = http_status.as_u16(),
                duration_ms,
                reason = %reason,
                "WhatsApp message rejected by gateway"
            ),
            DeliveryResult::Undelivered { .. } => {}
        }

        Ok(result)
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }

    /// Same rules as the `notifications.whatsapp` settings section, so a
    /// provider built for `send-whatsapp` is held to the startup checks.
    async fn validate_config(&self) -> AppResult<()> {
        self.config.validate().map_err(|e| match e {
            ConfigError::ValidationError { field, message } => AppError::Validation {
                field,
                reason: message,
            },
            other => other.into(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::notifications::normalize_phone;
    use httpmock::prelude::*;

    fn provider_for(server: &MockServer, timeout_seconds: u64) -> FonnteProvider {
        FonnteProvider::new(WhatsAppConfig {
            url: server.url("/send"),
            token: "secret-token".to_string(),
            country_code: "62".to_string(),
            timeout_seconds,
        })
    }

    #[test]
    fn test_truthiness() {
        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(1)));
        assert!(is_truthy(&json!("ok")));
        assert!(is_truthy(&json!(["x"])));
        assert!(is_truthy(&json!({})));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!("FALSE")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&Value::Null));
    }

    #[test]
    fn test_interpret_response_messages() {
        let delivered =
            interpret_response(json!({ "status": true, "detail": "success! message in queue" }));
        assert_eq!(delivered.human_message(), "success! message in queue");

        let plain = interpret_response(json!({ "status": true }));
        assert_eq!(plain.human_message(), DEFAULT_SUCCESS_MESSAGE);

        let missing = interpret_response(json!({ "detail": "?" }));
        assert!(!missing.succeeded());
        assert_eq!(missing.human_message(), DEFAULT_REJECTION_MESSAGE);
    }

    #[tokio::test]
    async fn test_send_posts_target_message_and_token() {
        let server = MockServer::start_async().await;
        let mock = server
            .mock_async(|when, then| {
                when.method(POST)
                    .path("/send")
                    .header("Authorization", "secret-token")
                    .json_body(json!({
                        "target": "628123456789",
                        "message": "halo",
                        "countryCode": "62",
                    }));
                then.status(200)
                    .json_body(json!({ "status": true, "detail": "success! message in queue" }));
            })
            .await;

        let result = provider_for(&server, 5)
            .send(&normalize_phone("08123456789"), &OutboundMessage::new("halo"))
            .await
            .unwrap();

        mock.assert_async().await;
        assert!(result.succeeded());
        assert_eq!(result.provider_status(), Some(&json!(true)));
    }

    #[tokio::test]
    async fn test_send_status_false_is_rejected_with_reason() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/send");
                then.status(200)
                    .json_body(json!({ "status": false, "reason": "quota exceeded" }));
            })
            .await;

        let result = provider_for(&server, 5)
            .send(&normalize_phone("08123456789"), &OutboundMessage::new("halo"))
            .await
            .unwrap();

        assert!(!result.succeeded());
        assert_eq!(result.human_message(), "quota exceeded");
    }

    #[tokio::test]
    async fn test_send_non_success_status_is_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/send");
                then.status(500).body("upstream down");
            })
            .await;

        let err = provider_for(&server, 5)
            .send(&normalize_phone("08123456789"), &OutboundMessage::new("halo"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TransportError::HttpStatus {
                provider: PROVIDER,
                status: 500,
                body: "upstream down".to_string(),
            }
        );
    }

    #[tokio::test]
    async fn test_send_unreadable_body_is_transport_error() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/send");
                then.status(200).body("<html>oops</html>");
            })
            .await;

        let err = provider_for(&server, 5)
            .send(&normalize_phone("08123456789"), &OutboundMessage::new("halo"))
            .await
            .unwrap_err();

        assert!(matches!(err, TransportError::InvalidResponse { .. }));
    }

    #[tokio::test]
    async fn test_send_times_out() {
        let server = MockServer::start_async().await;
        server
            .mock_async(|when, then| {
                when.method(POST).path("/send");
                then.status(200)
                    .delay(Duration::from_secs(3))
                    .json_body(json!({ "status": true }));
            })
            .await;

        let err = provider_for(&server, 1)
            .send(&normalize_phone("08123456789"), &OutboundMessage::new("halo"))
            .await
            .unwrap_err();

        assert_eq!(
            err,
            TransportError::Timeout {
                provider: PROVIDER,
                timeout_seconds: 1,
            }
        );
    }

    #[tokio::test]
    async fn test_validate_config() {
        let ok = FonnteProvider::new(WhatsAppConfig {
            token: "t".to_string(),
            ..WhatsAppConfig::default()
        });
        assert!(ok.validate_config().await.is_ok());

        let missing_token = FonnteProvider::new(WhatsAppConfig::default());
        assert!(missing_token.validate_config().await.is_err());

        let bad_url = FonnteProvider::new(WhatsAppConfig {
            url: "ftp://api.fonnte.com/send".to_string(),
            token: "t".to_string(),
            ..WhatsAppConfig::default()
        });
        assert!(bad_url.validate_config().await.is_err());
    }

    #[tokio::test]
    async fn test_validate_config_checks_timeout_and_country_code() {
        let zero_timeout = FonnteProvider::new(WhatsAppConfig {
            token: "t".to_string(),
            timeout_seconds: 0,
            ..WhatsAppConfig::default()
        });
        match zero_timeout.validate_config().await {
            Err(AppError::Validation { field, .. }) => {
                assert_eq!(field, "notifications.whatsapp.timeout_seconds")
            }
            other => panic!("expected validation error, got {other:?}"),
        }

        let bad_country = FonnteProvider::new(WhatsAppConfig {
            token: "t".to_string(),
            country_code: "+62".to_string(),
            ..WhatsAppConfig::default()
        });
        assert!(matches!(
            bad_country.validate_config().await,
            Err(AppError::Validation { .. })
        ));
    }

    #[derive(Clone, Default)]
    struct SharedBuffer(std::sync::Arc<std::sync::Mutex<Vec<u8>>>);

    impl std::io::Write for SharedBuffer {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[tokio::test(flavor = "current_thread")]
    async fn test_truncated_body_is_logged_transport_error() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut request = vec![0u8; 4096];
            let _ = socket.read(&mut request).await;
            socket
                .write_all(b"HTTP/1.1 200 OK\r\nContent-Length: 100\r\n\r\n{\"status\":")
                .await
                .unwrap();
        });

        let buffer = SharedBuffer::default();
        let writer = buffer.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_writer(move || writer.clone())
            .with_ansi(false)
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let provider = FonnteProvider::new(WhatsAppConfig {
            url: format!("http://{addr}/send"),
            token: "t".to_string(),
            timeout_seconds: 2,
            ..WhatsAppConfig::default()
        });
        let result = provider
            .send(&normalize_phone("081234567890"), &OutboundMessage::new("halo"))
            .await;

        assert!(result.is_err());
        let logs = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
        assert!(logs.contains("ERROR"));
        assert!(logs.contains("Failed to read WhatsApp gateway response"));
    }
}
