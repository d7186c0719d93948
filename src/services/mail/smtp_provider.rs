//! SMTP delivery with lettre.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{Address, AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

use super::provider::{MailError, MailProvider, OutgoingMail};
use crate::config::{ConfigError, MailSettings, SmtpEncryption};
use crate::error::{AppError, AppResult};

const PROVIDER: &str = "smtp";

#[derive(Debug, Clone)]
pub struct SmtpMailProvider {
    config: MailSettings,
    sender_name: String,
}

impl SmtpMailProvider {
    /// `fallback_name` is used when `from_name` is not configured.
    pub fn new(config: MailSettings, fallback_name: &str) -> Self {
        let sender_name = match config.from_name.trim() {
            "" => fallback_name.to_string(),
            name => name.to_string(),
        };
        Self {
            config,
            sender_name,
        }
    }

    fn sender(&self) -> Result<Mailbox, MailError> {
        Ok(Mailbox::new(
            Some(self.sender_name.clone()),
            parse_address(&self.config.from_address)?,
        ))
    }

    fn transport(&self) -> Result<AsyncSmtpTransport<Tokio1Executor>, MailError> {
        let host = self.config.host.as_str();
        type Transport = AsyncSmtpTransport<Tokio1Executor>;
        let builder = match self.config.encryption {
            SmtpEncryption::Starttls => Transport::starttls_relay(host),
            SmtpEncryption::Tls => Transport::relay(host),
            SmtpEncryption::None => Ok(Transport::builder_dangerous(host)),
        }
        .map_err(|e| MailError::Transport {
            provider: PROVIDER,
            reason: e.to_string(),
        })?;

        let mut builder = builder
            .port(self.config.port)
            .timeout(Some(Duration::from_secs(self.config.timeout_seconds)));
        if !self.config.username.is_empty() {
            builder = builder.credentials(Credentials::new(
                self.config.username.clone(),
                self.config.password.clone(),
            ));
        }
        Ok(builder.build())
    }
}

fn parse_address(address: &str) -> Result<Address, MailError> {
    address
        .trim()
        .parse::<Address>()
        .map_err(|e| MailError::InvalidAddress {
            address: address.to_string(),
            reason: e.to_string(),
        })
}

pub(crate) fn build_message(from: Mailbox, mail: &OutgoingMail) -> Result<Message, MailError> {
    let to = Mailbox::new(Some(mail.to_name.clone()), parse_address(&mail.to_address)?);

    Message::builder()
        .from(from)
        .to(to)
        .subject(mail.subject.clone())
        .header(ContentType::TEXT_PLAIN)
        .body(mail.body.clone())
        .map_err(|e| MailError::Build(e.to_string()))
}

#[async_trait]
impl MailProvider for SmtpMailProvider {
    async fn send(&self, mail: &OutgoingMail) -> Result<(), MailError> {
        let message = build_message(self.sender()?, mail)?;
        let transport = self.transport()?;
        let start = Instant::now();

        match transport.send(message).await {
            Ok(response) => {
                tracing::info!(
                    provider = PROVIDER,
                    host = %self.config.host,
                    recipient = %mail.to_address,
                    smtp_code = %response.code(),
                    duration_ms = start.elapsed().as_millis() as u64,
                    "E-mail sent"
                );
                Ok(())
            }
            Err(e) => {
                tracing::error!(
                    provider = PROVIDER,
                    host = %self.config.host,
                    recipient = %mail.to_address,
                    duration_ms = start.elapsed().as_millis() as u64,
                    error = %e,
                    "SMTP delivery failed"
                );
                Err(MailError::Transport {
                    provider: PROVIDER,
                    reason: e.to_string(),
                })
            }
        }
    }

    fn name(&self) -> &'static str {
        PROVIDER
    }

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

    fn settings(port: u16) -> MailSettings {
        MailSettings {
            enabled: true,
            host: "127.0.0.1".to_string(),
            port,
            encryption: SmtpEncryption::None,
            from_address: "kelurahan@example.org".to_string(),
            timeout_seconds: 2,
            ..Default::default()
        }
    }

    fn mail(to: &str) -> OutgoingMail {
        OutgoingMail {
            to_name: "Budi Santoso".to_string(),
            to_address: to.to_string(),
            subject: "Balasan Pesan Anda - Kelurahan Graha Indah".to_string(),
            body: "Terima kasih.".to_string(),
        }
    }

    #[test]
    fn test_sender_name_falls_back_to_organization() {
        let provider = SmtpMailProvider::new(settings(25), "Kelurahan Graha Indah");
        assert_eq!(provider.sender_name, "Kelurahan Graha Indah");

        let mut named = settings(25);
        named.from_name = "Loket Pelayanan".to_string();
        let provider = SmtpMailProvider::new(named, "Kelurahan Graha Indah");
        assert_eq!(provider.sender_name, "Loket Pelayanan");
    }

    #[test]
    fn test_build_message_headers() {
        let provider = SmtpMailProvider::new(settings(25), "Kelurahan Graha Indah");
        let message = build_message(provider.sender().unwrap(), &mail("budi@example.org")).unwrap();
        let raw = String::from_utf8(message.formatted()).unwrap();

        assert!(raw.contains("Subject: Balasan Pesan Anda - Kelurahan Graha Indah"));
        assert!(raw.contains("<budi@example.org>"));
        assert!(raw.contains("<kelurahan@example.org>"));
        assert!(raw.contains("text/plain"));
    }

    #[test]
    fn test_invalid_recipient_is_rejected_before_sending() {
        let provider = SmtpMailProvider::new(settings(25), "Kelurahan Graha Indah");
        let result = build_message(provider.sender().unwrap(), &mail("budi at example"));
        assert!(matches!(result, Err(MailError::InvalidAddress { .. })));
    }

    #[tokio::test]
    async fn test_unreachable_server_is_a_transport_error() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let port = listener.local_addr().unwrap().port();
        drop(listener);

        let provider = SmtpMailProvider::new(settings(port), "Kelurahan Graha Indah");
        let result = provider.send(&mail("budi@example.org")).await;

        assert!(matches!(result, Err(MailError::Transport { provider: "smtp", .. })));
    }

    #[tokio::test]
    async fn test_validate_config_reports_field() {
        let mut config = settings(25);
        config.host = String::new();
        let provider = SmtpMailProvider::new(config, "Kelurahan Graha Indah");

        match provider.validate_config().await {
            Err(AppError::Validation { field, .. }) => assert_eq!(field, "mail.host"),
            other => panic!("expected validation error, got {other:?}"),
        }
    }
}
