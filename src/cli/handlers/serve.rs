//! Serve command handler
//!
//! Only the dry run lives here; the server itself is started from `main`.

use crate::config::settings::Settings;
use crate::error::AppResult;
use crate::services::mail::MailService;
use crate::services::notifications::NotificationService;

pub struct ServeCommandHandler {
    config: Settings,
}

impl ServeCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Validates everything the server checks at startup, without binding
    /// or connecting to the database.
    ///
    /// # Errors
    /// - Settings, JWT, WhatsApp gateway or mail validation errors
    pub async fn dry_run(&self) -> AppResult<()> {
        self.config.validate()?;
        println!("✓ Configuration is valid");
        println!("✓ Server would bind to: {}", self.config.server.address());

        self.config.jwt.validate()?;
        println!("✓ JWT secret is configured");

        let notifications = NotificationService::from_settings(&self.config.notifications);
        notifications.validate().await?;
        if notifications.is_enabled() {
            println!(
                "✓ WhatsApp notifications enabled via {}",
                notifications.provider_name()
            );
        } else {
            println!("- WhatsApp notifications are disabled");
        }

        let mail = MailService::from_settings(
            &self.config.mail,
            &self.config.notifications.organization_name,
        );
        mail.validate().await?;
        if mail.is_enabled() {
            println!("✓ E-mail replies enabled via {}", self.config.mail.host);
        } else {
            println!("- E-mail replies are disabled");
        }

        println!("Dry run completed successfully - configuration is ready for deployment");
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_config() -> Settings {
        let mut config = Settings::default();
        config.database.url = "postgres://localhost/kelurahan".to_string();
        config.jwt.secret = "a-very-long-secret-for-kelurahan-tests".to_string();
        config
    }

    #[tokio::test]
    async fn test_dry_run_accepts_valid_config() {
        let handler = ServeCommandHandler::new(valid_config());
        assert!(handler.dry_run().await.is_ok());
    }

    #[tokio::test]
    async fn test_dry_run_rejects_invalid_port() {
        let mut config = valid_config();
        config.server.port = 0;

        assert!(ServeCommandHandler::new(config).dry_run().await.is_err());
    }

    #[tokio::test]
    async fn test_dry_run_requires_jwt_secret() {
        let mut config = valid_config();
        config.jwt.secret.clear();

        assert!(ServeCommandHandler::new(config).dry_run().await.is_err());
    }

    #[tokio::test]
    async fn test_dry_run_checks_gateway_only_when_enabled() {
        let mut config = valid_config();
        config.notifications.whatsapp.token.clear();
        assert!(ServeCommandHandler::new(config.clone()).dry_run().await.is_ok());

        config.notifications.enabled = true;
        assert!(ServeCommandHandler::new(config).dry_run().await.is_err());
    }

    #[tokio::test]
    async fn test_dry_run_checks_mail_only_when_enabled() {
        let mut config = valid_config();
        config.mail.enabled = true;
        assert!(ServeCommandHandler::new(config.clone()).dry_run().await.is_err());

        config.mail.host = "smtp.example.org".to_string();
        config.mail.from_address = "kelurahan@example.org".to_string();
        assert!(ServeCommandHandler::new(config).dry_run().await.is_ok());
    }
}
