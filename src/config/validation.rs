//! Configuration validation logic
//!
//! Each section checks its own ranges and formats; `Settings::validate`
//! returns the first failure.

use crate::config::error::ConfigError;
use crate::config::settings::{
    DatabaseConfig, JwtConfig, MailSettings, NotificationSettings, ServerConfig, Settings,
    WhatsAppConfig,
};

const MIN_JWT_SECRET_LEN: usize = 32;
const MAX_WHATSAPP_TIMEOUT_SECONDS: u64 = 120;
const MAX_MAIL_TIMEOUT_SECONDS: u64 = 120;

impl ServerConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.host.trim().is_empty() {
            return Err(ConfigError::validation("server.host", "Host must not be empty."));
        }
        if self.port == 0 {
            return Err(ConfigError::validation(
                "server.port",
                "Port must be between 1 and 65535. Please specify a valid port number.",
            ));
        }
        Ok(())
    }
}

impl DatabaseConfig {
    /// # Validation Rules
    /// - URL must not be empty and must use a PostgreSQL scheme
    /// - Connection counts must be positive and `min <= max`
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.url.is_empty() {
            return Err(ConfigError::validation(
                "database.url",
                "Database URL is required. Please specify a valid database connection string.",
            ));
        }

        if !self.url.starts_with("postgres://") && !self.url.starts_with("postgresql://") {
            return Err(ConfigError::validation(
                "database.url",
                "Invalid database URL format. Expected format: postgres://[user:password@]host[:port]/database",
            ));
        }

        if self.max_connections == 0 {
            return Err(ConfigError::validation(
                "database.max_connections",
                "Max connections must be greater than 0.",
            ));
        }

        if self.min_connections > self.max_connections {
            return Err(ConfigError::validation(
                "database.min_connections",
                format!(
                    "Min connections ({}) cannot exceed max connections ({}).",
                    self.min_connections, self.max_connections
                ),
            ));
        }

        if self.connection_timeout == 0 {
            return Err(ConfigError::validation(
                "database.connection_timeout",
                "Connection timeout must be greater than 0 seconds.",
            ));
        }

        Ok(())
    }
}

impl JwtConfig {
    /// Only required by commands that verify or mint tokens.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.secret.is_empty() {
            return Err(ConfigError::validation("jwt.secret", "JWT secret cannot be empty"));
        }

        if self.secret.len() < MIN_JWT_SECRET_LEN {
            return Err(ConfigError::validation(
                "jwt.secret",
                format!(
                    "JWT secret should be at least {} characters for security",
                    MIN_JWT_SECRET_LEN
                ),
            ));
        }

        if self.token_expiration_hours <= 0 {
            return Err(ConfigError::validation(
                "jwt.token_expiration_hours",
                "Token expiration must be positive",
            ));
        }

        Ok(())
    }
}

impl WhatsAppConfig {
    pub fn validate(&self) -> Result<(), ConfigError> {
        let url = reqwest::Url::parse(&self.url).map_err(|e| {
            ConfigError::validation(
                "notifications.whatsapp.url",
                format!("Invalid gateway URL '{}': {}", self.url, e),
            )
        })?;
        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::validation(
                "notifications.whatsapp.url",
                "Gateway URL must use http or https",
            ));
        }

        if self.token.trim().is_empty() {
            return Err(ConfigError::validation(
                "notifications.whatsapp.token",
                "Gateway token is required when notifications are enabled",
            ));
        }

        if self.country_code.is_empty() || !self.country_code.chars().all(|c| c.is_ascii_digit())
        {
            return Err(ConfigError::validation(
                "notifications.whatsapp.country_code",
                "Country code must contain digits only",
            ));
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_WHATSAPP_TIMEOUT_SECONDS {
            return Err(ConfigError::validation(
                "notifications.whatsapp.timeout_seconds",
                format!(
                    "Timeout must be between 1 and {} seconds",
                    MAX_WHATSAPP_TIMEOUT_SECONDS
                ),
            ));
        }

        Ok(())
    }
}

impl NotificationSettings {
    /// Template settings are always checked; gateway credentials only when enabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.organization_name.trim().is_empty() {
            return Err(ConfigError::validation(
                "notifications.organization_name",
                "Organization name must not be empty",
            ));
        }

        if !(-12..=14).contains(&self.utc_offset_hours) {
            return Err(ConfigError::validation(
                "notifications.utc_offset_hours",
                format!(
                    "UTC offset {} is outside the range -12..=14",
                    self.utc_offset_hours
                ),
            ));
        }

        if self.timezone_label.trim().is_empty() {
            return Err(ConfigError::validation(
                "notifications.timezone_label",
                "Timezone label must not be empty",
            ));
        }

        if self.enabled {
            self.whatsapp.validate()?;
        }

        Ok(())
    }
}

impl MailSettings {
    /// Nothing is checked while mail is disabled.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !self.enabled {
            return Ok(());
        }

        if self.host.trim().is_empty() {
            return Err(ConfigError::validation(
                "mail.host",
                "SMTP host is required when mail is enabled",
            ));
        }

        if self.port == 0 {
            return Err(ConfigError::validation("mail.port", "SMTP port must not be 0"));
        }

        if self.from_address.parse::<lettre::Address>().is_err() {
            return Err(ConfigError::validation(
                "mail.from_address",
                format!("'{}' is not a valid e-mail address", self.from_address),
            ));
        }

        if !self.username.is_empty() && self.password.is_empty() {
            return Err(ConfigError::validation(
                "mail.password",
                "SMTP password is required when a username is set",
            ));
        }

        if self.timeout_seconds == 0 || self.timeout_seconds > MAX_MAIL_TIMEOUT_SECONDS {
            return Err(ConfigError::validation(
                "mail.timeout_seconds",
                format!(
                    "Timeout must be between 1 and {} seconds",
                    MAX_MAIL_TIMEOUT_SECONDS
                ),
            ));
        }

        Ok(())
    }
}

impl Settings {
    /// Validate all configuration settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.server.validate()?;
        self.database.validate()?;
        self.logger
            .validate()
            .map_err(|e| ConfigError::validation("logger", e.to_string()))?;
        self.notifications.validate()?;
        self.mail.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_settings() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/kelurahan".to_string();
        settings
    }

    fn field_of(error: ConfigError) -> String {
        match error {
            ConfigError::ValidationError { field, .. } => field,
            other => panic!("Expected ValidationError, got {:?}", other),
        }
    }

    #[test]
    fn test_default_settings_with_database_url_are_valid() {
        assert!(valid_settings().validate().is_ok());
    }

    #[test]
    fn test_server_port_zero_is_rejected() {
        let mut settings = valid_settings();
        settings.server.port = 0;
        assert_eq!(field_of(settings.validate().unwrap_err()), "server.port");
    }

    #[test]
    fn test_database_url_must_be_postgres() {
        let mut settings = valid_settings();
        settings.database.url = "mysql://localhost/kelurahan".to_string();
        assert_eq!(field_of(settings.validate().unwrap_err()), "database.url");
    }

    #[test]
    fn test_database_min_exceeding_max_is_rejected() {
        let mut settings = valid_settings();
        settings.database.min_connections = 20;
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "database.min_connections"
        );
    }

    #[test]
    fn test_disabled_notifications_do_not_require_token() {
        let settings = valid_settings();
        assert!(!settings.notifications.enabled);
        assert!(settings.notifications.whatsapp.token.is_empty());
        assert!(settings.notifications.validate().is_ok());
    }

    #[test]
    fn test_enabled_notifications_require_token() {
        let mut settings = valid_settings();
        settings.notifications.enabled = true;
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "notifications.whatsapp.token"
        );
    }

    #[test]
    fn test_whatsapp_url_and_timeout_checks() {
        let mut whatsapp = WhatsAppConfig {
            token: "secret".to_string(),
            ..Default::default()
        };
        assert!(whatsapp.validate().is_ok());

        whatsapp.url = "ftp://api.fonnte.com/send".to_string();
        assert_eq!(field_of(whatsapp.validate().unwrap_err()), "notifications.whatsapp.url");

        whatsapp.url = "https://api.fonnte.com/send".to_string();
        whatsapp.timeout_seconds = 0;
        assert_eq!(
            field_of(whatsapp.validate().unwrap_err()),
            "notifications.whatsapp.timeout_seconds"
        );

        whatsapp.timeout_seconds = 10;
        whatsapp.country_code = "+62".to_string();
        assert_eq!(
            field_of(whatsapp.validate().unwrap_err()),
            "notifications.whatsapp.country_code"
        );
    }

    #[test]
    fn test_utc_offset_out_of_range() {
        let mut settings = valid_settings();
        settings.notifications.utc_offset_hours = 15;
        assert_eq!(
            field_of(settings.validate().unwrap_err()),
            "notifications.utc_offset_hours"
        );
    }

    #[test]
    fn test_jwt_secret_rules() {
        let mut jwt = JwtConfig::default();
        assert!(jwt.validate().is_err());

        jwt.secret = "short".to_string();
        assert!(jwt.validate().unwrap_err().to_string().contains("at least 32"));

        jwt.secret = "a".repeat(32);
        assert!(jwt.validate().is_ok());

        jwt.token_expiration_hours = 0;
        assert_eq!(field_of(jwt.validate().unwrap_err()), "jwt.token_expiration_hours");
    }

    #[test]
    fn test_invalid_logger_is_reported() {
        let mut settings = valid_settings();
        settings.logger.level = "verbose".to_string();
        assert_eq!(field_of(settings.validate().unwrap_err()), "logger");
    }

    #[test]
    fn test_mail_checked_only_when_enabled() {
        let mut settings = valid_settings();
        assert!(settings.validate().is_ok());

        settings.mail.enabled = true;
        assert_eq!(field_of(settings.validate().unwrap_err()), "mail.host");

        settings.mail.host = "smtp.example.org".to_string();
        settings.mail.from_address = "kelurahan at example".to_string();
        assert_eq!(field_of(settings.validate().unwrap_err()), "mail.from_address");

        settings.mail.from_address = "kelurahan@example.org".to_string();
        settings.mail.username = "mailer".to_string();
        assert_eq!(field_of(settings.validate().unwrap_err()), "mail.password");

        settings.mail.password = "secret".to_string();
        settings.mail.timeout_seconds = 0;
        assert_eq!(field_of(settings.validate().unwrap_err()), "mail.timeout_seconds");

        settings.mail.timeout_seconds = 15;
        assert!(settings.validate().is_ok());
    }
}
