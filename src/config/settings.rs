//! Configuration settings structures for kelurahan-rs
//!
//! Every section can be loaded from TOML files and overridden with
//! `KELURAHAN_*` environment variables.

use serde::{Deserialize, Serialize};

use crate::config::environment::Environment;
use crate::logger::LoggerConfig;

// ============================================================================
// Default value functions
// ============================================================================

fn default_app_name() -> String {
    "kelurahan-rs".to_string()
}

fn default_app_version() -> String {
    crate::pkg_version().to_string()
}

fn default_host() -> String {
    "127.0.0.1".to_string()
}

fn default_port() -> u16 {
    3000
}

fn default_max_connections() -> u32 {
    10
}

fn default_min_connections() -> u32 {
    1
}

fn default_connection_timeout() -> u64 {
    30
}

fn default_token_expiration() -> i64 {
    8
}

fn default_organization_name() -> String {
    "Kelurahan Graha Indah".to_string()
}

fn default_utc_offset_hours() -> i8 {
    7
}

fn default_timezone_label() -> String {
    "WIB".to_string()
}

fn default_whatsapp_url() -> String {
    "https://api.fonnte.com/send".to_string()
}

fn default_country_code() -> String {
    "62".to_string()
}

fn default_whatsapp_timeout() -> u64 {
    10
}

fn default_smtp_port() -> u16 {
    587
}

fn default_mail_timeout() -> u64 {
    15
}

// ============================================================================
// Application Configuration
// ============================================================================

/// Application basic information configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApplicationConfig {
    #[serde(default = "default_app_name")]
    pub name: String,

    #[serde(default = "default_app_version")]
    pub version: String,

    /// Overlay the settings were loaded with; set by the loader
    #[serde(skip)]
    pub environment: Environment,
}

impl Default for ApplicationConfig {
    fn default() -> Self {
        Self {
            name: default_app_name(),
            version: default_app_version(),
            environment: Environment::default(),
        }
    }
}

// ============================================================================
// Server Configuration
// ============================================================================

/// Axum HTTP server configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,
}

impl ServerConfig {
    /// Get the full server address as "host:port"
    pub fn address(&self) -> String {
        format!("{}:{}", self.host, self.port)
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
        }
    }
}

// ============================================================================
// Database Configuration
// ============================================================================

/// Diesel database connection configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DatabaseConfig {
    /// Database connection URL
    #[serde(default)]
    pub url: String,

    /// Maximum number of connections in the pool
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,

    /// Minimum number of idle connections kept in the pool
    #[serde(default = "default_min_connections")]
    pub min_connections: u32,

    /// Connection timeout in seconds
    #[serde(default = "default_connection_timeout")]
    pub connection_timeout: u64,

    /// Whether to run pending migrations on startup
    #[serde(default)]
    pub auto_migrate: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: String::new(),
            max_connections: default_max_connections(),
            min_connections: default_min_connections(),
            connection_timeout: default_connection_timeout(),
            auto_migrate: false,
        }
    }
}

// ============================================================================
// JWT Configuration
// ============================================================================

/// Verification of staff tokens issued by the portal's login service
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwtConfig {
    /// HS256 secret shared with the login service; keep it in the environment
    #[serde(default)]
    pub secret: String,

    /// Lifetime in hours of tokens minted by `issue-token`
    #[serde(default = "default_token_expiration")]
    pub token_expiration_hours: i64,
}

impl Default for JwtConfig {
    fn default() -> Self {
        Self {
            secret: String::new(),
            token_expiration_hours: default_token_expiration(),
        }
    }
}

// ============================================================================
// Notification Configuration
// ============================================================================

/// Fonnte WhatsApp gateway credentials and transport limits
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhatsAppConfig {
    #[serde(default = "default_whatsapp_url")]
    pub url: String,

    /// Sent verbatim in the `Authorization` header
    #[serde(default)]
    pub token: String,

    #[serde(default = "default_country_code")]
    pub country_code: String,

    /// Per-request timeout in seconds
    #[serde(default = "default_whatsapp_timeout")]
    pub timeout_seconds: u64,
}

impl Default for WhatsAppConfig {
    fn default() -> Self {
        Self {
            url: default_whatsapp_url(),
            token: String::new(),
            country_code: default_country_code(),
            timeout_seconds: default_whatsapp_timeout(),
        }
    }
}

/// Citizen notification settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSettings {
    /// Master switch; when off, status changes are persisted without messaging
    #[serde(default)]
    pub enabled: bool,

    /// Shown in the message header (upper-cased) and footer
    #[serde(default = "default_organization_name")]
    pub organization_name: String,

    /// Offset applied to timestamps printed in messages
    #[serde(default = "default_utc_offset_hours")]
    pub utc_offset_hours: i8,

    #[serde(default = "default_timezone_label")]
    pub timezone_label: String,

    #[serde(default)]
    pub whatsapp: WhatsAppConfig,
}

impl Default for NotificationSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            organization_name: default_organization_name(),
            utc_offset_hours: default_utc_offset_hours(),
            timezone_label: default_timezone_label(),
            whatsapp: WhatsAppConfig::default(),
        }
    }
}

// ============================================================================
// Mail Configuration
// ============================================================================

/// How the SMTP connection is secured
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SmtpEncryption {
    /// Plain connection upgraded with STARTTLS (usually port 587)
    #[default]
    Starttls,
    /// TLS from the first byte (usually port 465)
    Tls,
    /// No encryption; local relays only
    None,
}

/// Outgoing e-mail for replies to contact messages
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MailSettings {
    /// When off, replies are refused instead of silently dropped
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub host: String,

    #[serde(default = "default_smtp_port")]
    pub port: u16,

    #[serde(default)]
    pub encryption: SmtpEncryption,

    /// Empty username disables SMTP authentication
    #[serde(default)]
    pub username: String,

    #[serde(default)]
    pub password: String,

    #[serde(default)]
    pub from_address: String,

    /// Display name; the organization name when empty
    #[serde(default)]
    pub from_name: String,

    #[serde(default = "default_mail_timeout")]
    pub timeout_seconds: u64,
}

impl Default for MailSettings {
    fn default() -> Self {
        Self {
            enabled: false,
            host: String::new(),
            port: default_smtp_port(),
            encryption: SmtpEncryption::default(),
            username: String::new(),
            password: String::new(),
            from_address: String::new(),
            from_name: String::new(),
            timeout_seconds: default_mail_timeout(),
        }
    }
}

// ============================================================================
// Root
// ============================================================================

/// Root configuration structure
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Settings {
    #[serde(default)]
    pub application: ApplicationConfig,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub database: DatabaseConfig,

    #[serde(default)]
    pub logger: LoggerConfig,

    #[serde(default)]
    pub jwt: JwtConfig,

    #[serde(default)]
    pub notifications: NotificationSettings,

    #[serde(default)]
    pub mail: MailSettings,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_server_config_address() {
        let config = ServerConfig {
            host: "0.0.0.0".to_string(),
            port: 8080,
        };
        assert_eq!(config.address(), "0.0.0.0:8080");
    }

    #[test]
    fn test_notification_defaults() {
        let settings = NotificationSettings::default();
        assert!(!settings.enabled);
        assert_eq!(settings.utc_offset_hours, 7);
        assert_eq!(settings.timezone_label, "WIB");
        assert_eq!(settings.whatsapp.url, "https://api.fonnte.com/send");
        assert_eq!(settings.whatsapp.country_code, "62");
        assert_eq!(settings.whatsapp.timeout_seconds, 10);
    }

    #[test]
    fn test_settings_deserialize_partial() {
        let settings: Settings = serde_json::from_value(serde_json::json!({
            "server": { "port": 9000 },
            "notifications": {
                "enabled": true,
                "whatsapp": { "token": "abc" }
            }
        }))
        .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.host, "127.0.0.1");
        assert!(settings.notifications.enabled);
        assert_eq!(settings.notifications.whatsapp.token, "abc");
        assert_eq!(settings.notifications.whatsapp.timeout_seconds, 10);
        assert_eq!(settings.application.name, "kelurahan-rs");
        assert!(!settings.mail.enabled);
        assert_eq!(settings.mail.port, 587);
    }

    #[test]
    fn test_mail_encryption_tags() {
        let mail: MailSettings = serde_json::from_value(serde_json::json!({
            "enabled": true,
            "host": "smtp.example.org",
            "port": 465,
            "encryption": "tls"
        }))
        .unwrap();
        assert_eq!(mail.encryption, SmtpEncryption::Tls);
        assert_eq!(mail.timeout_seconds, 15);
    }
}
