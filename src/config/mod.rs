//! Configuration management for kelurahan-rs
//!
//! Layered loading from TOML files and `KELURAHAN_*` environment variables,
//! lowest priority first:
//! 1. `default.toml`
//! 2. `{environment}.toml`
//! 3. `local.toml` (not committed)
//! 4. `KELURAHAN_*` environment variables

pub mod environment;
pub mod error;
pub mod loader;
pub mod settings;
pub mod validation;

pub use environment::Environment;
pub use error::ConfigError;
pub use loader::ConfigLoader;
pub use settings::{
    ApplicationConfig, DatabaseConfig, JwtConfig, MailSettings, NotificationSettings,
    ServerConfig, Settings, SmtpEncryption, WhatsAppConfig,
};
