//! Errors raised while loading or validating settings.

use thiserror::Error;

use crate::error::AppError;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    /// `field` is the dotted settings path, e.g. `notifications.whatsapp.token`
    #[error("Invalid setting {field}: {message}")]
    ValidationError { field: String, message: String },

    #[error("Environment variable error: {0}")]
    EnvVarError(String),

    /// Two sources that cannot be combined were both given
    #[error("Conflicting configuration sources: {0}")]
    MutualExclusivityError(String),

    #[error("Configuration error: {0}")]
    Other(#[from] config::ConfigError),
}

impl ConfigError {
    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::ValidationError {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn file_not_found(path: impl Into<String>) -> Self {
        ConfigError::FileNotFound(path.into())
    }

    pub fn mutual_exclusivity(message: impl Into<String>) -> Self {
        ConfigError::MutualExclusivityError(message.into())
    }
}

/// Keeps the failing settings path as the error key.
impl From<ConfigError> for AppError {
    fn from(error: ConfigError) -> Self {
        let key = match &error {
            ConfigError::ValidationError { field, .. } => field.clone(),
            ConfigError::FileNotFound(path) => path.clone(),
            _ => "settings".to_string(),
        };
        AppError::Configuration {
            key,
            source: anyhow::Error::from(error),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validation_error_keeps_field_as_key() {
        let error: AppError =
            ConfigError::validation("notifications.whatsapp.token", "Gateway token is required")
                .into();

        match error {
            AppError::Configuration { key, source } => {
                assert_eq!(key, "notifications.whatsapp.token");
                assert!(source.to_string().contains("Gateway token is required"));
            }
            other => panic!("expected configuration error, got {other:?}"),
        }
    }

    #[test]
    fn test_other_errors_use_generic_key() {
        let error: AppError = ConfigError::ParseError("bad toml".to_string()).into();
        assert!(matches!(error, AppError::Configuration { key, .. } if key == "settings"));
    }
}
