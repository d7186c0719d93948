//! Applies CLI overrides on top of file and environment configuration.
//!
//! Precedence, highest first: command flags, global flags, environment
//! variables, configuration files.

use super::parser::{Cli, Commands};
use crate::config::error::ConfigError;
use crate::config::{ConfigLoader, Settings};

pub struct ConfigurationMerger {
    base_config: Settings,
}

impl ConfigurationMerger {
    pub fn new(base_config: Settings) -> Self {
        Self { base_config }
    }

    /// Loads the unvalidated base configuration selected by `--config` and `--env`.
    pub fn from_cli(cli: &Cli) -> Result<Self, ConfigError> {
        let mut loader = ConfigLoader::new()?;
        if let Some(path) = &cli.config {
            loader = loader.with_config_file(path);
        }
        if let Some(env) = cli.env {
            loader = loader.with_environment(env.into());
        }

        Ok(Self::new(loader.load_unvalidated()?))
    }

    /// Returns the merged and validated settings.
    pub fn merge_cli_args(&self, cli: &Cli) -> Result<Settings, ConfigError> {
        let mut config = self.base_config.clone();

        if cli.verbose {
            config.logger.level = "debug".to_string();
        } else if cli.quiet {
            config.logger.level = "error".to_string();
        }

        if let Some(Commands::Serve {
            host,
            port,
            log_level,
            ..
        }) = &cli.command
        {
            if let Some(host) = host {
                config.server.host = host.clone();
            }
            if let Some(port) = port {
                config.server.port = *port;
            }
            if let Some(level) = log_level {
                config.logger.level = level.as_str().to_string();
            }
        }

        config.validate()?;
        Ok(config)
    }

    pub fn base_config(&self) -> &Settings {
        &self.base_config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    fn base() -> Settings {
        let mut settings = Settings::default();
        settings.database.url = "postgres://localhost/kelurahan".to_string();
        settings
    }

    #[test]
    fn test_serve_flags_override_file_values() {
        let cli = Cli::try_parse_from([
            "kelurahan", "--verbose", "serve", "--host", "0.0.0.0", "--port", "9000",
        ])
        .unwrap();

        let merged = ConfigurationMerger::new(base()).merge_cli_args(&cli).unwrap();

        assert_eq!(merged.server.host, "0.0.0.0");
        assert_eq!(merged.server.port, 9000);
        assert_eq!(merged.logger.level, "debug");
    }

    #[test]
    fn test_command_log_level_beats_global_flag() {
        let cli =
            Cli::try_parse_from(["kelurahan", "--quiet", "serve", "--log-level", "trace"]).unwrap();

        let merged = ConfigurationMerger::new(base()).merge_cli_args(&cli).unwrap();

        assert_eq!(merged.logger.level, "trace");
    }

    #[test]
    fn test_other_commands_keep_file_values() {
        let cli = Cli::try_parse_from(["kelurahan", "migrate"]).unwrap();
        let base = base();

        let merged = ConfigurationMerger::new(base.clone()).merge_cli_args(&cli).unwrap();

        assert_eq!(merged.server, base.server);
        assert_eq!(merged.logger.level, base.logger.level);
    }

    #[test]
    fn test_invalid_merged_config_is_rejected() {
        let cli = Cli::try_parse_from(["kelurahan", "serve"]).unwrap();
        let mut settings = base();
        settings.database.url = "mysql://localhost/kelurahan".to_string();

        assert!(ConfigurationMerger::new(settings).merge_cli_args(&cli).is_err());
    }
}
