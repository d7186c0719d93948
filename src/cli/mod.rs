//! Command-line interface: parsing, configuration merging and command dispatch.

pub mod config_merger;
pub mod executor;
pub mod handlers;
pub mod parser;
pub mod validation;

pub use config_merger::ConfigurationMerger;
pub use executor::{CommandOutcome, execute_command};
pub use parser::{Cli, Commands, Environment, LogLevel, RoleArg};

use crate::config::settings::Settings;
use crate::config::ConfigError;

/// Loads configuration files and environment, then applies CLI overrides.
///
/// # Errors
/// Returns an error if a file cannot be read or the merged settings are invalid
pub fn load_and_merge_config(cli: &Cli) -> Result<Settings, ConfigError> {
    ConfigurationMerger::from_cli(cli)?.merge_cli_args(cli)
}
