//! CLI argument parsing with clap

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use crate::utils::jwt::StaffRole;

/// Kelurahan service-request backend
#[derive(Parser, Debug)]
#[command(name = "kelurahan")]
#[command(
    about = "Service-request backend for the kelurahan portal with WhatsApp status notifications"
)]
#[command(long_about = "
Kelurahan serves the staff and citizen API of the kelurahan service portal and
messages citizens over WhatsApp (Fonnte) whenever the status of their request
changes.

EXAMPLES:
    # Start the server with the layered configuration in ./config
    kelurahan serve

    # Start on all interfaces, port 8080
    kelurahan serve --host 0.0.0.0 --port 8080

    # Validate configuration without starting the server
    kelurahan --env production serve --dry-run

    # Apply or preview database migrations
    kelurahan migrate
    kelurahan migrate --dry-run

    # Send a WhatsApp test message through the configured gateway
    kelurahan send-whatsapp --target 081234567890 --message \"Tes\"

    # Mint a staff token for an operator
    kelurahan issue-token --subject petugas-01 --name \"Rina\" --role petugas
")]
#[command(version = crate::clap_long_version())]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Commands>,

    /// Single configuration file replacing the layered `config/` directory
    #[arg(
        short,
        long,
        value_name = "FILE",
        value_parser = super::validation::validate_config_file_path,
    )]
    pub config: Option<PathBuf>,

    /// Environment overlay to load (`config/{env}.toml`)
    #[arg(short, long, value_enum)]
    pub env: Option<Environment>,

    /// Debug-level logging
    #[arg(short, long)]
    pub verbose: bool,

    /// Error-level logging only
    #[arg(short, long, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Start the HTTP server (default)
    Serve {
        /// Address to bind, e.g. 127.0.0.1 or 0.0.0.0
        #[arg(
            long,
            value_name = "ADDRESS",
            value_parser = super::validation::validate_host_address,
        )]
        host: Option<String>,

        #[arg(short, long, value_name = "PORT", value_parser = super::validation::validate_port)]
        port: Option<u16>,

        /// Overrides the configured level and --verbose/--quiet
        #[arg(long, value_enum)]
        log_level: Option<LogLevel>,

        /// Validate configuration and exit
        #[arg(long)]
        dry_run: bool,
    },

    /// Apply, preview or roll back database migrations
    Migrate {
        /// List pending migrations without applying them
        #[arg(long, conflicts_with = "rollback")]
        dry_run: bool,

        /// Revert this many of the most recent migrations (1-100)
        #[arg(
            long,
            value_name = "STEPS",
            value_parser = super::validation::validate_rollback_steps,
        )]
        rollback: Option<u32>,
    },

    /// Send one WhatsApp message through the configured gateway
    SendWhatsapp {
        /// Phone number in any local or international format
        #[arg(
            short,
            long,
            value_name = "PHONE",
            value_parser = super::validation::validate_phone_target,
        )]
        target: String,

        #[arg(short, long, value_name = "TEXT")]
        message: String,
    },

    /// Print a signed staff token
    IssueToken {
        /// Staff account identifier (`sub` claim)
        #[arg(long, value_name = "ID")]
        subject: String,

        /// Display name
        #[arg(long, value_name = "NAME")]
        name: String,

        #[arg(long, value_enum, default_value = "petugas")]
        role: RoleArg,

        /// Lifetime in hours; defaults to `jwt.token_expiration_hours`
        #[arg(long, value_name = "HOURS", value_parser = super::validation::validate_token_hours)]
        hours: Option<i64>,
    },
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Environment {
    #[value(name = "development", alias = "dev")]
    Development,
    #[value(name = "test")]
    Test,
    #[value(name = "staging", alias = "stage")]
    Staging,
    #[value(name = "production", alias = "prod")]
    Production,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum LogLevel {
    Error,
    #[value(alias = "warning")]
    Warn,
    Info,
    Debug,
    Trace,
}

#[derive(ValueEnum, Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoleArg {
    Admin,
    Petugas,
}

impl LogLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Environment> for crate::config::Environment {
    fn from(env: Environment) -> Self {
        match env {
            Environment::Development => crate::config::Environment::Development,
            Environment::Test => crate::config::Environment::Test,
            Environment::Staging => crate::config::Environment::Staging,
            Environment::Production => crate::config::Environment::Production,
        }
    }
}

impl From<RoleArg> for StaffRole {
    fn from(role: RoleArg) -> Self {
        match role {
            RoleArg::Admin => StaffRole::Admin,
            RoleArg::Petugas => StaffRole::Petugas,
        }
    }
}
