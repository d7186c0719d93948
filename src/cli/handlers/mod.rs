//! Command handlers, one per subcommand.

pub mod migrate;
pub mod notify;
pub mod serve;
pub mod token;

pub use migrate::MigrateCommandHandler;
pub use notify::SendWhatsappCommandHandler;
pub use serve::ServeCommandHandler;
pub use token::IssueTokenCommandHandler;
