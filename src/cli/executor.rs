//! Dispatches parsed commands to their handlers.

use super::handlers::{
    IssueTokenCommandHandler, MigrateCommandHandler, SendWhatsappCommandHandler,
    ServeCommandHandler,
};
use super::parser::{Cli, Commands};
use crate::config::settings::Settings;
use crate::error::AppResult;

/// What `main` should do after a command ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CommandOutcome {
    /// Start the HTTP server with the merged settings
    StartServer,
    /// The command finished; exit
    Completed,
}

/// Runs the selected command with merged and validated settings.
///
/// `serve` without `--dry-run` (and no command at all) is left to the
/// caller, which owns the runtime and the logger.
pub async fn execute_command(cli: &Cli, settings: Settings) -> AppResult<CommandOutcome> {
    match &cli.command {
        None | Some(Commands::Serve { dry_run: false, .. }) => Ok(CommandOutcome::StartServer),
        Some(Commands::Serve { dry_run: true, .. }) => {
            ServeCommandHandler::new(settings).dry_run().await?;
            Ok(CommandOutcome::Completed)
        }
        Some(Commands::Migrate { dry_run, rollback }) => {
            MigrateCommandHandler::new(settings)
                .execute(*dry_run, *rollback)
                .await?;
            Ok(CommandOutcome::Completed)
        }
        Some(Commands::SendWhatsapp { target, message }) => {
            SendWhatsappCommandHandler::new(&settings.notifications)
                .execute(target, message)
                .await?;
            Ok(CommandOutcome::Completed)
        }
        Some(Commands::IssueToken {
            subject,
            name,
            role,
            hours,
        }) => {
            let token = IssueTokenCommandHandler::new(settings.jwt).execute(
                subject,
                name,
                (*role).into(),
                *hours,
            )?;
            println!("{}", token);
            Ok(CommandOutcome::Completed)
        }
    }
}
