use clap::Parser;
use kelurahan::cli::{Cli, CommandOutcome, execute_command, load_and_merge_config};
use kelurahan::logger::init_logger;
use kelurahan::server::Server;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let settings = match load_and_merge_config(&cli) {
        Ok(settings) => settings,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if let Err(e) = init_logger(&settings.logger) {
        eprintln!("Logger initialization error: {}", e);
        std::process::exit(1);
    }

    match execute_command(&cli, settings.clone()).await {
        Ok(CommandOutcome::StartServer) => Server::new(settings).run().await,
        Ok(CommandOutcome::Completed) => Ok(()),
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("Error: {}", e);
            std::process::exit(1);
        }
    }
}
