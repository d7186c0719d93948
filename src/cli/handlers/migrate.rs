//! Migrate command handler

use crate::config::settings::Settings;
use crate::db::{pending_migrations, revert_migrations, run_pending_migrations};
use crate::error::{AppError, AppResult};

pub struct MigrateCommandHandler {
    config: Settings,
}

impl MigrateCommandHandler {
    pub fn new(config: Settings) -> Self {
        Self { config }
    }

    /// Applies, previews (`dry_run`) or reverts (`rollback`) migrations.
    ///
    /// # Errors
    /// - Database configuration errors
    /// - Connection and migration errors
    pub async fn execute(&self, dry_run: bool, rollback: Option<u32>) -> AppResult<()> {
        self.config.database.validate()?;
        let url = &self.config.database.url;

        if dry_run {
            let pending = pending_migrations(url).await?;
            if pending.is_empty() {
                println!("✓ No pending migrations found - database is up to date");
            } else {
                println!("Found {} pending migration(s):", pending.len());
                print_names(&pending);
                println!("\nRun without --dry-run to apply these migrations");
            }
            return Ok(());
        }

        if let Some(steps) = rollback {
            if steps == 0 {
                return Err(AppError::validation(
                    "rollback_steps",
                    "Number of rollback steps must be greater than 0",
                ));
            }
            let reverted = revert_migrations(url, steps).await?;
            println!("✓ Rolled back {} migration(s):", reverted.len());
            print_names(&reverted);
            return Ok(());
        }

        let applied = run_pending_migrations(url).await?;
        if applied.is_empty() {
            println!("✓ No migrations to apply - database is already up to date");
        } else {
            println!("✓ Applied {} migration(s):", applied.len());
            print_names(&applied);
        }
        Ok(())
    }

    pub fn config(&self) -> &Settings {
        &self.config
    }
}

fn print_names(names: &[String]) {
    for name in names {
        println!("  - {}", name);
    }
}
