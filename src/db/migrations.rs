//! Embedded diesel migrations.
//!
//! The harness is synchronous, so every entry point opens a plain
//! `PgConnection` on a blocking thread.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};

use crate::error::{AppError, AppResult};

pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!("migrations");

/// Names of migrations not yet applied.
pub async fn pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    with_connection(database_url, "check pending migrations", |conn| {
        conn.pending_migrations(MIGRATIONS)
            .map(|pending| pending.iter().map(|m| m.name().to_string()).collect())
    })
    .await
}

/// Applies all pending migrations, returning the applied versions.
pub async fn run_pending_migrations(database_url: &str) -> AppResult<Vec<String>> {
    with_connection(database_url, "run pending migrations", |conn| {
        conn.run_pending_migrations(MIGRATIONS)
            .map(|applied| applied.iter().map(|v| v.to_string()).collect())
    })
    .await
}

/// Reverts up to `steps` migrations, newest first, returning the reverted versions.
///
/// Asking for more steps than are applied reverts everything that is applied.
/// A failing revert is an error even after earlier steps succeeded; those
/// steps stay reverted and are logged.
pub async fn revert_migrations(database_url: &str, steps: u32) -> AppResult<Vec<String>> {
    with_connection(database_url, "revert migrations", move |conn| {
        let applied = conn.applied_migrations()?.len();
        let steps = usize::try_from(steps).unwrap_or(usize::MAX);
        if applied < steps {
            tracing::warn!(
                requested = steps,
                applied,
                "Fewer migrations applied than requested, reverting all of them"
            );
        }

        revert_steps(steps.min(applied), || {
            conn.revert_last_migration(MIGRATIONS)
                .map(|version| version.to_string())
        })
    })
    .await
}

/// Runs `revert` `count` times, stopping at the first failure.
fn revert_steps<E, F>(count: usize, mut revert: F) -> Result<Vec<String>, E>
where
    E: std::fmt::Display,
    F: FnMut() -> Result<String, E>,
{
    let mut reverted = Vec::with_capacity(count);
    for _ in 0..count {
        match revert() {
            Ok(version) => reverted.push(version),
            Err(e) => {
                if !reverted.is_empty() {
                    tracing::error!(
                        reverted = ?reverted,
                        error = %e,
                        "Migration rollback stopped part way"
                    );
                }
                return Err(e);
            }
        }
    }
    Ok(reverted)
}

async fn with_connection<T, F>(database_url: &str, operation: &'static str, f: F) -> AppResult<T>
where
    T: Send + 'static,
    F: FnOnce(&mut PgConnection) -> diesel::migration::Result<T> + Send + 'static,
{
    let database_url = database_url.to_string();

    tokio::task::spawn_blocking(move || {
        let mut conn = PgConnection::establish(&database_url).map_err(|e| AppError::Database {
            operation: format!("establish connection to {}", operation),
            source: anyhow::anyhow!("Connection error: {}", e),
        })?;

        f(&mut conn).map_err(|e| AppError::Database {
            operation: operation.to_string(),
            source: anyhow::anyhow!("Migration error: {}", e),
        })
    })
    .await
    .map_err(|e| AppError::Internal {
        source: anyhow::Error::from(e),
    })?
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_revert_steps_collects_versions() {
        let mut versions = vec!["20250116000000", "20250115000000"].into_iter();
        let reverted =
            revert_steps(2, || versions.next().map(str::to_string).ok_or("exhausted")).unwrap();

        assert_eq!(reverted, vec!["20250116000000", "20250115000000"]);
    }

    #[test]
    fn test_revert_steps_reports_failure_after_partial_success() {
        let mut calls = 0;
        let result = revert_steps(3, || {
            calls += 1;
            if calls == 2 {
                Err("down.sql failed")
            } else {
                Ok(format!("v{calls}"))
            }
        });

        assert_eq!(result, Err("down.sql failed"));
        assert_eq!(calls, 2);
    }

    #[test]
    fn test_revert_steps_zero_is_noop() {
        let reverted: Result<Vec<String>, &str> = revert_steps(0, || panic!("not called"));
        assert!(reverted.unwrap().is_empty());
    }
}
