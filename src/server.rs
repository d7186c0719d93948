//! HTTP server lifecycle: startup checks, state wiring and graceful shutdown.

use crate::api::routes::create_router;
use crate::config::settings::Settings;
use crate::db::{establish_async_connection_pool, run_pending_migrations};
use crate::services::mail::MailService;
use crate::services::notifications::NotificationService;
use crate::state::AppState;
use tokio::net::TcpListener;
use tokio::signal;

pub struct Server {
    settings: Settings,
}

impl Server {
    pub fn new(settings: Settings) -> Self {
        Self { settings }
    }

    /// Runs until Ctrl+C or SIGTERM.
    ///
    /// # Errors
    /// - JWT or WhatsApp gateway misconfiguration
    /// - Pool initialization or startup migration failures
    /// - Address binding errors
    pub async fn run(self) -> anyhow::Result<()> {
        let settings = &self.settings;

        tracing::info!(
            app_name = %settings.application.name,
            app_version = %settings.application.version,
            environment = %settings.application.environment.as_str(),
            "Application starting"
        );

        tracing::info!(
            host = %settings.server.host,
            port = %settings.server.port,
            max_connections = %settings.database.max_connections,
            auto_migrate = %settings.database.auto_migrate,
            log_level = %settings.logger.level,
            "Configuration loaded"
        );

        settings.jwt.validate().map_err(|e| {
            tracing::error!(error = %e, "JWT configuration validation failed");
            anyhow::anyhow!("JWT configuration validation failed: {}", e)
        })?;

        let notifications = NotificationService::from_settings(&settings.notifications);
        notifications.validate().await.map_err(|e| {
            tracing::error!(error = %e, "WhatsApp gateway configuration is invalid");
            anyhow::anyhow!("WhatsApp gateway configuration is invalid: {}", e)
        })?;
        if notifications.is_enabled() {
            tracing::info!(
                provider = notifications.provider_name(),
                organization = %settings.notifications.organization_name,
                "WhatsApp notifications enabled"
            );
        } else {
            tracing::warn!("WhatsApp notifications are disabled; status changes will not be sent");
        }

        let mail = MailService::from_settings(
            &settings.mail,
            &settings.notifications.organization_name,
        );
        mail.validate().await.map_err(|e| {
            tracing::error!(error = %e, "Mail configuration is invalid");
            anyhow::anyhow!("Mail configuration is invalid: {}", e)
        })?;
        if mail.is_enabled() {
            tracing::info!(
                provider = mail.provider_name(),
                host = %settings.mail.host,
                "E-mail replies enabled"
            );
        } else {
            tracing::warn!("E-mail replies are disabled; contact replies will be refused");
        }

        if settings.database.auto_migrate {
            let applied = run_pending_migrations(&settings.database.url).await?;
            tracing::info!(
                count = applied.len(),
                migrations = ?applied,
                "Startup migrations applied"
            );
        }

        let pool = establish_async_connection_pool(&settings.database).await?;
        tracing::info!("Database connection pool initialized");

        let state = AppState::new(pool, settings.jwt.clone(), notifications, mail);
        let router = create_router(state);

        let address = settings.server.address();
        let listener = TcpListener::bind(&address).await.map_err(|e| {
            tracing::error!(error = %e, address = %address, "Failed to bind to address");
            anyhow::anyhow!("Failed to bind to {}: {}", address, e)
        })?;

        tracing::info!(address = %address, "Server listening");

        axum::serve(listener, router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        tracing::info!("Server shutdown complete");
        Ok(())
    }
}

/// Resolves on Ctrl+C or SIGTERM. A handler that cannot be installed
/// never resolves, leaving the other one in charge.
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, initiating graceful shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, initiating graceful shutdown");
        }
    }
}
