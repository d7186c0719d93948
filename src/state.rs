//! Application state for Axum web framework.
//!
//! Contains shared services and resources that are accessible
//! across all request handlers.

use crate::config::JwtConfig;
use crate::db::AsyncDbPool;
use crate::repositories::Repositories;
use crate::services::{MailService, NotificationService, Services};

/// Shared state handed to every handler.
///
/// Cloning is cheap since the pool, the services and the notification
/// provider are all reference counted.
#[derive(Clone)]
pub struct AppState {
    pub services: Services,
    /// Direct pool access for health checks
    pub db_pool: AsyncDbPool,
    /// Secret and lifetime for staff tokens
    pub jwt_config: JwtConfig,
}

impl AppState {
    /// # Example
    /// ```ignore
    /// let pool = establish_async_connection_pool(&settings.database).await?;
    /// let notifications = NotificationService::from_settings(&settings.notifications);
    /// let mail = MailService::from_settings(&settings.mail, "Kelurahan Graha Indah");
    /// let state = AppState::new(pool, settings.jwt.clone(), notifications, mail);
    /// ```
    pub fn new(
        pool: AsyncDbPool,
        jwt_config: JwtConfig,
        notifications: NotificationService,
        mail: MailService,
    ) -> Self {
        let repos = Repositories::new(pool.clone());
        let services = Services::new(repos, notifications, mail);
        Self {
            services,
            db_pool: pool,
            jwt_config,
        }
    }
}
