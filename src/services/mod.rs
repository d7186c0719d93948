//! Service layer for business logic operations.
//!
//! Services encapsulate business logic and coordinate between
//! repositories and handlers.

mod kontak_service;
mod layanan_service;
pub mod mail;
pub mod notifications;
mod permohonan_service;

pub use kontak_service::{ContactSubmission, KontakService};
pub use layanan_service::LayananService;
pub use mail::MailService;
pub use notifications::NotificationService;
pub use permohonan_service::{
    BulkDeleteOutcome, BulkStatusUpdateOutcome, NewServiceRequest, PermohonanService,
    StatusUpdateOutcome,
};

use std::sync::Arc;

use crate::repositories::Repositories;

/// Aggregates all services for convenient access.
///
/// Designed to be used as Axum application state. Cloning is cheap since the
/// pool and the providers are behind `Arc`.
#[derive(Clone)]
pub struct Services {
    pub permohonan: PermohonanService,
    pub layanan: LayananService,
    pub kontak: KontakService,
    pub notifications: NotificationService,
}

impl Services {
    pub fn new(repos: Repositories, notifications: NotificationService, mail: MailService) -> Self {
        Self {
            permohonan: PermohonanService::new(Arc::new(repos.permohonan), notifications.clone()),
            layanan: LayananService::new(repos.layanan),
            kontak: KontakService::new(Arc::new(repos.kontak), mail),
            notifications,
        }
    }
}
