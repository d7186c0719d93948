//! Storage traits the services are written against.
//!
//! The diesel repositories implement them for PostgreSQL.

use async_trait::async_trait;

use crate::error::AppError;
use crate::models::{
    ContactStatus, Kontak, NewKontak, NewPermohonan, PermohonanWithLayanan, RequestStatus,
    StatusTransition, UpdatePermohonanStatus,
};

/// Persistence for service requests.
#[async_trait]
pub trait PermohonanStore: Send + Sync {
    async fn find_by_id(&self, request_id: i32) -> Result<Option<PermohonanWithLayanan>, AppError>;

    async fn find_by_registration(
        &self,
        code: &str,
    ) -> Result<Option<PermohonanWithLayanan>, AppError>;

    /// One page, newest first, plus the total number of matching rows.
    async fn list_paginated(
        &self,
        status_filter: Option<RequestStatus>,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<PermohonanWithLayanan>, i64), AppError>;

    async fn create(&self, request: &NewPermohonan) -> Result<PermohonanWithLayanan, AppError>;

    /// Applies a status change atomically.
    ///
    /// The row is locked while the old status is read, so of two concurrent
    /// changes to the same status only one reports a transition.
    /// `None` when no row has that ID.
    async fn transition_status(
        &self,
        request_id: i32,
        changes: &UpdatePermohonanStatus,
    ) -> Result<Option<StatusTransition>, AppError>;

    /// Deletes the given rows and returns the IDs that were actually removed.
    async fn delete_many(&self, ids: &[i32]) -> Result<Vec<i32>, AppError>;
}

/// Filter for the contact inbox.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct KontakFilter {
    pub status: Option<ContactStatus>,
    /// Matched case-insensitively against name, e-mail and subject
    pub search: Option<String>,
}

/// Persistence for contact messages.
#[async_trait]
pub trait KontakStore: Send + Sync {
    async fn create(&self, message: &NewKontak) -> Result<Kontak, AppError>;

    async fn find_by_id(&self, kontak_id: i32) -> Result<Option<Kontak>, AppError>;

    async fn list_paginated(
        &self,
        filter: &KontakFilter,
        offset: i64,
        limit: i64,
    ) -> Result<(Vec<Kontak>, i64), AppError>;

    /// `None` when no row has that ID.
    async fn set_status(
        &self,
        kontak_id: i32,
        status: ContactStatus,
    ) -> Result<Option<Kontak>, AppError>;

    /// Moves a `baru` message to `dibaca`; other statuses are left as they are.
    async fn mark_read(&self, kontak_id: i32) -> Result<Option<Kontak>, AppError>;

    /// `false` when no row had that ID.
    async fn delete(&self, kontak_id: i32) -> Result<bool, AppError>;
}
