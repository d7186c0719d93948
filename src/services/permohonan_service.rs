//! Service request business logic.
//!
//! Status changes are persisted first and the requester is notified
//! afterwards. A notification outcome never rolls back a status change.

use std::sync::Arc;

use crate::error::{AppError, AppResult};
use crate::models::{
    Layanan, NewPermohonan, Permohonan, PermohonanWithLayanan, RequestStatus, ServiceRequest,
    UpdatePermohonanStatus,
};
use crate::repositories::PermohonanStore;
use crate::services::notifications::{DeliveryResult, NotificationService};

const REGISTRATION_PREFIX: &str = "REG";

/// Result of a single status update
#[derive(Debug)]
pub struct StatusUpdateOutcome {
    pub permohonan: Permohonan,
    pub layanan: Option<Layanan>,
    /// `None` when no message was attempted
    pub notification: Option<DeliveryResult>,
}

/// Result of a bulk status update
#[derive(Debug, Default)]
pub struct BulkStatusUpdateOutcome {
    pub updated: Vec<StatusUpdateOutcome>,
    /// IDs that did not match any request
    pub missing: Vec<i32>,
}

/// Result of a bulk delete
#[derive(Debug, Default, PartialEq, Eq)]
pub struct BulkDeleteOutcome {
    pub deleted: Vec<i32>,
    pub missing: Vec<i32>,
}

/// A citizen's submission before it gets a registration number.
#[derive(Debug, Clone)]
pub struct NewServiceRequest {
    pub nama: String,
    pub no_hp: String,
    pub layanan_id: i32,
    pub catatan: Option<String>,
}

#[derive(Clone)]
pub struct PermohonanService {
    store: Arc<dyn PermohonanStore>,
    notifications: NotificationService,
}

impl PermohonanService {
    pub fn new(store: Arc<dyn PermohonanStore>, notifications: NotificationService) -> Self {
        Self {
            store,
            notifications,
        }
    }

    /// Gets a request with its service category.
    ///
    /// # Returns
    /// The request if found, or `NotFound` error
    pub async fn get(&self, id: i32) -> AppResult<PermohonanWithLayanan> {
        self.store
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found("permohonan", "id", id))
    }

    /// Lists requests newest first.
    ///
    /// # Returns
    /// A tuple of (rows, total_count)
    pub async fn list(
        &self,
        status: Option<RequestStatus>,
        offset: i64,
        limit: i64,
    ) -> AppResult<(Vec<PermohonanWithLayanan>, i64)> {
        self.store.list_paginated(status, offset, limit).await
    }

    /// Public lookup by the registration code on the citizen's receipt.
    pub async fn check_status(&self, nomor_registrasi: &str) -> AppResult<PermohonanWithLayanan> {
        let code = nomor_registrasi.trim();
        if code.is_empty() {
            return Err(AppError::validation(
                "nomor_registrasi",
                "Registration number is required",
            ));
        }

        self.store
            .find_by_registration(code)
            .await?
            .ok_or_else(|| AppError::not_found("permohonan", "nomor_registrasi", code))
    }

    /// Stores a citizen's submission under a fresh registration number.
    ///
    /// An unknown `layanan_id` is rejected by the foreign key. A registration
    /// number collision is retried once with a new number.
    pub async fn create(&self, request: NewServiceRequest) -> AppResult<PermohonanWithLayanan> {
        let mut row = NewPermohonan {
            nomor_registrasi: registration_number(jiff::Timestamp::now()),
            nama: request.nama.trim().to_string(),
            no_hp: request.no_hp.trim().to_string(),
            layanan_id: Some(request.layanan_id),
            catatan: clean_note(request.catatan),
        };

        let created = match self.store.create(&row).await {
            Err(AppError::Validation { field, .. }) if field == "nomor_registrasi" => {
                tracing::warn!(
                    registration = %row.nomor_registrasi,
                    "Registration number collision, retrying"
                );
                row.nomor_registrasi = registration_number(jiff::Timestamp::now());
                self.store.create(&row).await?
            }
            other => other?,
        };

        tracing::info!(
            permohonan_id = created.0.id,
            registration = %created.0.nomor_registrasi,
            layanan_id = request.layanan_id,
            "Service request submitted"
        );

        Ok(created)
    }

    /// Changes a request's status and notifies the requester.
    ///
    /// The requester is only messaged when the status actually changes.
    /// A blank `catatan` leaves the stored note untouched.
    pub async fn update_status(
        &self,
        id: i32,
        status: RequestStatus,
        catatan: Option<String>,
    ) -> AppResult<StatusUpdateOutcome> {
        let changes = UpdatePermohonanStatus {
            status,
            catatan: clean_note(catatan),
        };
        let transition = self
            .store
            .transition_status(id, &changes)
            .await?
            .ok_or_else(|| AppError::not_found("permohonan", "id", id))?;

        tracing::info!(
            permohonan_id = id,
            registration = %transition.permohonan.nomor_registrasi,
            from = %transition.previous,
            to = %status,
            "Service request status updated"
        );

        let notification = if transition.changed() {
            let request =
                ServiceRequest::from_row(&transition.permohonan, transition.layanan.as_ref());
            self.notifications.notify_status_change(&request).await
        } else {
            tracing::debug!(permohonan_id = id, "Status unchanged, no notification sent");
            None
        };

        Ok(StatusUpdateOutcome {
            permohonan: transition.permohonan,
            layanan: transition.layanan,
            notification,
        })
    }

    /// Applies one status to many requests, notifying each in turn.
    pub async fn bulk_update_status(
        &self,
        ids: &[i32],
        status: RequestStatus,
    ) -> AppResult<BulkStatusUpdateOutcome> {
        let mut outcome = BulkStatusUpdateOutcome::default();

        for id in unique_ids(ids) {
            match self.update_status(id, status, None).await {
                Ok(updated) => outcome.updated.push(updated),
                Err(AppError::NotFound { .. }) => outcome.missing.push(id),
                Err(e) => return Err(e),
            }
        }

        tracing::info!(
            status = %status,
            updated = outcome.updated.len(),
            missing = outcome.missing.len(),
            "Bulk status update finished"
        );

        Ok(outcome)
    }

    /// Deletes many requests; unknown IDs are reported, not treated as errors.
    pub async fn bulk_delete(&self, ids: &[i32]) -> AppResult<BulkDeleteOutcome> {
        let requested = unique_ids(ids);
        let deleted = self.store.delete_many(&requested).await?;
        let missing = requested
            .iter()
            .copied()
            .filter(|id| !deleted.contains(id))
            .collect();
        let deleted = requested
            .into_iter()
            .filter(|id| deleted.contains(id))
            .collect();

        let outcome = BulkDeleteOutcome { deleted, missing };
        tracing::info!(
            deleted = outcome.deleted.len(),
            missing = outcome.missing.len(),
            "Bulk delete finished"
        );
        Ok(outcome)
    }
}

/// `REG-YYYYMMDD-XXXXXX`, the date in UTC and six random hex digits.
fn registration_number(now: jiff::Timestamp) -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!(
        "{}-{}-{}",
        REGISTRATION_PREFIX,
        now.strftime("%Y%m%d"),
        suffix[..6].to_uppercase()
    )
}

fn clean_note(note: Option<String>) -> Option<String> {
    note.map(|n| n.trim().to_string()).filter(|n| !n.is_empty())
}

/// IDs in first-seen order without duplicates.
fn unique_ids(ids: &[i32]) -> Vec<i32> {
    let mut seen = Vec::with_capacity(ids.len());
    for id in ids {
        if !seen.contains(id) {
            seen.push(*id);
        }
    }
    seen
}
