//! Service request DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::notification::NotificationSummary;
use super::pagination::{DEFAULT_PAGE_SIZE, PaginationParams};
use crate::models::{Layanan, MISSING_SERVICE_NAME, Permohonan, RequestStatus};
use crate::services::{
    BulkDeleteOutcome, BulkStatusUpdateOutcome, NewServiceRequest, StatusUpdateOutcome,
};

// ============================================================================
// Requests
// ============================================================================

/// Query parameters for listing requests.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct ListPermohonanParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: u32,

    /// Number of items per page (max 100)
    #[serde(default = "default_page_size")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 20)]
    pub page_size: u32,

    /// Only requests with this status
    #[param(inline)]
    pub status: Option<RequestStatus>,
}

impl ListPermohonanParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.page_size)
    }
}

fn default_page() -> u32 {
    1
}

fn default_page_size() -> u32 {
    DEFAULT_PAGE_SIZE
}

/// Public submission of a new service request
#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "nama": "Budi Santoso",
    "no_hp": "081234567890",
    "layanan_id": 1,
    "catatan": "Pindah domisili"
}))]
pub struct CreatePermohonanRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub nama: String,

    /// WhatsApp number for status updates
    #[validate(length(min = 6, max = 32, message = "Phone number must be 6-32 characters"))]
    pub no_hp: String,

    #[validate(range(min = 1, message = "Service category is required"))]
    pub layanan_id: i32,

    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub catatan: Option<String>,
}

impl From<CreatePermohonanRequest> for NewServiceRequest {
    fn from(request: CreatePermohonanRequest) -> Self {
        Self {
            nama: request.nama,
            no_hp: request.no_hp,
            layanan_id: request.layanan_id,
            catatan: request.catatan,
        }
    }
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({ "status": "proses", "catatan": "Berkas sedang diverifikasi" }))]
pub struct UpdateStatusRequest {
    pub status: RequestStatus,

    /// Optional staff note shown to the requester; blank keeps the current note
    #[validate(length(max = 1000, message = "Note must be at most 1000 characters"))]
    pub catatan: Option<String>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({ "ids": [12, 13, 14], "status": "selesai" }))]
pub struct BulkUpdateStatusRequest {
    #[validate(length(min = 1, max = 500, message = "Provide between 1 and 500 ids"))]
    pub ids: Vec<i32>,

    pub status: RequestStatus,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({ "ids": [21, 22] }))]
pub struct BulkDeleteRequest {
    #[validate(length(min = 1, max = 500, message = "Provide between 1 and 500 ids"))]
    pub ids: Vec<i32>,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({ "nomor_registrasi": "REG-001" }))]
pub struct StatusCheckRequest {
    #[validate(length(min = 1, max = 64, message = "Registration number must be 1-64 characters"))]
    pub nomor_registrasi: String,
}

// ============================================================================
// Responses
// ============================================================================

/// Service request as seen by staff
#[derive(Debug, Serialize, ToSchema)]
pub struct PermohonanResponse {
    pub id: i32,
    #[schema(example = "REG-001")]
    pub nomor_registrasi: String,
    pub nama: String,
    pub no_hp: String,
    pub layanan_id: Option<i32>,
    /// Service name, `-` when the category was removed
    #[schema(example = "KTP")]
    pub layanan: String,
    pub catatan: Option<String>,
    pub status: RequestStatus,
    #[schema(example = "PROSES")]
    pub status_label: String,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

impl PermohonanResponse {
    pub fn new(row: Permohonan, layanan: Option<&Layanan>) -> Self {
        Self {
            id: row.id,
            nomor_registrasi: row.nomor_registrasi,
            nama: row.nama,
            no_hp: row.no_hp,
            layanan_id: row.layanan_id,
            layanan: service_name(layanan),
            catatan: row.catatan,
            status: row.status,
            status_label: row.status.label(),
            created_at: row.created_at.to_jiff().to_string(),
            updated_at: row.updated_at.to_jiff().to_string(),
        }
    }
}

impl From<(Permohonan, Option<Layanan>)> for PermohonanResponse {
    fn from((row, layanan): (Permohonan, Option<Layanan>)) -> Self {
        Self::new(row, layanan.as_ref())
    }
}

/// Public status summary; the contact number is never exposed
#[derive(Debug, Serialize, ToSchema)]
pub struct StatusCheckResponse {
    pub nomor_registrasi: String,
    pub nama: String,
    pub layanan: String,
    pub status: RequestStatus,
    pub status_label: String,
    pub catatan: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

impl From<(Permohonan, Option<Layanan>)> for StatusCheckResponse {
    fn from((row, layanan): (Permohonan, Option<Layanan>)) -> Self {
        Self {
            nomor_registrasi: row.nomor_registrasi,
            nama: row.nama,
            layanan: service_name(layanan.as_ref()),
            status: row.status,
            status_label: row.status.label(),
            catatan: row.catatan,
            updated_at: row.updated_at.to_jiff().to_string(),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct StatusUpdateResponse {
    pub data: PermohonanResponse,
    pub notification: NotificationSummary,
}

impl From<StatusUpdateOutcome> for StatusUpdateResponse {
    fn from(outcome: StatusUpdateOutcome) -> Self {
        Self {
            notification: NotificationSummary::from(outcome.notification.as_ref()),
            data: PermohonanResponse::new(outcome.permohonan, outcome.layanan.as_ref()),
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkUpdateItem {
    pub id: i32,
    pub status: RequestStatus,
    pub notification: NotificationSummary,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkStatusUpdateResponse {
    pub updated_count: usize,
    /// Requested IDs that do not exist
    pub missing_ids: Vec<i32>,
    pub results: Vec<BulkUpdateItem>,
}

impl From<BulkStatusUpdateOutcome> for BulkStatusUpdateResponse {
    fn from(outcome: BulkStatusUpdateOutcome) -> Self {
        let results: Vec<BulkUpdateItem> = outcome
            .updated
            .into_iter()
            .map(|item| BulkUpdateItem {
                id: item.permohonan.id,
                status: item.permohonan.status,
                notification: NotificationSummary::from(item.notification.as_ref()),
            })
            .collect();

        Self {
            updated_count: results.len(),
            missing_ids: outcome.missing,
            results,
        }
    }
}

#[derive(Debug, Serialize, ToSchema)]
pub struct BulkDeleteResponse {
    pub deleted_count: usize,
    pub deleted_ids: Vec<i32>,
    /// Requested IDs that do not exist
    pub missing_ids: Vec<i32>,
}

impl From<BulkDeleteOutcome> for BulkDeleteResponse {
    fn from(outcome: BulkDeleteOutcome) -> Self {
        Self {
            deleted_count: outcome.deleted.len(),
            deleted_ids: outcome.deleted,
            missing_ids: outcome.missing,
        }
    }
}

fn service_name(layanan: Option<&Layanan>) -> String {
    layanan
        .map(|l| l.nama.clone())
        .unwrap_or_else(|| MISSING_SERVICE_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_list_params_defaults() {
        let params: ListPermohonanParams = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(params.page, 1);
        assert_eq!(params.page_size, DEFAULT_PAGE_SIZE);
        assert!(params.status.is_none());
        assert!(params.validate().is_ok());
    }

    #[test]
    fn test_update_request_accepts_status_tags() {
        let request: UpdateStatusRequest =
            serde_json::from_value(serde_json::json!({ "status": "selesai" })).unwrap();
        assert_eq!(request.status, RequestStatus::Done);
        assert!(request.catatan.is_none());

        assert!(
            serde_json::from_value::<UpdateStatusRequest>(serde_json::json!({ "status": "done" }))
                .is_err()
        );
    }

    #[test]
    fn test_bulk_request_requires_ids() {
        let request = BulkUpdateStatusRequest {
            ids: vec![],
            status: RequestStatus::InProgress,
        };
        assert!(request.validate().is_err());
    }

    #[test]
    fn test_create_request_rules() {
        let request: CreatePermohonanRequest = serde_json::from_value(serde_json::json!({
            "nama": "Budi",
            "no_hp": "081234567890",
            "layanan_id": 1
        }))
        .unwrap();
        assert!(request.validate().is_ok());
        assert!(request.catatan.is_none());

        let invalid = CreatePermohonanRequest {
            nama: String::new(),
            no_hp: "0812".to_string(),
            layanan_id: 0,
            catatan: None,
        };
        let errors = invalid.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("nama"));
        assert!(fields.contains_key("no_hp"));
        assert!(fields.contains_key("layanan_id"));
    }

    #[test]
    fn test_bulk_delete_response_counts() {
        let response = BulkDeleteResponse::from(BulkDeleteOutcome {
            deleted: vec![4, 2],
            missing: vec![9],
        });
        assert_eq!(response.deleted_count, 2);
        assert_eq!(response.missing_ids, vec![9]);
    }

    #[test]
    fn test_status_check_requires_code() {
        let request = StatusCheckRequest {
            nomor_registrasi: String::new(),
        };
        assert!(request.validate().is_err());
    }
}
