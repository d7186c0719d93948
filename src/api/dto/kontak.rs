//! Contact message DTOs.

use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::Validate;

use super::pagination::PaginationParams;
use crate::error::{AppError, AppResult};
use crate::models::{ContactStatus, Kontak};
use crate::repositories::KontakFilter;
use crate::services::ContactSubmission;

/// Page size when `per_page` is not given
pub const DEFAULT_KONTAK_PAGE_SIZE: u32 = 15;

/// Value of `status` that disables the status filter
const ALL_STATUSES: &str = "all";

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({
    "nama": "Dewi Lestari",
    "email": "dewi@example.org",
    "subjek": "Jam pelayanan",
    "pesan": "Apakah kantor kelurahan buka hari Sabtu?"
}))]
pub struct CreateKontakRequest {
    #[validate(length(min = 1, max = 255, message = "Name must be 1-255 characters"))]
    pub nama: String,

    #[validate(
        email(message = "Must be a valid e-mail address"),
        length(max = 255, message = "E-mail must be at most 255 characters")
    )]
    pub email: String,

    #[validate(length(min = 1, max = 255, message = "Subject must be 1-255 characters"))]
    pub subjek: String,

    #[validate(length(min = 1, message = "Message is required"))]
    pub pesan: String,
}

impl From<CreateKontakRequest> for ContactSubmission {
    fn from(request: CreateKontakRequest) -> Self {
        Self {
            nama: request.nama,
            email: request.email,
            subjek: request.subjek,
            pesan: request.pesan,
        }
    }
}

/// Query parameters for the contact inbox.
#[derive(Debug, Deserialize, IntoParams, Validate)]
pub struct ListKontakParams {
    /// Page number (1-based)
    #[serde(default = "default_page")]
    #[validate(range(min = 1, message = "Page must be at least 1"))]
    #[param(minimum = 1, example = 1)]
    pub page: u32,

    /// Number of items per page (max 100)
    #[serde(default = "default_per_page")]
    #[validate(range(min = 1, max = 100, message = "Page size must be between 1 and 100"))]
    #[param(minimum = 1, maximum = 100, example = 15)]
    pub per_page: u32,

    /// `baru`, `dibaca`, `dibalas` or `all`
    #[param(example = "baru")]
    pub status: Option<String>,

    /// Matches name, e-mail or subject
    #[validate(length(max = 255, message = "Search must be at most 255 characters"))]
    pub search: Option<String>,
}

impl ListKontakParams {
    pub fn pagination(&self) -> PaginationParams {
        PaginationParams::new(self.page, self.per_page)
    }

    pub fn filter(&self) -> AppResult<KontakFilter> {
        let status = match self.status.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(s) if s.eq_ignore_ascii_case(ALL_STATUSES) => None,
            Some(s) => Some(s.parse::<ContactStatus>().map_err(|_| {
                AppError::validation("status", "Status must be baru, dibaca, dibalas or all")
            })?),
        };
        Ok(KontakFilter {
            status,
            search: self.search.clone(),
        })
    }
}

fn default_page() -> u32 {
    1
}

fn default_per_page() -> u32 {
    DEFAULT_KONTAK_PAGE_SIZE
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({ "status": "dibaca" }))]
pub struct UpdateKontakStatusRequest {
    pub status: ContactStatus,
}

#[derive(Debug, Deserialize, ToSchema, Validate)]
#[schema(example = json!({ "balasan": "Kantor buka hari Sabtu pukul 08.00-12.00." }))]
pub struct ReplyKontakRequest {
    #[validate(length(min = 1, max = 10000, message = "Reply must be 1-10000 characters"))]
    pub balasan: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct KontakResponse {
    pub id: i32,
    pub nama: String,
    pub email: String,
    pub subjek: String,
    pub pesan: String,
    pub status: ContactStatus,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

impl From<Kontak> for KontakResponse {
    fn from(kontak: Kontak) -> Self {
        Self {
            id: kontak.id,
            nama: kontak.nama,
            email: kontak.email,
            subjek: kontak.subjek,
            pesan: kontak.pesan,
            status: kontak.status,
            created_at: kontak.created_at.to_jiff().to_string(),
            updated_at: kontak.updated_at.to_jiff().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn params(value: serde_json::Value) -> ListKontakParams {
        serde_json::from_value(value).unwrap()
    }

    #[test]
    fn test_list_defaults_to_fifteen_per_page() {
        let params = params(serde_json::json!({}));
        assert_eq!(params.per_page, 15);
        assert_eq!(params.pagination().limit(), 15);
        assert_eq!(params.filter().unwrap(), KontakFilter::default());
    }

    #[test]
    fn test_status_all_disables_filter() {
        let filter = params(serde_json::json!({ "status": "all", "search": "dewi" }))
            .filter()
            .unwrap();
        assert!(filter.status.is_none());
        assert_eq!(filter.search.as_deref(), Some("dewi"));

        let filter = params(serde_json::json!({ "status": "dibalas" })).filter().unwrap();
        assert_eq!(filter.status, Some(ContactStatus::Replied));
    }

    #[test]
    fn test_unknown_status_filter_is_rejected() {
        let result = params(serde_json::json!({ "status": "arsip" })).filter();
        assert!(matches!(result, Err(AppError::Validation { ref field, .. }) if field == "status"));
    }

    #[test]
    fn test_create_request_rules() {
        let request = CreateKontakRequest {
            nama: "Dewi".to_string(),
            email: "bukan-email".to_string(),
            subjek: "x".repeat(256),
            pesan: String::new(),
        };
        let errors = request.validate().unwrap_err();
        let fields = errors.field_errors();
        assert!(fields.contains_key("email"));
        assert!(fields.contains_key("subjek"));
        assert!(fields.contains_key("pesan"));
        assert!(!fields.contains_key("nama"));
    }

    #[test]
    fn test_update_status_accepts_only_known_tags() {
        let request: UpdateKontakStatusRequest =
            serde_json::from_value(serde_json::json!({ "status": "dibaca" })).unwrap();
        assert_eq!(request.status, ContactStatus::Read);
        assert!(
            serde_json::from_value::<UpdateKontakStatusRequest>(
                serde_json::json!({ "status": "arsip" })
            )
            .is_err()
        );
    }
}
