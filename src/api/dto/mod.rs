//! Data Transfer Objects for API requests and responses.
//!
//! DTOs are organized by domain:
//! - `permohonan` - Service request DTOs
//! - `layanan` - Service category DTOs
//! - `kontak` - Contact message DTOs
//! - `notification` - WhatsApp delivery DTOs
//! - `health` - Health check DTOs
//! - `error` - Common error response DTOs
//! - `pagination` - Pagination-related DTOs

mod error;
mod health;
mod kontak;
mod layanan;
mod notification;
mod pagination;
mod permohonan;

pub use error::ErrorResponse;
pub use health::{ComponentHealth, HealthResponse, HealthStatus};
pub use kontak::{
    CreateKontakRequest, KontakResponse, ListKontakParams, ReplyKontakRequest,
    UpdateKontakStatusRequest,
};
pub use layanan::LayananResponse;
pub use notification::{DeliveryResultResponse, NotificationSummary, SendTestMessageRequest};
pub use pagination::{PagedResponse, PaginationMeta, PaginationParams};
pub use permohonan::{
    BulkDeleteRequest, BulkDeleteResponse, BulkStatusUpdateResponse, BulkUpdateItem,
    BulkUpdateStatusRequest, CreatePermohonanRequest, ListPermohonanParams, PermohonanResponse,
    StatusCheckRequest, StatusCheckResponse, StatusUpdateResponse, UpdateStatusRequest,
};
