use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

pub const HEALTH_TAG: &str = "Health";
pub const STATUS_TAG: &str = "Status";
pub const PERMOHONAN_TAG: &str = "Permohonan";
pub const NOTIFICATION_TAG: &str = "Notifications";
pub const LAYANAN_TAG: &str = "Layanan";
pub const KONTAK_TAG: &str = "Kontak";

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Kelurahan",
        description = "Service-request backend for the kelurahan portal",
    ),
    modifiers(&SecurityAddon),
    components(
        schemas(
            crate::api::dto::ErrorResponse,
            crate::models::RequestStatus,
            crate::models::ContactStatus,
        )
    ),
    tags(
        (name = HEALTH_TAG, description = "Health check endpoints"),
        (name = STATUS_TAG, description = "Public status lookup for citizens"),
        (name = PERMOHONAN_TAG, description = "Service request submission and staff handling"),
        (name = LAYANAN_TAG, description = "Service categories citizens can apply for"),
        (name = KONTAK_TAG, description = "Contact form messages and e-mail replies"),
        (name = NOTIFICATION_TAG, description = "WhatsApp notification endpoints"),
    )
)]
pub struct ApiDoc;

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearerAuth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .bearer_format("JWT")
                        .description(Some("Staff token signed with the configured secret"))
                        .build(),
                ),
            )
        }
    }
}
