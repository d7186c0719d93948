//! Service category DTOs.

use serde::Serialize;
use utoipa::ToSchema;

use crate::models::Layanan;

#[derive(Debug, Serialize, ToSchema)]
pub struct LayananResponse {
    pub id: i32,
    #[schema(example = "Surat Keterangan Domisili")]
    pub nama: String,
    pub deskripsi: Option<String>,
    #[schema(value_type = String, format = DateTime)]
    pub created_at: String,
    #[schema(value_type = String, format = DateTime)]
    pub updated_at: String,
}

impl From<Layanan> for LayananResponse {
    fn from(layanan: Layanan) -> Self {
        Self {
            id: layanan.id,
            nama: layanan.nama,
            deskripsi: layanan.deskripsi,
            created_at: layanan.created_at.to_jiff().to_string(),
            updated_at: layanan.updated_at.to_jiff().to_string(),
        }
    }
}
