use diesel::prelude::*;
use jiff_diesel::DateTime;

/// Service category a citizen can apply for (KTP, KK, SKTM, ...).
#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::layanan)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Layanan {
    pub id: i32,
    pub nama: String,
    pub deskripsi: Option<String>,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}
