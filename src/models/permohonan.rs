//! Service request (permohonan) models.
//!
//! `Permohonan` mirrors the database row. `ServiceRequest` is the read-only
//! view handed to the notification pathway, built from a row and the name of
//! the service category it references.

use std::fmt;
use std::io::Write;
use std::str::FromStr;

use diesel::AsExpression;
use diesel::FromSqlRow;
use diesel::deserialize::{self, FromSql};
use diesel::pg::Pg;
use diesel::prelude::*;
use diesel::serialize::{self, Output, ToSql};
use diesel::sql_types::Text;
use jiff_diesel::DateTime;
use serde::{Deserialize, Serialize};

use super::Layanan;

/// Placeholder used when a request references no (or a deleted) service category.
pub const MISSING_SERVICE_NAME: &str = "-";

// ============================================================================
// Enums
// ============================================================================

/// Processing status of a service request.
///
/// Stored and serialized with the portal's Indonesian tags.
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    utoipa::ToSchema,
    AsExpression,
    FromSqlRow,
)]
#[diesel(sql_type = Text)]
pub enum RequestStatus {
    #[serde(rename = "baru")]
    New,
    #[serde(rename = "proses")]
    InProgress,
    #[serde(rename = "selesai")]
    Done,
    #[serde(rename = "ditolak")]
    Rejected,
}

impl RequestStatus {
    pub const ALL: [RequestStatus; 4] = [
        RequestStatus::New,
        RequestStatus::InProgress,
        RequestStatus::Done,
        RequestStatus::Rejected,
    ];

    /// Returns the storage/wire tag.
    pub fn as_str(&self) -> &'static str {
        match self {
            RequestStatus::New => "baru",
            RequestStatus::InProgress => "proses",
            RequestStatus::Done => "selesai",
            RequestStatus::Rejected => "ditolak",
        }
    }

    /// Upper-cased tag as shown to citizens.
    pub fn label(&self) -> String {
        self.as_str().to_uppercase()
    }
}

impl fmt::Display for RequestStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized request status: {0}")]
pub struct ParseStatusError(pub String);

impl FromStr for RequestStatus {
    type Err = ParseStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baru" => Ok(RequestStatus::New),
            "proses" => Ok(RequestStatus::InProgress),
            "selesai" => Ok(RequestStatus::Done),
            "ditolak" => Ok(RequestStatus::Rejected),
            _ => Err(ParseStatusError(s.to_string())),
        }
    }
}

impl diesel::query_builder::QueryId for RequestStatus {
    type QueryId = RequestStatus;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for RequestStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for RequestStatus {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse::<RequestStatus>().map_err(|e| e.to_string().into())
    }
}

// ============================================================================
// Rows
// ============================================================================

/// A service request row.
#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::permohonan)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Permohonan {
    pub id: i32,
    pub nomor_registrasi: String,
    pub nama: String,
    pub no_hp: String,
    pub layanan_id: Option<i32>,
    pub catatan: Option<String>,
    pub status: RequestStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

/// Row joined with its (optional) service category.
pub type PermohonanWithLayanan = (Permohonan, Option<Layanan>);

/// A request submitted by a citizen; the status starts as `baru`.
#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::permohonan)]
pub struct NewPermohonan {
    pub nomor_registrasi: String,
    pub nama: String,
    pub no_hp: String,
    pub layanan_id: Option<i32>,
    pub catatan: Option<String>,
}

/// A committed status change together with the status it replaced.
#[derive(Debug, Clone)]
pub struct StatusTransition {
    pub previous: RequestStatus,
    pub permohonan: Permohonan,
    pub layanan: Option<Layanan>,
}

impl StatusTransition {
    pub fn changed(&self) -> bool {
        self.previous != self.permohonan.status
    }
}

/// Status change applied by staff. A `None` note leaves the stored note untouched.
#[derive(Debug, AsChangeset, Clone)]
#[diesel(table_name = crate::schema::permohonan)]
pub struct UpdatePermohonanStatus {
    pub status: RequestStatus,
    pub catatan: Option<String>,
}

// ============================================================================
// Notification view
// ============================================================================

/// What the notification pathway needs to know about a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ServiceRequest {
    pub id: i32,
    pub requester_name: String,
    pub contact_address: String,
    pub registration_code: String,
    pub note: Option<String>,
    pub service_name: String,
    pub status: RequestStatus,
}

impl ServiceRequest {
    pub fn from_row(row: &Permohonan, layanan: Option<&Layanan>) -> Self {
        Self {
            id: row.id,
            requester_name: row.nama.clone(),
            contact_address: row.no_hp.clone(),
            registration_code: row.nomor_registrasi.clone(),
            note: row.catatan.clone(),
            service_name: layanan
                .map(|l| l.nama.clone())
                .unwrap_or_else(|| MISSING_SERVICE_NAME.to_string()),
            status: row.status,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_tags_roundtrip_through_from_str() {
        for status in RequestStatus::ALL {
            assert_eq!(status.as_str().parse::<RequestStatus>(), Ok(status));
        }
    }

    #[test]
    fn test_status_parse_is_case_insensitive() {
        assert_eq!(" Selesai ".parse::<RequestStatus>(), Ok(RequestStatus::Done));
        assert!("completed".parse::<RequestStatus>().is_err());
    }

    #[test]
    fn test_status_serde_uses_indonesian_tags() {
        let json = serde_json::to_string(&RequestStatus::InProgress).unwrap();
        assert_eq!(json, "\"proses\"");
        let status: RequestStatus = serde_json::from_str("\"ditolak\"").unwrap();
        assert_eq!(status, RequestStatus::Rejected);
    }

    #[test]
    fn test_status_label_is_upper_case() {
        assert_eq!(RequestStatus::Rejected.label(), "DITOLAK");
    }
}
