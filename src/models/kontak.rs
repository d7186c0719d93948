//! Contact form messages sent to the kelurahan office.

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

/// Handling state of a contact message.
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
pub enum ContactStatus {
    #[serde(rename = "baru")]
    New,
    #[serde(rename = "dibaca")]
    Read,
    #[serde(rename = "dibalas")]
    Replied,
}

impl ContactStatus {
    pub const ALL: [ContactStatus; 3] = [
        ContactStatus::New,
        ContactStatus::Read,
        ContactStatus::Replied,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            ContactStatus::New => "baru",
            ContactStatus::Read => "dibaca",
            ContactStatus::Replied => "dibalas",
        }
    }
}

impl fmt::Display for ContactStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognized contact status: {0}")]
pub struct ParseContactStatusError(pub String);

impl FromStr for ContactStatus {
    type Err = ParseContactStatusError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "baru" => Ok(ContactStatus::New),
            "dibaca" => Ok(ContactStatus::Read),
            "dibalas" => Ok(ContactStatus::Replied),
            _ => Err(ParseContactStatusError(s.to_string())),
        }
    }
}

impl diesel::query_builder::QueryId for ContactStatus {
    type QueryId = ContactStatus;
    const HAS_STATIC_QUERY_ID: bool = false;
}

impl ToSql<Text, Pg> for ContactStatus {
    fn to_sql<'b>(&'b self, out: &mut Output<'b, '_, Pg>) -> serialize::Result {
        out.write_all(self.as_str().as_bytes())?;
        Ok(serialize::IsNull::No)
    }
}

impl FromSql<Text, Pg> for ContactStatus {
    fn from_sql(
        bytes: <Pg as diesel::backend::Backend>::RawValue<'_>,
    ) -> deserialize::Result<Self> {
        let s = <String as FromSql<Text, Pg>>::from_sql(bytes)?;
        s.parse::<ContactStatus>().map_err(|e| e.to_string().into())
    }
}

#[derive(Debug, Queryable, Selectable, Identifiable, Clone)]
#[diesel(table_name = crate::schema::kontak)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct Kontak {
    pub id: i32,
    pub nama: String,
    pub email: String,
    pub subjek: String,
    pub pesan: String,
    pub status: ContactStatus,
    pub created_at: DateTime,
    pub updated_at: DateTime,
}

#[derive(Debug, Insertable, Clone)]
#[diesel(table_name = crate::schema::kontak)]
pub struct NewKontak {
    pub nama: String,
    pub email: String,
    pub subjek: String,
    pub pesan: String,
    pub status: ContactStatus,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_contact_status_tags() {
        for status in ContactStatus::ALL {
            assert_eq!(status.as_str().parse::<ContactStatus>(), Ok(status));
        }
        assert_eq!(
            serde_json::to_string(&ContactStatus::Replied).unwrap(),
            "\"dibalas\""
        );
        assert!("all".parse::<ContactStatus>().is_err());
    }
}
