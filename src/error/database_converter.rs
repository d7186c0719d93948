use crate::error::AppError;
use diesel::result::{DatabaseErrorInformation, DatabaseErrorKind, Error as DieselError};

/// Utility for converting database errors to structured AppError variants.
///
/// Constraint violations become field-level validation errors named after the
/// offending column; everything else is an opaque `Database` error.
pub struct DatabaseErrorConverter;

const CONSTRAINT_SUFFIXES: [&str; 4] = ["_key", "_fkey", "_check", "_not_null"];

impl DatabaseErrorConverter {
    /// Converts a Diesel error to an appropriate AppError variant.
    ///
    /// # Arguments
    /// * `error` - The Diesel error to convert
    /// * `operation` - Description of the database operation that failed
    pub fn convert_diesel_error(error: DieselError, operation: &str) -> AppError {
        match error {
            DieselError::DatabaseError(kind, info) => {
                Self::convert_database_error(kind, info.as_ref(), operation)
            }
            DieselError::NotFound => AppError::not_found("resource", "id", "unknown"),
            other => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::from(other),
            },
        }
    }

    fn convert_database_error(
        kind: DatabaseErrorKind,
        info: &(dyn DatabaseErrorInformation + Send + Sync),
        operation: &str,
    ) -> AppError {
        let field = Self::offending_field(info);
        let reason = match kind {
            DatabaseErrorKind::UniqueViolation => "Value already exists",
            DatabaseErrorKind::NotNullViolation => "Field is required",
            DatabaseErrorKind::ForeignKeyViolation => "Referenced record does not exist",
            DatabaseErrorKind::CheckViolation => "Value is not allowed",
            _ => {
                return AppError::Database {
                    operation: operation.to_string(),
                    source: anyhow::Error::msg(format!("Database error: {}", info.message())),
                };
            }
        };

        match field {
            Some(field) => AppError::validation(&field, reason),
            None => AppError::Database {
                operation: operation.to_string(),
                source: anyhow::Error::msg(format!("{}: {}", reason, info.message())),
            },
        }
    }

    /// Column named by the driver, or derived from a `<table>_<column>_<suffix>` constraint.
    fn offending_field(info: &(dyn DatabaseErrorInformation + Send + Sync)) -> Option<String> {
        if let Some(column) = info.column_name() {
            return Some(column.to_string());
        }

        let constraint = info.constraint_name()?;
        let stem = CONSTRAINT_SUFFIXES
            .iter()
            .find_map(|suffix| constraint.strip_suffix(suffix))?;

        let column = match info.table_name() {
            Some(table) => stem.strip_prefix(table)?.strip_prefix('_')?,
            None => stem.split_once('_').map(|(_, rest)| rest)?,
        };

        (!column.is_empty()).then(|| column.to_string())
    }
}
