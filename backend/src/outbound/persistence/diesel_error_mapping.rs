//! Classification of Diesel and pool failures shared by repositories.
//!
//! Each repository turns a [`DbFailure`] into its own port error; the raw
//! database message is logged at debug level and never forwarded.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse failure category for a database operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DbFailure {
    /// The connection dropped or could not be obtained.
    Connection(String),
    /// A foreign key pointed at a row that does not exist.
    MissingReference(String),
    /// A unique constraint rejected the write; carries the constraint name.
    UniqueViolation(String),
    /// Anything else.
    Query(String),
}

pub(crate) fn classify_pool_error(error: PoolError) -> DbFailure {
    DbFailure::Connection(error.into_message())
}

pub(crate) fn classify_diesel_error(error: DieselError) -> DbFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(error = %error, "diesel operation failed"),
    }

    match error {
        DieselError::NotFound => DbFailure::Query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => DbFailure::Query("database query error".to_owned()),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DbFailure::Connection("database connection error".to_owned())
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DbFailure::MissingReference(
                info.constraint_name()
                    .unwrap_or("foreign key")
                    .to_owned(),
            )
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DbFailure::UniqueViolation(info.constraint_name().unwrap_or("unique").to_owned())
        }
        _ => DbFailure::Query("database error".to_owned()),
    }
}

/// Escape `LIKE` metacharacters so user text matches literally.
pub(crate) fn like_pattern(needle: &str) -> String {
    let mut escaped = String::with_capacity(needle.len() + 2);
    escaped.push('%');
    for ch in needle.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped.push('%');
    escaped
}
