//! Error type shared by both backends.

use thiserror::Error;

/// Errors surfaced by [`Database`](crate::Database) operations.
///
/// The in-memory fallback never produces `Sqlx` or `UnknownField`; it only fails when the
/// caller hands the builder values that cannot be represented as records.
#[derive(Debug, Error)]
pub enum Error {
    /// The SQL driver or pool failed.
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    /// A caller value could not be converted to or from a record.
    #[error("serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Insert or update values were neither an object nor a list of objects.
    #[error("expected an object or a list of objects, got {0}")]
    InvalidValues(String),

    /// A record key matched no column of the target table.
    #[error("unknown field `{field}` for table `{table}`")]
    UnknownField { table: &'static str, field: String },
}
