use rusqlite::ErrorCode;
use thiserror::Error;

/// Storage failures as seen by callers of the repositories.
///
/// SQLite's "no rows" and "interrupted" conditions are translated here so
/// nothing above this crate needs to match on `rusqlite::Error`.
#[derive(Debug, Error)]
pub enum DbError {
    #[error("row not found")]
    NotFound,

    #[error("unique constraint violated")]
    Conflict,

    #[error("storage call cancelled")]
    Cancelled,

    #[error("database lock poisoned")]
    Poisoned,

    #[error(transparent)]
    Sqlite(rusqlite::Error),
}

impl From<rusqlite::Error> for DbError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => Self::NotFound,
            rusqlite::Error::SqliteFailure(ref e, _) if e.code == ErrorCode::OperationInterrupted => {
                Self::Cancelled
            }
            rusqlite::Error::SqliteFailure(ref e, _)
                if e.code == ErrorCode::ConstraintViolation
                    && e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE =>
            {
                Self::Conflict
            }
            other => Self::Sqlite(other),
        }
    }
}
