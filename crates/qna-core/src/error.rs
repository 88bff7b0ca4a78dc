use qna_db::DbError;
use thiserror::Error;

/// Usecase outcomes the transport has to tell apart.
///
/// Existence is always checked before ownership, so a caller asking to
/// delete something that is not there sees a not-found variant, never
/// `Forbidden`.
#[derive(Debug, Error)]
pub enum Error {
    #[error("question not found")]
    QuestionNotFound,

    #[error("answer not found")]
    AnswerNotFound,

    /// The question an answer was posted to does not exist or was deleted.
    #[error("requested question not found")]
    ParentQuestionNotFound,

    #[error("access denied")]
    Forbidden,

    /// Unknown username and wrong password are deliberately the same error.
    #[error("username or password incorrect")]
    InvalidCredentials,

    #[error("password hashing failed")]
    Hashing(#[source] argon2::password_hash::Error),

    #[error("{context}: {source}")]
    Internal {
        context: &'static str,
        #[source]
        source: DbError,
    },
}

impl Error {
    pub fn internal(context: &'static str, source: DbError) -> Self {
        Self::Internal { context, source }
    }
}

/// Failures raised by the storage plumbing itself (locking, begin, commit).
impl From<DbError> for Error {
    fn from(source: DbError) -> Self {
        Self::internal("storage", source)
    }
}

#[cfg(test)]
mod tests {
    use std::error::Error as _;

    use super::*;

    #[test]
    fn hashing_failure_keeps_its_cause() {
        let err = Error::Hashing(argon2::password_hash::Error::Password);
        assert_eq!(err.to_string(), "password hashing failed");
        assert!(err.source().is_some());
    }

    #[test]
    fn storage_failure_keeps_its_cause() {
        let err = Error::from(DbError::Poisoned);
        assert!(matches!(err, Error::Internal { context: "storage", .. }));
        assert_eq!(err.source().map(|s| s.to_string()).as_deref(), Some("database lock poisoned"));
    }
}
