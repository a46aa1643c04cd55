use thiserror::Error;

use crate::storage::StorageError;
use crate::utils::UtilError;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum SessionError {
    /// No usable session accompanied the request.
    #[error("Unauthenticated")]
    Unauthenticated,

    /// The session id does not resolve to a live record.
    #[error("Session not found")]
    NotFound,

    /// The record exists but its absolute expiry has passed.
    #[error("Session expired")]
    SessionExpired,

    #[error("CSRF token missing")]
    CsrfTokenMissing,

    #[error("CSRF token mismatch")]
    CsrfTokenMismatch,

    #[error("Storage error: {0}")]
    Storage(String),

    #[error("Cookie error: {0}")]
    Cookie(String),

    #[error("Header error: {0}")]
    Header(String),

    #[error("Utils error: {0}")]
    Utils(#[from] UtilError),
}

impl From<StorageError> for SessionError {
    fn from(err: StorageError) -> Self {
        SessionError::Storage(err.to_string())
    }
}
