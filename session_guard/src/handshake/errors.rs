use thiserror::Error;

use crate::credentials::CredentialError;
use crate::session::SessionError;

#[derive(Debug, Error, Clone)]
pub enum HandshakeError {
    /// Credential verification failed. Deliberately silent about whether the
    /// email or the password was wrong.
    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Session error: {0}")]
    Session(#[from] SessionError),

    #[error("Credential store error: {0}")]
    Credential(#[from] CredentialError),
}
