use http::StatusCode;
use session_guard::{CredentialError, HandshakeError, SessionError};

/// Helper trait for converting errors to a standard response error format
pub trait IntoResponseError<T> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)>;
}

pub(crate) fn session_error_response(err: &SessionError) -> (StatusCode, String) {
    match err {
        SessionError::Unauthenticated
        | SessionError::NotFound
        | SessionError::SessionExpired => (StatusCode::UNAUTHORIZED, "Unauthorized".to_string()),
        // Missing and mismatched tokens must be indistinguishable to the
        // client; a different message would help an attacker probing tokens.
        SessionError::CsrfTokenMissing | SessionError::CsrfTokenMismatch => (
            StatusCode::FORBIDDEN,
            "CSRF token validation failed".to_string(),
        ),
        SessionError::Cookie(_) | SessionError::Header(_) => {
            (StatusCode::BAD_REQUEST, "Malformed request".to_string())
        }
        SessionError::Storage(_) => (
            StatusCode::SERVICE_UNAVAILABLE,
            "Service temporarily unavailable".to_string(),
        ),
        SessionError::Utils(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Internal server error".to_string(),
        ),
    }
}

impl<T> IntoResponseError<T> for Result<T, SessionError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::debug!("Session error: {}", e);
            session_error_response(&e)
        })
    }
}

impl<T> IntoResponseError<T> for Result<T, HandshakeError> {
    fn into_response_error(self) -> Result<T, (StatusCode, String)> {
        self.map_err(|e| {
            tracing::debug!("Handshake error: {}", e);
            match e {
                HandshakeError::InvalidCredentials => (
                    StatusCode::UNAUTHORIZED,
                    "Invalid credentials".to_string(),
                ),
                HandshakeError::Session(session_err) => session_error_response(&session_err),
                HandshakeError::Credential(CredentialError::Store(_)) => (
                    StatusCode::SERVICE_UNAVAILABLE,
                    "Service temporarily unavailable".to_string(),
                ),
                HandshakeError::Credential(_) => (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                ),
            }
        })
    }
}
