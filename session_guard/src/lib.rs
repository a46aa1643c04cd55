//! session_guard - Cookie-based session authentication with double-submit
//! CSRF protection.
//!
//! The crate implements the stateful half of a browser login handshake:
//! opaque server-side sessions delivered in an `HttpOnly` cookie, paired with
//! a CSRF token the client must read from a script-visible cookie and echo in
//! a request header on every state-changing request.

mod credentials;
mod handshake;
mod session;
mod storage;
mod utils;

#[cfg(test)]
mod test_utils;

pub use credentials::{
    CredentialError, CredentialStore, InMemoryCredentialStore, Principal, install_credential_store,
};

pub use handshake::{
    HandshakeError, current_principal, login, prepare_csrf_response, prepare_logout_response,
};

pub use session::{
    CSRF_COOKIE_NAME, CSRF_HEADER_NAME, CsrfToken, SESSION_COOKIE_NAME, SESSION_TTL, SessionError,
    SessionId, StoredSession, User, authenticate_request, is_mutating_method,
};

pub use utils::{UtilError, gen_token};

/// Initialize the session layer. Touches the lazily-constructed stores so a
/// misconfiguration fails at startup instead of on the first request.
pub async fn init() -> Result<(), Box<dyn std::error::Error>> {
    storage::init().await?;
    Ok(())
}
