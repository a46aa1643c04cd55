//! Axum integration for `session-guard`.
//!
//! Provides the HTTP surface of the login handshake (token issuance, login,
//! logout, `me`), an `AuthUser` extractor for protected handlers, and the
//! origin-policy middleware that is the single writer of CORS response
//! headers.

mod config;
mod error;
mod handlers;
mod origin;
mod router;
mod session;

pub use config::{SG_ALLOWED_ORIGINS, SG_ROUTE_PREFIX};
pub use error::IntoResponseError;
pub use origin::{OriginDecision, OriginPolicy, enforce_origin_policy};
pub use router::{session_guard_router, session_guard_router_no_trace};
pub use session::AuthUser;

// Re-export the pieces an application needs for wiring
pub use session_guard::{
    CredentialStore, InMemoryCredentialStore, Principal, init, install_credential_store,
};
