mod config;
mod errors;
mod main;
mod types;

pub use config::{CSRF_COOKIE_NAME, CSRF_HEADER_NAME, SESSION_COOKIE_NAME, SESSION_TTL};
pub use errors::SessionError;
pub use types::{CsrfToken, SessionId, StoredSession, User};

pub use main::{authenticate_request, is_mutating_method};

pub(crate) use main::{
    clear_cookie, create_session, get_session_id_from_headers, invalidate_session, lookup_session,
    rotate_csrf_token, set_cookie,
};
