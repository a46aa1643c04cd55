use http::Method;
use http::header::HeaderMap;

use crate::credentials::credential_store;
use crate::session::{
    CSRF_COOKIE_NAME, SESSION_COOKIE_NAME, SESSION_TTL, SessionError, User, authenticate_request,
    clear_cookie, create_session, get_session_id_from_headers, invalidate_session, lookup_session,
    rotate_csrf_token, set_cookie,
};

use super::errors::HandshakeError;

fn set_auth_cookies(
    response: &mut HeaderMap,
    session_id: &str,
    csrf_token: &str,
) -> Result<(), SessionError> {
    let max_age = *SESSION_TTL as i64;
    set_cookie(response, SESSION_COOKIE_NAME.as_str(), session_id, max_age, true)?;
    set_cookie(response, CSRF_COOKIE_NAME.as_str(), csrf_token, max_age, false)?;
    Ok(())
}

/// Issue the CSRF cookie a client must read before its first mutation.
///
/// Idempotent: a request that already carries a live session gets that
/// session's bound token re-emitted unchanged (tokens rotate on privilege
/// change, never on read). A request without one gets an anonymous session
/// so the login mutation itself can be guarded like any other; no
/// authenticated session exists until credentials are verified.
pub async fn prepare_csrf_response(headers: &HeaderMap) -> Result<HeaderMap, HandshakeError> {
    let mut response = HeaderMap::new();

    if let Some(session_id) = resolve_session_id(headers) {
        match lookup_session(&session_id).await {
            Ok(session) => {
                set_cookie(
                    &mut response,
                    CSRF_COOKIE_NAME.as_str(),
                    &session.csrf_token,
                    *SESSION_TTL as i64,
                    false,
                )
                .map_err(HandshakeError::Session)?;
                return Ok(response);
            }
            Err(SessionError::NotFound | SessionError::SessionExpired) => {}
            Err(e) => return Err(e.into()),
        }
    }

    let (session_id, session) = create_session(None).await?;
    set_auth_cookies(&mut response, session_id.as_str(), &session.csrf_token)?;
    Ok(response)
}

/// Authenticate credentials and establish a session.
///
/// Login is a state-changing request and is CSRF-guarded exactly like any
/// other mutation, against the session presented with the request. On success
/// the presented session is discarded and a fresh one is created with a
/// rotated CSRF token, so neither the pre-login session id nor the pre-login
/// token survives authentication.
pub async fn login(
    headers: &HeaderMap,
    method: &Method,
    email: &str,
    password: &str,
) -> Result<(User, HeaderMap), HandshakeError> {
    let (presented_id, _) = authenticate_request(headers, method).await?;

    let principal = credential_store()?
        .verify(email, password)
        .await?
        .ok_or(HandshakeError::InvalidCredentials)?;

    let (session_id, _) = create_session(Some(&principal.id)).await?;
    let csrf_token = rotate_csrf_token(session_id.as_str()).await?;
    invalidate_session(presented_id.as_str()).await?;

    tracing::info!(principal_id = %principal.id, "Login successful");

    let mut response = HeaderMap::new();
    set_auth_cookies(&mut response, session_id.as_str(), csrf_token.as_str())?;
    Ok((User::from(principal), response))
}

/// Terminate the session and instruct the client to drop both cookies.
/// Safe to call with no session at all; termination is absorbing.
pub async fn prepare_logout_response(headers: &HeaderMap) -> Result<HeaderMap, HandshakeError> {
    if let Some(session_id) = resolve_session_id(headers) {
        invalidate_session(&session_id).await?;
    }

    let mut response = HeaderMap::new();
    clear_cookie(&mut response, SESSION_COOKIE_NAME.as_str(), true)
        .map_err(HandshakeError::Session)?;
    clear_cookie(&mut response, CSRF_COOKIE_NAME.as_str(), false)
        .map_err(HandshakeError::Session)?;
    Ok(response)
}

/// Resolve the authenticated principal behind a request, renewing the
/// session's sliding expiry. Anonymous sessions do not count.
pub async fn current_principal(
    headers: &HeaderMap,
    method: &Method,
) -> Result<User, HandshakeError> {
    let (_, session) = authenticate_request(headers, method).await?;
    let Some(principal_id) = session.principal_id else {
        return Err(SessionError::Unauthenticated.into());
    };

    let principal = credential_store()?
        .get(&principal_id)
        .await?
        .ok_or(SessionError::Unauthenticated)?;
    Ok(User::from(principal))
}

/// A cookie that fails to parse is treated as absent rather than fatal;
/// issuance and logout must keep working for clients with mangled cookies.
fn resolve_session_id(headers: &HeaderMap) -> Option<String> {
    get_session_id_from_headers(headers).ok().flatten()
}
