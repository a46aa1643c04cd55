use chrono::{Duration, Utc};
use http::header::{COOKIE, HeaderMap};

use crate::session::config::{SESSION_COOKIE_NAME, SESSION_TTL};
use crate::session::errors::SessionError;
use crate::session::types::{CsrfToken, SessionId, StoredSession};
use crate::storage::GENERIC_CACHE_STORE;
use crate::utils::gen_token;

use super::cookie::decode_value;

const SESSION_NAMESPACE: &str = "session";
const TOKEN_BYTES: usize = 32;

/// Collision on a 256-bit identifier is practically impossible, but creation
/// checks anyway and regenerates rather than overwriting a live session.
const CREATE_ATTEMPTS: usize = 3;

/// Create a session record and persist it under a fresh opaque identifier.
///
/// `principal_id` is `None` for the anonymous session established at CSRF
/// token issuance. The bound CSRF token is generated here as well, so a fresh
/// session never shares a token with any predecessor.
pub(crate) async fn create_session(
    principal_id: Option<&str>,
) -> Result<(SessionId, StoredSession), SessionError> {
    let now = Utc::now();
    let ttl = *SESSION_TTL;
    let session = StoredSession {
        principal_id: principal_id.map(str::to_string),
        csrf_token: gen_token(TOKEN_BYTES)?,
        created_at: now,
        last_seen_at: now,
        expires_at: now + Duration::seconds(ttl as i64),
        ttl,
    };

    let mut store = GENERIC_CACHE_STORE.lock().await;
    for _ in 0..CREATE_ATTEMPTS {
        let session_id = gen_token(TOKEN_BYTES)?;
        let created = store
            .put_if_not_exists(
                SESSION_NAMESPACE,
                &session_id,
                session.clone().into(),
                ttl as usize,
            )
            .await?;
        if created {
            tracing::debug!(
                "Created {} session {}...",
                if session.is_anonymous() { "anonymous" } else { "authenticated" },
                &session_id[..8]
            );
            return Ok((SessionId::new(session_id), session));
        }
        tracing::warn!("Session id collision, regenerating");
    }
    Err(SessionError::Storage(
        "Failed to allocate a unique session id".to_string(),
    ))
}

/// Resolve a session id to its record.
///
/// An expired record is purged lazily here; later lookups see `NotFound`.
pub(crate) async fn lookup_session(session_id: &str) -> Result<StoredSession, SessionError> {
    let mut store = GENERIC_CACHE_STORE.lock().await;
    let Some(data) = store.get(SESSION_NAMESPACE, session_id).await? else {
        return Err(SessionError::NotFound);
    };
    let session: StoredSession = data.try_into()?;
    if session.is_expired(Utc::now()) {
        store.remove(SESSION_NAMESPACE, session_id).await?;
        return Err(SessionError::SessionExpired);
    }
    Ok(session)
}

/// Sliding-window renewal: push `expires_at` out by the TTL and stamp
/// `last_seen_at`. The expiry never moves backwards.
pub(crate) async fn touch_session(session_id: &str) -> Result<StoredSession, SessionError> {
    let mut store = GENERIC_CACHE_STORE.lock().await;
    let Some(data) = store.get(SESSION_NAMESPACE, session_id).await? else {
        return Err(SessionError::NotFound);
    };
    let mut session: StoredSession = data.try_into()?;
    let now = Utc::now();
    if session.is_expired(now) {
        store.remove(SESSION_NAMESPACE, session_id).await?;
        return Err(SessionError::SessionExpired);
    }

    session.last_seen_at = now;
    session.expires_at = session
        .expires_at
        .max(now + Duration::seconds(session.ttl as i64));
    store
        .put_with_ttl(
            SESSION_NAMESPACE,
            session_id,
            session.clone().into(),
            session.ttl as usize,
        )
        .await?;
    Ok(session)
}

/// Remove the record. Termination is absorbing: any later use of the stale
/// session id resolves to `NotFound`.
pub(crate) async fn invalidate_session(session_id: &str) -> Result<(), SessionError> {
    let mut store = GENERIC_CACHE_STORE.lock().await;
    store.remove(SESSION_NAMESPACE, session_id).await?;
    Ok(())
}

/// Issue a new CSRF token for an existing session without destroying it.
/// Used on privilege changes; the rotated-out token fails validation exactly
/// like a missing one.
pub(crate) async fn rotate_csrf_token(session_id: &str) -> Result<CsrfToken, SessionError> {
    let mut store = GENERIC_CACHE_STORE.lock().await;
    let Some(data) = store.get(SESSION_NAMESPACE, session_id).await? else {
        return Err(SessionError::NotFound);
    };
    let mut session: StoredSession = data.try_into()?;
    if session.is_expired(Utc::now()) {
        store.remove(SESSION_NAMESPACE, session_id).await?;
        return Err(SessionError::SessionExpired);
    }

    session.csrf_token = gen_token(TOKEN_BYTES)?;
    let token = CsrfToken::new(session.csrf_token.clone());
    store
        .put_with_ttl(
            SESSION_NAMESPACE,
            session_id,
            session.into(),
            *SESSION_TTL as usize,
        )
        .await?;
    Ok(token)
}

/// Extract the session cookie value from the request's `Cookie` header.
pub(crate) fn get_session_id_from_headers(
    headers: &HeaderMap,
) -> Result<Option<String>, SessionError> {
    let Some(cookie_header) = headers.get(COOKIE) else {
        tracing::debug!("No cookie header found");
        return Ok(None);
    };

    let cookie_str = cookie_header.to_str().map_err(|e| {
        tracing::error!("Invalid cookie header: {}", e);
        SessionError::Header("Invalid cookie header".to_string())
    })?;

    let cookie_name = SESSION_COOKIE_NAME.as_str();
    let raw = cookie_str.split(';').map(|s| s.trim()).find_map(|s| {
        let mut parts = s.splitn(2, '=');
        match (parts.next(), parts.next()) {
            (Some(k), Some(v)) if k == cookie_name => Some(v),
            _ => None,
        }
    });

    let Some(raw) = raw else {
        tracing::debug!("No session cookie '{}' found in cookies", cookie_name);
        return Ok(None);
    };

    decode_value(raw).map(Some)
}
