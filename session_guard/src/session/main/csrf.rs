use http::Method;
use http::header::HeaderMap;
use subtle::ConstantTimeEq;

use crate::session::config::CSRF_HEADER_NAME;
use crate::session::errors::SessionError;
use crate::session::types::{SessionId, StoredSession};

use super::store::{get_session_id_from_headers, lookup_session, touch_session};

/// State-changing methods that require the double-submit check.
pub fn is_mutating_method(method: &Method) -> bool {
    method == Method::POST
        || method == Method::PUT
        || method == Method::DELETE
        || method == Method::PATCH
}

/// Resolve and validate the session carried by a request.
///
/// Session resolution happens strictly before any token inspection: a request
/// without a usable session fails `Unauthenticated` and the CSRF comparison is
/// never attempted. For state-changing methods the value of the configured
/// CSRF header is then percent-decoded (clients occasionally forward the
/// cookie's encoded form verbatim) and compared constant-time against the
/// session-bound token. The CSRF cookie itself is never read here; it exists
/// only so client script can learn the value to echo.
///
/// On success the session is touched, renewing the sliding expiry window.
pub async fn authenticate_request(
    headers: &HeaderMap,
    method: &Method,
) -> Result<(SessionId, StoredSession), SessionError> {
    let Some(session_id) = get_session_id_from_headers(headers)? else {
        return Err(SessionError::Unauthenticated);
    };

    let session = match lookup_session(&session_id).await {
        Ok(session) => session,
        Err(SessionError::NotFound) => return Err(SessionError::Unauthenticated),
        Err(e) => return Err(e),
    };

    if is_mutating_method(method) {
        verify_csrf_header(headers, &session)?;
    }

    let session = touch_session(&session_id).await?;
    Ok((SessionId::new(session_id), session))
}

fn verify_csrf_header(headers: &HeaderMap, session: &StoredSession) -> Result<(), SessionError> {
    let Some(submitted) = headers
        .get(CSRF_HEADER_NAME.as_str())
        .and_then(|h| h.to_str().ok())
    else {
        tracing::debug!("No CSRF token header found");
        return Err(SessionError::CsrfTokenMissing);
    };

    // Defense against double-encoding mistakes: a still-encoded header value
    // decodes to the stored form; an already-decoded token is unchanged since
    // tokens are base64url and carry no '%'.
    let submitted = urlencoding::decode(submitted)
        .map_err(|_| SessionError::CsrfTokenMismatch)?;

    if bool::from(
        submitted
            .as_bytes()
            .ct_eq(session.csrf_token.as_bytes()),
    ) {
        Ok(())
    } else {
        tracing::debug!("CSRF token mismatch");
        Err(SessionError::CsrfTokenMismatch)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::config::SESSION_COOKIE_NAME;
    use crate::session::main::store::{create_session, invalidate_session, rotate_csrf_token};
    use http::HeaderValue;
    use http::header::COOKIE;
    use serial_test::serial;

    fn request_headers(session_id: Option<&str>, csrf_header: Option<&str>) -> HeaderMap {
        let mut headers = HeaderMap::new();
        if let Some(id) = session_id {
            let cookie = format!("{}={id}", SESSION_COOKIE_NAME.as_str());
            headers.insert(COOKIE, HeaderValue::from_str(&cookie).expect("bad cookie"));
        }
        if let Some(token) = csrf_header {
            headers.insert(
                CSRF_HEADER_NAME.as_str(),
                HeaderValue::from_str(token).expect("bad header"),
            );
        }
        headers
    }

    #[test]
    fn test_is_mutating_method() {
        assert!(is_mutating_method(&Method::POST));
        assert!(is_mutating_method(&Method::PUT));
        assert!(is_mutating_method(&Method::PATCH));
        assert!(is_mutating_method(&Method::DELETE));
        assert!(!is_mutating_method(&Method::GET));
        assert!(!is_mutating_method(&Method::HEAD));
        assert!(!is_mutating_method(&Method::OPTIONS));
    }

    #[tokio::test]
    #[serial]
    async fn test_no_session_cookie_fails_before_csrf_comparison() {
        // Even with a CSRF header present, the missing session wins
        let headers = request_headers(None, Some("some-token"));
        let result = authenticate_request(&headers, &Method::POST).await;
        assert_eq!(result.unwrap_err(), SessionError::Unauthenticated);
    }

    #[tokio::test]
    #[serial]
    async fn test_stale_session_id_is_unauthenticated() {
        let headers = request_headers(Some("long-gone"), Some("some-token"));
        let result = authenticate_request(&headers, &Method::POST).await;
        assert_eq!(result.unwrap_err(), SessionError::Unauthenticated);
    }

    #[tokio::test]
    #[serial]
    async fn test_missing_csrf_header_on_mutation() {
        let (session_id, _) = create_session(Some("user-1")).await.expect("create failed");

        let headers = request_headers(Some(session_id.as_str()), None);
        let result = authenticate_request(&headers, &Method::POST).await;
        assert_eq!(result.unwrap_err(), SessionError::CsrfTokenMissing);

        invalidate_session(session_id.as_str()).await.expect("cleanup");
    }

    #[tokio::test]
    #[serial]
    async fn test_wrong_csrf_token_is_a_mismatch() {
        let (session_id, _) = create_session(Some("user-1")).await.expect("create failed");

        let headers = request_headers(Some(session_id.as_str()), Some("not-the-token"));
        let result = authenticate_request(&headers, &Method::POST).await;
        assert_eq!(result.unwrap_err(), SessionError::CsrfTokenMismatch);

        invalidate_session(session_id.as_str()).await.expect("cleanup");
    }

    #[tokio::test]
    #[serial]
    async fn test_matching_csrf_token_is_accepted() {
        let (session_id, session) = create_session(Some("user-1")).await.expect("create failed");

        let headers = request_headers(Some(session_id.as_str()), Some(&session.csrf_token));
        let (resolved_id, resolved) = authenticate_request(&headers, &Method::POST)
            .await
            .expect("valid request must pass");
        assert_eq!(resolved_id.as_str(), session_id.as_str());
        assert_eq!(resolved.principal_id.as_deref(), Some("user-1"));

        invalidate_session(session_id.as_str()).await.expect("cleanup");
    }

    #[tokio::test]
    #[serial]
    async fn test_percent_encoded_header_still_matches() {
        let (session_id, session) = create_session(Some("user-1")).await.expect("create failed");

        // Client forwarded the cookie's encoded form verbatim
        let encoded = urlencoding::encode(&session.csrf_token).into_owned();
        let headers = request_headers(Some(session_id.as_str()), Some(&encoded));
        let result = authenticate_request(&headers, &Method::POST).await;
        assert!(result.is_ok(), "encoded header must decode and match");

        invalidate_session(session_id.as_str()).await.expect("cleanup");
    }

    #[tokio::test]
    #[serial]
    async fn test_rotated_out_token_fails_like_any_mismatch() {
        let (session_id, session) = create_session(Some("user-1")).await.expect("create failed");
        let stale = session.csrf_token.clone();

        rotate_csrf_token(session_id.as_str())
            .await
            .expect("rotate failed");

        let headers = request_headers(Some(session_id.as_str()), Some(&stale));
        let result = authenticate_request(&headers, &Method::POST).await;
        assert_eq!(result.unwrap_err(), SessionError::CsrfTokenMismatch);

        invalidate_session(session_id.as_str()).await.expect("cleanup");
    }

    #[tokio::test]
    #[serial]
    async fn test_safe_methods_bypass_csrf() {
        let (session_id, _) = create_session(Some("user-1")).await.expect("create failed");

        // No CSRF header at all; GET must still resolve the session
        let headers = request_headers(Some(session_id.as_str()), None);
        let result = authenticate_request(&headers, &Method::GET).await;
        assert!(result.is_ok());

        invalidate_session(session_id.as_str()).await.expect("cleanup");
    }
}
