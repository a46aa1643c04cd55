use http::header::{HeaderMap, SET_COOKIE};

use crate::session::config::{COOKIE_DOMAIN, COOKIE_SAME_SITE, COOKIE_SECURE};
use crate::session::errors::SessionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SameSite {
    Lax,
    Strict,
    None,
}

impl SameSite {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            SameSite::Lax => "Lax",
            SameSite::Strict => "Strict",
            SameSite::None => "None",
        }
    }

    /// Parse a configured value. `SameSite=None` without `Secure` would be
    /// rejected by browsers and silently reopen cross-site delivery, so it is
    /// coerced back to `Lax`.
    pub(crate) fn parse(raw: &str, secure: bool) -> Self {
        match raw.to_lowercase().as_str() {
            "strict" => SameSite::Strict,
            "none" => {
                if secure {
                    SameSite::None
                } else {
                    tracing::warn!(
                        "SG_COOKIE_SAME_SITE=none requires Secure cookies; falling back to Lax"
                    );
                    SameSite::Lax
                }
            }
            "lax" => SameSite::Lax,
            other => {
                tracing::warn!("Unknown SameSite value '{}', using Lax", other);
                SameSite::Lax
            }
        }
    }
}

pub(crate) fn encode_value(value: &str) -> String {
    urlencoding::encode(value).into_owned()
}

/// Reverse of [`encode_value`]. A value that fails to percent-decode is a
/// validation failure, never a panic.
pub(crate) fn decode_value(value: &str) -> Result<String, SessionError> {
    urlencoding::decode(value)
        .map(|v| v.into_owned())
        .map_err(|_| SessionError::Cookie("Cookie value failed to percent-decode".to_string()))
}

/// Append a `Set-Cookie` header for `name`.
///
/// The session cookie is emitted with `HttpOnly`; the CSRF cookie must not be,
/// since the double-submit scheme depends on client script reading it back.
/// A `__Host-` prefixed name forces `Secure` and forbids `Domain` per the
/// cookie prefix rules.
pub(crate) fn set_cookie(
    headers: &mut HeaderMap,
    name: &str,
    value: &str,
    max_age: i64,
    http_only: bool,
) -> Result<(), SessionError> {
    let host_prefixed = name.starts_with("__Host-");
    let secure = *COOKIE_SECURE || host_prefixed;

    let mut cookie = format!(
        "{name}={}; SameSite={}; Path=/; Max-Age={max_age}",
        encode_value(value),
        COOKIE_SAME_SITE.as_str(),
    );
    if secure {
        cookie.push_str("; Secure");
    }
    if http_only {
        cookie.push_str("; HttpOnly");
    }
    if !host_prefixed {
        if let Some(domain) = COOKIE_DOMAIN.as_deref() {
            cookie.push_str("; Domain=");
            cookie.push_str(domain);
        }
    }

    tracing::trace!("Set-Cookie: {}", cookie);
    headers.append(
        SET_COOKIE,
        cookie
            .parse()
            .map_err(|_| SessionError::Cookie("Failed to parse cookie".to_string()))?,
    );
    Ok(())
}

/// Instruct the client to drop a cookie by re-setting it already expired.
pub(crate) fn clear_cookie(
    headers: &mut HeaderMap,
    name: &str,
    http_only: bool,
) -> Result<(), SessionError> {
    set_cookie(headers, name, "", 0, http_only)
}
