use std::sync::LazyLock;

use super::main::cookie::SameSite;

pub static SESSION_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SG_SESSION_COOKIE_NAME")
        .ok()
        .unwrap_or("__Host-SessionId".to_string())
});

/// CSRF cookie name. Deliberately not `__Host-` prefixed: the cookie must be
/// readable by client script, and deployments commonly rename it.
pub static CSRF_COOKIE_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SG_CSRF_COOKIE_NAME")
        .ok()
        .unwrap_or("XSRF-TOKEN".to_string())
});

pub static CSRF_HEADER_NAME: LazyLock<String> = LazyLock::new(|| {
    std::env::var("SG_CSRF_HEADER_NAME")
        .ok()
        .unwrap_or("X-CSRF-Token".to_string())
});

/// Sliding-window session TTL in seconds.
pub static SESSION_TTL: LazyLock<u64> = LazyLock::new(|| {
    std::env::var("SG_SESSION_TTL")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(7200) // Default to 2 hours if not set or invalid
});

/// Secure-by-default: plaintext development requires an explicit opt-out.
pub(crate) static COOKIE_SECURE: LazyLock<bool> = LazyLock::new(|| {
    std::env::var("SG_COOKIE_SECURE")
        .map(|val| val.to_lowercase() != "false")
        .unwrap_or(true)
});

/// Cookie Domain attribute. Unset means host-only cookies.
pub(crate) static COOKIE_DOMAIN: LazyLock<Option<String>> =
    LazyLock::new(|| std::env::var("SG_COOKIE_DOMAIN").ok().filter(|d| !d.is_empty()));

pub(crate) static COOKIE_SAME_SITE: LazyLock<SameSite> = LazyLock::new(|| {
    let raw = std::env::var("SG_COOKIE_SAME_SITE").unwrap_or_else(|_| "lax".to_string());
    SameSite::parse(&raw, *COOKIE_SECURE)
});
