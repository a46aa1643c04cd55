//! Central configuration for the session_guard_axum crate

use std::sync::LazyLock;

/// Mount point for the auth router.
/// Default: "/auth"
pub static SG_ROUTE_PREFIX: LazyLock<String> =
    LazyLock::new(|| std::env::var("SG_ROUTE_PREFIX").unwrap_or_else(|_| "/auth".to_string()));

/// Origins permitted to receive credentialed cross-origin responses.
/// Comma-separated exact `scheme://host[:port]` values; empty means no
/// cross-origin access.
pub static SG_ALLOWED_ORIGINS: LazyLock<Vec<String>> = LazyLock::new(|| {
    std::env::var("SG_ALLOWED_ORIGINS")
        .map(|raw| parse_origins(&raw))
        .unwrap_or_default()
});

fn parse_origins(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|o| o.trim().trim_end_matches('/').to_string())
        .filter(|o| !o.is_empty())
        .collect()
}
