use std::sync::LazyLock;

use axum::{extract::Request, middleware::Next, response::Response};
use http::header::{
    ACCESS_CONTROL_ALLOW_CREDENTIALS, ACCESS_CONTROL_ALLOW_HEADERS, ACCESS_CONTROL_ALLOW_METHODS,
    ACCESS_CONTROL_ALLOW_ORIGIN, HeaderMap, HeaderValue, ORIGIN, VARY,
};
use http::{Method, StatusCode};

use session_guard::CSRF_HEADER_NAME;

use super::config::SG_ALLOWED_ORIGINS;

/// Validates request origins against the configured allowlist and owns CORS
/// response headers.
///
/// Matching is exact on the full `scheme://host[:port]` string; no wildcard
/// or suffix matching. Credentialed responses never echo `*`.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    allowed: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OriginDecision {
    /// Echo this origin back with `Access-Control-Allow-Credentials: true`.
    Allow(String),
    Deny,
}

impl OriginPolicy {
    pub fn new(allowed: Vec<String>) -> Self {
        Self { allowed }
    }

    pub fn from_env() -> Self {
        Self::new(SG_ALLOWED_ORIGINS.clone())
    }

    pub fn evaluate(&self, request_origin: Option<&str>) -> OriginDecision {
        let Some(origin) = request_origin else {
            return OriginDecision::Deny;
        };
        if self.allowed.iter().any(|allowed| allowed == origin) {
            OriginDecision::Allow(origin.to_string())
        } else {
            OriginDecision::Deny
        }
    }

    /// Write CORS headers for a decision. `insert` rather than `append`
    /// throughout, so a response passing through this writer more than once
    /// still carries each header exactly once.
    pub fn apply(&self, decision: &OriginDecision, headers: &mut HeaderMap) {
        let OriginDecision::Allow(origin) = decision else {
            return;
        };
        let Ok(origin_value) = HeaderValue::from_str(origin) else {
            tracing::error!("Origin {} is not a valid header value", origin);
            return;
        };
        headers.insert(ACCESS_CONTROL_ALLOW_ORIGIN, origin_value);
        headers.insert(
            ACCESS_CONTROL_ALLOW_CREDENTIALS,
            HeaderValue::from_static("true"),
        );
        // Vary is shared with handlers, so add Origin to it instead of
        // claiming the whole header
        if !vary_includes_origin(headers) {
            headers.append(VARY, HeaderValue::from_static("Origin"));
        }
    }
}

fn vary_includes_origin(headers: &HeaderMap) -> bool {
    headers.get_all(VARY).iter().any(|value| {
        value
            .to_str()
            .is_ok_and(|v| v.split(',').any(|member| member.trim().eq_ignore_ascii_case("Origin")))
    })
}

static ORIGIN_POLICY: LazyLock<OriginPolicy> = LazyLock::new(OriginPolicy::from_env);

/// The single authoritative writer of CORS response headers.
///
/// Denied origins still reach the handler: CORS is enforced by the browser
/// refusing to expose the response, not by hiding the endpoint. Preflight
/// OPTIONS requests are answered here so no second layer ever emits CORS
/// headers.
pub async fn enforce_origin_policy(req: Request, next: Next) -> Response {
    let origin = req
        .headers()
        .get(ORIGIN)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let decision = ORIGIN_POLICY.evaluate(origin.as_deref());

    if req.method() == Method::OPTIONS {
        return preflight_response(&decision);
    }

    let mut response = next.run(req).await;
    ORIGIN_POLICY.apply(&decision, response.headers_mut());
    response
}

fn preflight_response(decision: &OriginDecision) -> Response {
    let mut response = Response::new(axum::body::Body::empty());
    *response.status_mut() = StatusCode::NO_CONTENT;

    if let OriginDecision::Allow(_) = decision {
        let headers = response.headers_mut();
        headers.insert(
            ACCESS_CONTROL_ALLOW_METHODS,
            HeaderValue::from_static("GET, POST, PUT, PATCH, DELETE, OPTIONS"),
        );
        if let Ok(allow_headers) =
            HeaderValue::from_str(&format!("Content-Type, {}", CSRF_HEADER_NAME.as_str()))
        {
            headers.insert(ACCESS_CONTROL_ALLOW_HEADERS, allow_headers);
        }
        ORIGIN_POLICY.apply(decision, response.headers_mut());
    }

    response
}
