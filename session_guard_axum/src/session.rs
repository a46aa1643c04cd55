use axum::{
    extract::{FromRequestParts, OptionalFromRequestParts},
    response::{IntoResponse, Response},
};
use http::{StatusCode, request::Parts};

use session_guard::{User as SessionUser, current_principal};

use super::error::IntoResponseError;

/// Rejection emitted when a request cannot be tied to an authenticated
/// session, carrying the already-mapped status code and generic message.
pub struct AuthRejection {
    status: StatusCode,
    message: String,
}

impl IntoResponse for AuthRejection {
    fn into_response(self) -> Response {
        (self.status, self.message).into_response()
    }
}

/// Authenticated principal, available as an axum extractor.
///
/// Extraction resolves the session cookie, renews the sliding expiry, and
/// for state-changing methods also enforces the double-submit CSRF check
/// before the handler body ever runs.
///
/// # Example
///
/// ```no_run
/// use axum::{routing::get, Json, Router};
/// use session_guard_axum::AuthUser;
///
/// async fn protected_handler(user: AuthUser) -> Json<String> {
///     Json(format!("Hello, {}!", user.name))
/// }
///
/// let app: Router = Router::new()
///     .route("/protected", get(protected_handler));
/// ```
#[derive(Clone, Debug)]
pub struct AuthUser {
    /// Unique principal identifier
    pub id: String,
    /// Login email
    pub email: String,
    /// Display name
    pub name: String,
}

impl From<SessionUser> for AuthUser {
    fn from(user: SessionUser) -> Self {
        Self {
            id: user.id,
            email: user.email,
            name: user.name,
        }
    }
}

impl<S> FromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(parts: &mut Parts, _: &S) -> Result<Self, Self::Rejection> {
        let user = current_principal(&parts.headers, &parts.method)
            .await
            .into_response_error()
            .map_err(|(status, message)| AuthRejection { status, message })?;
        Ok(AuthUser::from(user))
    }
}

impl<S> OptionalFromRequestParts<S> for AuthUser
where
    S: Send + Sync,
{
    type Rejection = AuthRejection;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &S,
    ) -> Result<Option<Self>, Self::Rejection> {
        let result: Result<Self, Self::Rejection> =
            <AuthUser as FromRequestParts<S>>::from_request_parts(parts, state).await;
        Ok(result.ok())
    }
}
