use axum::{
    Json,
    http::StatusCode,
    response::IntoResponse,
};
use http::{HeaderMap, Method};
use serde::Deserialize;
use serde_json::{Value, json};

use session_guard::{
    SessionError, authenticate_request, login as handshake_login, prepare_csrf_response,
    prepare_logout_response,
};

use super::error::{IntoResponseError, session_error_response};
use super::session::AuthUser;

#[derive(Deserialize)]
pub(super) struct LoginRequest {
    email: String,
    password: String,
}

/// `GET /csrf-token` — issue the CSRF cookie (and, for new clients, the
/// anonymous session cookie it is bound to). Safe method, exempt from the
/// guard by construction, idempotent for clients that already have a session.
pub(super) async fn csrf_token(
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let response_headers = prepare_csrf_response(&headers).await.into_response_error()?;
    Ok((response_headers, Json(json!({"message": "CSRF cookie set"}))))
}

/// `POST /login` — CSRF-guarded credential verification; on success the
/// response carries a fresh session cookie and a rotated CSRF cookie.
pub(super) async fn login(
    method: Method,
    headers: HeaderMap,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    let (user, response_headers) =
        handshake_login(&headers, &method, &payload.email, &payload.password)
            .await
            .into_response_error()?;

    Ok((
        response_headers,
        Json(json!({
            "message": "Login successful",
            "user": user,
        })),
    ))
}

/// `POST /logout` — terminate the session and clear both cookies.
///
/// Guarded like any mutation while a live session exists; a client whose
/// session is already gone still gets its cookies cleared, since an
/// unauthenticated logout forges nothing.
pub(super) async fn logout(
    method: Method,
    headers: HeaderMap,
) -> Result<impl IntoResponse, (StatusCode, String)> {
    match authenticate_request(&headers, &method).await {
        Ok(_)
        | Err(
            SessionError::Unauthenticated | SessionError::NotFound | SessionError::SessionExpired,
        ) => {}
        Err(e) => return Err(session_error_response(&e)),
    }

    let response_headers = prepare_logout_response(&headers).await.into_response_error()?;
    Ok((StatusCode::NO_CONTENT, response_headers))
}

/// `GET /me` — principal info for the current session.
pub(super) async fn me(user: AuthUser) -> Json<Value> {
    Json(json!({
        "user": {
            "id": user.id,
            "email": user.email,
            "name": user.name,
        }
    }))
}
