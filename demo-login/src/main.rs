use axum::{Json, Router, routing::get};
use dotenvy::dotenv;

use session_guard_axum::{
    AuthUser, InMemoryCredentialStore, Principal, SG_ROUTE_PREFIX, init, install_credential_store,
    session_guard_router,
};

mod server;

use crate::server::{init_tracing, spawn_http_server};

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

async fn protected(user: AuthUser) -> String {
    format!("Hello, {}! You are logged in as {}.", user.name, user.email)
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    init_tracing("demo_login");

    let store = InMemoryCredentialStore::new();
    store
        .add_principal(
            Principal::new("user-1", "dev@example.com", "Dev User"),
            "hunter2",
        )
        .await;
    install_credential_store(std::sync::Arc::new(store))?;

    init().await?;

    let app = Router::new()
        .route("/health", get(health))
        .route("/protected", get(protected))
        .nest(SG_ROUTE_PREFIX.as_str(), session_guard_router());

    let http_server = spawn_http_server(3001, app);

    http_server.await.unwrap();
    Ok(())
}
