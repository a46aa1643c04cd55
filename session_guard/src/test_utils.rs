//! Shared test initialization.
//!
//! Installs the process-wide in-memory credential store exactly once, seeded
//! with the account the handshake tests authenticate against, and loads test
//! environment variables from `.env_test` when present.

use std::sync::{Arc, Once};

use crate::credentials::{
    CredentialError, InMemoryCredentialStore, Principal, install_credential_store,
};

pub(crate) async fn init_test_environment() {
    static ENV_INIT: Once = Once::new();
    ENV_INIT.call_once(|| {
        if dotenvy::from_filename(".env_test").is_err() {
            dotenvy::dotenv().ok();
        }
    });

    let store = InMemoryCredentialStore::new();
    store
        .add_principal(
            Principal::new("user-1", "dev@example.com", "Dev User"),
            "hunter2",
        )
        .await;

    match install_credential_store(Arc::new(store)) {
        Ok(()) | Err(CredentialError::AlreadyConfigured) => {}
        Err(e) => panic!("Failed to install test credential store: {e}"),
    }
}
