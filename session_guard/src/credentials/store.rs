use std::collections::HashMap;
use std::sync::{Arc, OnceLock};

use async_trait::async_trait;
use subtle::ConstantTimeEq;
use tokio::sync::RwLock;

use super::errors::CredentialError;
use super::types::Principal;

/// Boundary to the external credential store.
///
/// `verify` must not reveal whether the email or the password was the wrong
/// half: both cases are `Ok(None)`.
#[async_trait]
pub trait CredentialStore: Send + Sync + 'static {
    /// Verify a credential pair, returning the principal on success.
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, CredentialError>;

    /// Fetch a principal by id, for resolving an established session.
    async fn get(&self, principal_id: &str) -> Result<Option<Principal>, CredentialError>;
}

static CREDENTIAL_STORE: OnceLock<Arc<dyn CredentialStore>> = OnceLock::new();

/// Install the process-wide credential store. Called once at startup.
pub fn install_credential_store(store: Arc<dyn CredentialStore>) -> Result<(), CredentialError> {
    CREDENTIAL_STORE
        .set(store)
        .map_err(|_| CredentialError::AlreadyConfigured)
}

pub(crate) fn credential_store() -> Result<&'static Arc<dyn CredentialStore>, CredentialError> {
    CREDENTIAL_STORE.get().ok_or(CredentialError::NotConfigured)
}

struct StoredCredential {
    principal: Principal,
    password: String,
}

/// In-memory credential store for tests and the demo server.
///
/// Holds plaintext passwords and is not meant for production; a real
/// deployment implements [`CredentialStore`] over its user database.
#[derive(Default)]
pub struct InMemoryCredentialStore {
    entries: RwLock<HashMap<String, StoredCredential>>,
}

impl InMemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn add_principal(&self, principal: Principal, password: impl Into<String>) {
        let mut entries = self.entries.write().await;
        entries.insert(
            principal.email.clone(),
            StoredCredential {
                principal,
                password: password.into(),
            },
        );
    }
}

#[async_trait]
impl CredentialStore for InMemoryCredentialStore {
    async fn verify(
        &self,
        email: &str,
        password: &str,
    ) -> Result<Option<Principal>, CredentialError> {
        let entries = self.entries.read().await;
        let Some(stored) = entries.get(email) else {
            // Burn a comparison anyway so an unknown email costs the same
            let _ = password.as_bytes().ct_eq(b"placeholder-credential");
            return Ok(None);
        };
        if bool::from(password.as_bytes().ct_eq(stored.password.as_bytes())) {
            Ok(Some(stored.principal.clone()))
        } else {
            Ok(None)
        }
    }

    async fn get(&self, principal_id: &str) -> Result<Option<Principal>, CredentialError> {
        let entries = self.entries.read().await;
        Ok(entries
            .values()
            .find(|c| c.principal.id == principal_id)
            .map(|c| c.principal.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_principal() -> Principal {
        Principal::new("user-1", "dev@example.com", "Dev User")
    }

    #[tokio::test]
    async fn test_verify_accepts_correct_credentials() {
        let store = InMemoryCredentialStore::new();
        store.add_principal(sample_principal(), "hunter2").await;

        let found = store
            .verify("dev@example.com", "hunter2")
            .await
            .expect("verify failed");
        assert_eq!(found, Some(sample_principal()));
    }

    #[tokio::test]
    async fn test_verify_is_silent_about_which_half_was_wrong() {
        let store = InMemoryCredentialStore::new();
        store.add_principal(sample_principal(), "hunter2").await;

        let wrong_password = store
            .verify("dev@example.com", "wrong")
            .await
            .expect("verify failed");
        let wrong_email = store
            .verify("nobody@example.com", "hunter2")
            .await
            .expect("verify failed");

        // Both failure modes are the same plain None
        assert_eq!(wrong_password, None);
        assert_eq!(wrong_email, None);
    }

    #[tokio::test]
    async fn test_get_by_principal_id() {
        let store = InMemoryCredentialStore::new();
        store.add_principal(sample_principal(), "hunter2").await;

        let found = store.get("user-1").await.expect("get failed");
        assert_eq!(found, Some(sample_principal()));

        let missing = store.get("user-2").await.expect("get failed");
        assert_eq!(missing, None);
    }
}
