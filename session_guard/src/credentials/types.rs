use serde::{Deserialize, Serialize};

/// An authenticated principal as reported by the credential store.
///
/// Password hashing and storage policy belong to the credential store behind
/// the [`CredentialStore`](super::CredentialStore) boundary; this type only
/// carries what the session layer needs.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Principal {
    pub id: String,
    pub email: String,
    pub name: String,
}

impl Principal {
    pub fn new(id: impl Into<String>, email: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            email: email.into(),
            name: name.into(),
        }
    }
}
