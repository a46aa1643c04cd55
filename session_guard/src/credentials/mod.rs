mod errors;
mod store;
mod types;

pub use errors::CredentialError;
pub use store::{CredentialStore, InMemoryCredentialStore, install_credential_store};
pub use types::Principal;

pub(crate) use store::credential_store;
