use thiserror::Error;

#[derive(Debug, Error, Clone)]
pub enum CredentialError {
    /// No credential store has been installed. Fatal configuration error.
    #[error("Credential store not configured")]
    NotConfigured,

    /// A store was already installed; installation happens once per process.
    #[error("Credential store already configured")]
    AlreadyConfigured,

    /// The backing store failed; distinct from a credential mismatch.
    #[error("Credential store error: {0}")]
    Store(String),
}
