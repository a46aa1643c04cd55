use base64::{Engine as _, engine::general_purpose::URL_SAFE_NO_PAD};
use ring::rand::SecureRandom;

use thiserror::Error;

/// Minimum number of random bytes for any session or CSRF token.
pub(crate) const MIN_TOKEN_BYTES: usize = 32;

#[derive(Debug, Error, Clone, PartialEq)]
pub enum UtilError {
    #[error("Crypto error: {0}")]
    Crypto(String),

    #[error("Invalid format: {0}")]
    Format(String),
}

pub(crate) fn base64url_encode(input: Vec<u8>) -> String {
    URL_SAFE_NO_PAD.encode(input)
}

/// Generate a URL-safe random token from `len` bytes of a CSPRNG.
///
/// Requests below [`MIN_TOKEN_BYTES`] are rejected rather than clamped, and an
/// unavailable random source is a hard error: there is no weak fallback.
pub fn gen_token(len: usize) -> Result<String, UtilError> {
    if len < MIN_TOKEN_BYTES {
        return Err(UtilError::Crypto(format!(
            "Token length {len} below minimum of {MIN_TOKEN_BYTES} bytes"
        )));
    }
    let rng = ring::rand::SystemRandom::new();
    let mut bytes = vec![0u8; len];
    rng.fill(&mut bytes)
        .map_err(|_| UtilError::Crypto("Failed to generate random bytes".to_string()))?;
    Ok(base64url_encode(bytes))
}
