//! Session error types

use linkbio_signing::ConfigError;
use thiserror::Error;

/// Session manager errors
///
/// Invalid or expired tokens are not errors: lookups return `None` for them.
#[derive(Error, Debug)]
pub enum SessionError {
    /// `SECRET_KEY` is not set
    #[error("Missing SECRET_KEY")]
    MissingSecretKey,

    /// The signer configuration was rejected
    #[error("Invalid signer configuration: {0}")]
    Config(#[from] ConfigError),

    /// The operating system could not provide random bytes
    #[error("Failed to generate session id: {0}")]
    Random(#[from] getrandom::Error),

    /// The backing store failed
    #[error("Session store error: {0}")]
    Store(String),

    /// A payload could not be encoded for the store
    #[error("Failed to encode session payload: {0}")]
    Encode(#[from] serde_json::Error),
}

/// Result type for session operations
pub type Result<T> = std::result::Result<T, SessionError>;
