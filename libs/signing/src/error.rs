//! Error taxonomy shared by every signer and serializer
//!
//! Every failure a caller can get back from `unsign`/`loads` is a `BadData`
//! class error. The variants refine it:
//!
//! ```text
//! BadData
//! ├── BadSignature { payload }
//! │   └── BadTimeSignature { payload, date_signed }
//! │       └── SignatureExpired { payload, date_signed }
//! └── BadPayload { source }
//! ```
//!
//! Rust has no subclassing, so the chain is expressed through the `is_*`
//! predicates: a `SignatureExpired` answers `true` to `is_bad_signature()`,
//! `is_bad_time_signature()` and `is_expired()`.
//!
//! Problems with the signer configuration itself are reported separately as
//! [`ConfigError`] at construction time.

use std::time::SystemTime;
use thiserror::Error;

/// Boxed codec error kept as the source of a [`Error::BadPayload`]
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Signing and verification errors
#[derive(Error, Debug)]
pub enum Error {
    /// Malformed input that is not tied to a signature check
    #[error("{message}")]
    BadData {
        /// Human readable description
        message: String,
    },

    /// The signature does not match or the token cannot be split
    #[error("{message}")]
    BadSignature {
        /// Human readable description
        message: String,
        /// The value that failed the signature test. Untrusted.
        payload: Option<String>,
    },

    /// The timestamp of a timed token is missing or malformed
    #[error("{message}")]
    BadTimeSignature {
        /// Human readable description
        message: String,
        /// The authenticated value without its timestamp, if recovered
        payload: Option<String>,
        /// When the token was signed, if the timestamp could be decoded
        date_signed: Option<SystemTime>,
    },

    /// The timestamp is older than the allowed maximum age
    #[error("{message}")]
    SignatureExpired {
        /// Human readable description
        message: String,
        /// The authenticated value without its timestamp
        payload: Option<String>,
        /// When the token was signed
        date_signed: SystemTime,
    },

    /// The bytes are authentic but the payload codec rejected them
    #[error("{message}")]
    BadPayload {
        /// Human readable description
        message: String,
        /// The codec error that caused the failure
        #[source]
        source: BoxError,
    },
}

impl Error {
    pub(crate) fn bad_data(message: impl Into<String>) -> Self {
        Self::BadData {
            message: message.into(),
        }
    }

    pub(crate) fn bad_payload(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::BadPayload {
            message: message.into(),
            source: source.into(),
        }
    }

    /// True for `BadSignature` and everything derived from it
    #[must_use]
    pub fn is_bad_signature(&self) -> bool {
        matches!(
            self,
            Self::BadSignature { .. } | Self::BadTimeSignature { .. } | Self::SignatureExpired { .. }
        )
    }

    /// True for `BadTimeSignature` and `SignatureExpired`
    #[must_use]
    pub fn is_bad_time_signature(&self) -> bool {
        matches!(
            self,
            Self::BadTimeSignature { .. } | Self::SignatureExpired { .. }
        )
    }

    /// True only for `SignatureExpired`
    #[must_use]
    pub fn is_expired(&self) -> bool {
        matches!(self, Self::SignatureExpired { .. })
    }

    /// True only for `BadPayload`
    #[must_use]
    pub fn is_bad_payload(&self) -> bool {
        matches!(self, Self::BadPayload { .. })
    }

    /// Error message without the variant name
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::BadData { message }
            | Self::BadSignature { message, .. }
            | Self::BadTimeSignature { message, .. }
            | Self::SignatureExpired { message, .. }
            | Self::BadPayload { message, .. } => message,
        }
    }

    /// The untrusted payload attached to a signature failure
    ///
    /// Never treat this value as authenticated.
    #[must_use]
    pub fn payload(&self) -> Option<&str> {
        match self {
            Self::BadSignature { payload, .. }
            | Self::BadTimeSignature { payload, .. }
            | Self::SignatureExpired { payload, .. } => payload.as_deref(),
            Self::BadData { .. } | Self::BadPayload { .. } => None,
        }
    }

    /// When the token was signed, for timed signature failures
    #[must_use]
    pub fn date_signed(&self) -> Option<SystemTime> {
        match self {
            Self::BadTimeSignature { date_signed, .. } => *date_signed,
            Self::SignatureExpired { date_signed, .. } => Some(*date_signed),
            _ => None,
        }
    }
}

/// Result type for signing operations
pub type Result<T, E = Error> = std::result::Result<T, E>;

/// Invalid signer configuration
///
/// These are programmer errors. They are raised while constructing a signer
/// or serializer, never while signing or verifying.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    /// The separator may appear inside an encoded signature
    #[error(
        "The given separator {0:?} cannot be used because it may be contained in the signature itself. Alphanumeric characters and `-_=` must not be used."
    )]
    SeparatorInAlphabet(char),

    /// Key derivation name is not one of `concat`, `django-concat`, `hmac`, `none`
    #[error("Unknown key derivation method: {0}")]
    UnknownKeyDerivation(String),

    /// Digest name is not in the supported allow-list
    #[error("Unsupported digest method: {0}")]
    UnsupportedDigest(String),

    /// Signing algorithm name is not one of `hmac`, `hash`, `none`
    #[error("Unknown signing algorithm: {0}")]
    UnknownAlgorithm(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::{Duration, UNIX_EPOCH};

    #[test]
    fn test_expired_is_every_ancestor() {
        let err = Error::SignatureExpired {
            message: "Signature age 61 > 60 seconds".to_string(),
            payload: Some("user-42".to_string()),
            date_signed: UNIX_EPOCH + Duration::from_secs(10),
        };

        assert!(err.is_bad_signature());
        assert!(err.is_bad_time_signature());
        assert!(err.is_expired());
        assert!(!err.is_bad_payload());
        assert_eq!(err.payload(), Some("user-42"));
        assert_eq!(
            err.date_signed(),
            Some(UNIX_EPOCH + Duration::from_secs(10))
        );
    }

    #[test]
    fn test_bad_payload_is_not_a_signature_error() {
        let source = serde_json::from_str::<u32>("nope").unwrap_err();
        let err = Error::bad_payload("could not load", source);

        assert!(err.is_bad_payload());
        assert!(!err.is_bad_signature());
        assert!(err.payload().is_none());
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_display_is_message() {
        let err = Error::BadSignature {
            message: "No '.' found in value".to_string(),
            payload: None,
        };
        assert_eq!(err.to_string(), "No '.' found in value");
        assert_eq!(err.message(), "No '.' found in value");
    }
}
