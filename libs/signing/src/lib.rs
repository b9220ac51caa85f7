//! Tamper-evident token signing and timed serialization
//!
//! This library signs strings and serialized values with a server-side
//! secret so they can be handed to clients and verified when they come back.
//! It is the authentication boundary for Linkbio session tokens.
//!
//! # Layers
//!
//! - `encoding`: URL-safe base64 without padding, minimal big-endian integers
//! - `key_derivation`: turns the secret and salt into the signing key
//! - `algorithm`: keyed hash over the value (`hmac`, `hash` or `none`)
//! - `signer`: `value<sep>signature` tokens
//! - `timed`: `value<sep>timestamp<sep>signature` tokens with expiry
//! - `serializer`: codec + signer, including timed and URL-safe variants
//! - `error`: the `BadData` family of verification errors
//!
//! # Token format
//!
//! ```text
//! <value>.<b64 signature>
//! <value>.<b64 timestamp>.<b64 signature>
//! ```
//!
//! # Example Usage
//!
//! ```rust
//! use linkbio_signing::{Signer, SignerOptions, UrlSafeTimedSerializer, SerializerOptions};
//! use std::time::Duration;
//!
//! let signer = Signer::new("topsecret", SignerOptions::default()).unwrap();
//! let token = signer.sign("user-42");
//! assert_eq!(signer.unsign(&token).unwrap(), "user-42");
//! assert!(signer.unsign("user-42.AAAA").unwrap_err().is_bad_signature());
//!
//! let serializer =
//!     UrlSafeTimedSerializer::url_safe("topsecret", SerializerOptions::default()).unwrap();
//! let token = serializer.dumps(&["a", "b"]).unwrap();
//! let items: Vec<String> = serializer
//!     .loads(&token, Some(Duration::from_secs(3600)))
//!     .unwrap();
//! assert_eq!(items, ["a", "b"]);
//! ```

#![warn(missing_docs)]

pub mod algorithm;
pub mod clock;
pub mod codec;
pub mod digest;
pub mod encoding;
pub mod error;
pub mod key_derivation;
pub mod serializer;
pub mod signer;
pub mod timed;

// Re-export commonly used types
pub use algorithm::{AlgorithmKind, SigningAlgorithm};
pub use clock::{Clock, FixedClock, SystemClock};
pub use codec::{JsonCodec, PayloadCodec, UrlSafeCodec};
pub use digest::DigestMethod;
pub use error::{ConfigError, Error, Result};
pub use key_derivation::{Concat, KeyDerivation};
pub use serializer::{
    DEFAULT_SERIALIZER_SALT, Serializer, SerializerOptions, TimedSerializer, UrlSafeSerializer,
    UrlSafeTimedSerializer,
};
pub use signer::{DEFAULT_SEP, DEFAULT_SIGNER_SALT, Signer, SignerOptions};
pub use timed::TimestampSigner;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
