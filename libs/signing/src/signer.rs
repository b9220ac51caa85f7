//! Base signer producing `value<sep>signature` tokens
//!
//! The signer owns the secret key, validates its configuration once at
//! construction and caches the derived key. After that every operation is a
//! pure function of the input, so a `Signer` can be shared freely between
//! threads.

use crate::algorithm::{AlgorithmKind, SigningAlgorithm};
use crate::digest::DigestMethod;
use crate::encoding;
use crate::error::{ConfigError, Error, Result};
use crate::key_derivation::KeyDerivation;
use serde::{Deserialize, Serialize};
use std::fmt;
use zeroize::Zeroizing;

/// Default salt for signers
pub const DEFAULT_SIGNER_SALT: &str = "itsdanger.Signer";

/// Default separator between value and signature
pub const DEFAULT_SEP: char = '.';

/// Signer configuration
///
/// Names are validated by [`Signer::new`], so a bad configuration file fails
/// when the signer is built rather than on the first request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SignerOptions {
    /// Namespaces signatures made with the same secret
    pub salt: String,
    /// Delimiter between value and signature
    pub sep: char,
    /// `concat`, `django-concat`, `hmac` or `none`
    pub key_derivation: String,
    /// Digest name, see [`DigestMethod`]
    pub digest_method: String,
    /// `hmac`, `hash` or `none`
    pub algorithm: String,
}

impl Default for SignerOptions {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SIGNER_SALT.to_string(),
            sep: DEFAULT_SEP,
            key_derivation: KeyDerivation::default().name().to_string(),
            digest_method: DigestMethod::default().name().to_string(),
            algorithm: AlgorithmKind::default().name().to_string(),
        }
    }
}

impl SignerOptions {
    /// Same options with a different salt
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    /// Same options with a different digest
    #[must_use]
    pub fn with_digest_method(mut self, digest_method: impl Into<String>) -> Self {
        self.digest_method = digest_method.into();
        self
    }
}

/// Signs values and verifies signed tokens
#[derive(Clone)]
pub struct Signer {
    secret_key: Zeroizing<Vec<u8>>,
    salt: String,
    sep: char,
    key_derivation: KeyDerivation,
    digest: DigestMethod,
    algorithm: SigningAlgorithm,
    derived_key: Zeroizing<Vec<u8>>,
}

impl Signer {
    /// Build a signer from named options
    ///
    /// Fails if the separator collides with the encoding alphabet, if the
    /// key derivation or algorithm name is unknown, or if an HMAC path is
    /// asked for an unsupported digest.
    pub fn new(secret_key: impl AsRef<[u8]>, options: SignerOptions) -> Result<Self, ConfigError> {
        let key_derivation: KeyDerivation = options.key_derivation.parse()?;
        let digest = key_derivation.resolve_digest(&options.digest_method)?;

        let algorithm = match options.algorithm.parse::<AlgorithmKind>()? {
            AlgorithmKind::Hmac => SigningAlgorithm::hmac(&options.digest_method)?,
            AlgorithmKind::Hash => SigningAlgorithm::hash(
                &options.digest_method,
                key_derivation.concat().unwrap_or_default(),
            ),
            AlgorithmKind::None => SigningAlgorithm::None,
        };

        Self::from_parts(
            secret_key,
            &options.salt,
            options.sep,
            key_derivation,
            digest,
            algorithm,
        )
    }

    /// Build a signer from already resolved parts
    ///
    /// `digest` is the digest used by key derivation; the algorithm carries
    /// its own.
    pub fn from_parts(
        secret_key: impl AsRef<[u8]>,
        salt: &str,
        sep: char,
        key_derivation: KeyDerivation,
        digest: DigestMethod,
        algorithm: SigningAlgorithm,
    ) -> Result<Self, ConfigError> {
        if encoding::alphabet_includes(sep) {
            return Err(ConfigError::SeparatorInAlphabet(sep));
        }

        let secret_key = Zeroizing::new(secret_key.as_ref().to_vec());
        let derived_key =
            Zeroizing::new(key_derivation.derive_key(&secret_key, salt.as_bytes(), digest));

        log::debug!(
            "Signer ready (salt={salt:?}, key_derivation={key_derivation}, digest={digest}, algorithm={algorithm:?})"
        );

        Ok(Self {
            secret_key,
            salt: salt.to_string(),
            sep,
            key_derivation,
            digest,
            algorithm,
            derived_key,
        })
    }

    /// Same configuration under a different salt
    #[must_use]
    pub fn with_salt(&self, salt: &str) -> Self {
        let derived_key = Zeroizing::new(self.key_derivation.derive_key(
            &self.secret_key,
            salt.as_bytes(),
            self.digest,
        ));

        Self {
            secret_key: self.secret_key.clone(),
            salt: salt.to_string(),
            sep: self.sep,
            key_derivation: self.key_derivation,
            digest: self.digest,
            algorithm: self.algorithm,
            derived_key,
        }
    }

    /// Salt in use
    #[must_use]
    pub fn salt(&self) -> &str {
        &self.salt
    }

    /// Separator in use
    #[must_use]
    pub fn sep(&self) -> char {
        self.sep
    }

    /// Key derivation method
    #[must_use]
    pub fn key_derivation(&self) -> KeyDerivation {
        self.key_derivation
    }

    /// Signing algorithm
    #[must_use]
    pub fn algorithm(&self) -> SigningAlgorithm {
        self.algorithm
    }

    /// Encoded signature of `value`
    #[must_use]
    pub fn get_signature(&self, value: &str) -> String {
        encoding::encode_bytes(
            self.algorithm
                .get_signature(&self.derived_key, value.as_bytes()),
        )
    }

    /// Append the separator and signature to `value`
    #[must_use]
    pub fn sign(&self, value: &str) -> String {
        let signature = self.get_signature(value);
        let mut signed = String::with_capacity(value.len() + 1 + signature.len());
        signed.push_str(value);
        signed.push(self.sep);
        signed.push_str(&signature);
        signed
    }

    /// Check an encoded signature for `value`
    ///
    /// A signature that does not decode counts as a mismatch.
    #[must_use]
    pub fn verify_signature(&self, value: &str, signature: &str) -> bool {
        let Ok(raw) = encoding::decode_bytes(signature) else {
            return false;
        };
        self.algorithm
            .verify_signature(&self.derived_key, value.as_bytes(), &raw)
    }

    /// Verify a signed token and return its value
    ///
    /// The token is split at the last separator, so the value itself may
    /// contain the separator character.
    pub fn unsign<'a>(&self, signed_value: &'a str) -> Result<&'a str> {
        let Some((value, signature)) = signed_value.rsplit_once(self.sep) else {
            return Err(Error::BadSignature {
                message: format!("No '{}' found in value", self.sep),
                payload: None,
            });
        };

        if self.verify_signature(value, signature) {
            return Ok(value);
        }

        Err(Error::BadSignature {
            message: format!("Signature '{signature}' does not match"),
            payload: Some(value.to_string()),
        })
    }

    /// True if `signed_value` carries a valid signature
    #[must_use]
    pub fn validate(&self, signed_value: &str) -> bool {
        self.unsign(signed_value).is_ok()
    }
}

impl fmt::Debug for Signer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Signer")
            .field("secret_key", &"<redacted>")
            .field("salt", &self.salt)
            .field("sep", &self.sep)
            .field("key_derivation", &self.key_derivation)
            .field("digest", &self.digest)
            .field("algorithm", &self.algorithm)
            .finish_non_exhaustive()
    }
}
