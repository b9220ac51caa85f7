//! Signing algorithms
//!
//! A closed set of algorithms computing the raw signature of a value under a
//! derived key. Verification recomputes the signature and compares it in
//! constant time.

use crate::digest::DigestMethod;
use crate::error::ConfigError;
use crate::key_derivation::Concat;
use std::fmt;
use std::str::FromStr;
use subtle::ConstantTimeEq;

/// Algorithm producing the raw signature bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SigningAlgorithm {
    /// Plain digest over the value joined with the key
    Hash {
        /// Digest used for the signature
        digest: DigestMethod,
        /// How value and key are joined
        concat: Concat,
    },
    /// HMAC keyed with the derived key
    Hmac {
        /// Digest used by the HMAC
        digest: DigestMethod,
    },
    /// Empty signature, no integrity guarantee
    None,
}

impl Default for SigningAlgorithm {
    fn default() -> Self {
        Self::Hmac {
            digest: DigestMethod::Sha1,
        }
    }
}

impl SigningAlgorithm {
    /// Plain-hash algorithm; unknown digest names fall back to SHA-1
    #[must_use]
    pub fn hash(digest_name: &str, concat: Concat) -> Self {
        Self::Hash {
            digest: DigestMethod::from_name_or_default(digest_name),
            concat,
        }
    }

    /// HMAC algorithm; unknown digest names are rejected
    pub fn hmac(digest_name: &str) -> Result<Self, ConfigError> {
        Ok(Self::Hmac {
            digest: digest_name.parse()?,
        })
    }

    /// Compute the raw signature of `value`
    #[must_use]
    pub fn get_signature(&self, key: &[u8], value: &[u8]) -> Vec<u8> {
        match *self {
            Self::Hash { digest, concat } => concat.digest(digest, key, value),
            Self::Hmac { digest } => digest.hmac(key, value),
            Self::None => Vec::new(),
        }
    }

    /// Check `signature` against the expected signature in constant time
    ///
    /// The comparison time does not depend on where the first differing
    /// byte is. Length mismatches return `false`.
    #[must_use]
    pub fn verify_signature(&self, key: &[u8], value: &[u8], signature: &[u8]) -> bool {
        let expected = self.get_signature(key, value);
        expected.ct_eq(signature).into()
    }
}

/// Algorithm selector used in configuration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AlgorithmKind {
    /// [`SigningAlgorithm::Hmac`]
    #[default]
    Hmac,
    /// [`SigningAlgorithm::Hash`]
    Hash,
    /// [`SigningAlgorithm::None`]
    None,
}

impl AlgorithmKind {
    /// Name used in configuration
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Hmac => "hmac",
            Self::Hash => "hash",
            Self::None => "none",
        }
    }
}

impl fmt::Display for AlgorithmKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for AlgorithmKind {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "hmac" => Ok(Self::Hmac),
            "hash" => Ok(Self::Hash),
            "none" => Ok(Self::None),
            other => Err(ConfigError::UnknownAlgorithm(other.to_string())),
        }
    }
}
