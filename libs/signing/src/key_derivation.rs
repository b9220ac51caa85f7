//! Key derivation from a long-term secret and a salt
//!
//! The salt namespaces signatures: two signers sharing a secret but using
//! different salts never accept each other's tokens.

use crate::digest::DigestMethod;
use crate::error::ConfigError;
use std::fmt;
use std::str::FromStr;

/// Marker inserted between value and key by the django-style concatenation
const DJANGO_MARKER: &[u8] = b"signer";

/// How the value and key are joined before plain hashing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Concat {
    /// `value ‖ key`
    Plain,
    /// `value ‖ "signer" ‖ key`
    #[default]
    Django,
}

impl Concat {
    /// Plain digest of `value` joined with `key`
    #[must_use]
    pub fn digest(self, digest: DigestMethod, key: &[u8], value: &[u8]) -> Vec<u8> {
        match self {
            Self::Plain => digest.hash(&[value, key]),
            Self::Django => digest.hash(&[value, DJANGO_MARKER, key]),
        }
    }
}

/// Method turning `(secret, salt)` into the signing key
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum KeyDerivation {
    /// `digest(salt ‖ secret)`
    Concat,
    /// `digest(salt ‖ "signer" ‖ secret)`, compatible with Django-issued tokens
    #[default]
    DjangoConcat,
    /// `HMAC(secret, salt)`
    Hmac,
    /// The raw secret, salt ignored. Testing and interop only.
    None,
}

impl KeyDerivation {
    /// Name used in configuration
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Concat => "concat",
            Self::DjangoConcat => "django-concat",
            Self::Hmac => "hmac",
            Self::None => "none",
        }
    }

    /// Concatenation style for the plain-hash methods
    #[must_use]
    pub fn concat(self) -> Option<Concat> {
        match self {
            Self::Concat => Some(Concat::Plain),
            Self::DjangoConcat => Some(Concat::Django),
            Self::Hmac | Self::None => None,
        }
    }

    /// Resolve the digest name the way this method requires
    ///
    /// The concatenation methods fall back to SHA-1 for unknown names,
    /// HMAC derivation rejects them. `None` ignores the digest.
    pub fn resolve_digest(self, name: &str) -> Result<DigestMethod, ConfigError> {
        match self {
            Self::Concat | Self::DjangoConcat | Self::None => {
                Ok(DigestMethod::from_name_or_default(name))
            }
            Self::Hmac => name.parse(),
        }
    }

    /// Derive the signing key
    #[must_use]
    pub fn derive_key(self, secret: &[u8], salt: &[u8], digest: DigestMethod) -> Vec<u8> {
        match self {
            Self::Concat => Concat::Plain.digest(digest, secret, salt),
            Self::DjangoConcat => Concat::Django.digest(digest, secret, salt),
            Self::Hmac => digest.hmac(secret, salt),
            Self::None => secret.to_vec(),
        }
    }
}

impl fmt::Display for KeyDerivation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for KeyDerivation {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "concat" => Ok(Self::Concat),
            "django-concat" => Ok(Self::DjangoConcat),
            "hmac" => Ok(Self::Hmac),
            "none" => Ok(Self::None),
            other => Err(ConfigError::UnknownKeyDerivation(other.to_string())),
        }
    }
}
