//! Supported digest methods
//!
//! A static allow-list of hash functions usable for key derivation and
//! signing. Names are matched case-insensitively and `_` is accepted in
//! place of `-` (`sha3_512` == `sha3-512`).

use crate::error::ConfigError;
use blake2::{Blake2b512, Blake2s256};
use hmac::digest::Digest;
use hmac::digest::core_api::BlockSizeUser;
use hmac::{Mac, SimpleHmac};
use sha1::Sha1;
use sha2::{Sha224, Sha256, Sha384, Sha512, Sha512_224, Sha512_256};
use sha3::{Sha3_224, Sha3_256, Sha3_384, Sha3_512};
use std::fmt;
use std::str::FromStr;

/// Hash function used by key derivation and signing algorithms
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum DigestMethod {
    /// SHA-1, the legacy default kept for token interop
    #[default]
    Sha1,
    /// SHA-224
    Sha224,
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
    /// SHA-512/224
    Sha512_224,
    /// SHA-512/256
    Sha512_256,
    /// SHA3-224
    Sha3_224,
    /// SHA3-256
    Sha3_256,
    /// SHA3-384
    Sha3_384,
    /// SHA3-512, used for session tokens
    Sha3_512,
    /// BLAKE2b with 512-bit output
    Blake2b512,
    /// BLAKE2s with 256-bit output
    Blake2s256,
}

impl DigestMethod {
    /// Every supported digest
    pub const ALL: [Self; 13] = [
        Self::Sha1,
        Self::Sha224,
        Self::Sha256,
        Self::Sha384,
        Self::Sha512,
        Self::Sha512_224,
        Self::Sha512_256,
        Self::Sha3_224,
        Self::Sha3_256,
        Self::Sha3_384,
        Self::Sha3_512,
        Self::Blake2b512,
        Self::Blake2s256,
    ];

    /// Canonical name of the digest
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            Self::Sha1 => "sha1",
            Self::Sha224 => "sha224",
            Self::Sha256 => "sha256",
            Self::Sha384 => "sha384",
            Self::Sha512 => "sha512",
            Self::Sha512_224 => "sha512-224",
            Self::Sha512_256 => "sha512-256",
            Self::Sha3_224 => "sha3-224",
            Self::Sha3_256 => "sha3-256",
            Self::Sha3_384 => "sha3-384",
            Self::Sha3_512 => "sha3-512",
            Self::Blake2b512 => "blake2b512",
            Self::Blake2s256 => "blake2s256",
        }
    }

    /// Look up a digest by name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        let normalized = name.trim().to_ascii_lowercase().replace('_', "-");
        Self::ALL.into_iter().find(|d| d.name() == normalized)
    }

    /// Resolve a digest name, falling back to SHA-1 when it is unsupported
    ///
    /// Used by the plain-hash algorithm only, so tokens issued by older
    /// configurations stay verifiable. The HMAC path uses [`FromStr`] and
    /// rejects unknown names.
    #[must_use]
    pub fn from_name_or_default(name: &str) -> Self {
        Self::from_name(name).unwrap_or_else(|| {
            log::warn!("Unsupported digest method '{name}', falling back to sha1");
            Self::Sha1
        })
    }

    /// Output size in bytes
    #[must_use]
    pub fn output_size(self) -> usize {
        match self {
            Self::Sha1 => 20,
            Self::Sha224 | Self::Sha512_224 | Self::Sha3_224 => 28,
            Self::Sha256 | Self::Sha512_256 | Self::Sha3_256 | Self::Blake2s256 => 32,
            Self::Sha384 | Self::Sha3_384 => 48,
            Self::Sha512 | Self::Sha3_512 | Self::Blake2b512 => 64,
        }
    }

    /// Plain digest over the concatenation of `parts`
    #[must_use]
    pub fn hash(self, parts: &[&[u8]]) -> Vec<u8> {
        match self {
            Self::Sha1 => hash_parts::<Sha1>(parts),
            Self::Sha224 => hash_parts::<Sha224>(parts),
            Self::Sha256 => hash_parts::<Sha256>(parts),
            Self::Sha384 => hash_parts::<Sha384>(parts),
            Self::Sha512 => hash_parts::<Sha512>(parts),
            Self::Sha512_224 => hash_parts::<Sha512_224>(parts),
            Self::Sha512_256 => hash_parts::<Sha512_256>(parts),
            Self::Sha3_224 => hash_parts::<Sha3_224>(parts),
            Self::Sha3_256 => hash_parts::<Sha3_256>(parts),
            Self::Sha3_384 => hash_parts::<Sha3_384>(parts),
            Self::Sha3_512 => hash_parts::<Sha3_512>(parts),
            Self::Blake2b512 => hash_parts::<Blake2b512>(parts),
            Self::Blake2s256 => hash_parts::<Blake2s256>(parts),
        }
    }

    /// HMAC of `data` keyed with `key`
    #[must_use]
    pub fn hmac(self, key: &[u8], data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha1 => hmac_of::<Sha1>(key, data),
            Self::Sha224 => hmac_of::<Sha224>(key, data),
            Self::Sha256 => hmac_of::<Sha256>(key, data),
            Self::Sha384 => hmac_of::<Sha384>(key, data),
            Self::Sha512 => hmac_of::<Sha512>(key, data),
            Self::Sha512_224 => hmac_of::<Sha512_224>(key, data),
            Self::Sha512_256 => hmac_of::<Sha512_256>(key, data),
            Self::Sha3_224 => hmac_of::<Sha3_224>(key, data),
            Self::Sha3_256 => hmac_of::<Sha3_256>(key, data),
            Self::Sha3_384 => hmac_of::<Sha3_384>(key, data),
            Self::Sha3_512 => hmac_of::<Sha3_512>(key, data),
            Self::Blake2b512 => hmac_of::<Blake2b512>(key, data),
            Self::Blake2s256 => hmac_of::<Blake2s256>(key, data),
        }
    }
}

impl fmt::Display for DigestMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for DigestMethod {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_name(s).ok_or_else(|| ConfigError::UnsupportedDigest(s.to_string()))
    }
}

fn hash_parts<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
    let mut hasher = D::new();
    for part in parts {
        hasher.update(part);
    }
    hasher.finalize().to_vec()
}

fn hmac_of<D: Digest + BlockSizeUser>(key: &[u8], data: &[u8]) -> Vec<u8> {
    let mut mac =
        <SimpleHmac<D> as Mac>::new_from_slice(key).expect("HMAC can take key of any size");
    mac.update(data);
    mac.finalize().into_bytes().to_vec()
}
