//! URL-safe base64 encoding for bytes and integers
//!
//! Signatures, timestamps and URL-safe payloads all use the same alphabet:
//! standard base64 with `+` → `-`, `/` → `_` and the `=` padding stripped.
//! Decoding accepts tokens with or without padding.

use crate::error::{Error, Result};
use base64::Engine;
use base64::alphabet;
use base64::engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig};

const URL_SAFE_ENGINE: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new()
        .with_encode_padding(false)
        .with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// Characters that may appear in an encoded value
const BASE64_SYMBOLS: &[char] = &['-', '_', '='];

/// Encode bytes to a URL-safe, unpadded base64 string
#[must_use]
pub fn encode_bytes(data: impl AsRef<[u8]>) -> String {
    URL_SAFE_ENGINE.encode(data)
}

/// Decode a URL-safe base64 string produced by [`encode_bytes`]
pub fn decode_bytes(encoded: &str) -> Result<Vec<u8>> {
    URL_SAFE_ENGINE
        .decode(encoded)
        .map_err(|e| Error::bad_data(format!("Invalid base64-encoded data: {e}")))
}

/// Encode an integer as its minimal big-endian bytes, then [`encode_bytes`]
///
/// Zero is encoded as a single zero byte.
#[must_use]
pub fn encode_int(value: u64) -> String {
    let bytes = value.to_be_bytes();
    let first = bytes
        .iter()
        .position(|&b| b != 0)
        .unwrap_or(bytes.len() - 1);
    encode_bytes(&bytes[first..])
}

/// Decode an integer produced by [`encode_int`]
pub fn decode_int(encoded: &str) -> Result<u64> {
    let bytes = decode_bytes(encoded)?;

    if bytes.is_empty() || bytes.len() > 8 {
        return Err(Error::bad_data(format!(
            "Invalid encoded integer: {} bytes",
            bytes.len()
        )));
    }

    Ok(bytes
        .iter()
        .fold(0u64, |acc, &b| (acc << 8) | u64::from(b)))
}

/// Check whether `c` belongs to the encoding alphabet
///
/// Letters, digits and `-_=`. A separator must never satisfy this.
#[must_use]
pub fn alphabet_includes(c: char) -> bool {
    c.is_ascii_alphanumeric() || BASE64_SYMBOLS.contains(&c)
}
