//! Payload codecs turning structured values into signable text

use crate::encoding;
use crate::error::BoxError;
use serde::Serialize;
use serde::de::DeserializeOwned;

/// Converts values to and from the text that gets signed
pub trait PayloadCodec {
    /// Encode `value` as text
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, BoxError>;

    /// Decode text produced by [`PayloadCodec::encode`]
    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, BoxError>;
}

/// Compact JSON
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

impl PayloadCodec for JsonCodec {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, BoxError> {
        Ok(serde_json::to_string(value)?)
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, BoxError> {
        Ok(serde_json::from_str(text)?)
    }
}

/// Wraps another codec's output in URL-safe base64
///
/// Keeps payloads free of separator characters and safe for URLs and
/// headers, whatever the inner codec emits.
#[derive(Debug, Clone, Copy, Default)]
pub struct UrlSafeCodec<C = JsonCodec>(pub C);

impl<C: PayloadCodec> PayloadCodec for UrlSafeCodec<C> {
    fn encode<T: Serialize + ?Sized>(&self, value: &T) -> Result<String, BoxError> {
        Ok(encoding::encode_bytes(self.0.encode(value)?))
    }

    fn decode<T: DeserializeOwned>(&self, text: &str) -> Result<T, BoxError> {
        let bytes = encoding::decode_bytes(text)?;
        let inner = String::from_utf8(bytes)?;
        self.0.decode(&inner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, PartialEq, Serialize, Deserialize)]
    struct Payload {
        id: u32,
        name: String,
    }

    #[test]
    fn test_json_is_compact() {
        let text = JsonCodec
            .encode(&Payload {
                id: 5,
                name: "a.b".to_string(),
            })
            .unwrap();
        assert_eq!(text, r#"{"id":5,"name":"a.b"}"#);
    }

    #[test]
    fn test_url_safe_has_no_separator() {
        let codec = UrlSafeCodec(JsonCodec);
        let text = codec.encode(&vec!["a.b", "c/d", "e+f"]).unwrap();

        assert!(text.chars().all(encoding::alphabet_includes));
        let decoded: Vec<String> = codec.decode(&text).unwrap();
        assert_eq!(decoded, ["a.b", "c/d", "e+f"]);
    }

    #[test]
    fn test_url_safe_rejects_non_base64() {
        let codec = UrlSafeCodec::<JsonCodec>::default();
        assert!(codec.decode::<Payload>("{not base64}").is_err());
        // Valid base64 of invalid UTF-8
        assert!(codec.decode::<Payload>("_w").is_err());
    }
}
