//! Serializers: a signer composed with a payload codec
//!
//! `dumps` encodes a value with the codec and signs the text, `loads`
//! verifies and decodes it. Codec failures after a successful verification
//! are reported as [`Error::BadPayload`], never as signature errors: the
//! bytes are genuine, they just are not a valid payload.

use crate::clock::{Clock, SystemClock};
use crate::codec::{JsonCodec, PayloadCodec, UrlSafeCodec};
use crate::error::{ConfigError, Error, Result};
use crate::signer::{Signer, SignerOptions};
use crate::timed::TimestampSigner;
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::time::{Duration, SystemTime};

/// Default salt for serializers
pub const DEFAULT_SERIALIZER_SALT: &str = "itsdanger.Serializer";

/// Serializer configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "kebab-case")]
pub struct SerializerOptions {
    /// Salt for the signer. Replaces `signer.salt`.
    pub salt: String,
    /// Remaining signer options
    pub signer: SignerOptions,
}

impl Default for SerializerOptions {
    fn default() -> Self {
        Self {
            salt: DEFAULT_SERIALIZER_SALT.to_string(),
            signer: SignerOptions::default(),
        }
    }
}

impl SerializerOptions {
    /// Same options with a different salt
    #[must_use]
    pub fn with_salt(mut self, salt: impl Into<String>) -> Self {
        self.salt = salt.into();
        self
    }

    fn signer_options(&self) -> SignerOptions {
        self.signer.clone().with_salt(self.salt.clone())
    }
}

fn dump_payload<C, T>(codec: &C, value: &T) -> Result<String>
where
    C: PayloadCodec,
    T: Serialize + ?Sized,
{
    codec.encode(value).map_err(|e| {
        Error::bad_payload(
            "Could not dump the payload because an exception occurred on serializing the data.",
            e,
        )
    })
}

fn load_payload<C, T>(codec: &C, payload: &str) -> Result<T>
where
    C: PayloadCodec,
    T: DeserializeOwned,
{
    codec.decode(payload).map_err(|e| {
        log::debug!("Authenticated payload failed to decode: {e}");
        Error::bad_payload(
            "Could not load the payload because an exception occurred on unserializing the data.",
            e,
        )
    })
}

/// Signs and verifies serialized values
#[derive(Debug, Clone)]
pub struct Serializer<C = JsonCodec> {
    signer: Signer,
    codec: C,
}

/// Serializer whose payload is URL-safe base64 of compact JSON
pub type UrlSafeSerializer = Serializer<UrlSafeCodec<JsonCodec>>;

impl Serializer<JsonCodec> {
    /// JSON serializer
    pub fn new(secret_key: impl AsRef<[u8]>, options: SerializerOptions) -> Result<Self, ConfigError> {
        Self::with_codec(secret_key, options, JsonCodec)
    }
}

impl Serializer<UrlSafeCodec<JsonCodec>> {
    /// URL-safe JSON serializer
    pub fn url_safe(
        secret_key: impl AsRef<[u8]>,
        options: SerializerOptions,
    ) -> Result<Self, ConfigError> {
        Self::with_codec(secret_key, options, UrlSafeCodec(JsonCodec))
    }
}

impl<C: PayloadCodec> Serializer<C> {
    /// Serializer with a custom codec
    pub fn with_codec(
        secret_key: impl AsRef<[u8]>,
        options: SerializerOptions,
        codec: C,
    ) -> Result<Self, ConfigError> {
        let signer = Signer::new(secret_key, options.signer_options())?;
        Ok(Self { signer, codec })
    }

    /// Signer under the configured salt
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Encode and sign `value`
    pub fn dumps<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(self.signer.sign(&dump_payload(&self.codec, value)?))
    }

    /// Encode and sign `value` under `salt` instead of the configured salt
    pub fn dumps_with_salt<T: Serialize + ?Sized>(&self, value: &T, salt: &str) -> Result<String> {
        Ok(self
            .signer
            .with_salt(salt)
            .sign(&dump_payload(&self.codec, value)?))
    }

    /// Verify and decode a signed value
    pub fn loads<T: DeserializeOwned>(&self, signed_value: &str) -> Result<T> {
        load_payload(&self.codec, self.signer.unsign(signed_value)?)
    }

    /// Verify under `salt` and decode a signed value
    pub fn loads_with_salt<T: DeserializeOwned>(&self, signed_value: &str, salt: &str) -> Result<T> {
        load_payload(&self.codec, self.signer.with_salt(salt).unsign(signed_value)?)
    }
}

/// Serializer whose tokens carry a signing timestamp
#[derive(Debug, Clone)]
pub struct TimedSerializer<C = JsonCodec, K: Clock = SystemClock> {
    signer: TimestampSigner<K>,
    codec: C,
}

/// Timed serializer whose payload is URL-safe base64 of compact JSON
pub type UrlSafeTimedSerializer<K = SystemClock> = TimedSerializer<UrlSafeCodec<JsonCodec>, K>;

impl TimedSerializer<JsonCodec> {
    /// Timed JSON serializer using the wall clock
    pub fn new(secret_key: impl AsRef<[u8]>, options: SerializerOptions) -> Result<Self, ConfigError> {
        Self::with_clock(secret_key, options, JsonCodec, SystemClock)
    }
}

impl TimedSerializer<UrlSafeCodec<JsonCodec>> {
    /// Timed URL-safe JSON serializer using the wall clock
    pub fn url_safe(
        secret_key: impl AsRef<[u8]>,
        options: SerializerOptions,
    ) -> Result<Self, ConfigError> {
        Self::with_clock(secret_key, options, UrlSafeCodec(JsonCodec), SystemClock)
    }
}

impl<C: PayloadCodec, K: Clock> TimedSerializer<C, K> {
    /// Timed serializer with a custom codec and time source
    pub fn with_clock(
        secret_key: impl AsRef<[u8]>,
        options: SerializerOptions,
        codec: C,
        clock: K,
    ) -> Result<Self, ConfigError> {
        let signer = Signer::new(secret_key, options.signer_options())?;
        Ok(Self {
            signer: TimestampSigner::with_clock(signer, clock),
            codec,
        })
    }

    /// Timestamp signer under the configured salt
    pub fn signer(&self) -> &TimestampSigner<K> {
        &self.signer
    }

    /// Encode, timestamp and sign `value`
    pub fn dumps<T: Serialize + ?Sized>(&self, value: &T) -> Result<String> {
        Ok(self.signer.sign(&dump_payload(&self.codec, value)?))
    }

    /// Encode, timestamp and sign `value` under `salt`
    pub fn dumps_with_salt<T: Serialize + ?Sized>(&self, value: &T, salt: &str) -> Result<String>
    where
        K: Clone,
    {
        Ok(self
            .signer
            .with_salt(salt)
            .sign(&dump_payload(&self.codec, value)?))
    }

    /// Verify, age-check and decode a signed value
    pub fn loads<T: DeserializeOwned>(
        &self,
        signed_value: &str,
        max_age: Option<Duration>,
    ) -> Result<T> {
        load_payload(&self.codec, self.signer.unsign(signed_value, max_age)?)
    }

    /// Like [`TimedSerializer::loads`], also returning when the value was signed
    pub fn loads_with_timestamp<T: DeserializeOwned>(
        &self,
        signed_value: &str,
        max_age: Option<Duration>,
    ) -> Result<(T, SystemTime)> {
        let (payload, signed_at) = self.signer.unsign_with_timestamp(signed_value, max_age)?;
        Ok((load_payload(&self.codec, payload)?, signed_at))
    }

    /// Verify under `salt`, age-check and decode a signed value
    pub fn loads_with_salt<T: DeserializeOwned>(
        &self,
        signed_value: &str,
        max_age: Option<Duration>,
        salt: &str,
    ) -> Result<T>
    where
        K: Clone,
    {
        let signer = self.signer.with_salt(salt);
        load_payload(&self.codec, signer.unsign(signed_value, max_age)?)
    }
}
