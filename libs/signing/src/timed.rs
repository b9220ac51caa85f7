//! Timestamp signer
//!
//! Appends `<sep><timestamp>` to the value before signing, so the timestamp
//! is authenticated like the rest of the token:
//!
//! ```text
//! <value><sep><b64 timestamp><sep><b64 signature>
//! ```
//!
//! Expiry is checked only after the signature verifies, which keeps
//! "expired" distinct from "tampered".

use crate::clock::{self, Clock, SystemClock};
use crate::encoding;
use crate::error::{ConfigError, Error, Result};
use crate::signer::{Signer, SignerOptions};
use std::time::{Duration, SystemTime};

/// Signer embedding and age-checking a timestamp
#[derive(Debug, Clone)]
pub struct TimestampSigner<K: Clock = SystemClock> {
    signer: Signer,
    clock: K,
}

impl TimestampSigner {
    /// Build a timestamp signer using the wall clock
    pub fn new(secret_key: impl AsRef<[u8]>, options: SignerOptions) -> Result<Self, ConfigError> {
        Ok(Self::from_signer(Signer::new(secret_key, options)?))
    }

    /// Wrap an existing signer using the wall clock
    #[must_use]
    pub fn from_signer(signer: Signer) -> Self {
        Self::with_clock(signer, SystemClock)
    }
}

impl<K: Clock> TimestampSigner<K> {
    /// Wrap an existing signer with a custom time source
    pub fn with_clock(signer: Signer, clock: K) -> Self {
        Self { signer, clock }
    }

    /// Underlying base signer
    pub fn signer(&self) -> &Signer {
        &self.signer
    }

    /// Time source
    pub fn clock(&self) -> &K {
        &self.clock
    }

    /// Same configuration and clock under a different salt
    #[must_use]
    pub fn with_salt(&self, salt: &str) -> Self
    where
        K: Clone,
    {
        Self {
            signer: self.signer.with_salt(salt),
            clock: self.clock.clone(),
        }
    }

    /// Current timestamp in seconds
    pub fn get_timestamp(&self) -> u64 {
        self.clock.now()
    }

    /// Convert a decoded timestamp to a point in time
    pub fn timestamp_to_date(&self, timestamp: u64) -> SystemTime {
        clock::timestamp_to_time(timestamp)
    }

    /// Sign `value` together with the current timestamp
    pub fn sign(&self, value: &str) -> String {
        let timestamp = encoding::encode_int(self.get_timestamp());
        let sep = self.signer.sep();

        let mut timestamped = String::with_capacity(value.len() + 1 + timestamp.len());
        timestamped.push_str(value);
        timestamped.push(sep);
        timestamped.push_str(&timestamp);

        self.signer.sign(&timestamped)
    }

    /// Verify a timed token and return its value
    ///
    /// With `max_age`, tokens older than that many seconds fail with
    /// [`Error::SignatureExpired`]. A token exactly `max_age` old is accepted.
    pub fn unsign<'a>(&self, signed_value: &'a str, max_age: Option<Duration>) -> Result<&'a str> {
        self.unsign_with_timestamp(signed_value, max_age)
            .map(|(value, _)| value)
    }

    /// Verify a timed token and return its value and signing time
    pub fn unsign_with_timestamp<'a>(
        &self,
        signed_value: &'a str,
        max_age: Option<Duration>,
    ) -> Result<(&'a str, SystemTime)> {
        let result = self.signer.unsign(signed_value)?;

        let Some((value, timestamp)) = result.rsplit_once(self.signer.sep()) else {
            return Err(Error::BadTimeSignature {
                message: "timestamp missing".to_string(),
                payload: Some(result.to_string()),
                date_signed: None,
            });
        };

        let Ok(timestamp) = encoding::decode_int(timestamp) else {
            return Err(Error::BadTimeSignature {
                message: "Malformed timestamp".to_string(),
                payload: Some(value.to_string()),
                date_signed: None,
            });
        };
        let date_signed = self.timestamp_to_date(timestamp);

        if let Some(max_age) = max_age {
            let age = i128::from(self.get_timestamp()) - i128::from(timestamp);
            let max_age = max_age.as_secs();

            if age > i128::from(max_age) {
                return Err(Error::SignatureExpired {
                    message: format!("Signature age {age} > {max_age} seconds"),
                    payload: Some(value.to_string()),
                    date_signed,
                });
            }
        }

        Ok((value, date_signed))
    }

    /// True if the token verifies and is not older than `max_age`
    pub fn validate(&self, signed_value: &str, max_age: Option<Duration>) -> bool {
        self.unsign(signed_value, max_age).is_ok()
    }
}
