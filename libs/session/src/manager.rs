//! Session manager
//!
//! A session is a random identifier whose record lives in the store under
//! `sessions:<id>`. Clients hold the signed identifier as their token; the
//! store TTL bounds the session lifetime and is refreshed on every use.

use crate::error::{Result, SessionError};
use crate::store::SessionStore;
use linkbio_signing::{Signer, SignerOptions, encoding};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

/// Session lifetime in seconds (30 days)
pub const MAX_AGE: u64 = 2_592_000;

/// Current payload version
pub const PAYLOAD_VERSION: u32 = 1;

/// Digest used to sign session tokens
pub const SESSION_DIGEST: &str = "sha3-512";

/// Bytes of entropy in a session id
const SESSION_ID_BYTES: usize = 32;

/// Record stored for each session
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SessionPayload {
    /// Record layout version
    pub version: u32,
    /// Owner of the session
    #[serde(rename = "userId")]
    pub user_id: String,
}

fn require_secret(value: Option<String>) -> Result<String> {
    value
        .filter(|key| !key.is_empty())
        .ok_or(SessionError::MissingSecretKey)
}

fn store_key(session_id: &str) -> String {
    format!("sessions:{session_id}")
}

/// An authenticated session
#[derive(Debug)]
pub struct Session<S: SessionStore> {
    store: Arc<S>,
    signer: Arc<Signer>,
    /// Random identifier, URL-safe encoded
    pub session_id: String,
    /// Owner of the session
    pub user_id: String,
}

impl<S: SessionStore> Session<S> {
    /// Write the record and reset its TTL
    pub fn save(&self) -> Result<()> {
        let payload = serde_json::to_string(&SessionPayload {
            version: PAYLOAD_VERSION,
            user_id: self.user_id.clone(),
        })?;

        self.store.set(
            &store_key(&self.session_id),
            &payload,
            Duration::from_secs(MAX_AGE),
        )
    }

    /// Remove the record, invalidating every token for this session
    pub fn destroy(&self) -> Result<()> {
        self.store.del(&store_key(&self.session_id))
    }

    /// Signed token to hand to the client
    pub fn create_token(&self) -> String {
        self.signer.sign(&self.session_id)
    }
}

/// Creates sessions and resolves tokens back to them
pub struct SessionManager<S: SessionStore> {
    store: Arc<S>,
    signer: Arc<Signer>,
}

impl<S: SessionStore> std::fmt::Debug for SessionManager<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionManager")
            .field("signer", &self.signer)
            .finish_non_exhaustive()
    }
}

impl<S: SessionStore> SessionManager<S> {
    /// Manager signing tokens with `secret_key`
    pub fn new(store: Arc<S>, secret_key: impl AsRef<[u8]>) -> Result<Self> {
        let signer = Signer::new(
            secret_key,
            SignerOptions::default().with_digest_method(SESSION_DIGEST),
        )?;

        Ok(Self {
            store,
            signer: Arc::new(signer),
        })
    }

    /// Manager reading its secret from `SECRET_KEY`
    pub fn from_env(store: Arc<S>) -> Result<Self> {
        let secret_key = require_secret(std::env::var("SECRET_KEY").ok())?;
        Self::new(store, secret_key)
    }

    /// Start a new session for `user_id` and persist it
    pub fn create_session_for_user(&self, user_id: &str) -> Result<Session<S>> {
        let mut id = [0u8; SESSION_ID_BYTES];
        getrandom::fill(&mut id)?;

        let session = self.session(encoding::encode_bytes(id), user_id.to_string());
        session.save()?;
        log::debug!("Created session for user {user_id}");
        Ok(session)
    }

    /// Resolve a client token to its session
    ///
    /// Returns `Ok(None)` when the token is invalid, the session is unknown or
    /// expired, or its record cannot be read. Only store failures are errors.
    /// A resolved session has its TTL refreshed.
    pub fn get_session_from_token(&self, token: &str) -> Result<Option<Session<S>>> {
        let session_id = match self.signer.unsign(token) {
            Ok(session_id) => session_id,
            Err(e) => {
                log::debug!(
                    "Rejected session token: {e} (untrusted payload: {:?})",
                    e.payload()
                );
                return Ok(None);
            }
        };

        let Some(record) = self.store.get(&store_key(session_id))? else {
            log::info!("No session for token, expired or destroyed");
            return Ok(None);
        };

        let payload: SessionPayload = match serde_json::from_str(&record) {
            Ok(payload) => payload,
            Err(e) => {
                log::warn!("Unreadable session record: {e}");
                return Ok(None);
            }
        };

        if payload.version != PAYLOAD_VERSION {
            log::warn!("Unknown session payload version {}", payload.version);
            return Ok(None);
        }

        let session = self.session(session_id.to_string(), payload.user_id);
        session.save()?;
        Ok(Some(session))
    }

    fn session(&self, session_id: String, user_id: String) -> Session<S> {
        Session {
            store: Arc::clone(&self.store),
            signer: Arc::clone(&self.signer),
            session_id,
            user_id,
        }
    }
}
