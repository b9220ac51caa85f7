//! Key-value store holding session records
//!
//! Production deployments put sessions in Redis; [`MemoryStore`] provides the
//! same semantics (string values with a time to live) for tests and tools.

use crate::error::{Result, SessionError};
use linkbio_signing::{Clock, SystemClock};
use std::collections::HashMap;
use std::sync::RwLock;
use std::time::Duration;

/// Minimal string store with per-key expiry
pub trait SessionStore: Send + Sync {
    /// Value under `key`, or `None` when absent or expired
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Store `value` under `key`, replacing any previous value and TTL
    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()>;

    /// Remove `key`. Removing a missing key is not an error.
    fn del(&self, key: &str) -> Result<()>;
}

#[derive(Debug)]
struct Entry {
    value: String,
    expires_at: u64,
}

/// In-memory [`SessionStore`]
#[derive(Debug, Default)]
pub struct MemoryStore<K: Clock = SystemClock> {
    entries: RwLock<HashMap<String, Entry>>,
    clock: K,
}

impl MemoryStore {
    /// Empty store using the wall clock
    #[must_use]
    pub fn new() -> Self {
        Self::with_clock(SystemClock)
    }
}

impl<K: Clock> MemoryStore<K> {
    /// Empty store with a custom time source
    pub fn with_clock(clock: K) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            clock,
        }
    }

    /// Number of live entries
    pub fn len(&self) -> usize {
        let now = self.clock.now();
        self.entries
            .read()
            .map(|entries| entries.values().filter(|e| e.expires_at > now).count())
            .unwrap_or(0)
    }

    /// True if no live entries remain
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Drop expired entries
    pub fn purge_expired(&self) -> Result<usize> {
        let now = self.clock.now();
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        let before = entries.len();
        entries.retain(|_, e| e.expires_at > now);
        Ok(before - entries.len())
    }
}

fn lock_poisoned() -> SessionError {
    SessionError::Store("Lock poisoned".to_string())
}

impl<K: Clock + Send + Sync> SessionStore for MemoryStore<K> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        let entries = self.entries.read().map_err(|_| lock_poisoned())?;
        let now = self.clock.now();

        Ok(entries
            .get(key)
            .filter(|e| e.expires_at > now)
            .map(|e| e.value.clone()))
    }

    fn set(&self, key: &str, value: &str, ttl: Duration) -> Result<()> {
        let expires_at = self.clock.now().saturating_add(ttl.as_secs());
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;

        entries.insert(
            key.to_string(),
            Entry {
                value: value.to_string(),
                expires_at,
            },
        );
        Ok(())
    }

    fn del(&self, key: &str) -> Result<()> {
        let mut entries = self.entries.write().map_err(|_| lock_poisoned())?;
        entries.remove(key);
        Ok(())
    }
}
