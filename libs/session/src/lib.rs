//! Session tokens for Linkbio
//!
//! Sessions are records in a key-value store keyed by a random identifier.
//! The client receives the identifier signed with `linkbio-signing`, so a
//! token can be checked before the store is touched.
//!
//! ```rust
//! use linkbio_session::{MemoryStore, SessionManager};
//! use std::sync::Arc;
//!
//! let manager = SessionManager::new(Arc::new(MemoryStore::new()), "secret").unwrap();
//! let token = manager.create_session_for_user("42").unwrap().create_token();
//!
//! let session = manager.get_session_from_token(&token).unwrap().unwrap();
//! assert_eq!(session.user_id, "42");
//! assert!(manager.get_session_from_token("forged.token").unwrap().is_none());
//! ```

#![warn(missing_docs)]

pub mod error;
pub mod manager;
pub mod store;

pub use error::{Result, SessionError};
pub use manager::{MAX_AGE, Session, SessionManager, SessionPayload};
pub use store::{MemoryStore, SessionStore};
