//! Integration tests for session creation, lookup and expiry

use linkbio_session::{MAX_AGE, MemoryStore, SessionManager, SessionStore};
use linkbio_signing::FixedClock;
use std::sync::Arc;
use std::time::Duration;

const T0: u64 = 1_700_000_000;

type ClockedStore = MemoryStore<Arc<FixedClock>>;

fn setup() -> (SessionManager<ClockedStore>, Arc<ClockedStore>, Arc<FixedClock>) {
    let _ = env_logger::builder().is_test(true).try_init();

    let clock = Arc::new(FixedClock::new(T0));
    let store = Arc::new(MemoryStore::with_clock(Arc::clone(&clock)));
    let manager = SessionManager::new(Arc::clone(&store), "session-secret").unwrap();
    (manager, store, clock)
}

#[test]
fn test_token_resolves_to_session() {
    let (manager, _, _) = setup();
    let session = manager.create_session_for_user("1790001234567890").unwrap();
    let token = session.create_token();

    let resolved = manager.get_session_from_token(&token).unwrap().unwrap();
    assert_eq!(resolved.session_id, session.session_id);
    assert_eq!(resolved.user_id, "1790001234567890");
}

#[test]
fn test_tampered_token_yields_none() {
    let (manager, _, _) = setup();
    let token = manager.create_session_for_user("42").unwrap().create_token();

    let (id, signature) = token.rsplit_once('.').unwrap();
    let replacement = if id.ends_with('A') { 'B' } else { 'A' };
    let forged = format!("{}{replacement}.{signature}", &id[..id.len() - 1]);
    assert!(manager.get_session_from_token(&forged).unwrap().is_none());
    assert!(manager.get_session_from_token("no-separator").unwrap().is_none());
    assert!(manager.get_session_from_token("").unwrap().is_none());
}

#[test]
fn test_token_from_another_secret_yields_none() {
    let (manager, store, _) = setup();
    let other = SessionManager::new(store, "other-secret").unwrap();
    let token = other.create_session_for_user("42").unwrap().create_token();

    assert!(manager.get_session_from_token(&token).unwrap().is_none());
}

#[test]
fn test_session_expires_after_max_age() {
    let (manager, _, clock) = setup();
    let token = manager.create_session_for_user("42").unwrap().create_token();

    clock.set(T0 + MAX_AGE - 1);
    assert!(manager.get_session_from_token(&token).unwrap().is_some());

    // The lookup above refreshed the TTL
    clock.set(T0 + 2 * MAX_AGE - 2);
    assert!(manager.get_session_from_token(&token).unwrap().is_some());

    clock.advance(Duration::from_secs(MAX_AGE));
    assert!(manager.get_session_from_token(&token).unwrap().is_none());
}

#[test]
fn test_destroy_invalidates_token() {
    let (manager, store, _) = setup();
    let session = manager.create_session_for_user("42").unwrap();
    let token = session.create_token();

    session.destroy().unwrap();
    assert!(manager.get_session_from_token(&token).unwrap().is_none());
    assert!(store.is_empty());
}

#[test]
fn test_unknown_session_id_yields_none() {
    let (manager, store, _) = setup();
    let session = manager.create_session_for_user("42").unwrap();
    let token = session.create_token();

    store.del(&format!("sessions:{}", session.session_id)).unwrap();
    assert!(manager.get_session_from_token(&token).unwrap().is_none());
}

#[test]
fn test_sessions_are_independent() {
    let (manager, store, _) = setup();
    let a = manager.create_session_for_user("a").unwrap();
    let b = manager.create_session_for_user("b").unwrap();
    assert_eq!(store.len(), 2);

    a.destroy().unwrap();
    let resolved = manager
        .get_session_from_token(&b.create_token())
        .unwrap()
        .unwrap();
    assert_eq!(resolved.user_id, "b");
}
