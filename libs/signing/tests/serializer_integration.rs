//! Integration tests for the serializer stack
//!
//! Exercises the public API the way the session layer uses it: URL-safe
//! timed tokens carrying a small JSON document.

use linkbio_signing::clock::FixedClock;
use linkbio_signing::{
    Error, JsonCodec, SerializerOptions, SignerOptions, TimedSerializer, UrlSafeCodec,
    UrlSafeSerializer, UrlSafeTimedSerializer,
};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct SessionPayload {
    version: u32,
    #[serde(rename = "userId")]
    user_id: String,
}

const T0: u64 = 1_700_000_000;
const MONTH: Duration = Duration::from_secs(2_592_000);

fn session_options() -> SerializerOptions {
    SerializerOptions {
        signer: SignerOptions::default().with_digest_method("sha3-512"),
        ..SerializerOptions::default()
    }
}

fn timed(clock: Arc<FixedClock>) -> UrlSafeTimedSerializer<Arc<FixedClock>> {
    TimedSerializer::with_clock("secret", session_options(), UrlSafeCodec(JsonCodec), clock)
        .unwrap()
}

fn payload() -> SessionPayload {
    SessionPayload {
        version: 1,
        user_id: "1790001234567890".to_string(),
    }
}

#[test]
fn test_session_token_lifecycle() {
    let clock = Arc::new(FixedClock::new(T0));
    let serializer = timed(Arc::clone(&clock));
    let token = serializer.dumps(&payload()).unwrap();

    assert_eq!(token.matches('.').count(), 2);

    clock.advance(Duration::from_secs(3600));
    let (loaded, signed_at) = serializer
        .loads_with_timestamp::<SessionPayload>(&token, Some(MONTH))
        .unwrap();
    assert_eq!(loaded, payload());
    assert_eq!(
        signed_at,
        std::time::UNIX_EPOCH + Duration::from_secs(T0)
    );

    clock.set(T0 + MONTH.as_secs() + 1);
    let err = serializer
        .loads::<SessionPayload>(&token, Some(MONTH))
        .unwrap_err();
    assert!(err.is_expired());
    // The expired payload is still available for diagnostics
    assert!(err.payload().is_some());
}

#[test]
fn test_remediation_paths_are_distinct() {
    let clock = Arc::new(FixedClock::new(T0));
    let serializer = timed(Arc::clone(&clock));
    let token = serializer.dumps(&payload()).unwrap();

    // Tampered
    let (body, signature) = token.rsplit_once('.').unwrap();
    let tampered = format!("{body}x.{signature}");
    let tampered_err = serializer
        .loads::<SessionPayload>(&tampered, Some(MONTH))
        .unwrap_err();
    assert!(matches!(tampered_err, Error::BadSignature { .. }));

    // Authentic but not a session payload
    let wrong_shape = serializer.dumps(&["not", "a", "session"]).unwrap();
    let payload_err = serializer
        .loads::<SessionPayload>(&wrong_shape, Some(MONTH))
        .unwrap_err();
    assert!(payload_err.is_bad_payload());

    // Expired
    clock.set(T0 + 2 * MONTH.as_secs());
    let expired_err = serializer
        .loads::<SessionPayload>(&token, Some(MONTH))
        .unwrap_err();
    assert!(expired_err.is_expired());
}

#[test]
fn test_timed_and_untimed_tokens_do_not_mix() {
    let clock = Arc::new(FixedClock::new(T0));
    let timed = timed(clock);
    let untimed = UrlSafeSerializer::url_safe("secret", session_options()).unwrap();

    let untimed_token = untimed.dumps(&payload()).unwrap();
    let err = timed
        .loads::<SessionPayload>(&untimed_token, None)
        .unwrap_err();
    assert!(err.is_bad_time_signature());

    let timed_token = timed.dumps(&payload()).unwrap();
    assert!(untimed.loads::<SessionPayload>(&timed_token).is_err());
}

#[test]
fn test_different_secrets_do_not_verify() {
    let a = UrlSafeSerializer::url_safe("secret-a", session_options()).unwrap();
    let b = UrlSafeSerializer::url_safe("secret-b", session_options()).unwrap();

    let token = a.dumps(&payload()).unwrap();
    assert!(b.loads::<SessionPayload>(&token).unwrap_err().is_bad_signature());
}

/// One serializer shared by many threads gives every thread correct results
#[test]
fn test_shared_serializer_across_threads() {
    let clock = Arc::new(FixedClock::new(T0));
    let serializer = Arc::new(timed(clock));
    let num_threads = 8;

    let handles: Vec<_> = (0..num_threads)
        .map(|i| {
            let serializer = Arc::clone(&serializer);
            thread::spawn(move || {
                for n in 0..100 {
                    let payload = SessionPayload {
                        version: 1,
                        user_id: format!("{i}-{n}"),
                    };
                    let token = serializer.dumps(&payload).unwrap();
                    let loaded: SessionPayload = serializer.loads(&token, Some(MONTH)).unwrap();
                    assert_eq!(loaded, payload);
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
}
