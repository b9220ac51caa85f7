//! Known-answer tests pinning the wire format
//!
//! Tokens issued by earlier deployments must keep verifying, so these
//! vectors must never change.

use linkbio_signing::{Serializer, SerializerOptions, Signer, SignerOptions};

fn signer(digest: &str) -> Signer {
    Signer::new("topsecret", SignerOptions::default().with_digest_method(digest)).unwrap()
}

#[test]
fn test_default_hmac_sha1() {
    assert_eq!(
        signer("sha1").sign("user-42"),
        "user-42.PUMm2eM4Ldszy49Ku5lssseKfkw"
    );
}

#[test]
fn test_hmac_sha256() {
    let signer = signer("sha256");
    let signed = signer.sign("user-42");

    assert_eq!(signed, "user-42.y3JFlqkrYFaDdBPG9R3Wqao2EtWN8ZkiY5W0M1nQBps");
    assert_eq!(signer.unsign(&signed).unwrap(), "user-42");

    let err = signer.unsign("user-42.AAAA").unwrap_err();
    assert!(err.is_bad_signature());
    assert_eq!(err.payload(), Some("user-42"));
}

#[test]
fn test_hmac_sha3_512() {
    assert_eq!(
        signer("sha3-512").get_signature("user-42"),
        "sB2lfZQiuY3WW_41f_JRYTPvhWsIZBL7Fc2JXwvzhZQlkviwK6JaTe82j0gI5lcBcBAGgI-G7ttcnYl8KTUDeQ"
    );
}

#[test]
fn test_digest_names_are_case_insensitive() {
    assert_eq!(
        signer("SHA3_512").get_signature("user-42"),
        signer("sha3-512").get_signature("user-42")
    );
}

#[test]
fn test_serializer_default_salt() {
    let serializer = Serializer::new("secret", SerializerOptions::default()).unwrap();
    let signed = serializer.dumps(&serde_json::json!({"a": 1})).unwrap();

    assert_eq!(signed, r#"{"a":1}.gryXywLAvm54S5Df60l7TXmiGFE"#);
}
