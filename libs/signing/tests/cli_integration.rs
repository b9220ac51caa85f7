//! Integration tests for the linkbio-token binary

use std::io::Write;
use std::process::{Command, Output};
use tempfile::NamedTempFile;

const SECRET: &str = "cli-secret";

fn token_cmd(args: &[&str]) -> Output {
    Command::new(env!("CARGO_BIN_EXE_linkbio-token"))
        .args(args)
        .env("SECRET_KEY", SECRET)
        .env_remove("RUST_LOG")
        .output()
        .expect("failed to run linkbio-token")
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).trim().to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

#[test]
fn test_sign_then_unsign() {
    let signed = token_cmd(&["sign", "user-42"]);
    assert!(signed.status.success(), "{}", stderr(&signed));
    let token = stdout(&signed);
    assert!(token.starts_with("user-42."));

    let unsigned = token_cmd(&["unsign", &token]);
    assert!(unsigned.status.success(), "{}", stderr(&unsigned));
    assert_eq!(stdout(&unsigned), "user-42");
}

#[test]
fn test_tampered_token_exits_with_error() {
    let token = stdout(&token_cmd(&["sign", "user-42"]));
    let tampered = token.replacen("user-42", "user-43", 1);

    let output = token_cmd(&["unsign", &tampered]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Error: Bad signature"));
}

#[test]
fn test_timed_dumps_loads_url_safe() {
    let token = token_cmd(&["dumps", "--timed", "--url-safe", r#"{"userId":"42"}"#]);
    assert!(token.status.success(), "{}", stderr(&token));
    let token = stdout(&token);
    assert_eq!(token.matches('.').count(), 2);

    let loaded = token_cmd(&["loads", "--timed", "--url-safe", "--max-age", "60", &token]);
    assert!(loaded.status.success(), "{}", stderr(&loaded));
    assert_eq!(stdout(&loaded), r#"{"userId":"42"}"#);
}

#[test]
fn test_config_file_sets_options() {
    let mut config = NamedTempFile::new().unwrap();
    write!(
        config,
        r#"{{"salt": "activate", "sep": ":", "digest-method": "sha256"}}"#
    )
    .unwrap();
    let path = config.path().to_str().unwrap();

    let token = stdout(&token_cmd(&["sign", "--config", path, "user-42"]));
    let signature = token.strip_prefix("user-42:").unwrap();
    assert_eq!(signature.len(), 43);

    // Without the config the salt and separator differ
    assert_eq!(token_cmd(&["unsign", &token]).status.code(), Some(1));
    assert_eq!(stdout(&token_cmd(&["unsign", "-c", path, &token])), "user-42");

    // Flags override the file
    let overridden = token_cmd(&["unsign", "-c", path, "--salt", "reset", &token]);
    assert_eq!(overridden.status.code(), Some(1));
}

#[test]
fn test_invalid_config_is_reported() {
    let mut config = NamedTempFile::new().unwrap();
    write!(config, r#"{{"digest": "sha256"}}"#).unwrap();

    let output = token_cmd(&["sign", "-c", config.path().to_str().unwrap(), "value"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Invalid config"));
}

#[test]
fn test_bad_separator_is_rejected() {
    let output = token_cmd(&["sign", "--sep", "a", "value"]);
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("cannot be used"));
}

#[test]
fn test_missing_secret_key() {
    let output = Command::new(env!("CARGO_BIN_EXE_linkbio-token"))
        .args(["sign", "value"])
        .env_remove("SECRET_KEY")
        .output()
        .unwrap();
    assert_eq!(output.status.code(), Some(1));
    assert!(stderr(&output).contains("Missing SECRET_KEY"));
}
