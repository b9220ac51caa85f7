//! linkbio-token CLI - sign and verify tokens from the shell
//!
//! Useful for minting test sessions and inspecting tokens found in logs.

use clap::{Parser, Subcommand};
use linkbio_signing::{
    DEFAULT_SERIALIZER_SALT, DEFAULT_SIGNER_SALT, Error, Serializer, SerializerOptions, Signer,
    SignerOptions, TimedSerializer, TimestampSigner, UrlSafeSerializer, UrlSafeTimedSerializer,
};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

#[derive(Parser)]
#[command(name = "linkbio-token")]
#[command(about = "Sign and verify Linkbio tokens", long_about = None)]
#[command(version)]
struct Cli {
    /// Secret key
    #[arg(long, env = "SECRET_KEY", hide_env_values = true, global = true)]
    secret_key: Option<String>,

    /// JSON file with signer options
    #[arg(short = 'c', long, global = true)]
    config: Option<PathBuf>,

    /// Salt namespacing the signatures
    #[arg(long, global = true)]
    salt: Option<String>,

    /// Separator between value and signature
    #[arg(long, global = true)]
    sep: Option<char>,

    /// Digest, e.g. sha1, sha256, sha3-512
    #[arg(long, global = true)]
    digest_method: Option<String>,

    /// Key derivation: concat, django-concat, hmac or none
    #[arg(long, global = true)]
    key_derivation: Option<String>,

    /// Signing algorithm: hmac, hash or none
    #[arg(long, global = true)]
    algorithm: Option<String>,

    /// Embed and check a signing timestamp
    #[arg(short = 't', long, global = true)]
    timed: bool,

    /// Reject timed tokens older than this many seconds
    #[arg(long, global = true)]
    max_age: Option<u64>,

    /// Base64-encode serialized payloads
    #[arg(short = 'u', long, global = true)]
    url_safe: bool,

    /// Log configuration and failure details
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign a string
    Sign {
        /// Value to sign
        value: String,
    },
    /// Verify a signed string and print its value
    Unsign {
        /// Signed token
        token: String,
    },
    /// Serialize and sign a JSON document
    Dumps {
        /// JSON document
        json: String,
    },
    /// Verify a serialized token and print its JSON document
    Loads {
        /// Signed token
        token: String,
    },
}

/// Options read from `--config`
///
/// Command line flags take precedence over the file.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "kebab-case", deny_unknown_fields)]
struct FileConfig {
    salt: Option<String>,
    sep: Option<char>,
    key_derivation: Option<String>,
    digest_method: Option<String>,
    algorithm: Option<String>,
    max_age: Option<u64>,
}

fn load_config(path: Option<&Path>) -> Result<FileConfig, String> {
    let Some(path) = path else {
        return Ok(FileConfig::default());
    };

    let contents = fs::read_to_string(path)
        .map_err(|e| format!("Failed to read config '{}': {e}", path.display()))?;
    serde_json::from_str(&contents)
        .map_err(|e| format!("Invalid config '{}': {e}", path.display()))
}

/// Merge flags, file and defaults into signer options
fn signer_options(cli: &Cli, file: &FileConfig, default_salt: &str) -> SignerOptions {
    let defaults = SignerOptions::default();

    SignerOptions {
        salt: cli
            .salt
            .clone()
            .or_else(|| file.salt.clone())
            .unwrap_or_else(|| default_salt.to_string()),
        sep: cli.sep.or(file.sep).unwrap_or(defaults.sep),
        key_derivation: cli
            .key_derivation
            .clone()
            .or_else(|| file.key_derivation.clone())
            .unwrap_or(defaults.key_derivation),
        digest_method: cli
            .digest_method
            .clone()
            .or_else(|| file.digest_method.clone())
            .unwrap_or(defaults.digest_method),
        algorithm: cli
            .algorithm
            .clone()
            .or_else(|| file.algorithm.clone())
            .unwrap_or(defaults.algorithm),
    }
}

fn serializer_options(cli: &Cli, file: &FileConfig) -> SerializerOptions {
    let signer = signer_options(cli, file, DEFAULT_SERIALIZER_SALT);
    SerializerOptions {
        salt: signer.salt.clone(),
        signer,
    }
}

/// Describe a verification failure by remediation path
fn describe(err: &Error) -> String {
    let kind = if err.is_expired() {
        "Signature expired"
    } else if err.is_bad_time_signature() {
        "Bad timestamp"
    } else if err.is_bad_signature() {
        "Bad signature"
    } else if err.is_bad_payload() {
        "Bad payload"
    } else {
        "Bad data"
    };

    if let Some(payload) = err.payload() {
        log::debug!("Untrusted payload: {payload:?}");
    }
    format!("{kind}: {err}")
}

fn sign(cli: &Cli, secret: &str, options: SignerOptions, value: &str) -> Result<String, String> {
    let signer = Signer::new(secret, options).map_err(|e| e.to_string())?;
    if cli.timed {
        Ok(TimestampSigner::from_signer(signer).sign(value))
    } else {
        Ok(signer.sign(value))
    }
}

fn unsign(
    cli: &Cli,
    secret: &str,
    options: SignerOptions,
    max_age: Option<Duration>,
    token: &str,
) -> Result<String, String> {
    let signer = Signer::new(secret, options).map_err(|e| e.to_string())?;
    if !cli.timed {
        return signer
            .unsign(token)
            .map(str::to_string)
            .map_err(|e| describe(&e));
    }

    let (value, signed_at) = TimestampSigner::from_signer(signer)
        .unsign_with_timestamp(token, max_age)
        .map_err(|e| describe(&e))?;
    log::info!("Signed at {signed_at:?}");
    Ok(value.to_string())
}

fn dumps(cli: &Cli, secret: &str, options: SerializerOptions, json: &str) -> Result<String, String> {
    let value: serde_json::Value =
        serde_json::from_str(json).map_err(|e| format!("Invalid JSON document: {e}"))?;

    let token = match (cli.timed, cli.url_safe) {
        (false, false) => Serializer::new(secret, options)
            .map_err(|e| e.to_string())?
            .dumps(&value),
        (false, true) => UrlSafeSerializer::url_safe(secret, options)
            .map_err(|e| e.to_string())?
            .dumps(&value),
        (true, false) => TimedSerializer::new(secret, options)
            .map_err(|e| e.to_string())?
            .dumps(&value),
        (true, true) => UrlSafeTimedSerializer::url_safe(secret, options)
            .map_err(|e| e.to_string())?
            .dumps(&value),
    };
    token.map_err(|e| describe(&e))
}

fn loads(
    cli: &Cli,
    secret: &str,
    options: SerializerOptions,
    max_age: Option<Duration>,
    token: &str,
) -> Result<String, String> {
    let value: serde_json::Value = match (cli.timed, cli.url_safe) {
        (false, false) => Serializer::new(secret, options)
            .map_err(|e| e.to_string())?
            .loads(token),
        (false, true) => UrlSafeSerializer::url_safe(secret, options)
            .map_err(|e| e.to_string())?
            .loads(token),
        (true, false) => TimedSerializer::new(secret, options)
            .map_err(|e| e.to_string())?
            .loads(token, max_age),
        (true, true) => UrlSafeTimedSerializer::url_safe(secret, options)
            .map_err(|e| e.to_string())?
            .loads(token, max_age),
    }
    .map_err(|e| describe(&e))?;

    serde_json::to_string(&value).map_err(|e| e.to_string())
}

fn run(cli: &Cli) -> Result<String, String> {
    let secret = cli
        .secret_key
        .as_deref()
        .ok_or("Missing SECRET_KEY (set it in the environment or pass --secret-key)")?;
    let file = load_config(cli.config.as_deref())?;

    let max_age = cli.max_age.or(file.max_age).map(Duration::from_secs);
    if max_age.is_some() && !cli.timed {
        log::warn!("--max-age has no effect without --timed");
    }

    match &cli.command {
        Commands::Sign { value } => sign(
            cli,
            secret,
            signer_options(cli, &file, DEFAULT_SIGNER_SALT),
            value,
        ),
        Commands::Unsign { token } => unsign(
            cli,
            secret,
            signer_options(cli, &file, DEFAULT_SIGNER_SALT),
            max_age,
            token,
        ),
        Commands::Dumps { json } => dumps(cli, secret, serializer_options(cli, &file), json),
        Commands::Loads { token } => {
            loads(cli, secret, serializer_options(cli, &file), max_age, token)
        }
    }
}

fn main() {
    let cli = Cli::parse();

    let log_level = if cli.verbose {
        log::LevelFilter::Debug
    } else {
        log::LevelFilter::Warn
    };
    env_logger::Builder::from_default_env()
        .filter_level(log_level)
        .init();

    match run(&cli) {
        Ok(output) => println!("{output}"),
        Err(e) => {
            eprintln!("Error: {e}");
            std::process::exit(1);
        }
    }
}
