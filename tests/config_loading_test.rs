//! Integration tests for loading credentials from a `.env` file
//!
//! Loading writes into the process environment, so every test runs inside
//! `temp_env::with_vars_unset`, which serialises access and restores the
//! credential keys afterwards.

use std::io::Write;
use std::path::Path;
use std::time::Duration;

use grvt_bootstrap::grvt::Environment;
use grvt_bootstrap::utils::config::{
    ClientSettings, CredentialSet, LoggingConfig, CREDENTIAL_KEYS, KEY_API_KEY, KEY_PRIVATE_KEY,
    KEY_SUB_ACCOUNT_ID,
};
use grvt_bootstrap::utils::GrvtError;
use tempfile::NamedTempFile;

fn env_file(contents: &str) -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    file.write_all(contents.as_bytes()).expect("write temp file");
    file.flush().expect("flush temp file");
    file
}

fn load_isolated(path: &Path) -> Result<CredentialSet, GrvtError> {
    temp_env::with_vars_unset(CREDENTIAL_KEYS, || CredentialSet::load(path))
}

#[test]
fn test_well_formed_file_populates_every_field() {
    let file = env_file(
        "# GRVT credentials\n\
         GRVT_ENV=prod\n\
         GRVT_SUB_ACCOUNT_ID=8289849667772468\n\
         GRVT_API_KEY=api-key-abc\n\
         GRVT_API_SECRET=api-secret-def\n\
         GRVT_PRIVATE_KEY=0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80\n\
         GRVT_TRADING_ACCOUNT_ID=0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266\n",
    );

    let creds = load_isolated(file.path()).expect("credentials should load");

    assert_eq!(creds.environment, Environment::Prod);
    assert_eq!(creds.sub_account_id, "8289849667772468");
    assert_eq!(creds.api_key.as_deref(), Some("api-key-abc"));
    assert_eq!(creds.api_secret.as_deref(), Some("api-secret-def"));
    assert_eq!(
        creds.private_key.as_deref(),
        Some("0xac0974bec39a17e36ba4a6b4d238ff944bacb478cbed5efcae784d7bf4f2ff80")
    );
    assert_eq!(
        creds.trading_account_id.as_deref(),
        Some("0xf39fd6e51aad88f6f4ce6ab8827279cfffb92266")
    );
}

#[test]
fn test_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("absent.env");

    let err = load_isolated(&path).unwrap_err();
    assert!(matches!(err, GrvtError::MissingFile(p) if p == path));
}

#[test]
fn test_blank_sub_account_is_missing_field() {
    let file = env_file("GRVT_ENV=testnet\nGRVT_SUB_ACCOUNT_ID=\nGRVT_API_KEY=key\n");

    let err = load_isolated(file.path()).unwrap_err();
    assert!(matches!(err, GrvtError::MissingField(KEY_SUB_ACCOUNT_ID)));
}

#[test]
fn test_no_auth_method_is_missing_field() {
    let file = env_file("GRVT_SUB_ACCOUNT_ID=1\n");

    let err = load_isolated(file.path()).unwrap_err();
    assert!(matches!(err, GrvtError::MissingField(KEY_PRIVATE_KEY)));

    let file = env_file("GRVT_SUB_ACCOUNT_ID=1\nGRVT_API_SECRET=secret\n");
    let err = load_isolated(file.path()).unwrap_err();
    assert!(matches!(err, GrvtError::MissingField(KEY_API_KEY)));
}

#[test]
fn test_invalid_environment() {
    let file = env_file("GRVT_ENV=devnet\nGRVT_SUB_ACCOUNT_ID=1\nGRVT_API_KEY=key\n");

    let err = load_isolated(file.path()).unwrap_err();
    assert!(matches!(err, GrvtError::InvalidEnvironment(v) if v == "devnet"));
}

#[test]
fn test_process_environment_wins_over_file() {
    let file = env_file("GRVT_ENV=testnet\nGRVT_SUB_ACCOUNT_ID=1\nGRVT_API_KEY=from-file\n");

    let vars: Vec<(&str, Option<&str>)> = CREDENTIAL_KEYS
        .iter()
        .map(|key| {
            let value = (*key == KEY_API_KEY).then_some("from-process");
            (*key, value)
        })
        .collect();

    let creds = temp_env::with_vars(vars, || CredentialSet::load(file.path())).unwrap();

    assert_eq!(creds.api_key.as_deref(), Some("from-process"));
    assert_eq!(creds.environment, Environment::Testnet);
}

#[test]
fn test_loaded_values_land_in_process_environment() {
    let file = env_file("GRVT_SUB_ACCOUNT_ID=77\nGRVT_API_KEY=key\n");

    let seen = temp_env::with_vars_unset(CREDENTIAL_KEYS, || {
        CredentialSet::load(file.path()).unwrap();
        std::env::var(KEY_SUB_ACCOUNT_ID).ok()
    });

    assert_eq!(seen.as_deref(), Some("77"));
}

#[test]
fn test_malformed_line_is_config_parse_error() {
    let file = env_file("GRVT_SUB_ACCOUNT_ID=1\nGRVT_API_KEY=k\nthis is not a pair\n");

    let err = load_isolated(file.path()).unwrap_err();
    assert!(matches!(err, GrvtError::ConfigParse(_)));
    assert!(err.to_string().contains("this is not a pair"));
}

#[test]
fn test_malformed_file_exports_nothing() {
    let file = env_file("GRVT_SUB_ACCOUNT_ID=1\nGRVT_API_KEY=k\nthis is not a pair\n");

    let (result, sub_account, api_key) = temp_env::with_vars_unset(CREDENTIAL_KEYS, || {
        let result = CredentialSet::load(file.path());
        (
            result,
            std::env::var(KEY_SUB_ACCOUNT_ID).ok(),
            std::env::var(KEY_API_KEY).ok(),
        )
    });

    assert!(matches!(result, Err(GrvtError::ConfigParse(_))));
    assert_eq!(sub_account, None);
    assert_eq!(api_key, None);
}

#[test]
fn test_client_settings_fall_back_per_key() {
    let settings = temp_env::with_vars(
        [
            ("GRVT_RATE_LIMIT_MAX_REQUESTS", Some("abc")),
            ("GRVT_HTTP_TIMEOUT_MS", Some("250")),
            ("GRVT_RATE_LIMIT_WINDOW_SECS", None),
        ],
        ClientSettings::from_env,
    );

    assert_eq!(settings.max_requests, 200);
    assert_eq!(settings.timeout, Duration::from_millis(250));
    assert_eq!(settings.rate_window, Duration::from_secs(10));
}

#[test]
fn test_log_level_defaults_to_info() {
    let level = temp_env::with_var_unset("LOG_LEVEL", || LoggingConfig::from_env().level);
    assert_eq!(level, "info");

    let level = temp_env::with_var("LOG_LEVEL", Some("debug"), || LoggingConfig::from_env().level);
    assert_eq!(level, "debug");
}

#[test]
fn test_log_level_read_from_file() {
    let file = env_file("LOG_LEVEL=warn\nGRVT_SUB_ACCOUNT_ID=1\nGRVT_API_KEY=key\n");

    let mut keys = CREDENTIAL_KEYS.to_vec();
    keys.push("LOG_LEVEL");

    let level = temp_env::with_vars_unset(keys, || {
        CredentialSet::load(file.path()).unwrap();
        LoggingConfig::from_env().level
    });

    assert_eq!(level, "warn");
}
