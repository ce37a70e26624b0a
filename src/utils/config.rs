use std::fmt;
use std::io::ErrorKind;
use std::path::Path;
use std::time::Duration;

use tracing::{debug, info};

use crate::grvt::rate_limit::{GRVT_MAX_REQUESTS, GRVT_RATE_WINDOW};
use crate::grvt::types::Environment;
use crate::utils::error::GrvtError;

pub const DEFAULT_ENV_FILE: &str = ".env";

pub const KEY_ENV: &str = "GRVT_ENV";
pub const KEY_SUB_ACCOUNT_ID: &str = "GRVT_SUB_ACCOUNT_ID";
pub const KEY_API_KEY: &str = "GRVT_API_KEY";
pub const KEY_API_SECRET: &str = "GRVT_API_SECRET";
pub const KEY_PRIVATE_KEY: &str = "GRVT_PRIVATE_KEY";
pub const KEY_TRADING_ACCOUNT_ID: &str = "GRVT_TRADING_ACCOUNT_ID";

/// Every key the loader reads from the environment.
pub const CREDENTIAL_KEYS: [&str; 6] = [
    KEY_ENV,
    KEY_SUB_ACCOUNT_ID,
    KEY_API_KEY,
    KEY_API_SECRET,
    KEY_PRIVATE_KEY,
    KEY_TRADING_ACCOUNT_ID,
];

/// Credentials for one GRVT sub-account.
///
/// Built once at startup and never mutated. At least one of `api_key` or
/// `private_key` is always present.
#[derive(Clone, PartialEq, Eq)]
pub struct CredentialSet {
    pub environment: Environment,
    pub sub_account_id: String,
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub private_key: Option<String>,
    pub trading_account_id: Option<String>,
}

impl CredentialSet {
    /// Load `path` into the process environment, then read the credential keys back out.
    ///
    /// Variables already set in the environment win over the file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, GrvtError> {
        apply_env_file(path)?;
        Self::from_env()
    }

    /// Build from the current process environment without reading any file.
    pub fn from_env() -> Result<Self, GrvtError> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary key lookup. Blank values count as absent.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, GrvtError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| {
            lookup(key)
                .map(|value| value.trim().to_string())
                .filter(|value| !value.is_empty())
        };

        let environment = match get(KEY_ENV) {
            Some(raw) => raw.parse::<Environment>()?,
            None => Environment::Testnet,
        };

        let sub_account_id = get(KEY_SUB_ACCOUNT_ID).ok_or(GrvtError::MissingField(KEY_SUB_ACCOUNT_ID))?;
        let api_key = get(KEY_API_KEY);
        let api_secret = get(KEY_API_SECRET);
        let private_key = get(KEY_PRIVATE_KEY);
        let trading_account_id = get(KEY_TRADING_ACCOUNT_ID);

        // a secret on its own is half a key pair
        if api_key.is_none() && private_key.is_none() {
            let missing = if api_secret.is_some() { KEY_API_KEY } else { KEY_PRIVATE_KEY };
            return Err(GrvtError::MissingField(missing));
        }

        debug!(
            environment = %environment,
            sub_account_id = %sub_account_id,
            has_api_key = api_key.is_some(),
            has_private_key = private_key.is_some(),
            "Credential set assembled"
        );

        Ok(Self {
            environment,
            sub_account_id,
            api_key,
            api_secret,
            private_key,
            trading_account_id,
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn has_private_key(&self) -> bool {
        self.private_key.is_some()
    }
}

/// Parse every line of `path`, then export the pairs not already set.
///
/// Nothing is exported unless the whole file parses.
pub fn apply_env_file(path: impl AsRef<Path>) -> Result<(), GrvtError> {
    let path = path.as_ref();
    let pairs = dotenv::from_path_iter(path)
        .and_then(|iter| iter.collect::<Result<Vec<_>, _>>())
        .map_err(|e| env_file_error(path, e))?;

    let mut exported = 0;
    for (key, value) in pairs {
        if std::env::var_os(&key).is_none() {
            std::env::set_var(&key, value);
            exported += 1;
        }
    }

    info!("Loaded credentials file {} ({} new variables)", path.display(), exported);
    Ok(())
}

fn env_file_error(path: &Path, err: dotenv::Error) -> GrvtError {
    match err {
        dotenv::Error::Io(e) if e.kind() == ErrorKind::NotFound => {
            GrvtError::MissingFile(path.to_path_buf())
        }
        dotenv::Error::Io(e) => GrvtError::ConfigParse(format!("{}: {}", path.display(), e)),
        dotenv::Error::LineParse(line, index) => GrvtError::ConfigParse(format!(
            "{}: malformed line {:?} at offset {}",
            path.display(),
            line,
            index
        )),
        e => GrvtError::ConfigParse(e.to_string()),
    }
}

fn redact(value: &Option<String>) -> &'static str {
    if value.is_some() {
        "<redacted>"
    } else {
        "<unset>"
    }
}

impl fmt::Debug for CredentialSet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CredentialSet")
            .field("environment", &self.environment)
            .field("sub_account_id", &self.sub_account_id)
            .field("api_key", &redact(&self.api_key))
            .field("api_secret", &redact(&self.api_secret))
            .field("private_key", &redact(&self.private_key))
            .field("trading_account_id", &self.trading_account_id)
            .finish()
    }
}

#[derive(Debug, Clone)]
pub struct LoggingConfig {
    pub level: String,
}

impl LoggingConfig {
    pub fn from_env() -> Self {
        Self {
            level: std::env::var("LOG_LEVEL").unwrap_or_else(|_| "info".to_string()),
        }
    }
}

/// Transport settings for the GRVT client.
#[derive(Debug, Clone)]
pub struct ClientSettings {
    pub timeout: Duration,
    pub max_requests: u32,
    pub rate_window: Duration,
}

impl Default for ClientSettings {
    fn default() -> Self {
        Self {
            timeout: Duration::from_millis(10_000),
            max_requests: GRVT_MAX_REQUESTS,
            rate_window: GRVT_RATE_WINDOW,
        }
    }
}

impl ClientSettings {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            timeout: std::env::var("GRVT_HTTP_TIMEOUT_MS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_millis)
                .unwrap_or(defaults.timeout),
            max_requests: std::env::var("GRVT_RATE_LIMIT_MAX_REQUESTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.max_requests),
            rate_window: std::env::var("GRVT_RATE_LIMIT_WINDOW_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.rate_window),
        }
    }
}
