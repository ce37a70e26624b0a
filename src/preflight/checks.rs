use ethers::signers::{LocalWallet, Signer};
use ethers::utils::to_checksum;
use tracing::{info, warn};

use crate::utils::config::{CredentialSet, KEY_API_KEY, KEY_PRIVATE_KEY, KEY_TRADING_ACCOUNT_ID};
use crate::utils::error::GrvtError;

/// Outcome of the offline checks run before connecting.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreflightReport {
    /// Keys required for trading that are absent from the credential set
    pub missing_fields: Vec<&'static str>,
    pub private_key_format: bool,
    /// Checksummed address derived from the private key, when it parses
    pub public_address: Option<String>,
}

impl PreflightReport {
    pub fn config_complete(&self) -> bool {
        self.missing_fields.is_empty()
    }

    pub fn all_passed(&self) -> bool {
        self.config_complete() && self.private_key_format
    }
}

/// Trading needs an API key, a signing key and the trading account id.
pub fn missing_trading_fields(credentials: &CredentialSet) -> Vec<&'static str> {
    [
        (KEY_API_KEY, credentials.api_key.is_some()),
        (KEY_PRIVATE_KEY, credentials.private_key.is_some()),
        (KEY_TRADING_ACCOUNT_ID, credentials.trading_account_id.is_some()),
    ]
    .into_iter()
    .filter(|(_, present)| !present)
    .map(|(key, _)| key)
    .collect()
}

/// `0x` followed by exactly 64 hex digits.
pub fn is_well_formed_private_key(key: &str) -> bool {
    match key.strip_prefix("0x") {
        Some(digits) => digits.len() == 64 && hex::decode(digits).is_ok(),
        None => false,
    }
}

/// EIP-55 address of a secp256k1 private key. The `0x` prefix is optional.
pub fn public_address(private_key: &str) -> Result<String, GrvtError> {
    let wallet: LocalWallet = private_key
        .trim()
        .parse()
        .map_err(|e| GrvtError::InvalidPrivateKey(format!("{}", e)))?;
    Ok(to_checksum(&wallet.address(), None))
}

pub fn run_preflight_checks(credentials: &CredentialSet) -> PreflightReport {
    info!("🔍 Running pre-flight checks for GRVT {}", credentials.environment);

    let missing_fields = missing_trading_fields(credentials);
    if missing_fields.is_empty() {
        info!("✅ Configuration complete");
    } else {
        warn!("❌ Configuration incomplete, missing: {}", missing_fields.join(", "));
    }

    let private_key = credentials.private_key.as_deref().unwrap_or_default();
    let private_key_format = is_well_formed_private_key(private_key);
    let public_address = if private_key_format {
        match public_address(private_key) {
            Ok(address) => {
                info!("✅ Private key format valid, public address {}", address);
                Some(address)
            }
            Err(e) => {
                warn!("❌ Private key rejected: {}", e);
                None
            }
        }
    } else {
        warn!("❌ Private key format invalid (expected 0x followed by 64 hex digits)");
        None
    };

    let report = PreflightReport {
        missing_fields,
        private_key_format: private_key_format && public_address.is_some(),
        public_address,
    };

    if report.all_passed() {
        info!("🟢 All pre-flight checks passed");
    } else {
        warn!("🔴 Some pre-flight checks failed");
    }
    report
}
