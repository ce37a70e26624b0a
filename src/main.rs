use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use grvt_bootstrap::{
    display::{account_table, positions_table},
    grvt::GrvtClient,
    preflight::run_preflight_checks,
    utils::{
        config::{apply_env_file, CredentialSet, LoggingConfig, DEFAULT_ENV_FILE},
        GrvtError,
    },
};

#[tokio::main]
async fn main() -> Result<()> {
    let env_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| DEFAULT_ENV_FILE.to_string());

    // The file may set LOG_LEVEL, so apply it before logging starts
    let applied = apply_env_file(&env_file);

    // Initialize logging
    let logging = LoggingConfig::from_env();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&logging.level)),
        )
        .init();

    // Load credentials
    let credentials = match applied.and_then(|_| CredentialSet::from_env()) {
        Ok(credentials) => credentials,
        Err(e) if e.is_config_error() => {
            error!("❌ Invalid configuration in {}: {}", env_file, e);
            return Err(e.into());
        }
        Err(e) => {
            error!("❌ Could not load credentials from {}: {}", env_file, e);
            return Err(e.into());
        }
    };
    info!(
        "Configuration loaded: environment={}, sub_account={}",
        credentials.environment, credentials.sub_account_id
    );

    let report = run_preflight_checks(&credentials);
    if !report.all_passed() {
        warn!("⚠️  Continuing with incomplete configuration; trading calls may be refused");
    }

    let client = match GrvtClient::connect(credentials).await {
        Ok(client) => client,
        Err(e @ GrvtError::Authentication(_)) => {
            error!("❌ GRVT rejected the credentials: {}", e);
            return Err(e.into());
        }
        Err(e) => {
            error!("❌ Could not connect to GRVT: {}", e);
            return Err(e.into());
        }
    };

    info!("Fetching account data from {}", client.endpoints().trades);
    let summary = client.fetch_account_summary().await?;
    if let Some(at) = summary.event_timestamp() {
        info!("Account summary as of {}", at.to_rfc3339());
    }
    println!("{}", account_table(&summary));

    let positions = client.fetch_positions().await?;
    info!("📊 {} position(s) returned", positions.len());
    println!("{}", positions_table(&positions));

    Ok(())
}
