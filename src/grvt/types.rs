use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, TimeZone, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use url::Url;

use crate::utils::error::GrvtError;

const TESTNET_EDGE_URL: &str = "https://edge.testnet.grvt.io";
const TESTNET_TRADES_URL: &str = "https://trades.testnet.grvt.io";
const PROD_EDGE_URL: &str = "https://edge.grvt.io";
const PROD_TRADES_URL: &str = "https://trades.grvt.io";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Environment {
    Testnet,
    Prod,
}

impl Environment {
    pub fn as_str(&self) -> &'static str {
        match self {
            Environment::Testnet => "testnet",
            Environment::Prod => "prod",
        }
    }

    pub fn endpoints(&self) -> Result<Endpoints, GrvtError> {
        match self {
            Environment::Testnet => Endpoints::new(TESTNET_EDGE_URL, TESTNET_TRADES_URL),
            Environment::Prod => Endpoints::new(PROD_EDGE_URL, PROD_TRADES_URL),
        }
    }
}

impl fmt::Display for Environment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Environment {
    type Err = GrvtError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "testnet" => Ok(Environment::Testnet),
            "prod" | "production" | "mainnet" => Ok(Environment::Prod),
            _ => Err(GrvtError::InvalidEnvironment(s.trim().to_string())),
        }
    }
}

/// Base URLs for the two GRVT services the client talks to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Endpoints {
    /// Auth gateway
    pub edge: Url,
    /// Trade data (account summary, positions)
    pub trades: Url,
}

impl Endpoints {
    pub fn new(edge: &str, trades: &str) -> Result<Self, GrvtError> {
        Ok(Self {
            edge: Url::parse(edge)?,
            trades: Url::parse(trades)?,
        })
    }

    /// Both services behind one host, as with a local gateway or a mock server.
    pub fn single(base: &str) -> Result<Self, GrvtError> {
        Self::new(base, base)
    }

    pub fn login_url(&self) -> Result<Url, GrvtError> {
        Ok(self.edge.join("/auth/api_key/login")?)
    }

    pub fn account_summary_url(&self) -> Result<Url, GrvtError> {
        Ok(self.trades.join("/full/v1/account_summary")?)
    }

    pub fn positions_url(&self) -> Result<Url, GrvtError> {
        Ok(self.trades.join("/full/v1/positions")?)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest<'a> {
    pub api_key: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct SubAccountRequest<'a> {
    pub sub_account_id: &'a str,
}

#[derive(Debug, Clone, Serialize)]
pub struct PositionsRequest<'a> {
    pub sub_account_id: &'a str,
    pub kind: Vec<String>,
    pub base: Vec<String>,
    pub quote: Vec<String>,
}

/// `{"result": ...}` envelope wrapped around every trade-data reply.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiResult<T> {
    pub result: T,
}

/// Error body returned on non-success replies.
#[derive(Debug, Clone, Deserialize)]
pub struct ApiErrorBody {
    #[serde(default)]
    pub code: Option<i64>,
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub status: Option<u16>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PositionSide {
    Long,
    Short,
    Flat,
}

impl PositionSide {
    pub fn label(&self) -> &'static str {
        match self {
            PositionSide::Long => "LONG",
            PositionSide::Short => "SHORT",
            PositionSide::Flat => "FLAT",
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Position {
    #[serde(default)]
    pub instrument: String,
    #[serde(default)]
    pub size: Decimal,
    #[serde(default)]
    pub entry_price: Decimal,
    #[serde(default)]
    pub mark_price: Decimal,
    #[serde(default)]
    pub unrealized_pnl: Decimal,
    #[serde(default)]
    pub realized_pnl: Decimal,
    #[serde(default)]
    pub roi: Decimal,
}

impl Position {
    pub fn side(&self) -> PositionSide {
        if self.size > Decimal::ZERO {
            PositionSide::Long
        } else if self.size < Decimal::ZERO {
            PositionSide::Short
        } else {
            PositionSide::Flat
        }
    }

    pub fn is_open(&self) -> bool {
        !self.size.is_zero()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AccountSummary {
    #[serde(default)]
    pub sub_account_id: String,
    #[serde(default)]
    pub settle_currency: String,
    #[serde(default)]
    pub total_equity: Decimal,
    #[serde(default)]
    pub available_balance: Decimal,
    #[serde(default)]
    pub initial_margin: Decimal,
    #[serde(default)]
    pub maintenance_margin: Decimal,
    #[serde(default)]
    pub unrealized_pnl: Decimal,
    /// Nanoseconds since the Unix epoch, as a decimal string
    #[serde(default)]
    pub event_time: Option<String>,
    #[serde(default)]
    pub positions: Vec<Position>,
}

impl AccountSummary {
    pub fn event_timestamp(&self) -> Option<DateTime<Utc>> {
        let nanos: i64 = self.event_time.as_deref()?.parse().ok()?;
        Some(Utc.timestamp_nanos(nanos))
    }
}
