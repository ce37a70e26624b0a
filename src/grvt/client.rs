use reqwest::header::{HeaderMap, COOKIE, SET_COOKIE};
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info};
use url::Url;

use crate::grvt::rate_limit::RequestLimiter;
use crate::grvt::types::{
    AccountSummary, ApiErrorBody, ApiResult, Endpoints, Environment, LoginRequest, Position,
    PositionsRequest, SubAccountRequest,
};
use crate::utils::config::{ClientSettings, CredentialSet};
use crate::utils::error::GrvtError;

const SESSION_COOKIE: &str = "gravity";
const ACCOUNT_ID_HEADER: &str = "x-grvt-account-id";

#[derive(Debug, Clone)]
struct Session {
    cookie: String,
    account_id: Option<String>,
}

/// Authenticated connection to one GRVT environment for one credential set.
pub struct GrvtClient {
    http_client: reqwest::Client,
    endpoints: Endpoints,
    credentials: CredentialSet,
    session: Session,
    limiter: RequestLimiter,
}

impl GrvtClient {
    /// Log in against the endpoints of `credentials.environment`.
    pub async fn connect(credentials: CredentialSet) -> Result<Self, GrvtError> {
        let endpoints = credentials.environment.endpoints()?;
        Self::connect_to(credentials, endpoints, ClientSettings::from_env()).await
    }

    /// Log in against explicit endpoints.
    pub async fn connect_to(
        credentials: CredentialSet,
        endpoints: Endpoints,
        settings: ClientSettings,
    ) -> Result<Self, GrvtError> {
        let api_key = credentials.api_key.as_deref().ok_or_else(|| {
            GrvtError::Authentication(
                "GRVT_API_KEY is required to open a session; a private key alone cannot log in"
                    .to_string(),
            )
        })?;

        let limiter = RequestLimiter::new(settings.max_requests, settings.rate_window)?;
        let http_client = reqwest::Client::builder().timeout(settings.timeout).build()?;

        let url = endpoints.login_url()?;
        info!(
            "Connecting to GRVT {} ({})",
            credentials.environment,
            endpoints.edge
        );

        limiter.acquire().await;
        let response = http_client
            .post(url)
            .json(&LoginRequest { api_key })
            .send()
            .await
            .map_err(|e| {
                error!("GRVT login request failed: {}", e);
                GrvtError::Network(e)
            })?;

        let status = response.status();
        let headers = response.headers().clone();
        let body = response.text().await?;

        if !status.is_success() {
            let err = classify_failure(status, &body);
            error!("GRVT login rejected: {}", err);
            return Err(err);
        }

        let cookie = session_cookie(&headers).ok_or_else(|| {
            GrvtError::Authentication("login returned no session cookie".to_string())
        })?;
        let account_id = headers
            .get(ACCOUNT_ID_HEADER)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string);

        info!(
            "✅ Connected to GRVT {} (account {})",
            credentials.environment,
            account_id.as_deref().unwrap_or("unknown")
        );

        Ok(Self {
            http_client,
            endpoints,
            credentials,
            session: Session { cookie, account_id },
            limiter,
        })
    }

    pub fn environment(&self) -> Environment {
        self.credentials.environment
    }

    pub fn endpoints(&self) -> &Endpoints {
        &self.endpoints
    }

    /// Account id issued at login, if the exchange sent one.
    pub fn account_id(&self) -> Option<&str> {
        self.session.account_id.as_deref()
    }

    pub fn sub_account_id(&self) -> &str {
        &self.credentials.sub_account_id
    }

    pub async fn fetch_account_summary(&self) -> Result<AccountSummary, GrvtError> {
        let url = self.endpoints.account_summary_url()?;
        let request = SubAccountRequest {
            sub_account_id: self.sub_account_id(),
        };
        self.post(url, &request).await
    }

    pub async fn fetch_positions(&self) -> Result<Vec<Position>, GrvtError> {
        let url = self.endpoints.positions_url()?;
        let request = PositionsRequest {
            sub_account_id: self.sub_account_id(),
            kind: Vec::new(),
            base: Vec::new(),
            quote: Vec::new(),
        };
        self.post(url, &request).await
    }

    async fn post<B, T>(&self, url: Url, body: &B) -> Result<T, GrvtError>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        self.limiter.acquire().await;
        debug!("POST {}", url);

        let mut request = self
            .http_client
            .post(url)
            .header(COOKIE, format!("{}={}", SESSION_COOKIE, self.session.cookie))
            .json(body);
        if let Some(account_id) = &self.session.account_id {
            request = request.header(ACCOUNT_ID_HEADER, account_id);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;

        if !status.is_success() {
            return Err(classify_failure(status, &text));
        }

        let parsed: ApiResult<T> = serde_json::from_str(&text)?;
        Ok(parsed.result)
    }
}

fn session_cookie(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find_map(|cookie| {
            let pair = cookie.split(';').next()?.trim();
            let value = pair.strip_prefix(SESSION_COOKIE)?.strip_prefix('=')?;
            (!value.is_empty()).then(|| value.to_string())
        })
}

fn classify_failure(status: StatusCode, body: &str) -> GrvtError {
    let parsed = serde_json::from_str::<ApiErrorBody>(body).ok();
    let code = parsed.as_ref().and_then(|b| b.code);
    let message = parsed
        .and_then(|b| b.message)
        .or_else(|| {
            let raw = body.trim();
            (!raw.is_empty()).then(|| raw.to_string())
        })
        .unwrap_or_else(|| {
            status
                .canonical_reason()
                .unwrap_or("unknown error")
                .to_string()
        });

    match status {
        StatusCode::UNAUTHORIZED | StatusCode::FORBIDDEN => GrvtError::Authentication(message),
        _ => GrvtError::Api {
            status: status.as_u16(),
            code,
            message,
        },
    }
}
