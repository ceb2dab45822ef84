use crate::common::{AuthError, ServerRejection, SubmitError, TransportError};
use crate::domains::scanner_agent::{Credentials, ScanReport, WarehouseBackend};
use async_trait::async_trait;
use reqwest::StatusCode;
use serde_json::Value;
use std::time::Duration;
use tracing::debug;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REPORT_PATH: &str = "/api/robots/data";
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const MAX_ERROR_BODY: usize = 256;

/// `WarehouseBackend` over HTTP/JSON. One client is shared by the whole fleet;
/// it carries connection pooling only, no per-agent state.
#[derive(Debug, Clone)]
pub struct HttpBackend {
    client: reqwest::Client,
    base_url: String,
}

impl HttpBackend {
    pub fn new(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .user_agent(concat!("warehouse-fleet/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| TransportError::Connection(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }
}

#[async_trait]
impl WarehouseBackend for HttpBackend {
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let response = self
            .client
            .post(self.url(LOGIN_PATH))
            .json(credentials)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        let body = response.text().await.map_err(transport_error)?;
        debug!(%status, email = %credentials.email, "login response");

        if status != StatusCode::OK {
            return Err(AuthError::Rejected { status: status.as_u16(), body: truncate(&body) });
        }

        let parsed: Value = serde_json::from_str(&body)
            .map_err(|e| TransportError::Decode(e.to_string()))?;
        extract_token(&parsed).ok_or_else(|| AuthError::MissingToken { body: truncate(&body) })
    }

    async fn submit_report(&self, token: &str, report: &ScanReport) -> Result<(), SubmitError> {
        let response = self
            .client
            .post(self.url(REPORT_PATH))
            .bearer_auth(token)
            .json(report)
            .send()
            .await
            .map_err(transport_error)?;

        let status = response.status();
        debug!(%status, robot = %report.robot_id, "report response");

        match status {
            StatusCode::OK => Ok(()),
            StatusCode::UNAUTHORIZED => Err(SubmitError::Unauthorized),
            other => {
                let body = response.text().await.unwrap_or_default();
                Err(ServerRejection { status: other.as_u16(), body: truncate(&body) }.into())
            }
        }
    }
}

/// Finds the token in a login response whatever the casing of its key
/// (`token`, `Token`, `TOKEN`). The backend has been inconsistent about it.
/// Empty strings and non-string values count as missing.
pub fn extract_token(body: &Value) -> Option<String> {
    body.as_object()?
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case("token"))
        .and_then(|(_, value)| value.as_str())
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

fn transport_error(e: reqwest::Error) -> TransportError {
    if e.is_timeout() {
        TransportError::Timeout(e.to_string())
    } else if e.is_decode() {
        TransportError::Decode(e.to_string())
    } else {
        TransportError::Connection(e.to_string())
    }
}

fn truncate(body: &str) -> String {
    match body.char_indices().nth(MAX_ERROR_BODY) {
        Some((idx, _)) => format!("{}...", &body[..idx]),
        None => body.to_string(),
    }
}
