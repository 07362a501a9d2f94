//! Query-rewriting oracle clients.
//!
//! `HttpQueryOracle` posts the refinement request as JSON. `NoopOracle` never proposes
//! anything, which ends refinement after the first evaluation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client as HttpClient;
use tracing::debug;

use super::error::{OracleError, OracleResult};
use super::types::{OracleResponse, RefinementRequest};

const MAX_ERROR_BODY: usize = 512;

#[async_trait]
/// External service proposing alternative phrasings for unresolved terms.
pub trait QueryOracle: Send + Sync {
    /// Returns zero or more rewrites. An empty response is not an error.
    async fn propose(&self, request: &RefinementRequest) -> OracleResult<OracleResponse>;
}

/// JSON-over-HTTP oracle.
pub struct HttpQueryOracle {
    http: HttpClient,
    url: String,
}

impl HttpQueryOracle {
    pub fn new(url: &str, timeout: Duration) -> OracleResult<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| OracleError::Unavailable {
                message: format!("failed to build HTTP client: {}", e),
            })?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl QueryOracle for HttpQueryOracle {
    async fn propose(&self, request: &RefinementRequest) -> OracleResult<OracleResponse> {
        debug!(
            url = %self.url,
            unresolved = request.unresolved.len(),
            history = request.history.len(),
            "Calling query oracle"
        );

        let resp = self
            .http
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| OracleError::Request {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| OracleError::Request {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(OracleError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                body: body.chars().take(MAX_ERROR_BODY).collect(),
            });
        }

        parse_oracle_response(&self.url, &body)
    }
}

pub(crate) fn parse_oracle_response(url: &str, body: &str) -> OracleResult<OracleResponse> {
    serde_json::from_str(body).map_err(|e| OracleError::Decode {
        url: url.to_string(),
        message: e.to_string(),
    })
}

#[derive(Debug, Clone, Copy, Default)]
/// Oracle used when none is configured.
pub struct NoopOracle;

#[async_trait]
impl QueryOracle for NoopOracle {
    async fn propose(&self, _request: &RefinementRequest) -> OracleResult<OracleResponse> {
        Ok(OracleResponse::default())
    }
}
