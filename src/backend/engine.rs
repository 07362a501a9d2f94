use std::future::Future;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::error::{BackendError, BackendResult, truncate_body};
use super::types::{
    HitSource, MultiSearchRequest, MultiSearchResponse, QueryResponse, RawHit, RejectedHit,
};

/// Minimal async interface to the full-text engine.
pub trait SearchEngine: Send + Sync {
    /// Runs every query of `request` in one round trip.
    fn multi_search(
        &self,
        request: MultiSearchRequest,
    ) -> impl Future<Output = BackendResult<MultiSearchResponse>> + Send;

    /// Tokenizes `text` with the index analyzer (tooling only).
    fn analyze(
        &self,
        text: &str,
        analyzer: Option<&str>,
    ) -> impl Future<Output = BackendResult<Vec<String>>> + Send;
}

#[derive(Clone)]
/// Elasticsearch REST client.
pub struct ElasticsearchClient {
    http: HttpClient,
    base_url: String,
    index: String,
    api_key: Option<String>,
}

impl std::fmt::Debug for ElasticsearchClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ElasticsearchClient")
            .field("base_url", &self.base_url)
            .field("index", &self.index)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[derive(Deserialize)]
struct EsMultiSearchBody {
    responses: Vec<EsResponseItem>,
}

#[derive(Deserialize)]
struct EsResponseItem {
    #[serde(default)]
    hits: Option<EsHits>,
    #[serde(default)]
    error: Option<Value>,
}

#[derive(Deserialize)]
struct EsHits {
    #[serde(default)]
    hits: Vec<EsHit>,
}

#[derive(Deserialize)]
struct EsHit {
    #[serde(rename = "_id")]
    id: String,
    #[serde(rename = "_score", default)]
    score: Option<f32>,
    #[serde(rename = "_source", default)]
    source: Option<Value>,
}

#[derive(Deserialize)]
struct EsAnalyzeBody {
    #[serde(default)]
    tokens: Vec<EsToken>,
}

#[derive(Deserialize)]
struct EsToken {
    token: String,
}

impl ElasticsearchClient {
    /// Creates a client for `base_url`, scoped to `index`.
    pub fn new(base_url: &str, index: &str, timeout: Duration) -> BackendResult<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            index: index.to_string(),
            api_key: None,
        })
    }

    pub fn with_api_key(mut self, api_key: impl Into<String>) -> Self {
        self.api_key = Some(api_key.into());
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    pub fn index(&self) -> &str {
        &self.index
    }

    fn authorize(&self, builder: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_key {
            Some(key) => builder.header("Authorization", format!("ApiKey {}", key)),
            None => builder,
        }
    }

    async fn send(&self, url: &str, builder: reqwest::RequestBuilder) -> BackendResult<String> {
        let resp = self
            .authorize(builder)
            .send()
            .await
            .map_err(|e| BackendError::Request {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| BackendError::Request {
            url: url.to_string(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                url: url.to_string(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        Ok(body)
    }

    pub async fn multi_search(
        &self,
        request: MultiSearchRequest,
    ) -> BackendResult<MultiSearchResponse> {
        if request.is_empty() {
            return Ok(MultiSearchResponse::default());
        }

        let url = format!("{}/{}/_msearch", self.base_url, request.index);
        let payload = request.to_ndjson()?;

        debug!(queries = request.len(), url = %url, "Sending multi-search request");

        let builder = self
            .http
            .post(&url)
            .header("Content-Type", "application/x-ndjson")
            .body(payload);
        let body = self.send(&url, builder).await?;

        parse_multi_search(&url, &body, request.len())
    }

    pub async fn analyze(&self, text: &str, analyzer: Option<&str>) -> BackendResult<Vec<String>> {
        let url = format!("{}/{}/_analyze", self.base_url, self.index);
        let mut payload = serde_json::json!({ "text": text });
        if let Some(analyzer) = analyzer {
            payload["analyzer"] = Value::String(analyzer.to_string());
        }

        let body = self.send(&url, self.http.post(&url).json(&payload)).await?;
        let parsed: EsAnalyzeBody =
            serde_json::from_str(&body).map_err(|e| BackendError::Decode {
                url: url.clone(),
                message: e.to_string(),
            })?;

        Ok(parsed.tokens.into_iter().map(|t| t.token).collect())
    }
}

/// Decodes an `_msearch` response body, checking it answers `expected` queries.
pub(crate) fn parse_multi_search(
    url: &str,
    body: &str,
    expected: usize,
) -> BackendResult<MultiSearchResponse> {
    let parsed: EsMultiSearchBody =
        serde_json::from_str(body).map_err(|e| BackendError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    if parsed.responses.len() != expected {
        return Err(BackendError::InvalidResponse {
            reason: format!(
                "expected {} responses, got {}",
                expected,
                parsed.responses.len()
            ),
        });
    }

    Ok(MultiSearchResponse {
        responses: parsed.responses.into_iter().map(convert_item).collect(),
    })
}

fn convert_item(item: EsResponseItem) -> QueryResponse {
    if let Some(error) = item.error {
        return QueryResponse::failed(describe_error(&error));
    }

    let mut response = QueryResponse::default();
    for hit in item.hits.map(|h| h.hits).unwrap_or_default() {
        let Some(source) = hit.source else {
            response.rejected.push(RejectedHit {
                id: hit.id,
                reason: "missing _source".to_string(),
            });
            continue;
        };

        match serde_json::from_value::<HitSource>(source) {
            Ok(source) => response.hits.push(RawHit {
                id: hit.id,
                score: hit.score.unwrap_or(0.0),
                source,
            }),
            Err(e) => response.rejected.push(RejectedHit {
                id: hit.id,
                reason: e.to_string(),
            }),
        }
    }
    response
}

fn describe_error(error: &Value) -> String {
    error
        .get("reason")
        .and_then(Value::as_str)
        .or_else(|| error.as_str())
        .map(str::to_string)
        .unwrap_or_else(|| error.to_string())
}

impl SearchEngine for ElasticsearchClient {
    async fn multi_search(
        &self,
        request: MultiSearchRequest,
    ) -> BackendResult<MultiSearchResponse> {
        self.multi_search(request).await
    }

    async fn analyze(&self, text: &str, analyzer: Option<&str>) -> BackendResult<Vec<String>> {
        self.analyze(text, analyzer).await
    }
}
