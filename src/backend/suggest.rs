use std::future::Future;
use std::time::Duration;

use reqwest::Client as HttpClient;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::model::NutritionMap;

use super::error::{BackendError, BackendResult, truncate_body};
use super::types::{HitSource, RawHit};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SuggestionRequest {
    pub query: String,
    pub limit: usize,
    pub debug: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
enum SuggestionId {
    Text(String),
    Number(i64),
}

impl std::fmt::Display for SuggestionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SuggestionId::Text(s) => f.write_str(s),
            SuggestionId::Number(n) => write!(f, "{}", n),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
/// One ranked entry of a suggestion response.
pub struct Suggestion {
    id: SuggestionId,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub source_db: Option<String>,
    #[serde(default)]
    pub confidence: f32,
    #[serde(default)]
    pub nutrition_preview: NutritionMap,
    #[serde(default)]
    pub reference_weight: Option<f64>,
}

impl Suggestion {
    pub fn id(&self) -> String {
        self.id.to_string()
    }
}

impl From<Suggestion> for RawHit {
    fn from(s: Suggestion) -> Self {
        RawHit {
            id: s.id.to_string(),
            score: s.confidence,
            source: HitSource {
                short_name: s.short_name,
                description: s.name,
                original_name: None,
                category: s.category,
                source_db: s.source_db,
                nutrition: s.nutrition_preview,
                reference_weight: s.reference_weight,
            },
        }
    }
}

#[derive(Deserialize)]
struct SuggestionResponse {
    #[serde(default)]
    suggestions: Vec<Suggestion>,
}

/// Per-term suggestion endpoint used by the Parallel and Batched executors.
pub trait SuggestionApi: Send + Sync {
    fn suggest(
        &self,
        request: SuggestionRequest,
    ) -> impl Future<Output = BackendResult<Vec<RawHit>>> + Send;
}

#[derive(Debug, Clone)]
pub struct HttpSuggestionClient {
    http: HttpClient,
    url: String,
}

impl HttpSuggestionClient {
    pub fn new(url: &str, timeout: Duration) -> BackendResult<Self> {
        let http = HttpClient::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| BackendError::Client {
                message: e.to_string(),
            })?;

        Ok(Self {
            http,
            url: url.to_string(),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub async fn suggest(&self, request: SuggestionRequest) -> BackendResult<Vec<RawHit>> {
        debug!(query = %request.query, limit = request.limit, "Requesting suggestions");

        let resp = self
            .http
            .post(&self.url)
            .json(&request)
            .send()
            .await
            .map_err(|e| BackendError::Request {
                url: self.url.clone(),
                message: e.to_string(),
            })?;

        let status = resp.status();
        let body = resp.text().await.map_err(|e| BackendError::Request {
            url: self.url.clone(),
            message: e.to_string(),
        })?;

        if !status.is_success() {
            return Err(BackendError::Status {
                url: self.url.clone(),
                status: status.as_u16(),
                body: truncate_body(&body),
            });
        }

        parse_suggestions(&self.url, &body, request.limit)
    }
}

pub(crate) fn parse_suggestions(url: &str, body: &str, limit: usize) -> BackendResult<Vec<RawHit>> {
    let parsed: SuggestionResponse =
        serde_json::from_str(body).map_err(|e| BackendError::Decode {
            url: url.to_string(),
            message: e.to_string(),
        })?;

    Ok(parsed
        .suggestions
        .into_iter()
        .take(limit)
        .map(RawHit::from)
        .collect())
}

impl SuggestionApi for HttpSuggestionClient {
    async fn suggest(&self, request: SuggestionRequest) -> BackendResult<Vec<RawHit>> {
        self.suggest(request).await
    }
}
