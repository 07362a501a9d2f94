use serde::{Deserialize, Serialize};

use crate::model::NutritionMap;
use crate::query::RankedQuery;

use super::error::{BackendError, BackendResult};

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
/// Engine-specific document fields carried by a hit.
pub struct HitSource {
    #[serde(default)]
    pub short_name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub original_name: Option<String>,
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default, rename = "data_source", alias = "source_db")]
    pub source_db: Option<String>,
    #[serde(default)]
    pub nutrition: NutritionMap,
    #[serde(default, rename = "reference_weight_g", alias = "reference_weight")]
    pub reference_weight: Option<f64>,
}

#[derive(Debug, Clone, PartialEq)]
/// One ranked hit as returned by either backend.
pub struct RawHit {
    pub id: String,
    pub score: f32,
    pub source: HitSource,
}

#[derive(Debug, Clone, PartialEq)]
/// A hit the client could not decode.
pub struct RejectedHit {
    pub id: String,
    pub reason: String,
}

#[derive(Debug, Clone)]
/// All terms of a wave as one engine round trip.
pub struct MultiSearchRequest {
    pub index: String,
    pub queries: Vec<RankedQuery>,
}

impl MultiSearchRequest {
    pub fn new(index: impl Into<String>, queries: Vec<RankedQuery>) -> Self {
        Self {
            index: index.into(),
            queries,
        }
    }

    pub fn len(&self) -> usize {
        self.queries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queries.is_empty()
    }

    /// Encodes the request as newline-delimited JSON (header line + body line per query).
    pub fn to_ndjson(&self) -> BackendResult<String> {
        let header = serde_json::json!({ "index": self.index });
        let header = serde_json::to_string(&header).map_err(|e| BackendError::Encode {
            message: e.to_string(),
        })?;

        let mut out = String::new();
        for query in &self.queries {
            let body = serde_json::to_string(&query.body).map_err(|e| BackendError::Encode {
                message: e.to_string(),
            })?;
            out.push_str(&header);
            out.push('\n');
            out.push_str(&body);
            out.push('\n');
        }
        Ok(out)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Result of one query inside a multi-search response.
pub struct QueryResponse {
    pub hits: Vec<RawHit>,
    pub rejected: Vec<RejectedHit>,
    /// Query-level failure reported by the engine; other queries are unaffected.
    pub error: Option<String>,
}

impl QueryResponse {
    pub fn from_hits(hits: Vec<RawHit>) -> Self {
        Self {
            hits,
            ..Default::default()
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            error: Some(message.into()),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
/// Per-query responses, in request order.
pub struct MultiSearchResponse {
    pub responses: Vec<QueryResponse>,
}
