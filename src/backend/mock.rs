//! In-memory backends for tests: a tiny lexical catalog served through both traits.

use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;

use crate::model::NutritionMap;
use crate::normalize::normalize;

use super::engine::SearchEngine;
use super::error::{BackendError, BackendResult};
use super::suggest::{SuggestionApi, SuggestionRequest};
use super::types::{HitSource, MultiSearchRequest, MultiSearchResponse, QueryResponse, RawHit};

#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub source_db: Option<String>,
    pub nutrition: NutritionMap,
    pub reference_weight: Option<f64>,
}

impl CatalogEntry {
    pub fn new(id: impl Into<String>, short_name: impl Into<String>) -> Self {
        let short_name = short_name.into();
        Self {
            id: id.into(),
            description: Some(short_name.clone()),
            short_name: Some(short_name),
            category: None,
            source_db: Some("mock".to_string()),
            nutrition: NutritionMap::new(),
            reference_weight: Some(100.0),
        }
    }

    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }

    pub fn nutrient(mut self, name: &str, value: f64) -> Self {
        self.nutrition.insert(name.to_string(), value);
        self
    }

    fn names(&self) -> impl Iterator<Item = &str> {
        self.short_name
            .iter()
            .chain(self.description.iter())
            .map(String::as_str)
    }

    fn to_hit(&self, score: f32) -> RawHit {
        RawHit {
            id: self.id.clone(),
            score,
            source: HitSource {
                short_name: self.short_name.clone(),
                description: self.description.clone(),
                original_name: None,
                category: self.category.clone(),
                source_db: self.source_db.clone(),
                nutrition: self.nutrition.clone(),
                reference_weight: self.reference_weight,
            },
        }
    }
}

#[derive(Debug, Clone, Default)]
/// Token-overlap ranking over a fixed set of entries.
pub struct MockCatalog {
    entries: Vec<CatalogEntry>,
}

impl MockCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_entry(mut self, entry: CatalogEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Ranks entries sharing at least one normalized token with `term`.
    pub fn search(&self, term: &str, limit: usize) -> Vec<RawHit> {
        let query = normalize(term);
        let query_tokens: HashSet<&str> = query.split(' ').filter(|t| !t.is_empty()).collect();
        if query_tokens.is_empty() {
            return Vec::new();
        }

        let mut scored: Vec<(f32, &CatalogEntry)> = self
            .entries
            .iter()
            .filter_map(|entry| {
                let best = entry
                    .names()
                    .map(|name| overlap_score(&query, &query_tokens, &normalize(name)))
                    .fold(0.0_f32, f32::max);
                (best > 0.0).then_some((best, entry))
            })
            .collect();

        scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| a.1.id.cmp(&b.1.id)));

        scored
            .into_iter()
            .take(limit)
            .map(|(score, entry)| entry.to_hit(score))
            .collect()
    }
}

fn overlap_score(query: &str, query_tokens: &HashSet<&str>, name: &str) -> f32 {
    let name_tokens: HashSet<&str> = name.split(' ').filter(|t| !t.is_empty()).collect();
    let shared = query_tokens.intersection(&name_tokens).count();
    if shared == 0 {
        return 0.0;
    }
    let denom = query_tokens.len().max(name_tokens.len()) as f32;
    let exact_bonus = if query == name { 5.0 } else { 0.0 };
    10.0 * shared as f32 / denom + exact_bonus
}

#[derive(Default)]
/// Mock multi-search engine. Counts round trips and can be switched off.
pub struct MockSearchEngine {
    catalog: MockCatalog,
    calls: AtomicUsize,
    unavailable: AtomicBool,
    failing_terms: Mutex<HashSet<String>>,
    requests: Mutex<Vec<MultiSearchRequest>>,
}

impl MockSearchEngine {
    pub fn new(catalog: MockCatalog) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    /// Makes every subsequent call fail outright.
    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.store(unavailable, Ordering::SeqCst);
    }

    /// Makes the query for `term` fail inside an otherwise successful response.
    pub fn fail_term(&self, term: &str) {
        self.failing_terms.lock().insert(term.to_string());
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn requests(&self) -> Vec<MultiSearchRequest> {
        self.requests.lock().clone()
    }
}

impl SearchEngine for MockSearchEngine {
    async fn multi_search(
        &self,
        request: MultiSearchRequest,
    ) -> BackendResult<MultiSearchResponse> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requests.lock().push(request.clone());

        if self.unavailable.load(Ordering::SeqCst) {
            return Err(BackendError::Request {
                url: "mock://engine".to_string(),
                message: "connection refused".to_string(),
            });
        }

        let failing = self.failing_terms.lock().clone();
        let responses = request
            .queries
            .iter()
            .map(|query| {
                if failing.contains(&query.term) {
                    QueryResponse::failed(format!("shard failure for '{}'", query.term))
                } else {
                    QueryResponse::from_hits(self.catalog.search(&query.term, query.size))
                }
            })
            .collect();

        Ok(MultiSearchResponse { responses })
    }

    async fn analyze(&self, text: &str, _analyzer: Option<&str>) -> BackendResult<Vec<String>> {
        Ok(normalize(text)
            .split(' ')
            .filter(|t| !t.is_empty())
            .map(str::to_string)
            .collect())
    }
}

#[derive(Default)]
/// Mock per-term suggestion API with failure and latency injection.
pub struct MockSuggestionApi {
    catalog: MockCatalog,
    calls: AtomicUsize,
    in_flight: Arc<AtomicUsize>,
    max_in_flight: AtomicUsize,
    failing_terms: Mutex<HashSet<String>>,
    delays: Mutex<HashMap<String, Duration>>,
    requested: Mutex<Vec<String>>,
}

struct InFlightGuard(Arc<AtomicUsize>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.fetch_sub(1, Ordering::SeqCst);
    }
}

impl MockSuggestionApi {
    pub fn new(catalog: MockCatalog) -> Self {
        Self {
            catalog,
            ..Default::default()
        }
    }

    pub fn fail_term(&self, term: &str) {
        self.failing_terms.lock().insert(term.to_string());
    }

    /// Delays the response for `term` (use with a paused tokio clock).
    pub fn delay_term(&self, term: &str, delay: Duration) {
        self.delays.lock().insert(term.to_string(), delay);
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Highest number of concurrently pending requests observed.
    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Queries in the order they were received.
    pub fn requested(&self) -> Vec<String> {
        self.requested.lock().clone()
    }
}

impl SuggestionApi for MockSuggestionApi {
    async fn suggest(&self, request: SuggestionRequest) -> BackendResult<Vec<RawHit>> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.requested.lock().push(request.query.clone());

        let current = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        let _guard = InFlightGuard(Arc::clone(&self.in_flight));
        self.max_in_flight.fetch_max(current, Ordering::SeqCst);

        let delay = self.delays.lock().get(&request.query).copied();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.failing_terms.lock().contains(&request.query) {
            return Err(BackendError::Status {
                url: "mock://suggest".to_string(),
                status: 503,
                body: "service unavailable".to_string(),
            });
        }

        Ok(self.catalog.search(&request.query, request.limit))
    }
}
