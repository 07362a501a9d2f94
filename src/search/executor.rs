use std::sync::Arc;
use std::time::Duration;

use futures_util::future::join_all;
use tokio::time::{sleep, timeout};
use tracing::{debug, warn};

use crate::backend::{MultiSearchRequest, SearchEngine, SuggestionApi, SuggestionRequest};
use crate::query::RankedQueryBuilder;

use super::error::{SearchError, SearchResult, TermError};
use super::types::TermOutcome;

/// Fans out one suggestion request per term and waits for all of them.
pub struct ParallelExecutor<S: SuggestionApi> {
    api: Arc<S>,
    limit: usize,
    term_timeout: Duration,
    debug: bool,
}

impl<S: SuggestionApi> Clone for ParallelExecutor<S> {
    fn clone(&self) -> Self {
        Self {
            api: Arc::clone(&self.api),
            limit: self.limit,
            term_timeout: self.term_timeout,
            debug: self.debug,
        }
    }
}

impl<S: SuggestionApi> ParallelExecutor<S> {
    pub fn new(api: Arc<S>, limit: usize, term_timeout: Duration) -> Self {
        Self {
            api,
            limit,
            term_timeout,
            debug: false,
        }
    }

    pub fn with_debug(mut self, debug: bool) -> Self {
        self.debug = debug;
        self
    }

    /// Outcomes are returned in the order of `terms`.
    pub async fn execute(&self, terms: &[String]) -> Vec<TermOutcome> {
        join_all(terms.iter().map(|term| self.search_term(term))).await
    }

    async fn search_term(&self, term: &str) -> TermOutcome {
        let request = SuggestionRequest {
            query: term.to_string(),
            limit: self.limit,
            debug: self.debug,
        };

        match timeout(self.term_timeout, self.api.suggest(request)).await {
            Ok(Ok(hits)) => TermOutcome::hits(term, hits),
            Ok(Err(e)) => {
                warn!(term = %term, error = %e, "Suggestion request failed");
                TermOutcome::failed(
                    term,
                    TermError::Backend {
                        message: e.to_string(),
                    },
                )
            }
            Err(_) => {
                warn!(
                    term = %term,
                    timeout_ms = self.term_timeout.as_millis() as u64,
                    "Suggestion request timed out"
                );
                TermOutcome::failed(
                    term,
                    TermError::Timeout {
                        after_ms: self.term_timeout.as_millis() as u64,
                    },
                )
            }
        }
    }
}

/// Runs the Parallel executor over fixed-size chunks, pausing between chunks.
pub struct BatchedExecutor<S: SuggestionApi> {
    inner: ParallelExecutor<S>,
    batch_size: usize,
    delay: Duration,
}

impl<S: SuggestionApi> BatchedExecutor<S> {
    pub fn new(inner: ParallelExecutor<S>, batch_size: usize, delay: Duration) -> Self {
        Self {
            inner,
            batch_size: batch_size.max(1),
            delay,
        }
    }

    pub async fn execute(&self, terms: &[String]) -> Vec<TermOutcome> {
        let mut outcomes = Vec::with_capacity(terms.len());
        for (index, chunk) in terms.chunks(self.batch_size).enumerate() {
            if index > 0 && !self.delay.is_zero() {
                sleep(self.delay).await;
            }
            debug!(chunk = index, size = chunk.len(), "Executing batch");
            outcomes.extend(self.inner.execute(chunk).await);
        }
        outcomes
    }
}

/// Sends every term's ranked query to the engine in one multi-search call.
pub struct BulkExecutor<E: SearchEngine> {
    engine: Arc<E>,
    builder: RankedQueryBuilder,
    index: String,
    call_timeout: Duration,
}

impl<E: SearchEngine> BulkExecutor<E> {
    pub fn new(
        engine: Arc<E>,
        builder: RankedQueryBuilder,
        index: impl Into<String>,
        call_timeout: Duration,
    ) -> Self {
        Self {
            engine,
            builder,
            index: index.into(),
            call_timeout,
        }
    }

    /// Fails the whole wave if the engine call fails; per-query errors stay per-term.
    pub async fn execute(&self, terms: &[String]) -> SearchResult<Vec<TermOutcome>> {
        let queries = terms.iter().map(|t| self.builder.build(t)).collect();
        let request = MultiSearchRequest::new(self.index.clone(), queries);

        let response = match timeout(self.call_timeout, self.engine.multi_search(request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => {
                return Err(SearchError::EngineUnavailable {
                    index: self.index.clone(),
                    message: e.to_string(),
                });
            }
            Err(_) => {
                return Err(SearchError::EngineUnavailable {
                    index: self.index.clone(),
                    message: format!(
                        "multi-search timed out after {}ms",
                        self.call_timeout.as_millis()
                    ),
                });
            }
        };

        if response.responses.len() != terms.len() {
            return Err(SearchError::EngineUnavailable {
                index: self.index.clone(),
                message: format!(
                    "expected {} responses, got {}",
                    terms.len(),
                    response.responses.len()
                ),
            });
        }

        Ok(terms
            .iter()
            .zip(response.responses)
            .map(|(term, response)| {
                let mut outcome = TermOutcome::hits(term.clone(), response.hits);
                if let Some(message) = response.error {
                    outcome.errors.push(TermError::Backend { message });
                }
                outcome
                    .errors
                    .extend(response.rejected.into_iter().map(|r| TermError::MalformedHit {
                        id: r.id,
                        reason: r.reason,
                    }));
                outcome
            })
            .collect())
    }
}
