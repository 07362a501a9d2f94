use std::sync::Arc;

use tokio::time::Instant;
use tracing::{info, instrument};

use crate::backend::{SearchEngine, SuggestionApi};
use crate::query::{QueryConfig, RankedQueryBuilder};

use super::error::SearchResult;
use super::executor::{BatchedExecutor, BulkExecutor, ParallelExecutor};
use super::types::{RoutingConfig, Strategy, WaveResult};

/// Selects an executor from the wave size and runs it.
pub struct StrategyRouter<E: SearchEngine, S: SuggestionApi> {
    config: RoutingConfig,
    parallel: ParallelExecutor<S>,
    batched: BatchedExecutor<S>,
    bulk: BulkExecutor<E>,
}

impl<E: SearchEngine, S: SuggestionApi> std::fmt::Debug for StrategyRouter<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("StrategyRouter")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: SearchEngine, S: SuggestionApi> StrategyRouter<E, S> {
    pub fn new(
        engine: Arc<E>,
        suggestions: Arc<S>,
        query: QueryConfig,
        config: RoutingConfig,
    ) -> Self {
        let parallel = ParallelExecutor::new(suggestions, query.result_size, config.term_timeout)
            .with_debug(config.debug);
        let batched = BatchedExecutor::new(parallel.clone(), config.batch_size, config.batch_delay);
        let bulk = BulkExecutor::new(
            engine,
            RankedQueryBuilder::new(query),
            config.index.clone(),
            config.bulk_timeout,
        );

        Self {
            config,
            parallel,
            batched,
            bulk,
        }
    }

    pub fn config(&self) -> &RoutingConfig {
        &self.config
    }

    pub fn route(&self, term_count: usize) -> Strategy {
        self.config.route(term_count)
    }

    /// Runs one wave. Outcomes keep the order of `terms`.
    #[instrument(skip(self, terms), fields(term_count = terms.len()))]
    pub async fn execute(&self, terms: &[String]) -> SearchResult<WaveResult> {
        self.execute_with(self.route(terms.len()), terms).await
    }

    /// Runs a wave of refinement rewrites, each searched as its own query.
    #[instrument(skip(self, terms), fields(term_count = terms.len()))]
    pub async fn execute_rewrites(&self, terms: &[String]) -> SearchResult<WaveResult> {
        self.execute_with(self.config.route_rewrites(terms.len()), terms).await
    }

    async fn execute_with(
        &self,
        strategy: Strategy,
        terms: &[String],
    ) -> SearchResult<WaveResult> {
        let started = Instant::now();

        if terms.is_empty() {
            return Ok(WaveResult {
                strategy,
                outcomes: Vec::new(),
                elapsed: started.elapsed(),
                request_count: 0,
            });
        }

        let (outcomes, request_count) = match strategy {
            Strategy::Parallel => (self.parallel.execute(terms).await, terms.len()),
            Strategy::Batched => (self.batched.execute(terms).await, terms.len()),
            Strategy::Bulk => (self.bulk.execute(terms).await?, 1),
        };

        let elapsed = started.elapsed();
        let failed = outcomes.iter().filter(|o| o.is_failed()).count();
        info!(
            strategy = %strategy,
            requests = request_count,
            failed,
            elapsed_ms = elapsed.as_millis() as u64,
            "Wave complete"
        );

        Ok(WaveResult {
            strategy,
            outcomes,
            elapsed,
            request_count,
        })
    }
}
