use std::collections::HashSet;
use std::sync::Arc;

use tracing::{debug, info, instrument};
use uuid::Uuid;

use crate::assemble::{AssembledWave, ResultAssembler};
use crate::backend::{SearchEngine, SuggestionApi};
use crate::config::ConfigError;
use crate::consolidate::{RefinementResult, ResultConsolidator};
use crate::model::SearchTerm;
use crate::refine::{QueryOracle, RecognitionContext, RefinementOrchestrator};
use crate::search::{SearchResult, StrategyRouter};

use super::config::MatcherConfig;

/// Resolves recognized food terms to canonical nutrition records.
///
/// One `analyze` call is one independent run; the matcher holds no per-run state and can
/// be shared across concurrent requests.
pub struct NutritionMatcher<E: SearchEngine, S: SuggestionApi> {
    router: StrategyRouter<E, S>,
    assembler: ResultAssembler,
    consolidator: ResultConsolidator,
    oracle: Arc<dyn QueryOracle>,
    config: MatcherConfig,
}

impl<E: SearchEngine, S: SuggestionApi> std::fmt::Debug for NutritionMatcher<E, S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NutritionMatcher")
            .field("router", &self.router)
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl<E: SearchEngine, S: SuggestionApi> NutritionMatcher<E, S> {
    pub fn new(
        engine: Arc<E>,
        suggestions: Arc<S>,
        oracle: Arc<dyn QueryOracle>,
        config: MatcherConfig,
    ) -> Result<Self, ConfigError> {
        config.validate()?;

        let router = StrategyRouter::new(
            engine,
            suggestions,
            config.query.clone(),
            config.routing.clone(),
        );

        Ok(Self {
            router,
            assembler: ResultAssembler::default(),
            consolidator: ResultConsolidator::new(config.include_best_effort),
            oracle,
            config,
        })
    }

    pub fn config(&self) -> &MatcherConfig {
        &self.config
    }

    /// Runs one wave over `terms` without refinement.
    pub async fn search(&self, terms: &[SearchTerm]) -> SearchResult<AssembledWave> {
        let texts: Vec<String> = terms.iter().map(|t| t.text().to_string()).collect();
        let wave = self.router.execute(&texts).await?;
        Ok(self.assembler.assemble(&wave))
    }

    /// Full pipeline. Fails only when the engine is unavailable for a Bulk wave.
    ///
    /// Repeated and blank terms are dropped (first occurrence wins). Without an explicit
    /// `context`, one is derived from the terms.
    #[instrument(
        skip(self, terms, context),
        fields(run_id = tracing::field::Empty, term_count = terms.len())
    )]
    pub async fn analyze(
        &self,
        terms: &[SearchTerm],
        context: Option<RecognitionContext>,
    ) -> SearchResult<RefinementResult> {
        let run_id = Uuid::new_v4();
        tracing::Span::current().record("run_id", tracing::field::display(run_id));

        let terms = dedupe(terms);
        let context = context.unwrap_or_else(|| RecognitionContext::from_terms(&terms));

        let original = self.search(&terms).await?;
        debug!(
            matched = original.summary.matched_terms,
            total = original.summary.total_terms,
            strategy = %original.summary.strategy_used,
            "Original search complete"
        );

        let orchestrator = RefinementOrchestrator::new(
            &self.router,
            &self.assembler,
            self.oracle.as_ref(),
            &self.config.refinement,
        );
        let refinement = orchestrator.run(&terms, &context, &original).await?;

        let result = self
            .consolidator
            .consolidate(run_id, &terms, original, refinement);

        info!(
            exact = result.coverage.exact_terms,
            total = result.coverage.total_terms,
            iterations = result.iterations.len(),
            termination = %result.termination,
            all_resolved = result.all_resolved,
            "Analysis complete"
        );

        Ok(result)
    }
}

fn dedupe(terms: &[SearchTerm]) -> Vec<SearchTerm> {
    let mut seen = HashSet::new();
    terms
        .iter()
        .filter(|t| !t.text().trim().is_empty() && seen.insert(t.text().to_string()))
        .cloned()
        .collect()
}
