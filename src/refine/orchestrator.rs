//! The refinement state machine.
//!
//! ```text
//! Evaluating ──(all exact)──────────────▶ Done(Converged)
//!     │      ──(budget spent)───────────▶ Done(MaxIterationsReached)
//!     ▼
//! Refining ──(oracle failed / nothing usable)──▶ Done(OracleExhausted)
//!     ▼
//! Searching ──(wave complete)──▶ Evaluating
//! ```
//!
//! The deadline, when configured, is checked at every transition and bounds every await;
//! hitting it ends the loop in `Done(Cancelled)` with completed iterations kept.

use std::collections::{BTreeMap, BTreeSet};
use std::time::Duration;

use tokio::time::{Instant, timeout};
use tracing::{debug, info, instrument, warn};

use crate::assemble::{AssembledWave, ResultAssembler};
use crate::backend::{SearchEngine, SuggestionApi};
use crate::consolidate::AlternativeMatch;
use crate::model::SearchTerm;
use crate::normalize::TermNormalizer;
use crate::search::{SearchResult, StrategyRouter};

use super::config::RefinementConfig;
use super::error::OracleError;
use super::oracle::QueryOracle;
use super::types::{
    AlternativeQuery, IterationRecord, NoMatchItem, RecognitionContext, RefinementRequest,
    Termination,
};

#[derive(Debug, Clone, PartialEq)]
/// Everything the loop produced, ready for consolidation.
pub struct RefinementOutcome {
    pub iterations: Vec<IterationRecord>,
    /// Per original term, one entry per searched alternative in iteration order.
    pub alternative_matches: BTreeMap<String, Vec<AlternativeMatch>>,
    pub termination: Termination,
    /// Last oracle failure, if the loop ended on one.
    pub oracle_error: Option<String>,
}

enum Phase {
    Evaluating,
    Refining(Vec<NoMatchItem>),
    Searching {
        items: Vec<NoMatchItem>,
        alternatives: Vec<AlternativeQuery>,
        generated_count: usize,
    },
    Done(Termination),
}

/// Per-request accumulators. Owned by one `run` call.
struct LoopState {
    resolved: BTreeSet<String>,
    /// Normalized rewrites already searched, per original term.
    tried: BTreeMap<String, BTreeSet<String>>,
    iterations: Vec<IterationRecord>,
    alternative_matches: BTreeMap<String, Vec<AlternativeMatch>>,
    oracle_error: Option<String>,
}

pub struct RefinementOrchestrator<'a, E: SearchEngine, S: SuggestionApi> {
    router: &'a StrategyRouter<E, S>,
    assembler: &'a ResultAssembler,
    oracle: &'a dyn QueryOracle,
    config: &'a RefinementConfig,
    normalizer: TermNormalizer,
}

impl<'a, E: SearchEngine, S: SuggestionApi> RefinementOrchestrator<'a, E, S> {
    pub fn new(
        router: &'a StrategyRouter<E, S>,
        assembler: &'a ResultAssembler,
        oracle: &'a dyn QueryOracle,
        config: &'a RefinementConfig,
    ) -> Self {
        Self {
            router,
            assembler,
            oracle,
            config,
            normalizer: *assembler.classifier().normalizer(),
        }
    }

    /// Refines every term of `terms` lacking an exact candidate in `original`.
    ///
    /// Only an engine-unavailable wave escapes as an error; oracle trouble ends the loop.
    #[instrument(
        skip_all,
        fields(terms = terms.len(), max_iterations = self.config.max_iterations)
    )]
    pub async fn run(
        &self,
        terms: &[SearchTerm],
        context: &RecognitionContext,
        original: &AssembledWave,
    ) -> SearchResult<RefinementOutcome> {
        let deadline = self.config.deadline.map(|d| Instant::now() + d);
        let mut state = LoopState {
            resolved: terms
                .iter()
                .map(SearchTerm::text)
                .filter(|t| original.has_exact(t))
                .map(str::to_string)
                .collect(),
            tried: terms
                .iter()
                .map(|t| {
                    let seed = BTreeSet::from([self.normalizer.normalize(t.text())]);
                    (t.text().to_string(), seed)
                })
                .collect(),
            iterations: Vec::new(),
            alternative_matches: BTreeMap::new(),
            oracle_error: None,
        };

        let mut phase = Phase::Evaluating;
        let termination = loop {
            phase = match phase {
                Phase::Evaluating => self.evaluate(terms, original, &state, deadline),
                Phase::Refining(items) => {
                    self.refine(items, context, &mut state, deadline).await
                }
                Phase::Searching {
                    items,
                    alternatives,
                    generated_count,
                } => {
                    self.search(items, alternatives, generated_count, &mut state, deadline)
                        .await?
                }
                Phase::Done(termination) => break termination,
            };
        };

        info!(
            termination = %termination,
            iterations = state.iterations.len(),
            unresolved = terms.len() - state.resolved.len(),
            "Refinement finished"
        );

        Ok(RefinementOutcome {
            iterations: state.iterations,
            alternative_matches: state.alternative_matches,
            termination,
            oracle_error: state.oracle_error,
        })
    }

    fn evaluate(
        &self,
        terms: &[SearchTerm],
        original: &AssembledWave,
        state: &LoopState,
        deadline: Option<Instant>,
    ) -> Phase {
        let items: Vec<NoMatchItem> = terms
            .iter()
            .filter(|t| !state.resolved.contains(t.text()))
            .map(|t| no_match_item(t, original))
            .collect();

        if items.is_empty() {
            Phase::Done(Termination::Converged)
        } else if state.iterations.len() >= self.config.max_iterations {
            Phase::Done(Termination::MaxIterationsReached)
        } else if remaining(deadline).is_some_and(|r| r.is_zero()) {
            Phase::Done(Termination::Cancelled)
        } else {
            debug!(unresolved = items.len(), "Terms still unresolved");
            Phase::Refining(items)
        }
    }

    async fn refine(
        &self,
        items: Vec<NoMatchItem>,
        context: &RecognitionContext,
        state: &mut LoopState,
        deadline: Option<Instant>,
    ) -> Phase {
        let request = RefinementRequest {
            context: context.clone(),
            unresolved: items.clone(),
            history: state.iterations.clone(),
        };

        let limit = self.config.oracle_timeout;
        let budget = remaining(deadline).map_or(limit, |r| r.min(limit));
        let response = match timeout(budget, self.oracle.propose(&request)).await {
            Ok(Ok(response)) => response,
            Ok(Err(e)) => return self.oracle_failed(e, state),
            Err(_) if budget < limit => return Phase::Done(Termination::Cancelled),
            Err(_) => {
                let e = OracleError::Timeout {
                    after_ms: limit.as_millis() as u64,
                };
                return self.oracle_failed(e, state);
            }
        };

        let generated_count = response.alternative_query.len();
        let alternatives = self.usable_alternatives(response.alternative_query, &items, state);
        debug!(
            generated = generated_count,
            usable = alternatives.len(),
            "Oracle proposed alternatives"
        );

        if alternatives.is_empty() {
            Phase::Done(Termination::OracleExhausted)
        } else {
            Phase::Searching {
                items,
                alternatives,
                generated_count,
            }
        }
    }

    fn oracle_failed(&self, error: OracleError, state: &mut LoopState) -> Phase {
        warn!(error = %error, "Query oracle failed, stopping refinement");
        state.oracle_error = Some(error.to_string());
        Phase::Done(Termination::OracleExhausted)
    }

    /// Keeps alternatives for unresolved terms, capped per term, minus repeats.
    fn usable_alternatives(
        &self,
        proposed: Vec<AlternativeQuery>,
        items: &[NoMatchItem],
        state: &mut LoopState,
    ) -> Vec<AlternativeQuery> {
        let unresolved: BTreeSet<&str> = items.iter().map(|i| i.original_term.as_str()).collect();
        let mut per_term: BTreeMap<String, usize> = BTreeMap::new();
        let mut seen: BTreeSet<(String, String)> = BTreeSet::new();
        let mut usable = Vec::new();

        for mut alternative in proposed {
            alternative.rewritten_term = alternative.rewritten_term.trim().to_string();
            if alternative.rewritten_term.is_empty()
                || !unresolved.contains(alternative.original_term.as_str())
            {
                continue;
            }

            let key = self.normalizer.normalize(&alternative.rewritten_term);
            if key.is_empty() || !seen.insert((alternative.original_term.clone(), key.clone())) {
                continue;
            }

            let tried = state
                .tried
                .entry(alternative.original_term.clone())
                .or_default();
            if self.config.skip_repeated_rewrites && tried.contains(&key) {
                debug!(
                    term = %alternative.original_term,
                    rewrite = %alternative.rewritten_term,
                    "Skipping repeated rewrite"
                );
                continue;
            }

            let count = per_term.entry(alternative.original_term.clone()).or_default();
            if *count >= self.config.max_alternatives_per_term {
                continue;
            }
            *count += 1;
            tried.insert(key);
            usable.push(alternative);
        }

        usable
    }

    async fn search(
        &self,
        items: Vec<NoMatchItem>,
        alternatives: Vec<AlternativeQuery>,
        generated_count: usize,
        state: &mut LoopState,
        deadline: Option<Instant>,
    ) -> SearchResult<Phase> {
        let mut queries: Vec<String> = Vec::new();
        for alternative in &alternatives {
            if !queries.contains(&alternative.rewritten_term) {
                queries.push(alternative.rewritten_term.clone());
            }
        }

        let wave = match remaining(deadline) {
            Some(left) => match timeout(left, self.router.execute_rewrites(&queries)).await {
                Ok(wave) => wave?,
                Err(_) => return Ok(Phase::Done(Termination::Cancelled)),
            },
            None => self.router.execute_rewrites(&queries).await?,
        };
        let assembled = self.assembler.assemble(&wave);

        let iteration_index = state.iterations.len() + 1;
        let mut resolved = Vec::new();
        for alternative in &alternatives {
            let candidate = assembled
                .best_exact(&alternative.rewritten_term)
                .or_else(|| assembled.candidates(&alternative.rewritten_term).first());
            let Some(candidate) = candidate else { continue };

            if candidate.is_exact_match && state.resolved.insert(alternative.original_term.clone())
            {
                resolved.push(alternative.original_term.clone());
            }

            state
                .alternative_matches
                .entry(alternative.original_term.clone())
                .or_default()
                .push(AlternativeMatch {
                    candidate: candidate.clone(),
                    rewritten_term: alternative.rewritten_term.clone(),
                    rationale: alternative.rationale.clone(),
                    strategy: alternative.strategy_tag.clone(),
                    iteration: iteration_index,
                });
        }

        info!(
            iteration = iteration_index,
            searched = queries.len(),
            resolved = resolved.len(),
            "Refinement iteration complete"
        );

        state.iterations.push(IterationRecord {
            iteration_index,
            no_match_items: items,
            alternatives,
            generated_count,
            resolved,
            summary: assembled.summary,
        });

        Ok(Phase::Evaluating)
    }
}

fn no_match_item(term: &SearchTerm, original: &AssembledWave) -> NoMatchItem {
    let candidates = original.candidates(term.text());
    let best = candidates.first();
    NoMatchItem {
        original_term: term.text().to_string(),
        kind: term.kind(),
        prior_confidence: term.confidence(),
        candidate_count: candidates.len(),
        best_score: best.map(|c| c.relevance_score),
        best_name: best.map(|c| c.canonical_name.clone()),
    }
}

fn remaining(deadline: Option<Instant>) -> Option<Duration> {
    deadline.map(|d| d.saturating_duration_since(Instant::now()))
}
