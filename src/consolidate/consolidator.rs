use tracing::debug;
use uuid::Uuid;

use crate::assemble::AssembledWave;
use crate::model::SearchTerm;
use crate::model::summary::rate;
use crate::refine::RefinementOutcome;

use super::types::{CoverageStats, FinalMatch, MatchSource, RefinementResult};

#[derive(Debug, Clone, Copy)]
pub struct ResultConsolidator {
    include_best_effort: bool,
}

impl Default for ResultConsolidator {
    fn default() -> Self {
        Self {
            include_best_effort: true,
        }
    }
}

impl ResultConsolidator {
    pub fn new(include_best_effort: bool) -> Self {
        Self {
            include_best_effort,
        }
    }

    /// Picks one winner per term: original exact, then the first exact alternative, then
    /// (optionally) the top original candidate marked non-exact.
    pub fn consolidate(
        &self,
        run_id: Uuid,
        terms: &[SearchTerm],
        original: AssembledWave,
        refinement: RefinementOutcome,
    ) -> RefinementResult {
        let mut final_matches = std::collections::BTreeMap::new();
        let mut coverage = CoverageStats {
            total_terms: terms.len(),
            ..Default::default()
        };

        for term in terms.iter().map(SearchTerm::text) {
            if let Some(candidate) = original.best_exact(term) {
                coverage.resolved_by_original += 1;
                final_matches.insert(
                    term.to_string(),
                    FinalMatch {
                        candidate: candidate.clone(),
                        source: MatchSource::Original,
                        is_exact: true,
                    },
                );
                continue;
            }

            let alternative = refinement
                .alternative_matches
                .get(term)
                .and_then(|matches| matches.iter().find(|m| m.candidate.is_exact_match));
            if let Some(alternative) = alternative {
                coverage.resolved_by_alternative += 1;
                final_matches.insert(
                    term.to_string(),
                    FinalMatch {
                        candidate: alternative.candidate.clone(),
                        source: MatchSource::Alternative {
                            rewritten_term: alternative.rewritten_term.clone(),
                            rationale: alternative.rationale.clone(),
                            strategy: alternative.strategy.clone(),
                            iteration: alternative.iteration,
                        },
                        is_exact: true,
                    },
                );
                continue;
            }

            if self.include_best_effort
                && let Some(candidate) = original.candidates(term).first()
            {
                final_matches.insert(
                    term.to_string(),
                    FinalMatch {
                        candidate: candidate.clone(),
                        source: MatchSource::Original,
                        is_exact: false,
                    },
                );
            }
        }

        coverage.exact_terms = coverage.resolved_by_original + coverage.resolved_by_alternative;
        coverage.unresolved_terms = coverage.total_terms - coverage.exact_terms;
        coverage.exact_match_rate = rate(coverage.exact_terms, coverage.total_terms);

        debug!(
            exact = coverage.exact_terms,
            by_alternative = coverage.resolved_by_alternative,
            unresolved = coverage.unresolved_terms,
            "Consolidated results"
        );

        RefinementResult {
            run_id,
            original_matches: original.matches,
            alternative_matches: refinement.alternative_matches,
            final_matches,
            all_resolved: coverage.unresolved_terms == 0,
            iterations: refinement.iterations,
            termination: refinement.termination,
            coverage,
            original_summary: original.summary,
            oracle_error: refinement.oracle_error,
        }
    }
}
