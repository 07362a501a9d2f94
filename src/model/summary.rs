use std::collections::BTreeSet;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::search::{Strategy, TermError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A per-term error carried in-band on a summary.
pub struct TermFailure {
    pub term: String,
    pub error: TermError,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Aggregate counters for one search wave.
pub struct SearchSummary {
    pub total_terms: usize,
    /// Terms with at least one exact candidate.
    pub matched_terms: usize,
    /// Terms without an exact candidate that recorded at least one error.
    pub failed_terms: usize,
    pub match_rate: f64,
    pub elapsed_ms: u64,
    pub strategy_used: Strategy,
    pub errors: Vec<TermFailure>,
}

impl SearchSummary {
    /// Builds a summary; `match_rate` is derived here and nowhere else.
    pub fn compute(
        total_terms: usize,
        exact_terms: &BTreeSet<String>,
        errors: Vec<TermFailure>,
        elapsed: Duration,
        strategy_used: Strategy,
    ) -> Self {
        let matched_terms = exact_terms.len();
        let failed_terms = errors
            .iter()
            .map(|f| f.term.as_str())
            .filter(|term| !exact_terms.contains(*term))
            .collect::<BTreeSet<_>>()
            .len();

        Self {
            total_terms,
            matched_terms,
            failed_terms,
            match_rate: rate(matched_terms, total_terms),
            elapsed_ms: elapsed.as_millis() as u64,
            strategy_used,
            errors,
        }
    }

    /// Terms that were searched cleanly but found nothing exact.
    pub fn unmatched_terms(&self) -> usize {
        self.total_terms
            .saturating_sub(self.matched_terms)
            .saturating_sub(self.failed_terms)
    }

    pub fn has_errors(&self) -> bool {
        !self.errors.is_empty()
    }
}

pub(crate) fn rate(numerator: usize, denominator: usize) -> f64 {
    if denominator == 0 {
        0.0
    } else {
        numerator as f64 / denominator as f64
    }
}
