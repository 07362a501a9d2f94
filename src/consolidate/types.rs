use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::model::{MatchCandidate, SearchSummary};
use crate::refine::{IterationRecord, Termination};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A candidate found through a rewritten query.
pub struct AlternativeMatch {
    pub candidate: MatchCandidate,
    pub rewritten_term: String,
    pub rationale: String,
    /// Oracle strategy tag of the rewrite.
    pub strategy: String,
    /// 1-based iteration that produced it.
    pub iteration: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum MatchSource {
    Original,
    Alternative {
        rewritten_term: String,
        rationale: String,
        strategy: String,
        iteration: usize,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// The winner chosen for one original term.
pub struct FinalMatch {
    pub candidate: MatchCandidate,
    pub source: MatchSource,
    /// `false` only for best-effort entries of unresolved terms.
    pub is_exact: bool,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// Exact-match coverage over the original term set.
pub struct CoverageStats {
    pub total_terms: usize,
    pub exact_terms: usize,
    pub resolved_by_original: usize,
    pub resolved_by_alternative: usize,
    pub unresolved_terms: usize,
    pub exact_match_rate: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RefinementResult {
    pub run_id: Uuid,
    pub original_matches: BTreeMap<String, Vec<MatchCandidate>>,
    pub alternative_matches: BTreeMap<String, Vec<AlternativeMatch>>,
    pub final_matches: BTreeMap<String, FinalMatch>,
    /// Every original term has an exact final match.
    pub all_resolved: bool,
    pub iterations: Vec<IterationRecord>,
    pub termination: Termination,
    pub coverage: CoverageStats,
    pub original_summary: SearchSummary,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub oracle_error: Option<String>,
}

impl RefinementResult {
    pub fn final_match(&self, term: &str) -> Option<&FinalMatch> {
        self.final_matches.get(term)
    }

    pub fn is_exact(&self, term: &str) -> bool {
        self.final_match(term).is_some_and(|m| m.is_exact)
    }

    /// Original terms without an exact final match, in key order.
    pub fn unresolved_terms(&self) -> Vec<&str> {
        self.original_matches
            .keys()
            .map(String::as_str)
            .filter(|term| !self.is_exact(term))
            .collect()
    }
}
