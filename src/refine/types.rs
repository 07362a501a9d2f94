use serde::{Deserialize, Serialize};

use crate::model::{SearchSummary, SearchTerm, TermKind};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A term that had no exact candidate after the original search.
pub struct NoMatchItem {
    pub original_term: String,
    pub kind: TermKind,
    /// Upstream recognition confidence.
    pub prior_confidence: Option<f32>,
    /// Candidates the original search returned (none exact).
    pub candidate_count: usize,
    pub best_score: Option<f32>,
    pub best_name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One rewrite proposed by the oracle.
pub struct AlternativeQuery {
    pub original_term: String,
    pub rewritten_term: String,
    #[serde(default)]
    pub strategy_tag: String,
    #[serde(default)]
    pub rationale: String,
    #[serde(default)]
    pub confidence: Option<f32>,
}

impl AlternativeQuery {
    pub fn new(original_term: impl Into<String>, rewritten_term: impl Into<String>) -> Self {
        Self {
            original_term: original_term.into(),
            rewritten_term: rewritten_term.into(),
            strategy_tag: String::new(),
            rationale: String::new(),
            confidence: None,
        }
    }

    pub fn with_strategy_tag(mut self, tag: impl Into<String>) -> Self {
        self.strategy_tag = tag.into();
        self
    }

    pub fn with_rationale(mut self, rationale: impl Into<String>) -> Self {
        self.rationale = rationale.into();
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One completed refinement pass.
pub struct IterationRecord {
    /// 1-based.
    pub iteration_index: usize,
    pub no_match_items: Vec<NoMatchItem>,
    /// Alternatives that were searched.
    pub alternatives: Vec<AlternativeQuery>,
    /// Alternatives the oracle returned, before filtering.
    pub generated_count: usize,
    /// Original terms this pass resolved.
    pub resolved: Vec<String>,
    pub summary: SearchSummary,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Why the refinement loop stopped.
pub enum Termination {
    /// Every term has an exact match.
    Converged,
    MaxIterationsReached,
    /// The oracle failed or returned nothing usable.
    OracleExhausted,
    /// The loop deadline passed.
    Cancelled,
}

impl Termination {
    pub fn as_str(&self) -> &'static str {
        match self {
            Termination::Converged => "converged",
            Termination::MaxIterationsReached => "max_iterations_reached",
            Termination::OracleExhausted => "oracle_exhausted",
            Termination::Cancelled => "cancelled",
        }
    }
}

impl std::fmt::Display for Termination {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
/// What upstream recognition saw, passed to the oracle unchanged on every pass.
pub struct RecognitionContext {
    #[serde(default)]
    pub dish_names: Vec<String>,
    #[serde(default)]
    pub ingredient_names: Vec<String>,
    #[serde(default)]
    pub notes: Option<String>,
}

impl RecognitionContext {
    pub fn from_terms(terms: &[SearchTerm]) -> Self {
        let mut context = Self::default();
        for term in terms {
            match term.kind() {
                TermKind::Dish => context.dish_names.push(term.text().to_string()),
                TermKind::Ingredient => context.ingredient_names.push(term.text().to_string()),
            }
        }
        context
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = Some(notes.into());
        self
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// Body of one oracle call.
pub struct RefinementRequest {
    pub context: RecognitionContext,
    pub unresolved: Vec<NoMatchItem>,
    pub history: Vec<IterationRecord>,
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OracleResponse {
    #[serde(default)]
    pub alternative_query: Vec<AlternativeQuery>,
}

impl OracleResponse {
    pub fn new(alternative_query: Vec<AlternativeQuery>) -> Self {
        Self { alternative_query }
    }
}
