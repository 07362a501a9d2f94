use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::normalize::{MatchKind, Transform};
use crate::search::Strategy;

/// Nutrient name to amount per reference weight.
pub type NutritionMap = BTreeMap<String, f64>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Candidate name field a classification was made against.
pub enum NameField {
    ShortName,
    Description,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Diagnostics attached to every candidate.
pub struct MatchDetails {
    /// Field that produced the exact match, if any.
    pub matched_field: Option<NameField>,
    pub kind: MatchKind,
    /// Transformations that were required for the names to compare equal.
    pub transforms: Vec<Transform>,
    pub normalized_query: String,
    pub normalized_name: String,
    /// Zero-based position in the backend's ranking.
    pub rank: usize,
    pub strategy: Strategy,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// A canonical nutrition record found for a term.
pub struct MatchCandidate {
    pub id: String,
    pub canonical_name: String,
    pub short_name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub source_db: Option<String>,
    pub nutrition: NutritionMap,
    /// Reference weight in grams the nutrition values refer to.
    pub reference_weight: Option<f64>,
    pub relevance_score: f32,
    pub is_exact_match: bool,
    pub match_details: MatchDetails,
}
