use serde::{Deserialize, Serialize};
use tracing::trace;

use super::normalizer::{NormalizeOptions, TermNormalizer, Transform};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Why a pair did or did not classify as exact.
pub enum MatchKind {
    /// Byte-identical after trimming.
    Identical,
    CaseOnly,
    PunctuationOnly,
    PossessiveOnly,
    PluralOnly,
    OrderOnly,
    /// Equal after normalization, but no single step was decisive (e.g. extra whitespace).
    Formatting,
    /// More than one step was needed.
    Combination,
    NotExact,
    /// One side normalized to nothing.
    Empty,
}

impl MatchKind {
    fn single(transform: Transform) -> Self {
        match transform {
            Transform::Case => MatchKind::CaseOnly,
            Transform::Punctuation => MatchKind::PunctuationOnly,
            Transform::Possessive => MatchKind::PossessiveOnly,
            Transform::Plural => MatchKind::PluralOnly,
            Transform::WordOrder => MatchKind::OrderOnly,
        }
    }

    pub fn is_exact(&self) -> bool {
        !matches!(self, MatchKind::NotExact | MatchKind::Empty)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// Outcome of comparing a query with one candidate name.
pub struct Classification {
    pub is_exact: bool,
    pub kind: MatchKind,
    pub transforms: Vec<Transform>,
    pub normalized_query: String,
    pub normalized_name: String,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ExactMatchClassifier {
    normalizer: TermNormalizer,
}

impl ExactMatchClassifier {
    pub fn new(normalizer: TermNormalizer) -> Self {
        Self { normalizer }
    }

    pub fn normalizer(&self) -> &TermNormalizer {
        &self.normalizer
    }

    pub fn is_exact(&self, query: &str, candidate_name: &str) -> bool {
        self.classify(query, candidate_name).is_exact
    }

    /// Compares `query` with `candidate_name`. Never panics.
    pub fn classify(&self, query: &str, candidate_name: &str) -> Classification {
        let normalized_query = self.normalizer.normalize(query);
        let normalized_name = self.normalizer.normalize(candidate_name);

        let (kind, transforms) = if normalized_query.is_empty() || normalized_name.is_empty() {
            (MatchKind::Empty, Vec::new())
        } else if normalized_query != normalized_name {
            (MatchKind::NotExact, Vec::new())
        } else if query.trim() == candidate_name.trim() {
            (MatchKind::Identical, Vec::new())
        } else {
            let transforms = self.required_transforms(query, candidate_name);
            let kind = match transforms.as_slice() {
                [] => MatchKind::Formatting,
                [single] => MatchKind::single(*single),
                _ => MatchKind::Combination,
            };
            (kind, transforms)
        };

        trace!(
            query = query,
            candidate = candidate_name,
            kind = ?kind,
            "classified candidate"
        );

        Classification {
            is_exact: kind.is_exact(),
            kind,
            transforms,
            normalized_query,
            normalized_name,
        }
    }

    /// A transform is required when the pair stops comparing equal without it.
    fn required_transforms(&self, query: &str, candidate_name: &str) -> Vec<Transform> {
        Transform::ALL
            .into_iter()
            .filter(|transform| {
                let options = NormalizeOptions::ALL.without(*transform);
                self.normalizer.normalize_with(query, options)
                    != self.normalizer.normalize_with(candidate_name, options)
            })
            .collect()
    }
}
