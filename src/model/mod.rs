//! Shared data model: search terms, match candidates and per-wave summaries.

pub mod candidate;
pub mod summary;
pub mod term;

#[cfg(test)]
mod tests;

pub use candidate::{MatchCandidate, MatchDetails, NameField, NutritionMap};
pub use summary::{SearchSummary, TermFailure};
pub use term::{SearchTerm, TermKind};
