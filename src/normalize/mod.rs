//! Term canonicalization and exact-match classification.
//!
//! [`TermNormalizer`] reduces a name to a comparison key: lowercase, punctuation stripped,
//! possessives removed, tokens singularized and sorted. [`ExactMatchClassifier`] compares two
//! keys and reports which of those reductions were needed.
//!
//! Both are total over arbitrary strings. Inputs that normalize to nothing are never exact.

pub mod classifier;
pub mod normalizer;

#[cfg(test)]
mod tests;

pub use classifier::{Classification, ExactMatchClassifier, MatchKind};
pub use normalizer::{NormalizeOptions, TermNormalizer, Transform, normalize, singularize};
