//! Merges the original wave and every refinement pass into one winner per term.

pub mod consolidator;
pub mod types;


pub use consolidator::ResultConsolidator;
pub use types::{AlternativeMatch, CoverageStats, FinalMatch, MatchSource, RefinementResult};
