//! Top-level entry point: original wave, refinement, consolidation.

pub mod config;
pub mod pipeline;


pub use config::MatcherConfig;
pub use pipeline::NutritionMatcher;
