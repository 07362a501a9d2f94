//! Nutrimatch library crate (used by the CLI binary and integration tests).
//!
//! Resolves free-text food terms into canonical nutrition records held in a full-text
//! index, aiming for an exact match on every term.
//!
//! # Pipeline
//!
//! 1. [`StrategyRouter`] runs the original wave through the Parallel, Batched or Bulk
//!    executor, chosen from the number of terms.
//! 2. [`ResultAssembler`] maps hits to [`MatchCandidate`]s, classifying each with
//!    [`ExactMatchClassifier`].
//! 3. [`RefinementOrchestrator`] asks a [`QueryOracle`] to rewrite terms still lacking an
//!    exact match and re-searches the rewrites, up to a fixed iteration budget.
//! 4. [`ResultConsolidator`] picks one winner per term.
//!
//! [`NutritionMatcher`] wires these together.
//!
//! ## Test/Mock Support
//! In-memory engine, suggestion API and oracle implementations are available behind
//! `#[cfg(any(test, feature = "mock"))]`.

pub mod assemble;
pub mod backend;
pub mod config;
pub mod consolidate;
pub mod constants;
pub mod matcher;
pub mod model;
pub mod normalize;
pub mod query;
pub mod refine;
pub mod search;

pub use assemble::{AssembledWave, ResultAssembler};
#[cfg(any(test, feature = "mock"))]
pub use backend::{CatalogEntry, MockCatalog, MockSearchEngine, MockSuggestionApi};
pub use backend::{
    BackendError, BackendResult, ElasticsearchClient, HttpSuggestionClient, RawHit, SearchEngine,
    SuggestionApi,
};
pub use config::{Config, ConfigError};
pub use consolidate::{
    AlternativeMatch, CoverageStats, FinalMatch, MatchSource, RefinementResult,
    ResultConsolidator,
};
pub use matcher::{MatcherConfig, NutritionMatcher};
pub use model::{MatchCandidate, MatchDetails, SearchSummary, SearchTerm, TermKind};
pub use normalize::{Classification, ExactMatchClassifier, MatchKind, TermNormalizer, normalize};
pub use query::{QueryConfig, RankedQueryBuilder, TierBoosts};
#[cfg(any(test, feature = "mock"))]
pub use refine::MockQueryOracle;
pub use refine::{
    AlternativeQuery, HttpQueryOracle, IterationRecord, NoMatchItem, NoopOracle, OracleError,
    QueryOracle, RecognitionContext, RefinementConfig, RefinementOrchestrator, Termination,
};
pub use search::{RoutingConfig, SearchError, Strategy, StrategyRouter, TermError};
