//! Wave execution: routes a batch of terms to the Parallel, Batched or Bulk executor.
//!
//! Parallel and Batched fan out one suggestion request per term. Bulk sends every term's
//! ranked query to the engine in a single multi-search call. Per-term failures are values on
//! [`TermOutcome`]; only a failed Bulk call surfaces as [`SearchError::EngineUnavailable`].

pub mod error;
pub mod executor;
pub mod router;
pub mod types;

#[cfg(test)]
mod tests;

pub use error::{SearchError, SearchResult, TermError};
pub use executor::{BatchedExecutor, BulkExecutor, ParallelExecutor};
pub use router::StrategyRouter;
pub use types::{RoutingConfig, Strategy, TermOutcome, WaveResult};
