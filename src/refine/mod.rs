//! Phase 1.5 refinement: asks a query-rewriting oracle for new phrasings of unresolved
//! terms and re-searches them until every term resolves or the budget runs out.
//!
//! The loop is an explicit state machine (see [`orchestrator`]). Each pass hands the
//! oracle the full iteration history so it can avoid rewrites that already failed.

pub mod config;
pub mod error;
#[cfg(any(test, feature = "mock"))]
pub mod mock;
pub mod oracle;
pub mod orchestrator;
pub mod types;


pub use config::RefinementConfig;
pub use error::{OracleError, OracleResult};
#[cfg(any(test, feature = "mock"))]
pub use mock::MockQueryOracle;
pub use oracle::{HttpQueryOracle, NoopOracle, QueryOracle};
pub use orchestrator::{RefinementOrchestrator, RefinementOutcome};
pub use types::{
    AlternativeQuery, IterationRecord, NoMatchItem, OracleResponse, RecognitionContext,
    RefinementRequest, Termination,
};
