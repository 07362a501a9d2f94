use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
/// A failure confined to one term of a wave.
pub enum TermError {
    /// The backend request for this term failed.
    #[error("backend error: {message}")]
    Backend {
        /// Error message.
        message: String,
    },

    /// The term did not complete within its timeout.
    #[error("timed out after {after_ms}ms")]
    Timeout {
        /// Configured timeout in milliseconds.
        after_ms: u64,
    },

    /// A hit was returned but could not be mapped to a candidate.
    #[error("malformed hit '{id}': {reason}")]
    MalformedHit {
        /// Backend document id.
        id: String,
        /// Why the hit was rejected.
        reason: String,
    },
}

#[derive(Debug, Error)]
/// Errors that fail a whole wave (and the request that issued it).
pub enum SearchError {
    /// The Bulk executor's single engine call failed.
    #[error("search engine unavailable for index '{index}': {message}")]
    EngineUnavailable {
        /// Index the wave targeted.
        index: String,
        /// Underlying error message.
        message: String,
    },
}

impl SearchError {
    pub fn is_engine_unavailable(&self) -> bool {
        matches!(self, SearchError::EngineUnavailable { .. })
    }
}

/// Convenience result type for wave execution.
pub type SearchResult<T> = Result<T, SearchError>;
