use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::backend::RawHit;
use crate::config::ConfigError;
use crate::constants::{
    DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE, DEFAULT_BATCHED_MAX, DEFAULT_BULK_TIMEOUT,
    DEFAULT_ES_INDEX, DEFAULT_PARALLEL_MAX, DEFAULT_TERM_TIMEOUT,
};

use super::error::TermError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Strategy {
    /// One concurrent suggestion request per term.
    Parallel,
    /// Fixed-size concurrent chunks with a delay between chunks.
    Batched,
    /// One multi-search request for the whole wave.
    Bulk,
}

impl Strategy {
    pub fn as_str(&self) -> &'static str {
        match self {
            Strategy::Parallel => "parallel",
            Strategy::Batched => "batched",
            Strategy::Bulk => "bulk",
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Batch-size thresholds and timeouts for [`super::StrategyRouter`].
pub struct RoutingConfig {
    /// Largest wave served by the Parallel executor.
    pub parallel_max: usize,
    /// Largest wave served by the Batched executor.
    pub batched_max: usize,
    /// Chunk size for the Batched executor.
    pub batch_size: usize,
    /// Pause between Batched chunks.
    pub batch_delay: Duration,
    /// Timeout for each per-term suggestion request.
    pub term_timeout: Duration,
    /// Timeout for the single Bulk call.
    pub bulk_timeout: Duration,
    /// Engine index targeted by Bulk waves.
    pub index: String,
    /// Forwarded as the suggestion API's debug flag.
    pub debug: bool,
}

impl Default for RoutingConfig {
    fn default() -> Self {
        Self {
            parallel_max: DEFAULT_PARALLEL_MAX,
            batched_max: DEFAULT_BATCHED_MAX,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            term_timeout: DEFAULT_TERM_TIMEOUT,
            bulk_timeout: DEFAULT_BULK_TIMEOUT,
            index: DEFAULT_ES_INDEX.to_string(),
            debug: false,
        }
    }
}

impl RoutingConfig {
    pub fn with_thresholds(mut self, parallel_max: usize, batched_max: usize) -> Self {
        self.parallel_max = parallel_max;
        self.batched_max = batched_max;
        self
    }

    pub fn with_batching(mut self, batch_size: usize, batch_delay: Duration) -> Self {
        self.batch_size = batch_size;
        self.batch_delay = batch_delay;
        self
    }

    pub fn with_term_timeout(mut self, timeout: Duration) -> Self {
        self.term_timeout = timeout;
        self
    }

    pub fn with_index(mut self, index: impl Into<String>) -> Self {
        self.index = index.into();
        self
    }

    /// Picks an executor from the wave size alone.
    pub fn route(&self, term_count: usize) -> Strategy {
        if term_count <= self.parallel_max {
            Strategy::Parallel
        } else if term_count <= self.batched_max {
            Strategy::Batched
        } else {
            Strategy::Bulk
        }
    }

    /// Route for a wave of independent rewrites: fanned out in full up to `batched_max`,
    /// one multi-search above it. Never Batched.
    pub fn route_rewrites(&self, term_count: usize) -> Strategy {
        if term_count <= self.batched_max {
            Strategy::Parallel
        } else {
            Strategy::Bulk
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.parallel_max >= self.batched_max {
            return Err(ConfigError::InvalidValue {
                name: "parallel_max",
                reason: format!(
                    "must be below batched_max ({} >= {})",
                    self.parallel_max, self.batched_max
                ),
            });
        }
        if self.batch_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "batch_size",
                reason: "must be > 0".to_string(),
            });
        }
        if self.term_timeout.is_zero() || self.bulk_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "term_timeout",
                reason: "timeouts must be non-zero".to_string(),
            });
        }
        if self.index.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "index",
                reason: "cannot be empty".to_string(),
            });
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Raw per-term result of a wave.
pub struct TermOutcome {
    pub term: String,
    pub hits: Vec<RawHit>,
    pub errors: Vec<TermError>,
}

impl TermOutcome {
    pub fn hits(term: impl Into<String>, hits: Vec<RawHit>) -> Self {
        Self {
            term: term.into(),
            hits,
            errors: Vec::new(),
        }
    }

    pub fn failed(term: impl Into<String>, error: TermError) -> Self {
        Self {
            term: term.into(),
            hits: Vec::new(),
            errors: vec![error],
        }
    }

    pub fn is_failed(&self) -> bool {
        self.hits.is_empty() && !self.errors.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
/// Outcomes of one wave, in input order.
pub struct WaveResult {
    pub strategy: Strategy,
    pub outcomes: Vec<TermOutcome>,
    pub elapsed: Duration,
    /// Backend round trips issued.
    pub request_count: usize,
}

impl WaveResult {
    pub fn term_count(&self) -> usize {
        self.outcomes.len()
    }

    pub fn outcome(&self, term: &str) -> Option<&TermOutcome> {
        self.outcomes.iter().find(|o| o.term == term)
    }
}
