use std::time::Duration;

use crate::config::ConfigError;
use crate::constants::{
    DEFAULT_MAX_ALTERNATIVES_PER_TERM, DEFAULT_MAX_ITERATIONS, DEFAULT_ORACLE_TIMEOUT,
};

#[derive(Debug, Clone, PartialEq)]
pub struct RefinementConfig {
    /// Upper bound on recorded iterations. `0` disables refinement.
    pub max_iterations: usize,
    /// Timeout for one oracle call.
    pub oracle_timeout: Duration,
    /// Alternatives searched per unresolved term in one iteration.
    pub max_alternatives_per_term: usize,
    /// Drop rewrites equal to the original term or to one already tried for it.
    pub skip_repeated_rewrites: bool,
    /// Wall-clock budget for the whole loop.
    pub deadline: Option<Duration>,
}

impl Default for RefinementConfig {
    fn default() -> Self {
        Self {
            max_iterations: DEFAULT_MAX_ITERATIONS,
            oracle_timeout: DEFAULT_ORACLE_TIMEOUT,
            max_alternatives_per_term: DEFAULT_MAX_ALTERNATIVES_PER_TERM,
            skip_repeated_rewrites: true,
            deadline: None,
        }
    }
}

impl RefinementConfig {
    pub fn with_max_iterations(mut self, max_iterations: usize) -> Self {
        self.max_iterations = max_iterations;
        self
    }

    pub fn with_oracle_timeout(mut self, timeout: Duration) -> Self {
        self.oracle_timeout = timeout;
        self
    }

    pub fn with_skip_repeated_rewrites(mut self, skip: bool) -> Self {
        self.skip_repeated_rewrites = skip;
        self
    }

    pub fn with_deadline(mut self, deadline: Option<Duration>) -> Self {
        self.deadline = deadline;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.max_alternatives_per_term == 0 {
            return Err(ConfigError::InvalidValue {
                name: "max_alternatives_per_term",
                reason: "must be > 0".to_string(),
            });
        }
        if self.oracle_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: "oracle_timeout",
                reason: "must be > 0".to_string(),
            });
        }
        Ok(())
    }
}
