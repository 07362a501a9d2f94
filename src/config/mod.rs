//! Environment-backed configuration.
//!
//! Every setting has a default. Override with `NUTRIMATCH_*` environment variables.

pub mod error;

#[cfg(test)]
mod tests;

pub use error::ConfigError;

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_BATCH_DELAY, DEFAULT_BATCH_SIZE, DEFAULT_BATCHED_MAX, DEFAULT_ES_INDEX,
    DEFAULT_ES_URL, DEFAULT_HTTP_TIMEOUT, DEFAULT_MAX_ITERATIONS, DEFAULT_PARALLEL_MAX,
    DEFAULT_RESULT_SIZE, DEFAULT_SUGGEST_URL, DEFAULT_TERM_TIMEOUT,
};
use crate::matcher::MatcherConfig;
use crate::query::QueryConfig;
use crate::refine::RefinementConfig;
use crate::search::RoutingConfig;

/// Process configuration loaded from environment variables.
///
/// Use [`Config::from_env`] to read `NUTRIMATCH_*` overrides on top of defaults, then
/// [`Config::matcher_config`] to derive the per-component settings.
#[derive(Clone)]
pub struct Config {
    /// Search engine base URL. Default: `http://localhost:9200`.
    pub es_url: String,

    /// Index holding nutrition records. Default: `nutrition`.
    pub es_index: String,

    /// Sent as `Authorization: ApiKey ...` when set.
    pub es_api_key: Option<String>,

    /// Per-term suggestion endpoint. Default: `http://localhost:8000/api/suggest`.
    pub suggest_url: String,

    /// Query-rewriting oracle endpoint. Refinement is skipped without it.
    pub oracle_url: Option<String>,

    /// Client-level HTTP timeout. Default: 15s.
    pub http_timeout: Duration,

    pub parallel_max: usize,
    pub batched_max: usize,
    pub batch_size: usize,
    pub batch_delay: Duration,

    /// Hits per term. Default: `5`.
    pub result_size: usize,

    pub term_timeout: Duration,

    /// Refinement iteration budget. Default: `3`.
    pub max_iterations: usize,

    /// Wall-clock budget for the refinement loop.
    pub refinement_deadline: Option<Duration>,
}

impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("es_url", &self.es_url)
            .field("es_index", &self.es_index)
            .field("es_api_key", &self.es_api_key.as_ref().map(|_| "<redacted>"))
            .field("suggest_url", &self.suggest_url)
            .field("oracle_url", &self.oracle_url)
            .field("http_timeout", &self.http_timeout)
            .field("parallel_max", &self.parallel_max)
            .field("batched_max", &self.batched_max)
            .field("batch_size", &self.batch_size)
            .field("batch_delay", &self.batch_delay)
            .field("result_size", &self.result_size)
            .field("term_timeout", &self.term_timeout)
            .field("max_iterations", &self.max_iterations)
            .field("refinement_deadline", &self.refinement_deadline)
            .finish()
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            es_url: DEFAULT_ES_URL.to_string(),
            es_index: DEFAULT_ES_INDEX.to_string(),
            es_api_key: None,
            suggest_url: DEFAULT_SUGGEST_URL.to_string(),
            oracle_url: None,
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            parallel_max: DEFAULT_PARALLEL_MAX,
            batched_max: DEFAULT_BATCHED_MAX,
            batch_size: DEFAULT_BATCH_SIZE,
            batch_delay: DEFAULT_BATCH_DELAY,
            result_size: DEFAULT_RESULT_SIZE,
            term_timeout: DEFAULT_TERM_TIMEOUT,
            max_iterations: DEFAULT_MAX_ITERATIONS,
            refinement_deadline: None,
        }
    }
}

impl Config {
    const ENV_ES_URL: &'static str = "NUTRIMATCH_ES_URL";
    const ENV_ES_INDEX: &'static str = "NUTRIMATCH_ES_INDEX";
    const ENV_ES_API_KEY: &'static str = "NUTRIMATCH_ES_API_KEY";
    const ENV_SUGGEST_URL: &'static str = "NUTRIMATCH_SUGGEST_URL";
    const ENV_ORACLE_URL: &'static str = "NUTRIMATCH_ORACLE_URL";
    const ENV_HTTP_TIMEOUT_MS: &'static str = "NUTRIMATCH_HTTP_TIMEOUT_MS";
    const ENV_PARALLEL_MAX: &'static str = "NUTRIMATCH_PARALLEL_MAX";
    const ENV_BATCHED_MAX: &'static str = "NUTRIMATCH_BATCHED_MAX";
    const ENV_BATCH_SIZE: &'static str = "NUTRIMATCH_BATCH_SIZE";
    const ENV_BATCH_DELAY_MS: &'static str = "NUTRIMATCH_BATCH_DELAY_MS";
    const ENV_RESULT_SIZE: &'static str = "NUTRIMATCH_RESULT_SIZE";
    const ENV_TERM_TIMEOUT_MS: &'static str = "NUTRIMATCH_TERM_TIMEOUT_MS";
    const ENV_MAX_ITERATIONS: &'static str = "NUTRIMATCH_MAX_ITERATIONS";
    const ENV_REFINEMENT_DEADLINE_MS: &'static str = "NUTRIMATCH_REFINEMENT_DEADLINE_MS";

    /// Loads configuration from environment variables (falling back to defaults).
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            es_url: Self::parse_string_from_env(Self::ENV_ES_URL, defaults.es_url),
            es_index: Self::parse_string_from_env(Self::ENV_ES_INDEX, defaults.es_index),
            es_api_key: Self::parse_optional_string_from_env(Self::ENV_ES_API_KEY),
            suggest_url: Self::parse_string_from_env(Self::ENV_SUGGEST_URL, defaults.suggest_url),
            oracle_url: Self::parse_optional_string_from_env(Self::ENV_ORACLE_URL),
            http_timeout: Self::parse_millis_from_env(
                Self::ENV_HTTP_TIMEOUT_MS,
                defaults.http_timeout,
            )?,
            parallel_max: Self::parse_usize_from_env(
                Self::ENV_PARALLEL_MAX,
                defaults.parallel_max,
            )?,
            batched_max: Self::parse_usize_from_env(Self::ENV_BATCHED_MAX, defaults.batched_max)?,
            batch_size: Self::parse_usize_from_env(Self::ENV_BATCH_SIZE, defaults.batch_size)?,
            batch_delay: Self::parse_millis_from_env(
                Self::ENV_BATCH_DELAY_MS,
                defaults.batch_delay,
            )?,
            result_size: Self::parse_usize_from_env(Self::ENV_RESULT_SIZE, defaults.result_size)?,
            term_timeout: Self::parse_millis_from_env(
                Self::ENV_TERM_TIMEOUT_MS,
                defaults.term_timeout,
            )?,
            max_iterations: Self::parse_usize_from_env(
                Self::ENV_MAX_ITERATIONS,
                defaults.max_iterations,
            )?,
            refinement_deadline: Self::parse_optional_u64_from_env(
                Self::ENV_REFINEMENT_DEADLINE_MS,
            )?
            .map(Duration::from_millis),
        })
    }

    /// Checks URLs and cross-field invariants.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::check_url(Self::ENV_ES_URL, &self.es_url)?;
        Self::check_url(Self::ENV_SUGGEST_URL, &self.suggest_url)?;
        if let Some(ref url) = self.oracle_url {
            Self::check_url(Self::ENV_ORACLE_URL, url)?;
        }
        if self.http_timeout.is_zero() {
            return Err(ConfigError::InvalidValue {
                name: Self::ENV_HTTP_TIMEOUT_MS,
                reason: "must be > 0".to_string(),
            });
        }
        self.matcher_config().validate()
    }

    /// Per-component settings derived from this configuration.
    pub fn matcher_config(&self) -> MatcherConfig {
        let query = QueryConfig::default().with_result_size(self.result_size);
        let routing = RoutingConfig::default()
            .with_thresholds(self.parallel_max, self.batched_max)
            .with_batching(self.batch_size, self.batch_delay)
            .with_term_timeout(self.term_timeout)
            .with_index(self.es_index.clone());
        let refinement = RefinementConfig::default()
            .with_max_iterations(self.max_iterations)
            .with_deadline(self.refinement_deadline);

        MatcherConfig {
            query,
            routing,
            refinement,
            ..Default::default()
        }
    }

    fn check_url(name: &'static str, value: &str) -> Result<(), ConfigError> {
        let trimmed = value.trim();
        let has_host = trimmed
            .strip_prefix("http://")
            .or_else(|| trimmed.strip_prefix("https://"))
            .is_some_and(|rest| !rest.is_empty());
        if has_host {
            Ok(())
        } else {
            Err(ConfigError::InvalidUrl {
                name,
                value: value.to_string(),
            })
        }
    }

    fn parse_string_from_env(var_name: &str, default: String) -> String {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .unwrap_or(default)
    }

    fn parse_optional_string_from_env(var_name: &str) -> Option<String> {
        env::var(var_name)
            .ok()
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
    }

    fn parse_optional_u64_from_env(var_name: &'static str) -> Result<Option<u64>, ConfigError> {
        match Self::parse_optional_string_from_env(var_name) {
            Some(value) => value
                .parse()
                .map(Some)
                .map_err(|e| ConfigError::InvalidNumber {
                    name: var_name,
                    value,
                    source: e,
                }),
            None => Ok(None),
        }
    }

    fn parse_usize_from_env(var_name: &'static str, default: usize) -> Result<usize, ConfigError> {
        Ok(Self::parse_optional_u64_from_env(var_name)?
            .map(|v| v as usize)
            .unwrap_or(default))
    }

    fn parse_millis_from_env(
        var_name: &'static str,
        default: Duration,
    ) -> Result<Duration, ConfigError> {
        Ok(Self::parse_optional_u64_from_env(var_name)?
            .map(Duration::from_millis)
            .unwrap_or(default))
    }
}
