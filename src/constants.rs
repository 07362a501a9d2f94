//! Cross-cutting, shared defaults.
//!
//! Components take explicit config structs; these values only seed their `Default` impls.
//!
//! # Tier Invariants
//!
//! The seven tier boosts must stay strictly descending. [`crate::query::TierBoosts::validate`]
//! enforces this for runtime overrides; the defaults below already satisfy it.

use std::time::Duration;

pub const DEFAULT_BOOST_EXACT_PHRASE_SHORT_NAME: f32 = 15.0;
pub const DEFAULT_BOOST_EXACT_PHRASE_DESCRIPTION: f32 = 12.0;
pub const DEFAULT_BOOST_PHRASE_SHORT_NAME: f32 = 10.0;
pub const DEFAULT_BOOST_PHRASE_DESCRIPTION: f32 = 8.0;
pub const DEFAULT_BOOST_EXACT_TOKEN: f32 = 6.0;
pub const DEFAULT_BOOST_MULTI_FIELD: f32 = 4.0;
pub const DEFAULT_BOOST_FUZZY: f32 = 2.0;

/// Hits returned per term.
pub const DEFAULT_RESULT_SIZE: usize = 5;

/// Slop allowed by the non-exact phrase tiers.
pub const DEFAULT_PHRASE_SLOP: u32 = 2;

/// Largest batch still served by the Parallel executor.
pub const DEFAULT_PARALLEL_MAX: usize = 5;
/// Largest batch still served by the Batched executor; anything above goes Bulk.
pub const DEFAULT_BATCHED_MAX: usize = 15;
/// Chunk size (and in-flight bound) for the Batched executor.
pub const DEFAULT_BATCH_SIZE: usize = 5;
pub const DEFAULT_BATCH_DELAY: Duration = Duration::from_millis(100);

pub const DEFAULT_TERM_TIMEOUT: Duration = Duration::from_secs(10);
pub const DEFAULT_BULK_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_ORACLE_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(15);

pub const DEFAULT_MAX_ITERATIONS: usize = 3;
pub const DEFAULT_MAX_ALTERNATIVES_PER_TERM: usize = 3;

pub const DEFAULT_ES_URL: &str = "http://localhost:9200";
pub const DEFAULT_ES_INDEX: &str = "nutrition";
pub const DEFAULT_SUGGEST_URL: &str = "http://localhost:8000/api/suggest";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_boosts_strictly_descending() {
        let boosts = [
            DEFAULT_BOOST_EXACT_PHRASE_SHORT_NAME,
            DEFAULT_BOOST_EXACT_PHRASE_DESCRIPTION,
            DEFAULT_BOOST_PHRASE_SHORT_NAME,
            DEFAULT_BOOST_PHRASE_DESCRIPTION,
            DEFAULT_BOOST_EXACT_TOKEN,
            DEFAULT_BOOST_MULTI_FIELD,
            DEFAULT_BOOST_FUZZY,
        ];
        assert!(boosts.windows(2).all(|w| w[0] > w[1]));
    }

    #[test]
    fn test_default_thresholds_ordered() {
        assert!(DEFAULT_PARALLEL_MAX < DEFAULT_BATCHED_MAX);
        assert!(DEFAULT_BATCH_SIZE > 0);
    }
}
