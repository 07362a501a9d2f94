use serde::Serialize;
use serde_json::{Value, json};

use crate::config::ConfigError;
use crate::constants::{DEFAULT_PHRASE_SLOP, DEFAULT_RESULT_SIZE};

use super::tiers::{
    DESCRIPTION_FIELD, ORIGINAL_NAME_FIELD, SHORT_NAME_FIELD, SHORT_NAME_KEYWORD_FIELD,
    SOURCE_PROJECTION, Tier, TierBoosts, TierMode,
};

#[derive(Debug, Clone, PartialEq)]
pub struct QueryConfig {
    pub boosts: TierBoosts,
    /// Hits requested per term.
    pub result_size: usize,
    /// Slop for the non-exact phrase tiers.
    pub phrase_slop: u32,
    pub fuzziness: String,
    /// Leading characters a fuzzy match must share exactly.
    pub fuzzy_prefix_length: u32,
    pub fuzzy_max_expansions: u32,
}

impl Default for QueryConfig {
    fn default() -> Self {
        Self {
            boosts: TierBoosts::default(),
            result_size: DEFAULT_RESULT_SIZE,
            phrase_slop: DEFAULT_PHRASE_SLOP,
            fuzziness: "AUTO".to_string(),
            fuzzy_prefix_length: 1,
            fuzzy_max_expansions: 50,
        }
    }
}

impl QueryConfig {
    pub fn with_result_size(mut self, size: usize) -> Self {
        self.result_size = size;
        self
    }

    pub fn with_boosts(mut self, boosts: TierBoosts) -> Self {
        self.boosts = boosts;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.result_size == 0 {
            return Err(ConfigError::InvalidValue {
                name: "result_size",
                reason: "must be > 0".to_string(),
            });
        }
        if self.fuzziness.trim().is_empty() {
            return Err(ConfigError::InvalidValue {
                name: "fuzziness",
                reason: "cannot be empty".to_string(),
            });
        }
        self.boosts.validate()
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
/// A search body for one term, ready to be embedded in a multi-search request.
pub struct RankedQuery {
    pub term: String,
    pub size: usize,
    pub body: Value,
}

#[derive(Debug, Clone, Default)]
pub struct RankedQueryBuilder {
    config: QueryConfig,
}

impl RankedQueryBuilder {
    pub fn new(config: QueryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &QueryConfig {
        &self.config
    }

    pub fn tiers(&self) -> [Tier; 7] {
        self.config.boosts.tiers()
    }

    /// Builds a disjunctive query over all seven tiers for `term`.
    pub fn build(&self, term: &str) -> RankedQuery {
        let term = term.trim();
        let should: Vec<Value> = self
            .tiers()
            .iter()
            .map(|tier| self.clause(tier, term))
            .collect();

        let body = json!({
            "query": {
                "bool": {
                    "should": should,
                    "minimum_should_match": 1
                }
            },
            "size": self.config.result_size,
            "_source": SOURCE_PROJECTION,
        });

        RankedQuery {
            term: term.to_string(),
            size: self.config.result_size,
            body,
        }
    }

    fn clause(&self, tier: &Tier, term: &str) -> Value {
        let boost = tier.boost;
        match tier.mode {
            TierMode::ExactPhraseShortName => phrase(SHORT_NAME_FIELD, term, 0, boost),
            TierMode::ExactPhraseDescription => phrase(DESCRIPTION_FIELD, term, 0, boost),
            TierMode::PhraseShortName => {
                phrase(SHORT_NAME_FIELD, term, self.config.phrase_slop, boost)
            }
            TierMode::PhraseDescription => {
                phrase(DESCRIPTION_FIELD, term, self.config.phrase_slop, boost)
            }
            TierMode::ExactToken => json!({
                "term": {
                    SHORT_NAME_KEYWORD_FIELD: {
                        "value": term.to_lowercase(),
                        "case_insensitive": true,
                        "boost": boost
                    }
                }
            }),
            TierMode::MultiField => json!({
                "multi_match": {
                    "query": term,
                    "type": "best_fields",
                    "fields": [
                        format!("{}^3", SHORT_NAME_FIELD),
                        format!("{}^2", DESCRIPTION_FIELD),
                        ORIGINAL_NAME_FIELD
                    ],
                    "boost": boost
                }
            }),
            TierMode::Fuzzy => json!({
                "match": {
                    SHORT_NAME_FIELD: {
                        "query": term,
                        "fuzziness": self.config.fuzziness,
                        "prefix_length": self.config.fuzzy_prefix_length,
                        "max_expansions": self.config.fuzzy_max_expansions,
                        "boost": boost
                    }
                }
            }),
        }
    }
}

fn phrase(field: &str, term: &str, slop: u32, boost: f32) -> Value {
    json!({
        "match_phrase": {
            field: {
                "query": term,
                "slop": slop,
                "boost": boost
            }
        }
    })
}
