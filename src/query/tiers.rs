use serde::{Deserialize, Serialize};

use crate::config::ConfigError;
use crate::constants::{
    DEFAULT_BOOST_EXACT_PHRASE_DESCRIPTION, DEFAULT_BOOST_EXACT_PHRASE_SHORT_NAME,
    DEFAULT_BOOST_EXACT_TOKEN, DEFAULT_BOOST_FUZZY, DEFAULT_BOOST_MULTI_FIELD,
    DEFAULT_BOOST_PHRASE_DESCRIPTION, DEFAULT_BOOST_PHRASE_SHORT_NAME,
};

pub const SHORT_NAME_FIELD: &str = "short_name";
/// Not-analyzed sub-field of the short name.
pub const SHORT_NAME_KEYWORD_FIELD: &str = "short_name.keyword";
pub const DESCRIPTION_FIELD: &str = "description";
pub const ORIGINAL_NAME_FIELD: &str = "original_name";
pub const CATEGORY_FIELD: &str = "category";
pub const SOURCE_DB_FIELD: &str = "data_source";
pub const NUTRITION_FIELD: &str = "nutrition";
pub const REFERENCE_WEIGHT_FIELD: &str = "reference_weight_g";

/// `_source` fields requested for every hit.
pub const SOURCE_PROJECTION: &[&str] = &[
    SHORT_NAME_FIELD,
    DESCRIPTION_FIELD,
    ORIGINAL_NAME_FIELD,
    CATEGORY_FIELD,
    SOURCE_DB_FIELD,
    NUTRITION_FIELD,
    REFERENCE_WEIGHT_FIELD,
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// Matching mode of one tier, highest priority first.
pub enum TierMode {
    ExactPhraseShortName,
    ExactPhraseDescription,
    PhraseShortName,
    PhraseDescription,
    ExactToken,
    MultiField,
    Fuzzy,
}

impl TierMode {
    pub const ORDERED: [TierMode; 7] = [
        TierMode::ExactPhraseShortName,
        TierMode::ExactPhraseDescription,
        TierMode::PhraseShortName,
        TierMode::PhraseDescription,
        TierMode::ExactToken,
        TierMode::MultiField,
        TierMode::Fuzzy,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            TierMode::ExactPhraseShortName => "exact_phrase_short_name",
            TierMode::ExactPhraseDescription => "exact_phrase_description",
            TierMode::PhraseShortName => "phrase_short_name",
            TierMode::PhraseDescription => "phrase_description",
            TierMode::ExactToken => "exact_token",
            TierMode::MultiField => "multi_field",
            TierMode::Fuzzy => "fuzzy",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Tier {
    /// 1-based priority.
    pub rank: usize,
    pub mode: TierMode,
    pub boost: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
/// Boost weight per tier. Must be strictly descending in tier order.
pub struct TierBoosts {
    pub exact_phrase_short_name: f32,
    pub exact_phrase_description: f32,
    pub phrase_short_name: f32,
    pub phrase_description: f32,
    pub exact_token: f32,
    pub multi_field: f32,
    pub fuzzy: f32,
}

impl Default for TierBoosts {
    fn default() -> Self {
        Self {
            exact_phrase_short_name: DEFAULT_BOOST_EXACT_PHRASE_SHORT_NAME,
            exact_phrase_description: DEFAULT_BOOST_EXACT_PHRASE_DESCRIPTION,
            phrase_short_name: DEFAULT_BOOST_PHRASE_SHORT_NAME,
            phrase_description: DEFAULT_BOOST_PHRASE_DESCRIPTION,
            exact_token: DEFAULT_BOOST_EXACT_TOKEN,
            multi_field: DEFAULT_BOOST_MULTI_FIELD,
            fuzzy: DEFAULT_BOOST_FUZZY,
        }
    }
}

impl TierBoosts {
    pub fn boost(&self, mode: TierMode) -> f32 {
        match mode {
            TierMode::ExactPhraseShortName => self.exact_phrase_short_name,
            TierMode::ExactPhraseDescription => self.exact_phrase_description,
            TierMode::PhraseShortName => self.phrase_short_name,
            TierMode::PhraseDescription => self.phrase_description,
            TierMode::ExactToken => self.exact_token,
            TierMode::MultiField => self.multi_field,
            TierMode::Fuzzy => self.fuzzy,
        }
    }

    pub fn tiers(&self) -> [Tier; 7] {
        let mut rank = 0;
        TierMode::ORDERED.map(|mode| {
            rank += 1;
            Tier {
                rank,
                mode,
                boost: self.boost(mode),
            }
        })
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let tiers = self.tiers();

        if let Some(tier) = tiers.iter().find(|t| !t.boost.is_finite() || t.boost <= 0.0) {
            return Err(ConfigError::InvalidValue {
                name: "tier boost",
                reason: format!(
                    "{} boost must be positive, got {}",
                    tier.mode.as_str(),
                    tier.boost
                ),
            });
        }

        for pair in tiers.windows(2) {
            if pair[0].boost <= pair[1].boost {
                return Err(ConfigError::InvalidValue {
                    name: "tier boost",
                    reason: format!(
                        "{} ({}) must outrank {} ({})",
                        pair[0].mode.as_str(),
                        pair[0].boost,
                        pair[1].mode.as_str(),
                        pair[1].boost
                    ),
                });
            }
        }

        Ok(())
    }
}
