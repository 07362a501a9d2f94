//! Multi-tier boosted query construction for the full-text engine.

pub mod builder;
pub mod tiers;


pub use builder::{QueryConfig, RankedQuery, RankedQueryBuilder};
pub use tiers::{
    CATEGORY_FIELD, DESCRIPTION_FIELD, NUTRITION_FIELD, ORIGINAL_NAME_FIELD, REFERENCE_WEIGHT_FIELD,
    SHORT_NAME_FIELD, SHORT_NAME_KEYWORD_FIELD, SOURCE_DB_FIELD, SOURCE_PROJECTION, Tier,
    TierBoosts, TierMode,
};
