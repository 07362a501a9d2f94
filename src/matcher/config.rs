use crate::config::ConfigError;
use crate::query::QueryConfig;
use crate::refine::RefinementConfig;
use crate::search::RoutingConfig;

#[derive(Debug, Clone, PartialEq)]
/// All component settings, passed to [`super::NutritionMatcher::new`].
pub struct MatcherConfig {
    pub query: QueryConfig,
    pub routing: RoutingConfig,
    pub refinement: RefinementConfig,
    /// Emit a non-exact final entry for unresolved terms that had candidates.
    pub include_best_effort: bool,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            query: QueryConfig::default(),
            routing: RoutingConfig::default(),
            refinement: RefinementConfig::default(),
            include_best_effort: true,
        }
    }
}

impl MatcherConfig {
    pub fn with_query(mut self, query: QueryConfig) -> Self {
        self.query = query;
        self
    }

    pub fn with_routing(mut self, routing: RoutingConfig) -> Self {
        self.routing = routing;
        self
    }

    pub fn with_refinement(mut self, refinement: RefinementConfig) -> Self {
        self.refinement = refinement;
        self
    }

    pub fn with_best_effort(mut self, include: bool) -> Self {
        self.include_best_effort = include;
        self
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        self.query.validate()?;
        self.routing.validate()?;
        self.refinement.validate()
    }
}
