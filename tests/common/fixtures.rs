//! Shared catalog and matcher builders for integration tests.

use std::sync::Arc;

use nutrimatch::backend::{CatalogEntry, MockCatalog, MockSearchEngine, MockSuggestionApi};
use nutrimatch::matcher::{MatcherConfig, NutritionMatcher};
use nutrimatch::model::SearchTerm;
use nutrimatch::refine::QueryOracle;

pub type MockMatcher = NutritionMatcher<MockSearchEngine, MockSuggestionApi>;

pub struct Harness {
    pub matcher: MockMatcher,
    pub engine: Arc<MockSearchEngine>,
    pub suggestions: Arc<MockSuggestionApi>,
}

pub fn food_catalog() -> MockCatalog {
    let catalog = MockCatalog::new()
        .with_entry(
            CatalogEntry::new("usda-11529", "Tomato")
                .description("Tomatoes, red, ripe, raw")
                .category("Vegetables")
                .nutrient("energy_kcal", 18.0)
                .nutrient("protein_g", 0.88),
        )
        .with_entry(
            CatalogEntry::new("usda-11546", "Tomato paste")
                .description("Tomato products, canned, paste")
                .category("Vegetables"),
        )
        .with_entry(CatalogEntry::new("usda-09003", "Apple").category("Fruits"))
        .with_entry(CatalogEntry::new("usda-18301", "Apple pie").category("Baked goods"))
        .with_entry(CatalogEntry::new("usda-20420", "Pasta with marinara"));

    // Filler records so larger waves have something to hit.
    (0..30).fold(catalog, |catalog, i| {
        catalog.with_entry(CatalogEntry::new(format!("filler-{i}"), format!("ingredient{i}")))
    })
}

pub fn harness(oracle: Arc<dyn QueryOracle>, config: MatcherConfig) -> Harness {
    let engine = Arc::new(MockSearchEngine::new(food_catalog()));
    let suggestions = Arc::new(MockSuggestionApi::new(food_catalog()));
    let matcher = NutritionMatcher::new(
        Arc::clone(&engine),
        Arc::clone(&suggestions),
        oracle,
        config,
    )
    .expect("valid matcher config");

    Harness {
        matcher,
        engine,
        suggestions,
    }
}

pub fn filler_terms(n: usize) -> Vec<SearchTerm> {
    (0..n)
        .map(|i| SearchTerm::ingredient(format!("ingredient{i}")))
        .collect()
}
