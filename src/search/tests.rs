use std::sync::Arc;
use std::time::Duration;

use super::error::TermError;
use super::router::StrategyRouter;
use super::types::{RoutingConfig, Strategy};
use crate::backend::{CatalogEntry, MockCatalog, MockSearchEngine, MockSuggestionApi};
use crate::query::QueryConfig;

type TestRouter = StrategyRouter<MockSearchEngine, MockSuggestionApi>;

fn catalog() -> MockCatalog {
    (0..30).fold(
        MockCatalog::new()
            .with_entry(CatalogEntry::new("tom", "Tomato"))
            .with_entry(CatalogEntry::new("app", "Apple")),
        |catalog, i| catalog.with_entry(CatalogEntry::new(format!("f{i}"), format!("food{i}"))),
    )
}

fn terms(n: usize) -> Vec<String> {
    (0..n).map(|i| format!("food{i}")).collect()
}

fn setup(config: RoutingConfig) -> (TestRouter, Arc<MockSearchEngine>, Arc<MockSuggestionApi>) {
    let engine = Arc::new(MockSearchEngine::new(catalog()));
    let api = Arc::new(MockSuggestionApi::new(catalog()));
    let router = StrategyRouter::new(
        Arc::clone(&engine),
        Arc::clone(&api),
        QueryConfig::default(),
        config,
    );
    (router, engine, api)
}

#[test]
fn test_route_default_boundaries() {
    let config = RoutingConfig::default();
    assert_eq!(config.route(0), Strategy::Parallel);
    assert_eq!(config.route(1), Strategy::Parallel);
    assert_eq!(config.route(5), Strategy::Parallel);
    assert_eq!(config.route(6), Strategy::Batched);
    assert_eq!(config.route(15), Strategy::Batched);
    assert_eq!(config.route(16), Strategy::Bulk);
    assert_eq!(config.route(500), Strategy::Bulk);
}

#[test]
fn test_route_custom_thresholds() {
    let config = RoutingConfig::default().with_thresholds(2, 4);
    assert_eq!(config.route(2), Strategy::Parallel);
    assert_eq!(config.route(3), Strategy::Batched);
    assert_eq!(config.route(5), Strategy::Bulk);
}

#[test]
fn test_routing_validate() {
    assert!(RoutingConfig::default().validate().is_ok());
    assert!(RoutingConfig::default().with_thresholds(15, 15).validate().is_err());
    assert!(
        RoutingConfig::default()
            .with_batching(0, Duration::ZERO)
            .validate()
            .is_err()
    );
    assert!(RoutingConfig::default().with_index(" ").validate().is_err());
    assert!(
        RoutingConfig::default()
            .with_term_timeout(Duration::ZERO)
            .validate()
            .is_err()
    );
}

#[test]
fn test_strategy_serde_names() {
    assert_eq!(serde_json::to_string(&Strategy::Bulk).unwrap(), "\"bulk\"");
    assert_eq!(Strategy::Batched.to_string(), "batched");
}

#[tokio::test]
async fn test_empty_wave_issues_no_requests() {
    let (router, engine, api) = setup(RoutingConfig::default());
    let wave = router.execute(&[]).await.unwrap();

    assert!(wave.outcomes.is_empty());
    assert_eq!(wave.request_count, 0);
    assert_eq!(engine.call_count() + api.call_count(), 0);
}

#[tokio::test]
async fn test_parallel_isolates_failing_term() {
    let (router, engine, api) = setup(RoutingConfig::default());
    api.fail_term("Apple");

    let input = vec!["Tomato".to_string(), "Apple".to_string(), "food1".to_string()];
    let wave = router.execute(&input).await.unwrap();

    assert_eq!(wave.strategy, Strategy::Parallel);
    assert_eq!(wave.request_count, 3);
    assert_eq!(api.call_count(), 3);
    assert_eq!(engine.call_count(), 0);

    let order: Vec<&str> = wave.outcomes.iter().map(|o| o.term.as_str()).collect();
    assert_eq!(order, vec!["Tomato", "Apple", "food1"]);

    assert_eq!(wave.outcomes[0].hits[0].id, "tom");
    assert!(wave.outcomes[1].is_failed());
    assert!(matches!(wave.outcomes[1].errors[0], TermError::Backend { .. }));
    assert_eq!(wave.outcomes[2].hits[0].id, "f1");
}

#[tokio::test(start_paused = true)]
async fn test_parallel_timeout_is_per_term() {
    let config = RoutingConfig::default().with_term_timeout(Duration::from_secs(2));
    let (router, _engine, api) = setup(config);
    api.delay_term("food0", Duration::from_secs(60));
    api.delay_term("food1", Duration::from_millis(500));

    let wave = router.execute(&terms(3)).await.unwrap();

    assert_eq!(
        wave.outcomes[0].errors,
        vec![TermError::Timeout { after_ms: 2000 }]
    );
    assert!(wave.outcomes[1].errors.is_empty());
    assert_eq!(wave.outcomes[1].hits.len(), 1);
    assert_eq!(wave.outcomes[2].hits.len(), 1);
    assert!(wave.elapsed < Duration::from_secs(60));
}

#[tokio::test(start_paused = true)]
async fn test_batched_bounds_in_flight_requests() {
    let (router, engine, api) = setup(RoutingConfig::default());
    let input = terms(12);
    for term in &input {
        api.delay_term(term, Duration::from_millis(10));
    }

    let wave = router.execute(&input).await.unwrap();

    assert_eq!(wave.strategy, Strategy::Batched);
    assert_eq!(wave.outcomes.len(), 12);
    assert_eq!(api.call_count(), 12);
    assert_eq!(api.max_in_flight(), 5);
    assert_eq!(engine.call_count(), 0);
    assert_eq!(api.requested(), input);
}

#[tokio::test(start_paused = true)]
async fn test_batched_delays_between_chunks() {
    let config = RoutingConfig::default().with_batching(5, Duration::from_millis(100));
    let (router, _engine, _api) = setup(config);

    let wave = router.execute(&terms(12)).await.unwrap();

    // Three chunks, two pauses.
    assert!(wave.elapsed >= Duration::from_millis(200));
    assert!(wave.outcomes.iter().all(|o| o.errors.is_empty()));
}

#[test]
fn test_route_rewrites_skips_batching() {
    let config = RoutingConfig::default();
    assert_eq!(config.route_rewrites(1), Strategy::Parallel);
    assert_eq!(config.route_rewrites(6), Strategy::Parallel);
    assert_eq!(config.route_rewrites(15), Strategy::Parallel);
    assert_eq!(config.route_rewrites(16), Strategy::Bulk);
}

#[tokio::test(start_paused = true)]
async fn test_rewrites_fan_out_without_chunk_delay() {
    let config = RoutingConfig::default().with_batching(5, Duration::from_millis(100));
    let (router, engine, api) = setup(config);
    let input = terms(12);
    for term in &input {
        api.delay_term(term, Duration::from_millis(10));
    }

    let wave = router.execute_rewrites(&input).await.unwrap();

    assert_eq!(wave.strategy, Strategy::Parallel);
    assert_eq!(wave.request_count, 12);
    assert_eq!(api.max_in_flight(), 12);
    assert!(wave.elapsed < Duration::from_millis(100));
    assert_eq!(engine.call_count(), 0);
}

#[tokio::test]
async fn test_bulk_uses_single_request() {
    let (router, engine, api) = setup(RoutingConfig::default());
    let input = terms(20);

    let wave = router.execute(&input).await.unwrap();

    assert_eq!(wave.strategy, Strategy::Bulk);
    assert_eq!(wave.request_count, 1);
    assert_eq!(engine.call_count(), 1);
    assert_eq!(engine.requests()[0].len(), 20);
    assert_eq!(engine.requests()[0].index, "nutrition");
    assert_eq!(api.call_count(), 0);
    assert_eq!(wave.outcomes.len(), 20);
    assert_eq!(wave.outcome("food7").unwrap().hits[0].id, "f7");
}

#[tokio::test]
async fn test_bulk_engine_failure_fails_wave() {
    let (router, engine, _api) = setup(RoutingConfig::default());
    engine.set_unavailable(true);

    let err = router.execute(&terms(16)).await.unwrap_err();
    assert!(err.is_engine_unavailable());
}

#[tokio::test]
async fn test_bulk_query_error_stays_per_term() {
    let (router, engine, _api) = setup(RoutingConfig::default());
    engine.fail_term("food3");

    let wave = router.execute(&terms(16)).await.unwrap();

    let failed = wave.outcome("food3").unwrap();
    assert!(failed.is_failed());
    assert!(matches!(failed.errors[0], TermError::Backend { .. }));
    assert_eq!(wave.outcomes.iter().filter(|o| o.is_failed()).count(), 1);
}
