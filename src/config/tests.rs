use super::*;
use serial_test::serial;
use std::env;
use std::time::Duration;

use crate::search::Strategy;

const ALL_VARS: [&str; 14] = [
    "NUTRIMATCH_ES_URL",
    "NUTRIMATCH_ES_INDEX",
    "NUTRIMATCH_ES_API_KEY",
    "NUTRIMATCH_SUGGEST_URL",
    "NUTRIMATCH_ORACLE_URL",
    "NUTRIMATCH_HTTP_TIMEOUT_MS",
    "NUTRIMATCH_PARALLEL_MAX",
    "NUTRIMATCH_BATCHED_MAX",
    "NUTRIMATCH_BATCH_SIZE",
    "NUTRIMATCH_BATCH_DELAY_MS",
    "NUTRIMATCH_RESULT_SIZE",
    "NUTRIMATCH_TERM_TIMEOUT_MS",
    "NUTRIMATCH_MAX_ITERATIONS",
    "NUTRIMATCH_REFINEMENT_DEADLINE_MS",
];

fn with_env_vars<F, R>(vars: &[(&str, &str)], f: F) -> R
where
    F: FnOnce() -> R,
{
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, value) in vars {
        unsafe { env::set_var(key, value) };
    }

    let result = f();

    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for (key, _) in vars {
        unsafe { env::remove_var(key) };
    }

    result
}

fn clear_nutrimatch_env() {
    // SAFETY: Test code only, we accept the thread-safety risk in tests.
    for key in ALL_VARS {
        unsafe { env::remove_var(key) };
    }
}

#[test]
fn test_default_config() {
    let config = Config::default();

    assert_eq!(config.es_url, "http://localhost:9200");
    assert_eq!(config.es_index, "nutrition");
    assert_eq!(config.suggest_url, "http://localhost:8000/api/suggest");
    assert!(config.es_api_key.is_none());
    assert!(config.oracle_url.is_none());
    assert_eq!(config.parallel_max, 5);
    assert_eq!(config.batched_max, 15);
    assert_eq!(config.batch_size, 5);
    assert_eq!(config.batch_delay, Duration::from_millis(100));
    assert_eq!(config.result_size, 5);
    assert_eq!(config.max_iterations, 3);
    assert!(config.refinement_deadline.is_none());
    assert!(config.validate().is_ok());
}

#[test]
#[serial]
fn test_from_env_with_defaults() {
    clear_nutrimatch_env();

    let config = Config::from_env().expect("should parse with defaults");

    assert_eq!(config.es_url, "http://localhost:9200");
    assert_eq!(config.term_timeout, Duration::from_secs(10));
}

#[test]
#[serial]
fn test_from_env_overrides() {
    clear_nutrimatch_env();

    with_env_vars(
        &[
            ("NUTRIMATCH_ES_URL", "https://es.cluster:9243"),
            ("NUTRIMATCH_ES_INDEX", "foods_v2"),
            ("NUTRIMATCH_ES_API_KEY", "c2VjcmV0"),
            ("NUTRIMATCH_ORACLE_URL", "http://oracle:9000/rewrite"),
            ("NUTRIMATCH_PARALLEL_MAX", "3"),
            ("NUTRIMATCH_BATCHED_MAX", "30"),
            ("NUTRIMATCH_BATCH_SIZE", "10"),
            ("NUTRIMATCH_BATCH_DELAY_MS", "0"),
            ("NUTRIMATCH_RESULT_SIZE", "8"),
            ("NUTRIMATCH_TERM_TIMEOUT_MS", "2500"),
            ("NUTRIMATCH_MAX_ITERATIONS", "5"),
            ("NUTRIMATCH_REFINEMENT_DEADLINE_MS", "45000"),
        ],
        || {
            let config = Config::from_env().expect("should parse");

            assert_eq!(config.es_url, "https://es.cluster:9243");
            assert_eq!(config.es_index, "foods_v2");
            assert_eq!(config.es_api_key.as_deref(), Some("c2VjcmV0"));
            assert_eq!(config.oracle_url.as_deref(), Some("http://oracle:9000/rewrite"));
            assert_eq!(config.batch_delay, Duration::ZERO);
            assert_eq!(config.term_timeout, Duration::from_millis(2500));
            assert_eq!(config.refinement_deadline, Some(Duration::from_secs(45)));
            assert!(config.validate().is_ok());

            let matcher = config.matcher_config();
            assert_eq!(matcher.query.result_size, 8);
            assert_eq!(matcher.routing.index, "foods_v2");
            assert_eq!(matcher.routing.route(3), Strategy::Parallel);
            assert_eq!(matcher.routing.route(30), Strategy::Batched);
            assert_eq!(matcher.routing.route(31), Strategy::Bulk);
            assert_eq!(matcher.routing.batch_size, 10);
            assert_eq!(matcher.refinement.max_iterations, 5);
            assert_eq!(
                matcher.refinement.deadline,
                Some(Duration::from_secs(45))
            );
        },
    );
}

#[test]
#[serial]
fn test_blank_values_fall_back() {
    clear_nutrimatch_env();

    with_env_vars(
        &[("NUTRIMATCH_ES_INDEX", "  "), ("NUTRIMATCH_ORACLE_URL", "")],
        || {
            let config = Config::from_env().expect("should parse");
            assert_eq!(config.es_index, "nutrition");
            assert!(config.oracle_url.is_none());
        },
    );
}

#[test]
#[serial]
fn test_invalid_number_is_error() {
    clear_nutrimatch_env();

    with_env_vars(&[("NUTRIMATCH_BATCH_SIZE", "five")], || {
        let err = Config::from_env().unwrap_err();
        assert!(matches!(
            err,
            ConfigError::InvalidNumber { name: "NUTRIMATCH_BATCH_SIZE", .. }
        ));
        assert!(err.to_string().contains("five"));
    });
}

#[test]
#[serial]
fn test_negative_timeout_is_error() {
    clear_nutrimatch_env();

    with_env_vars(&[("NUTRIMATCH_TERM_TIMEOUT_MS", "-1")], || {
        assert!(matches!(
            Config::from_env(),
            Err(ConfigError::InvalidNumber { .. })
        ));
    });
}

#[test]
fn test_validate_rejects_bad_urls() {
    let config = Config {
        es_url: "localhost:9200".to_string(),
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidUrl { name: "NUTRIMATCH_ES_URL", .. })
    ));

    let config = Config {
        oracle_url: Some("ftp://oracle".to_string()),
        ..Default::default()
    };
    assert!(matches!(config.validate(), Err(ConfigError::InvalidUrl { .. })));

    let config = Config {
        suggest_url: "http://".to_string(),
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_rejects_unordered_thresholds() {
    let config = Config {
        parallel_max: 20,
        batched_max: 10,
        ..Default::default()
    };
    assert!(matches!(
        config.validate(),
        Err(ConfigError::InvalidValue { name: "parallel_max", .. })
    ));
}

#[test]
fn test_validate_rejects_zero_sizes() {
    let config = Config {
        batch_size: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());

    let config = Config {
        result_size: 0,
        ..Default::default()
    };
    assert!(config.validate().is_err());
}

#[test]
fn test_debug_redacts_api_key() {
    let config = Config {
        es_api_key: Some("top-secret".to_string()),
        ..Default::default()
    };
    let debug = format!("{:?}", config);
    assert!(!debug.contains("top-secret"));
    assert!(debug.contains("<redacted>"));
}
