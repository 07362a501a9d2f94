use std::collections::BTreeSet;
use std::time::Duration;

use super::*;
use crate::search::{Strategy, TermError};

#[test]
fn test_term_kind_parsing() {
    assert_eq!("ingredient".parse::<TermKind>(), Ok(TermKind::Ingredient));
    assert_eq!(" Dish ".parse::<TermKind>(), Ok(TermKind::Dish));
    assert!("drink".parse::<TermKind>().is_err());
}

#[test]
fn test_term_kind_serializes_lowercase() {
    let json = serde_json::to_string(&TermKind::Dish).unwrap();
    assert_eq!(json, "\"dish\"");
}

#[test]
fn test_search_term_builders() {
    let term = SearchTerm::dish("Lasagna").with_confidence(0.8);
    assert_eq!(term.text(), "Lasagna");
    assert_eq!(term.kind(), TermKind::Dish);
    assert_eq!(term.confidence(), Some(0.8));
    assert_eq!(term.to_string(), "Lasagna (dish)");
}

#[test]
fn test_summary_match_rate() {
    let exact: BTreeSet<String> = ["tomato".to_string()].into_iter().collect();
    let summary = SearchSummary::compute(
        4,
        &exact,
        vec![],
        Duration::from_millis(12),
        Strategy::Parallel,
    );

    assert_eq!(summary.matched_terms, 1);
    assert_eq!(summary.failed_terms, 0);
    assert!((summary.match_rate - 0.25).abs() < f64::EPSILON);
    assert_eq!(summary.elapsed_ms, 12);
    assert_eq!(summary.unmatched_terms(), 3);
}

#[test]
fn test_summary_empty_input_has_zero_rate() {
    let summary =
        SearchSummary::compute(0, &BTreeSet::new(), vec![], Duration::ZERO, Strategy::Parallel);
    assert_eq!(summary.match_rate, 0.0);
}

#[test]
fn test_summary_failed_terms_are_distinct_and_exclude_exact() {
    let exact: BTreeSet<String> = ["egg".to_string()].into_iter().collect();
    let errors = vec![
        TermFailure {
            term: "rice".to_string(),
            error: TermError::Timeout { after_ms: 10 },
        },
        TermFailure {
            term: "rice".to_string(),
            error: TermError::Backend {
                message: "boom".to_string(),
            },
        },
        TermFailure {
            term: "egg".to_string(),
            error: TermError::MalformedHit {
                id: "1".to_string(),
                reason: "no name".to_string(),
            },
        },
    ];

    let summary = SearchSummary::compute(3, &exact, errors, Duration::ZERO, Strategy::Batched);
    assert_eq!(summary.failed_terms, 1);
    assert!(summary.has_errors());
    assert_eq!(summary.unmatched_terms(), 1);
}
