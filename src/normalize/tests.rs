use proptest::prelude::*;

use super::*;

#[test]
fn test_normalize_lowercases_and_sorts() {
    assert_eq!(normalize("Tomato Sauce"), "sauce tomato");
    assert_eq!(normalize("sauce tomato"), "sauce tomato");
}

#[test]
fn test_normalize_strips_punctuation() {
    assert_eq!(normalize("sweet-potato, raw!"), "potato raw sweet");
    assert_eq!(normalize("  milk (2%)  "), "2 milk");
}

#[test]
fn test_normalize_strips_possessives() {
    assert_eq!(normalize("Baker's yeast"), "baker yeast");
    assert_eq!(normalize("cooks' choice"), "choice cook");
    assert_eq!(normalize("shepherd\u{2019}s pie"), "pi shepherd");
}

#[test]
fn test_normalize_empty_and_punctuation_only() {
    assert_eq!(normalize(""), "");
    assert_eq!(normalize("   "), "");
    assert_eq!(normalize("--!!''"), "");
}

#[test]
fn test_normalize_uses_context_free_lowercase() {
    assert_eq!(normalize("ΣΑΣ"), normalize("σασ"));
}

#[test]
fn test_singularize_regular_plurals() {
    assert_eq!(singularize("apples"), "apple");
    assert_eq!(singularize("tomatoes"), "tomato");
    assert_eq!(singularize("berries"), "berri");
    assert_eq!(singularize("peaches"), "peach");
    assert_eq!(singularize("radishes"), "radish");
    assert_eq!(singularize("boxes"), "box");
    assert_eq!(singularize("glasses"), "glass");
    assert_eq!(singularize("olives"), "olive");
}

#[test]
fn test_singularize_leaves_singular_and_short_words() {
    assert_eq!(singularize("hummus"), "hummus");
    assert_eq!(singularize("asparagus"), "asparagus");
    assert_eq!(singularize("swiss"), "swiss");
    assert_eq!(singularize("molasses"), "molasses");
    assert_eq!(singularize("peas"), "pea");
    assert_eq!(singularize("gas"), "gas");
    assert_eq!(singularize("pies"), "pi");
    assert_eq!(singularize("pie"), "pi");
}

#[test]
fn test_singularize_irregulars() {
    assert_eq!(singularize("leaves"), "leaf");
    assert_eq!(singularize("mice"), "mouse");
    assert_eq!(singularize("geese"), "goose");
    assert_eq!(singularize("womens"), "woman");
}

#[test]
fn test_singularize_folds_ambiguous_singular_spellings() {
    assert_eq!(singularize("hoagies"), "hoagi");
    assert_eq!(singularize("hoagie"), "hoagi");
    assert_eq!(singularize("hoagy"), "hoagi");
    assert_eq!(singularize("brioches"), "brioch");
    assert_eq!(singularize("brioche"), "brioch");
    assert_eq!(singularize("aloes"), "alo");
    assert_eq!(singularize("aloe"), "alo");
    assert_eq!(singularize("mousses"), "mouss");
    assert_eq!(singularize("mousse"), "mouss");
    assert_eq!(singularize("cookies"), "cooki");
    assert_eq!(singularize("cookie"), "cooki");
}

#[test]
fn test_classify_plural_pairs_with_vowel_and_e_endings() {
    let classifier = ExactMatchClassifier::default();
    let pairs = [
        ("brioches", "brioche"),
        ("hoagies", "hoagie"),
        ("potpies", "potpie"),
        ("aloes", "aloe"),
        ("sloes", "sloe"),
        ("cherries", "cherry"),
        ("tomatoes", "tomato"),
        ("peaches", "peach"),
        ("boxes", "box"),
        ("quiches", "quiche"),
        ("smoothies", "smoothie"),
        ("mousses", "mousse"),
        ("axes", "axe"),
        ("pies", "pie"),
        ("turkeys", "turkey"),
    ];
    for (plural, singular) in pairs {
        let c = classifier.classify(plural, singular);
        assert!(
            c.is_exact,
            "{plural} vs {singular}: {} != {}",
            c.normalized_query, c.normalized_name
        );
        assert_eq!(c.kind, MatchKind::PluralOnly, "{plural} vs {singular}");
    }
}

#[test]
fn test_classify_irregular_plural_with_case_reports_both() {
    let c = ExactMatchClassifier::default().classify("Leaves", "leaf");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::Combination);
    assert_eq!(c.transforms, vec![Transform::Case, Transform::Plural]);
}

#[test]
fn test_classify_identical() {
    let c = ExactMatchClassifier::default().classify("tomato", "tomato");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::Identical);
    assert!(c.transforms.is_empty());
}

#[test]
fn test_classify_case_only() {
    let c = ExactMatchClassifier::default().classify("Tomato", "tomato");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::CaseOnly);
    assert_eq!(c.transforms, vec![Transform::Case]);
}

#[test]
fn test_classify_plural_only() {
    let c = ExactMatchClassifier::default().classify("tomatoes", "tomato");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::PluralOnly);
}

#[test]
fn test_classify_possessive_only() {
    let c = ExactMatchClassifier::default().classify("baker's yeast", "baker yeast");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::PossessiveOnly);
}

#[test]
fn test_classify_order_only() {
    let c = ExactMatchClassifier::default().classify("sauce tomato", "tomato sauce");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::OrderOnly);
}

#[test]
fn test_classify_punctuation_only() {
    let c = ExactMatchClassifier::default().classify("sweet-potato", "sweet potato");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::PunctuationOnly);
}

#[test]
fn test_classify_combination() {
    let c = ExactMatchClassifier::default().classify("Tomatoes", "tomato");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::Combination);
    assert!(c.transforms.contains(&Transform::Case));
    assert!(c.transforms.contains(&Transform::Plural));
}

#[test]
fn test_classify_whitespace_is_formatting() {
    let c = ExactMatchClassifier::default().classify("tomato  sauce", "tomato sauce");
    assert!(c.is_exact);
    assert_eq!(c.kind, MatchKind::Formatting);
}

#[test]
fn test_classify_different_terms_not_exact() {
    let c = ExactMatchClassifier::default().classify("tomato sauce", "tomato");
    assert!(!c.is_exact);
    assert_eq!(c.kind, MatchKind::NotExact);
    assert_eq!(c.normalized_query, "sauce tomato");
    assert_eq!(c.normalized_name, "tomato");
}

#[test]
fn test_classify_empty_never_exact() {
    let classifier = ExactMatchClassifier::default();
    assert_eq!(classifier.classify("", "").kind, MatchKind::Empty);
    assert!(!classifier.is_exact("!!!", "???"));
    assert!(!classifier.is_exact("tomato", ""));
}

proptest! {
    #[test]
    fn normalize_is_idempotent(text in "[A-Za-z0-9'\u{2019} ,.()%-]{0,64}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn normalize_is_idempotent_for_any_text(text in "\\PC{0,32}") {
        let once = normalize(&text);
        prop_assert_eq!(normalize(&once), once);
    }

    #[test]
    fn classify_ignores_case_and_order(
        words in proptest::collection::vec("[a-z]{1,10}", 1..5),
    ) {
        let query = words.join(" ");
        let mut shuffled = words.clone();
        shuffled.reverse();
        let candidate = shuffled.join(" ").to_uppercase();

        prop_assert!(ExactMatchClassifier::default().is_exact(&query, &candidate));
    }

    #[test]
    fn classify_ignores_plural_and_possessive(word in "[a-z]{3,9}[bdfgklmpr]") {
        let classifier = ExactMatchClassifier::default();
        let plural = format!("{word}s");
        let possessive = format!("{word}'s");
        let plural_possessive = format!("{word}s'");
        prop_assert!(classifier.is_exact(&plural, &word));
        prop_assert!(classifier.is_exact(&possessive, &word));
        prop_assert!(classifier.is_exact(&plural_possessive, &word));
    }

    #[test]
    fn classify_ignores_plural_of_vowel_and_e_endings(
        stem in "[a-z]{3,8}",
        ending in prop::sample::select(vec!["e", "ie", "oe", "che", "y", "o"]),
    ) {
        let singular = format!("{stem}{ending}");
        let plural = match ending {
            "y" => format!("{stem}ies"),
            "o" => format!("{singular}es"),
            _ => format!("{singular}s"),
        };
        // Table-driven words have their own singulars.
        let table = [
            "molasses", "series", "species", "leaves", "loaves", "halves", "calves", "knives",
        ];
        prop_assume!(!table.contains(&plural.as_str()));
        prop_assert!(ExactMatchClassifier::default().is_exact(&plural, &singular));
    }

    #[test]
    fn classify_never_panics(query in "\\PC{0,32}", name in "\\PC{0,32}") {
        let c = ExactMatchClassifier::default().classify(&query, &name);
        prop_assert_eq!(c.is_exact, c.kind.is_exact());
    }
}
