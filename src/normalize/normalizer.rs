use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
/// One reduction step applied by the normalizer.
pub enum Transform {
    Case,
    Punctuation,
    Possessive,
    Plural,
    WordOrder,
}

impl Transform {
    pub const ALL: [Transform; 5] = [
        Transform::Case,
        Transform::Punctuation,
        Transform::Possessive,
        Transform::Plural,
        Transform::WordOrder,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// Switches for each reduction step. [`NormalizeOptions::ALL`] is the canonical form.
pub struct NormalizeOptions {
    pub lowercase: bool,
    pub strip_punctuation: bool,
    pub strip_possessive: bool,
    pub singularize: bool,
    pub sort_tokens: bool,
}

impl NormalizeOptions {
    pub const ALL: Self = Self {
        lowercase: true,
        strip_punctuation: true,
        strip_possessive: true,
        singularize: true,
        sort_tokens: true,
    };

    /// Returns these options with `transform` switched off.
    pub fn without(mut self, transform: Transform) -> Self {
        match transform {
            Transform::Case => self.lowercase = false,
            Transform::Punctuation => self.strip_punctuation = false,
            Transform::Possessive => self.strip_possessive = false,
            Transform::Plural => self.singularize = false,
            Transform::WordOrder => self.sort_tokens = false,
        }
        self
    }
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self::ALL
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TermNormalizer;

impl TermNormalizer {
    pub fn new() -> Self {
        Self
    }

    /// Canonical comparison key for `text`. Idempotent.
    pub fn normalize(&self, text: &str) -> String {
        self.normalize_with(text, NormalizeOptions::ALL)
    }

    pub fn normalize_with(&self, text: &str, options: NormalizeOptions) -> String {
        // Per-char lowercasing keeps the mapping context-free (no final-sigma rule).
        let lowered: String = if options.lowercase {
            text.chars().flat_map(char::to_lowercase).collect()
        } else {
            text.to_string()
        };

        let raw_tokens: Vec<&str> = if options.strip_punctuation {
            lowered
                .split(|c: char| !(c.is_alphanumeric() || is_apostrophe(c)))
                .filter(|t| !t.is_empty())
                .collect()
        } else {
            lowered.split_whitespace().collect()
        };

        let mut tokens: Vec<String> = raw_tokens
            .into_iter()
            .map(|raw| {
                if options.strip_possessive {
                    strip_possessive(raw)
                        .chars()
                        .filter(|c| !is_apostrophe(*c))
                        .collect()
                } else {
                    raw.to_string()
                }
            })
            .filter(|t: &String| !t.is_empty())
            .map(|t| if options.singularize { singularize(&t) } else { t })
            .collect();

        if options.sort_tokens {
            tokens.sort_unstable();
        }

        tokens.join(" ")
    }
}

/// Shorthand for [`TermNormalizer::normalize`].
pub fn normalize(text: &str) -> String {
    TermNormalizer.normalize(text)
}

fn is_apostrophe(c: char) -> bool {
    matches!(c, '\'' | '\u{2018}' | '\u{2019}' | '\u{02BC}')
}

fn strip_possessive(token: &str) -> &str {
    let mut chars = token.char_indices().rev();
    match (chars.next(), chars.next()) {
        // "baker's" -> "baker"
        (Some((_, s)), Some((idx, a))) if (s == 's' || s == 'S') && is_apostrophe(a) => {
            &token[..idx]
        }
        // "cooks'" -> "cooks"
        (Some((idx, a)), Some((_, s))) if is_apostrophe(a) && (s == 's' || s == 'S') => {
            &token[..idx]
        }
        _ => token,
    }
}

const INVARIANT: &[&str] = &["molasses", "series", "species", "grits"];

const IRREGULAR: &[(&str, &str)] = &[
    ("leaves", "leaf"),
    ("loaves", "loaf"),
    ("halves", "half"),
    ("calves", "calf"),
    ("knives", "knife"),
    ("geese", "goose"),
    ("mice", "mouse"),
    ("teeth", "tooth"),
    ("feet", "foot"),
    ("children", "child"),
    ("women", "woman"),
    ("men", "man"),
];

fn ends_with_ci(word: &str, suffix: &str) -> bool {
    word.len() >= suffix.len()
        && word.is_char_boundary(word.len() - suffix.len())
        && word[word.len() - suffix.len()..].eq_ignore_ascii_case(suffix)
}

fn cut(word: &str, suffix_len: usize) -> &str {
    &word[..word.len() - suffix_len]
}

// Case-sensitive: with lowercasing off, "Leaves" must not collapse onto "leaf".
fn irregular_singular(word: &str) -> Option<&'static str> {
    IRREGULAR
        .iter()
        .find(|(plural, _)| *plural == word)
        .map(|(_, singular)| *singular)
}

/// Reduces an English plural to the stem it shares with its singular.
///
/// The stem is a comparison key, not always a word: singular spellings that the plural
/// suffix cannot tell apart collapse together, so "hoagie", "hoagy" and "hoagies" all give
/// "hoagi", and "brioche" and "brioches" both give "brioch".
///
/// Every output is a fixed point: `singularize(&singularize(w)) == singularize(w)`.
pub fn singularize(word: &str) -> String {
    if word.chars().count() <= 3 {
        return fold_ending(word);
    }
    if INVARIANT.contains(&word.to_lowercase().as_str()) {
        return word.to_string();
    }
    if let Some(singular) = irregular_singular(word) {
        return singular.to_string();
    }

    let reduced = strip_plural_suffix(word);
    // "womens" -> "women" must land on "woman", not stop halfway.
    match irregular_singular(&reduced) {
        Some(singular) => singular.to_string(),
        None => fold_ending(&reduced),
    }
}

// Singular endings whose `e` the plural suffix rules swallow ("brioches" -> "brioch").
const SILENT_E_ENDINGS: &[&str] = &["ie", "oe", "che", "she", "sse", "xe"];

/// Drops a silent trailing `e` and turns a final `y` into `i`.
fn fold_ending(word: &str) -> String {
    if SILENT_E_ENDINGS.iter().any(|ending| ends_with_ci(word, ending)) {
        return cut(word, 1).to_string();
    }
    match word.strip_suffix('y') {
        Some(stem) => format!("{stem}i"),
        None => match word.strip_suffix('Y') {
            Some(stem) => format!("{stem}I"),
            None => word.to_string(),
        },
    }
}

fn strip_plural_suffix(word: &str) -> String {
    if ends_with_ci(word, "ss") || ends_with_ci(word, "us") {
        return word.to_string();
    }

    let long = word.chars().count() > 4;
    if long && ends_with_ci(word, "ies") {
        return cut(word, 2).to_string();
    }
    if long && ends_with_ci(word, "oes") {
        return cut(word, 2).to_string();
    }
    if ends_with_ci(word, "sses")
        || ends_with_ci(word, "ches")
        || ends_with_ci(word, "shes")
        || ends_with_ci(word, "xes")
    {
        return cut(word, 2).to_string();
    }
    if ends_with_ci(word, "s") {
        return cut(word, 1).to_string();
    }

    word.to_string()
}
