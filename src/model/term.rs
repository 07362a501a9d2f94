use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
/// What the upstream recognizer thought the term was.
pub enum TermKind {
    #[default]
    /// A single ingredient ("tomato").
    Ingredient,
    /// A prepared dish ("lasagna").
    Dish,
}

impl TermKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            TermKind::Ingredient => "ingredient",
            TermKind::Dish => "dish",
        }
    }
}

impl std::fmt::Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for TermKind {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "ingredient" | "i" => Ok(Self::Ingredient),
            "dish" | "d" => Ok(Self::Dish),
            _ => Err(format!("Unknown term kind: {}", s)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
/// One recognized food term to resolve. Immutable once created.
pub struct SearchTerm {
    text: String,
    kind: TermKind,
    /// Recognizer confidence, if upstream reported one.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    confidence: Option<f32>,
}

impl SearchTerm {
    pub fn new(text: impl Into<String>, kind: TermKind) -> Self {
        Self {
            text: text.into(),
            kind,
            confidence: None,
        }
    }

    pub fn ingredient(text: impl Into<String>) -> Self {
        Self::new(text, TermKind::Ingredient)
    }

    pub fn dish(text: impl Into<String>) -> Self {
        Self::new(text, TermKind::Dish)
    }

    pub fn with_confidence(mut self, confidence: f32) -> Self {
        self.confidence = Some(confidence);
        self
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn kind(&self) -> TermKind {
        self.kind
    }

    pub fn confidence(&self) -> Option<f32> {
        self.confidence
    }
}

impl std::fmt::Display for SearchTerm {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({})", self.text, self.kind)
    }
}
