use std::collections::{BTreeMap, BTreeSet};

use tracing::debug;

use crate::backend::RawHit;
use crate::model::{MatchCandidate, MatchDetails, NameField, SearchSummary, TermFailure};
use crate::normalize::{Classification, ExactMatchClassifier};
use crate::search::{Strategy, TermError, WaveResult};

#[derive(Debug, Clone, PartialEq)]
/// Classified candidates for every term of one wave, plus its summary.
pub struct AssembledWave {
    /// Wave terms in input order.
    pub terms: Vec<String>,
    /// Candidates per term, best-ranked first. Terms without hits map to an empty list.
    pub matches: BTreeMap<String, Vec<MatchCandidate>>,
    pub summary: SearchSummary,
}

impl AssembledWave {
    pub fn candidates(&self, term: &str) -> &[MatchCandidate] {
        self.matches.get(term).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Highest-ranked exact candidate for `term`.
    pub fn best_exact(&self, term: &str) -> Option<&MatchCandidate> {
        self.candidates(term).iter().find(|c| c.is_exact_match)
    }

    pub fn has_exact(&self, term: &str) -> bool {
        self.best_exact(term).is_some()
    }

    /// Terms without an exact candidate, in input order.
    pub fn unresolved_terms(&self) -> Vec<&str> {
        self.terms
            .iter()
            .map(String::as_str)
            .filter(|term| !self.has_exact(term))
            .collect()
    }

    pub fn errors_for(&self, term: &str) -> impl Iterator<Item = &TermError> {
        self.summary
            .errors
            .iter()
            .filter(move |f| f.term == term)
            .map(|f| &f.error)
    }
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ResultAssembler {
    classifier: ExactMatchClassifier,
}

impl ResultAssembler {
    pub fn new(classifier: ExactMatchClassifier) -> Self {
        Self { classifier }
    }

    pub fn classifier(&self) -> &ExactMatchClassifier {
        &self.classifier
    }

    pub fn assemble(&self, wave: &WaveResult) -> AssembledWave {
        let mut terms = Vec::with_capacity(wave.outcomes.len());
        let mut matches = BTreeMap::new();
        let mut errors = Vec::new();
        let mut exact_terms = BTreeSet::new();

        for outcome in &wave.outcomes {
            errors.extend(outcome.errors.iter().map(|error| TermFailure {
                term: outcome.term.clone(),
                error: error.clone(),
            }));

            let mut hits: Vec<&RawHit> = outcome.hits.iter().collect();
            hits.sort_by(|a, b| b.score.total_cmp(&a.score));

            let mut candidates = Vec::with_capacity(hits.len());
            for (rank, hit) in hits.into_iter().enumerate() {
                match self.to_candidate(&outcome.term, hit, rank, wave.strategy) {
                    Ok(candidate) => candidates.push(candidate),
                    Err(error) => errors.push(TermFailure {
                        term: outcome.term.clone(),
                        error,
                    }),
                }
            }

            if candidates.iter().any(|c| c.is_exact_match) {
                exact_terms.insert(outcome.term.clone());
            }
            terms.push(outcome.term.clone());
            matches.insert(outcome.term.clone(), candidates);
        }

        let summary = SearchSummary::compute(
            terms.len(),
            &exact_terms,
            errors,
            wave.elapsed,
            wave.strategy,
        );

        debug!(
            total = summary.total_terms,
            matched = summary.matched_terms,
            failed = summary.failed_terms,
            "Assembled wave"
        );

        AssembledWave {
            terms,
            matches,
            summary,
        }
    }

    /// Maps one hit, classifying against the short name first and then the description.
    pub fn to_candidate(
        &self,
        term: &str,
        hit: &RawHit,
        rank: usize,
        strategy: Strategy,
    ) -> Result<MatchCandidate, TermError> {
        let source = &hit.source;
        let short_name = non_empty(source.short_name.as_deref());
        let description = non_empty(source.description.as_deref());

        let canonical_name = short_name
            .or(description)
            .or(non_empty(source.original_name.as_deref()))
            .ok_or_else(|| TermError::MalformedHit {
                id: hit.id.clone(),
                reason: "hit has no name field".to_string(),
            })?;

        let fields = [
            (NameField::ShortName, short_name),
            (NameField::Description, description),
        ];
        let mut first: Option<Classification> = None;
        let mut matched: Option<(NameField, Classification)> = None;
        for (field, name) in fields {
            let Some(name) = name else { continue };
            let classification = self.classifier.classify(term, name);
            if classification.is_exact {
                matched = Some((field, classification));
                break;
            }
            first.get_or_insert(classification);
        }

        let (matched_field, classification) = match matched {
            Some((field, classification)) => (Some(field), classification),
            None => (
                None,
                first.unwrap_or_else(|| self.classifier.classify(term, canonical_name)),
            ),
        };

        Ok(MatchCandidate {
            id: hit.id.clone(),
            canonical_name: canonical_name.to_string(),
            short_name: source.short_name.clone(),
            description: source.description.clone(),
            category: source.category.clone(),
            source_db: source.source_db.clone(),
            nutrition: source.nutrition.clone(),
            reference_weight: source.reference_weight,
            relevance_score: hit.score,
            is_exact_match: classification.is_exact,
            match_details: MatchDetails {
                matched_field,
                kind: classification.kind,
                transforms: classification.transforms,
                normalized_query: classification.normalized_query,
                normalized_name: classification.normalized_name,
                rank,
                strategy,
            },
        })
    }
}

fn non_empty(value: Option<&str>) -> Option<&str> {
    value.filter(|v| !v.trim().is_empty())
}
