//! Greedy one-to-one assignment of source fields to target fields.

use std::collections::HashSet;

use serde::{Deserialize, Deserializer, Serialize};

use crate::similarity::SimilarityScorer;

/// Default minimum confidence for a suggestion
pub const DEFAULT_THRESHOLD: f64 = 0.3;

/// A proposed or accepted pairing of a source field to a target field.
///
/// An empty `target` means no match was found; its confidence is 0.0.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Correspondence {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub source: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub target: String,
    #[serde(default)]
    pub confidence: f64,
    #[serde(default)]
    pub transform: Option<String>,
}

/// Read a missing-or-null string field as empty
pub(crate) fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

impl Correspondence {
    pub fn new(source: impl Into<String>, target: impl Into<String>) -> Self {
        Self {
            source: source.into(),
            target: target.into(),
            confidence: 0.0,
            transform: None,
        }
    }

    /// A source field with no suitable target
    pub fn unmatched(source: impl Into<String>) -> Self {
        Self::new(source, "")
    }

    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = confidence;
        self
    }

    pub fn with_transform(mut self, transform: impl Into<String>) -> Self {
        self.transform = Some(transform.into());
        self
    }

    /// Both ends are present
    pub fn is_complete(&self) -> bool {
        !self.source.is_empty() && !self.target.is_empty()
    }
}

/// Produces ranked correspondence suggestions.
///
/// Sources are processed in the order given. Each takes the best-scoring
/// target not yet consumed (first seen wins a tie) if it reaches the
/// threshold. There is no backtracking, so an early source can take a
/// target that a later source would have scored higher.
#[derive(Debug, Clone)]
pub struct MappingAssigner {
    scorer: SimilarityScorer,
    threshold: f64,
}

impl MappingAssigner {
    pub fn new(scorer: SimilarityScorer) -> Self {
        Self {
            scorer,
            threshold: DEFAULT_THRESHOLD,
        }
    }

    /// Threshold is used as given, including values outside `[0, 1]`.
    pub fn with_threshold(mut self, threshold: f64) -> Self {
        self.threshold = threshold;
        self
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Suggest a correspondence for every source field, highest confidence first.
    ///
    /// # Example
    ///
    /// ```
    /// use data_whisperer::MappingAssigner;
    ///
    /// let assigner = MappingAssigner::default();
    /// let suggestions = assigner.suggest(
    ///     &["full_name".to_string(), "zzz".to_string()],
    ///     &["name".to_string()],
    /// );
    ///
    /// assert_eq!(suggestions[0].target, "name");
    /// assert_eq!(suggestions[1].target, "");
    /// ```
    pub fn suggest<S, T>(&self, source_fields: &[S], target_fields: &[T]) -> Vec<Correspondence>
    where
        S: AsRef<str>,
        T: AsRef<str>,
    {
        let mut used_targets: HashSet<&str> = HashSet::new();
        let mut mappings = Vec::with_capacity(source_fields.len());

        for source in source_fields {
            let source = source.as_ref();
            let mut best: Option<(&str, f64)> = None;

            for target in target_fields {
                let target = target.as_ref();
                if used_targets.contains(target) {
                    continue;
                }

                let score = self.scorer.score(source, target);
                let best_score = best.map(|(_, s)| s).unwrap_or(0.0);
                if score > best_score && score >= self.threshold {
                    best = Some((target, score));
                }
            }

            // An empty target path scores but never counts as a match
            match best.filter(|(target, _)| !target.is_empty()) {
                Some((target, score)) => {
                    tracing::trace!(source, target, score, "matched field");
                    used_targets.insert(target);
                    mappings.push(Correspondence::new(source, target).with_confidence(score));
                }
                None => {
                    tracing::trace!(source, "no target above threshold");
                    mappings.push(Correspondence::unmatched(source));
                }
            }
        }

        // Stable: equal confidences keep processing order
        mappings.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        tracing::debug!(
            sources = source_fields.len(),
            targets = target_fields.len(),
            matched = used_targets.len(),
            "suggested mappings"
        );

        mappings
    }
}

impl Default for MappingAssigner {
    fn default() -> Self {
        Self::new(SimilarityScorer::default())
    }
}

/// Suggest mappings with the default scorer.
pub fn suggest_mappings<S, T>(
    source_fields: &[S],
    target_fields: &[T],
    threshold: f64,
) -> Vec<Correspondence>
where
    S: AsRef<str>,
    T: AsRef<str>,
{
    MappingAssigner::default()
        .with_threshold(threshold)
        .suggest(source_fields, target_fields)
}
