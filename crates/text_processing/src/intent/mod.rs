//! Intent Classification
//!
//! Scores user input against every pattern in the registry and returns the
//! best-scoring intent with a confidence in `[0, 1]`.
//!
//! # Scoring
//!
//! For each pattern, on lowercased input:
//!
//! - each keyword found as a substring, or fuzzily equal to the whole input,
//!   adds 2.0
//! - each synonym, tested the same way, adds 1.5
//! - for context-dependent patterns, each context keyword close to the last
//!   recognized location adds 1.0
//!
//! The sum is divided by the pattern's total possible weight (context
//! keywords count toward it only when a location is remembered), boosted by
//! `1 + priority / 20`, halved when a `require_all` pattern misses a keyword,
//! then checked against the pattern's own confidence floor. The best accepted
//! pattern wins; earlier patterns win ties.
//!
//! # Example
//!
//! ```
//! use ingres_core::Intent;
//! use ingres_text_processing::IntentClassifier;
//!
//! let classifier = IntentClassifier::builtin().unwrap();
//! let result = classifier.classify("Hello", None);
//!
//! assert_eq!(result.intent, Intent::Greeting);
//! ```

use std::collections::HashSet;

use ingres_config::constants::weights;
use ingres_config::{ClassifierConfig, IntentPattern, PatternRegistry, SharedPatternRegistry};
use ingres_core::{clamp_unit, ClassificationResult, Intent, IntentCandidate};

use crate::similarity::{capped, is_similar};
use crate::Result;

/// Conversation state the classifier may consult
#[derive(Debug, Clone, Copy, Default)]
pub struct ClassificationContext<'a> {
    pub last_location: Option<&'a str>,
}

impl<'a> ClassificationContext<'a> {
    pub fn with_last_location(location: &'a str) -> Self {
        Self {
            last_location: Some(location),
        }
    }
}

/// Breakdown of one pattern's score
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PatternScore {
    pub score: f32,
    pub total_possible: f32,
    pub keywords_matched: usize,
    pub context_matched: usize,
    /// After priority boost, penalty and clamping
    pub normalized: f32,
}

/// Rule-based intent classifier
pub struct IntentClassifier {
    registry: SharedPatternRegistry,
    config: ClassifierConfig,
}

impl IntentClassifier {
    pub fn new(registry: impl Into<SharedPatternRegistry>, config: ClassifierConfig) -> Self {
        Self {
            registry: registry.into(),
            config,
        }
    }

    /// Classifier over the compiled-in pattern table with default thresholds
    pub fn builtin() -> Result<Self> {
        let registry = PatternRegistry::builtin()?;
        Ok(Self::new(registry, ClassifierConfig::default()))
    }

    /// Handle for hot-reloading the pattern table
    pub fn registry(&self) -> &SharedPatternRegistry {
        &self.registry
    }

    pub fn config(&self) -> &ClassifierConfig {
        &self.config
    }

    /// Classify `text`, optionally using conversation context
    ///
    /// Empty input yields `ERROR` with confidence 0. Input that no pattern
    /// accepts above the global floor yields `UNKNOWN`, still carrying the
    /// best accepted score.
    pub fn classify(
        &self,
        text: &str,
        context: Option<&ClassificationContext<'_>>,
    ) -> ClassificationResult {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return ClassificationResult::error();
        }

        let registry = self.registry.snapshot();
        let last_location = context
            .and_then(|c| c.last_location)
            .map(|l| l.trim().to_lowercase())
            .filter(|l| !l.is_empty());

        let mut candidates: Vec<IntentCandidate> = Vec::new();
        let mut best: Option<IntentCandidate> = None;

        for pattern in registry.patterns_for(|l| self.config.locale_enabled(l)) {
            let scored = self.score_pattern(pattern, &normalized, last_location.as_deref());

            tracing::trace!(
                intent = %pattern.intent,
                score = scored.score,
                total = scored.total_possible,
                normalized = scored.normalized,
                "Scored pattern"
            );

            if scored.normalized < pattern.min_confidence {
                continue;
            }

            let candidate = IntentCandidate {
                intent: pattern.intent,
                confidence: scored.normalized,
            };
            candidates.push(candidate);

            // Strictly greater: the first pattern keeps a tie
            if best.map_or(true, |b| candidate.confidence > b.confidence) {
                best = Some(candidate);
            }
        }

        let best_score = best.map_or(0.0, |b| b.confidence);
        let result = match best {
            Some(b) if best_score > self.config.acceptance_floor => {
                ClassificationResult::new(b.intent, best_score)
            }
            _ => ClassificationResult::unknown(best_score),
        };

        let alternatives = self.alternatives(candidates, result.intent);

        tracing::debug!(
            intent = %result.intent,
            confidence = result.confidence,
            alternatives = alternatives.len(),
            "Classified input"
        );

        result.with_alternatives(alternatives)
    }

    /// Score one pattern against already-normalized text
    pub fn score_pattern(
        &self,
        pattern: &IntentPattern,
        normalized: &str,
        last_location: Option<&str>,
    ) -> PatternScore {
        let mut score = 0.0;

        let keywords_matched = pattern
            .keywords
            .iter()
            .filter(|k| self.term_matches(k, normalized))
            .count();
        score += keywords_matched as f32 * weights::KEYWORD;

        let synonyms_matched = pattern
            .synonyms
            .iter()
            .filter(|s| self.term_matches(s, normalized))
            .count();
        score += synonyms_matched as f32 * weights::SYNONYM;

        let context_matched = match last_location {
            Some(location) if pattern.context_dependent => {
                let location = capped(location);
                pattern
                    .context_keywords
                    .iter()
                    .filter(|ck| is_similar(capped(ck), location, self.config.context_similarity))
                    .count()
            }
            _ => 0,
        };
        score += context_matched as f32 * weights::CONTEXT;

        let total_possible = pattern.total_possible_weight(last_location.is_some());
        let mut normalized_score = if total_possible > 0.0 {
            score / total_possible
        } else {
            0.0
        };

        normalized_score *= pattern.priority_boost();

        if pattern.require_all && keywords_matched < pattern.keywords.len() {
            normalized_score *= weights::REQUIRE_ALL_PENALTY;
        }

        PatternScore {
            score,
            total_possible,
            keywords_matched,
            context_matched,
            normalized: clamp_unit(normalized_score),
        }
    }

    /// Substring hit, or the whole input is a near-spelling of the term
    fn term_matches(&self, term: &str, normalized: &str) -> bool {
        normalized.contains(term)
            || is_similar(capped(term), capped(normalized), self.config.keyword_similarity)
    }

    /// Runner-ups, best first, one per intent, excluding `winner`
    fn alternatives(&self, mut candidates: Vec<IntentCandidate>, winner: Intent) -> Vec<IntentCandidate> {
        candidates.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut seen = HashSet::new();
        seen.insert(winner);
        candidates
            .into_iter()
            .filter(|c| seen.insert(c.intent))
            .take(self.config.max_alternatives)
            .collect()
    }
}
