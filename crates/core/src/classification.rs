//! Classification results

use serde::{Deserialize, Serialize};

use crate::Intent;

/// A scored intent
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct IntentCandidate {
    pub intent: Intent,
    pub confidence: f32,
}

/// Outcome of classifying one piece of text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClassificationResult {
    pub intent: Intent,
    /// Always within `[0, 1]`
    pub confidence: f32,
    /// Runner-up intents, best first
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<IntentCandidate>,
}

impl ClassificationResult {
    pub fn new(intent: Intent, confidence: f32) -> Self {
        Self {
            intent,
            confidence: clamp_unit(confidence),
            alternatives: Vec::new(),
        }
    }

    /// Result for empty input
    pub fn error() -> Self {
        Self::new(Intent::Error, 0.0)
    }

    pub fn unknown(confidence: f32) -> Self {
        Self::new(Intent::Unknown, confidence)
    }

    pub fn with_alternatives(mut self, alternatives: Vec<IntentCandidate>) -> Self {
        self.alternatives = alternatives;
        self
    }

    pub fn is_error(&self) -> bool {
        self.intent == Intent::Error
    }

    pub fn is_unknown(&self) -> bool {
        self.intent == Intent::Unknown
    }
}

/// Clamp to `[0, 1]`, mapping NaN to 0
pub fn clamp_unit(value: f32) -> f32 {
    if value.is_nan() {
        0.0
    } else {
        value.clamp(0.0, 1.0)
    }
}
