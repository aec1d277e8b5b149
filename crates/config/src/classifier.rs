//! Classifier configuration
//!
//! Thresholds and data sources for the intent classifier and location
//! extractor. Serde defaults come from `constants`.

use serde::{Deserialize, Serialize};

use crate::constants::{context, locale, text, thresholds};
use crate::domain::{Gazetteer, PatternRegistry};
use crate::ConfigError;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    /// Keyword/synonym similarity against the whole input
    #[serde(default = "default_keyword_similarity")]
    pub keyword_similarity: f32,

    /// Context keyword similarity against the last location
    #[serde(default = "default_context_similarity")]
    pub context_similarity: f32,

    /// Fuzzy state match threshold (exclusive)
    #[serde(default = "default_location_similarity")]
    pub location_similarity: f32,

    /// Global floor below which the result is UNKNOWN
    #[serde(default = "default_acceptance_floor")]
    pub acceptance_floor: f32,

    /// Confidence below which the session awaits clarification
    #[serde(default = "default_clarification_threshold")]
    pub clarification_threshold: f32,

    #[serde(default = "default_clarification_prompt")]
    pub clarification_prompt: String,

    #[serde(default = "default_max_alternatives")]
    pub max_alternatives: usize,

    /// Pattern locales to evaluate
    #[serde(default = "default_locales")]
    pub locales: Vec<String>,

    /// Pattern table on disk; the compiled-in table is used when unset
    #[serde(default)]
    pub patterns_path: Option<String>,

    /// Gazetteer on disk; the compiled-in lists are used when unset
    #[serde(default)]
    pub gazetteer_path: Option<String>,
}

fn default_keyword_similarity() -> f32 {
    thresholds::KEYWORD_SIMILARITY
}
fn default_context_similarity() -> f32 {
    thresholds::CONTEXT_SIMILARITY
}
fn default_location_similarity() -> f32 {
    thresholds::LOCATION_SIMILARITY
}
fn default_acceptance_floor() -> f32 {
    thresholds::ACCEPTANCE_FLOOR
}
fn default_clarification_threshold() -> f32 {
    thresholds::CLARIFICATION
}
fn default_clarification_prompt() -> String {
    context::CLARIFICATION_PROMPT.to_string()
}
fn default_max_alternatives() -> usize {
    text::MAX_ALTERNATIVES
}
fn default_locales() -> Vec<String> {
    vec![locale::DEFAULT.to_string()]
}

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            keyword_similarity: default_keyword_similarity(),
            context_similarity: default_context_similarity(),
            location_similarity: default_location_similarity(),
            acceptance_floor: default_acceptance_floor(),
            clarification_threshold: default_clarification_threshold(),
            clarification_prompt: default_clarification_prompt(),
            max_alternatives: default_max_alternatives(),
            locales: default_locales(),
            patterns_path: None,
            gazetteer_path: None,
        }
    }
}

impl ClassifierConfig {
    /// Whether patterns tagged with `tag` are evaluated
    pub fn locale_enabled(&self, tag: &str) -> bool {
        self.locales.iter().any(|l| l.eq_ignore_ascii_case(tag))
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let unit_fields = [
            ("classifier.keyword_similarity", self.keyword_similarity),
            ("classifier.context_similarity", self.context_similarity),
            ("classifier.location_similarity", self.location_similarity),
            ("classifier.acceptance_floor", self.acceptance_floor),
            ("classifier.clarification_threshold", self.clarification_threshold),
        ];
        for (field, value) in unit_fields {
            if !(0.0..=1.0).contains(&value) {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: format!("Must be between 0.0 and 1.0, got {}", value),
                });
            }
        }

        if self.locales.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "classifier.locales".to_string(),
                message: "At least one locale must be enabled".to_string(),
            });
        }

        Ok(())
    }

    /// Load the configured pattern table, or the compiled-in one
    pub fn load_registry(&self) -> Result<PatternRegistry, ConfigError> {
        match &self.patterns_path {
            Some(path) => PatternRegistry::load(path),
            None => PatternRegistry::builtin(),
        }
    }

    /// Load the configured gazetteer, or the compiled-in one
    pub fn load_gazetteer(&self) -> Result<Gazetteer, ConfigError> {
        match &self.gazetteer_path {
            Some(path) => Gazetteer::load(path),
            None => Gazetteer::builtin(),
        }
    }
}
