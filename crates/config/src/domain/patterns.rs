//! Intent Pattern Registry
//!
//! The scoring rules for every intent, loaded from `config/patterns.yaml`.
//! A registry is immutable once built; `SharedPatternRegistry` swaps whole
//! registries for hot reload.
//!
//! Terms are lowercased and trimmed at load time so the classifier only ever
//! compares normalized text.

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::Path;
use std::sync::Arc;

use ingres_core::Intent;

use crate::constants::{locale, thresholds, weights};
use crate::ConfigError;

const BUILTIN_PATTERNS: &str = include_str!("../../../../config/patterns.yaml");

/// A scoring rule for one intent
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntentPattern {
    pub intent: Intent,

    #[serde(default = "default_locale")]
    pub locale: String,

    /// Substring or fuzzy matches, weight 2.0 each
    pub keywords: Vec<String>,

    /// Weaker cues, weight 1.5 each
    #[serde(default)]
    pub synonyms: Vec<String>,

    /// Compared against the last location when `context_dependent`
    #[serde(default)]
    pub context_keywords: Vec<String>,

    #[serde(default)]
    pub priority: u8,

    #[serde(default)]
    pub require_all: bool,

    #[serde(default)]
    pub context_dependent: bool,

    #[serde(default = "default_min_confidence")]
    pub min_confidence: f32,

    /// Phrases this pattern must classify correctly
    #[serde(default)]
    pub examples: Vec<String>,
}

fn default_locale() -> String {
    locale::DEFAULT.to_string()
}

fn default_min_confidence() -> f32 {
    thresholds::PATTERN_MIN_CONFIDENCE
}

impl IntentPattern {
    /// Sum of every weight this pattern can accrue
    ///
    /// Context weights only count once a location has been remembered, so a
    /// context-dependent pattern scored without context is judged on its
    /// keywords and synonyms alone.
    pub fn total_possible_weight(&self, with_context: bool) -> f32 {
        let keyword = self.keywords.len() as f32 * weights::KEYWORD;
        let synonym = self.synonyms.len() as f32 * weights::SYNONYM;
        let context = if with_context && self.context_dependent {
            self.context_keywords.len() as f32 * weights::CONTEXT
        } else {
            0.0
        };
        keyword + synonym + context
    }

    /// Multiplier derived from priority
    pub fn priority_boost(&self) -> f32 {
        1.0 + f32::from(self.priority) / weights::PRIORITY_DIVISOR
    }

    fn normalize(&mut self) {
        for term in self
            .keywords
            .iter_mut()
            .chain(self.synonyms.iter_mut())
            .chain(self.context_keywords.iter_mut())
        {
            *term = term.trim().to_lowercase();
        }
        self.locale = self.locale.trim().to_lowercase();
    }

    fn validate(&self, index: usize) -> Result<(), ConfigError> {
        let field = |name: &str| format!("patterns[{}].{} ({})", index, name, self.intent);

        if self.keywords.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field("keywords"),
                message: "At least one keyword is required".to_string(),
            });
        }

        let has_blank = self
            .keywords
            .iter()
            .chain(&self.synonyms)
            .chain(&self.context_keywords)
            .any(|term| term.is_empty());
        if has_blank {
            return Err(ConfigError::InvalidValue {
                field: field("keywords"),
                message: "Empty terms match every input".to_string(),
            });
        }

        if self.context_dependent && self.context_keywords.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field("context_keywords"),
                message: "Context-dependent patterns need context keywords".to_string(),
            });
        }

        if self.total_possible_weight(false) <= 0.0 {
            return Err(ConfigError::InvalidValue {
                field: field("keywords"),
                message: "Total possible weight must be positive".to_string(),
            });
        }

        if !(0.0..=1.0).contains(&self.min_confidence) {
            return Err(ConfigError::InvalidValue {
                field: field("min_confidence"),
                message: format!("Must be between 0.0 and 1.0, got {}", self.min_confidence),
            });
        }

        if self.examples.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: field("examples"),
                message: "At least one example phrase is required".to_string(),
            });
        }

        Ok(())
    }
}

#[derive(Debug, Deserialize)]
struct PatternFile {
    #[serde(default)]
    version: u32,
    patterns: Vec<IntentPattern>,
}

/// Ordered, validated pattern table
///
/// Order is significant: on equal scores the earlier pattern wins.
#[derive(Debug, Clone, PartialEq)]
pub struct PatternRegistry {
    version: u32,
    patterns: Vec<IntentPattern>,
}

impl PatternRegistry {
    /// Build from patterns already in memory
    pub fn new(version: u32, mut patterns: Vec<IntentPattern>) -> Result<Self, ConfigError> {
        if patterns.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "patterns".to_string(),
                message: "Pattern table is empty".to_string(),
            });
        }

        for (index, pattern) in patterns.iter_mut().enumerate() {
            pattern.normalize();
            pattern.validate(index)?;
        }

        tracing::debug!(version, count = patterns.len(), "Loaded intent patterns");
        Ok(Self { version, patterns })
    }

    /// Parse a YAML pattern table
    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let file: PatternFile = serde_yaml::from_str(content)?;
        Self::new(file.version, file.patterns)
    }

    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// The table compiled into the binary
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_PATTERNS)
    }

    pub fn all_patterns(&self) -> &[IntentPattern] {
        &self.patterns
    }

    /// Patterns whose locale passes `enabled`, in registry order
    pub fn patterns_for<'a, F>(&'a self, enabled: F) -> impl Iterator<Item = &'a IntentPattern>
    where
        F: Fn(&str) -> bool + 'a,
    {
        self.patterns.iter().filter(move |p| enabled(&p.locale))
    }

    pub fn version(&self) -> u32 {
        self.version
    }

    pub fn len(&self) -> usize {
        self.patterns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Distinct locales present in the table
    pub fn locales(&self) -> Vec<&str> {
        let mut seen = HashSet::new();
        self.patterns
            .iter()
            .map(|p| p.locale.as_str())
            .filter(|l| seen.insert(*l))
            .collect()
    }

    pub fn has_intent(&self, intent: Intent) -> bool {
        self.patterns.iter().any(|p| p.intent == intent)
    }
}

/// Registry handle that can be swapped atomically
///
/// Readers take a snapshot and keep it for the duration of a call, so a
/// reload never exposes a half-replaced table.
#[derive(Debug, Clone)]
pub struct SharedPatternRegistry {
    inner: Arc<RwLock<Arc<PatternRegistry>>>,
}

impl SharedPatternRegistry {
    pub fn new(registry: PatternRegistry) -> Self {
        Self {
            inner: Arc::new(RwLock::new(Arc::new(registry))),
        }
    }

    pub fn snapshot(&self) -> Arc<PatternRegistry> {
        Arc::clone(&self.inner.read())
    }

    /// Install a new registry, returning the one it replaced
    pub fn replace(&self, registry: PatternRegistry) -> Arc<PatternRegistry> {
        let mut guard = self.inner.write();
        std::mem::replace(&mut *guard, Arc::new(registry))
    }

    /// Load and validate `path`, then swap it in
    ///
    /// On error the current registry stays in place.
    pub fn reload_from<P: AsRef<Path>>(&self, path: P) -> Result<usize, ConfigError> {
        let registry = PatternRegistry::load(path.as_ref())?;
        let count = registry.len();
        let previous = self.replace(registry);
        tracing::info!(
            path = %path.as_ref().display(),
            previous_version = previous.version(),
            patterns = count,
            "Pattern registry reloaded"
        );
        Ok(count)
    }
}

impl From<PatternRegistry> for SharedPatternRegistry {
    fn from(registry: PatternRegistry) -> Self {
        Self::new(registry)
    }
}
