//! Classification facade
//!
//! Runs one conversational turn: location extraction, context-aware intent
//! classification, then the context update and clarification decision.

use serde::Serialize;
use std::sync::Arc;
use std::time::Instant;

use ingres_config::{ClassifierConfig, Gazetteer, SharedPatternRegistry};
use ingres_core::{ClassificationResult, Intent, IntentCandidate, LocationReference};
use ingres_text_processing::{ClassificationContext, IntentClassifier, LocationExtractor};

use crate::context::ConversationContext;
use crate::AgentError;

/// Everything the caller learns from one turn
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TurnOutcome {
    pub intent: Intent,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location: Option<LocationReference>,
    pub awaiting_clarification: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pending_question: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub alternatives: Vec<IntentCandidate>,
    pub processing_time_ms: f64,
}

impl TurnOutcome {
    fn empty_input(started: Instant) -> Self {
        Self {
            intent: Intent::Error,
            confidence: 0.0,
            location: None,
            awaiting_clarification: false,
            pending_question: None,
            alternatives: Vec::new(),
            processing_time_ms: elapsed_ms(started),
        }
    }
}

pub struct ClassificationFacade {
    classifier: IntentClassifier,
    extractor: LocationExtractor,
}

impl ClassificationFacade {
    /// Build from already-loaded tables
    ///
    /// The registry handle is shared, so a reload through any clone of it is
    /// visible to the next turn.
    pub fn new(
        registry: SharedPatternRegistry,
        gazetteer: Arc<Gazetteer>,
        config: ClassifierConfig,
    ) -> Self {
        let extractor = LocationExtractor::new(gazetteer, config.location_similarity);
        Self {
            classifier: IntentClassifier::new(registry, config),
            extractor,
        }
    }

    /// Load the pattern and gazetteer files named in `config`, falling back
    /// to the compiled-in tables
    pub fn from_config(config: ClassifierConfig) -> Result<Self, AgentError> {
        config.validate()?;
        let registry = config.load_registry()?;
        let gazetteer = config.load_gazetteer()?;

        tracing::info!(
            patterns = registry.len(),
            version = registry.version(),
            states = gazetteer.states().len(),
            cities = gazetteer.cities().len(),
            "Classification tables loaded"
        );

        Ok(Self::new(
            SharedPatternRegistry::from(registry),
            Arc::new(gazetteer),
            config,
        ))
    }

    pub fn builtin() -> Result<Self, AgentError> {
        Self::from_config(ClassifierConfig::default())
    }

    pub fn classifier(&self) -> &IntentClassifier {
        &self.classifier
    }

    pub fn extractor(&self) -> &LocationExtractor {
        &self.extractor
    }

    pub fn registry(&self) -> &SharedPatternRegistry {
        self.classifier.registry()
    }

    pub fn config(&self) -> &ClassifierConfig {
        self.classifier.config()
    }

    /// Classify one turn and fold it into `context`
    ///
    /// Blank input yields `ERROR` and leaves the context untouched.
    pub fn process_turn(&self, raw_input: &str, context: &mut ConversationContext) -> TurnOutcome {
        let started = Instant::now();

        if raw_input.trim().is_empty() {
            return TurnOutcome::empty_input(started);
        }

        let location = self.extractor.extract(raw_input).into_option();

        // Score against the location remembered from earlier turns
        let result = {
            let view = context
                .last_location
                .as_deref()
                .map(ClassificationContext::with_last_location);
            self.classifier.classify(raw_input, view.as_ref())
        };

        match &location {
            Some(reference) => context.update_with_reference(raw_input, result.intent, reference),
            None => context.update(raw_input, result.intent, None),
        }

        let config = self.classifier.config();
        if result.confidence < config.clarification_threshold {
            context.set_clarification(config.clarification_prompt.as_str());
        } else {
            context.clear_clarification();
        }

        tracing::debug!(
            intent = %result.intent,
            confidence = result.confidence,
            location = ?location.as_ref().and_then(LocationReference::primary),
            awaiting_clarification = context.awaiting_clarification,
            query_count = context.query_count,
            "Processed turn"
        );

        let ClassificationResult {
            intent,
            confidence,
            alternatives,
        } = result;

        TurnOutcome {
            intent,
            confidence,
            location,
            awaiting_clarification: context.awaiting_clarification,
            pending_question: context.pending_question.clone(),
            alternatives,
            processing_time_ms: elapsed_ms(started),
        }
    }

    /// Classify without any conversation state
    pub fn classify_stateless(
        &self,
        raw_input: &str,
    ) -> (ClassificationResult, Option<LocationReference>) {
        if raw_input.trim().is_empty() {
            return (ClassificationResult::error(), None);
        }
        let location = self.extractor.extract(raw_input).into_option();
        (self.classifier.classify(raw_input, None), location)
    }
}

fn elapsed_ms(started: Instant) -> f64 {
    started.elapsed().as_secs_f64() * 1000.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use ingres_config::constants::context::CLARIFICATION_PROMPT;

    fn facade() -> ClassificationFacade {
        ClassificationFacade::builtin().unwrap()
    }

    #[test]
    fn test_blank_input_leaves_context_alone() {
        let facade = facade();
        let mut ctx = ConversationContext::new();
        ctx.update("punjab", Intent::QueryLocation, Some("punjab"));

        for input in ["", "   ", "\t\n"] {
            let outcome = facade.process_turn(input, &mut ctx);
            assert_eq!(outcome.intent, Intent::Error);
            assert_eq!(outcome.confidence, 0.0);
        }
        assert_eq!(ctx.query_count, 1);
        assert_eq!(ctx.history_len(), 1);
        assert!(!ctx.awaiting_clarification);
    }

    #[test]
    fn test_confident_turn_clears_clarification() {
        let facade = facade();
        let mut ctx = ConversationContext::new();

        let outcome = facade.process_turn("asdkjhasd", &mut ctx);
        assert!(outcome.awaiting_clarification);
        assert_eq!(outcome.pending_question.as_deref(), Some(CLARIFICATION_PROMPT));

        let outcome = facade.process_turn("Compare Punjab vs Haryana", &mut ctx);
        assert_eq!(outcome.intent, Intent::CompareLocations);
        assert!(!outcome.awaiting_clarification);
        assert!(outcome.pending_question.is_none());
        assert!(!ctx.awaiting_clarification);
    }

    #[test]
    fn test_custom_clarification_threshold() {
        let config = ClassifierConfig {
            clarification_threshold: 0.0,
            ..Default::default()
        };
        let facade = ClassificationFacade::from_config(config).unwrap();
        let mut ctx = ConversationContext::new();
        let outcome = facade.process_turn("asdkjhasd", &mut ctx);
        assert_eq!(outcome.intent, Intent::Unknown);
        assert!(!outcome.awaiting_clarification);
    }

    #[test]
    fn test_location_remembered_as_state() {
        let facade = facade();
        let mut ctx = ConversationContext::new();
        let outcome = facade.process_turn("groundwater in Ludhiana, Punjab", &mut ctx);

        let location = outcome.location.unwrap();
        assert_eq!(location.state.as_deref(), Some("punjab"));
        assert_eq!(ctx.last_location.as_deref(), Some("punjab"));
        assert_eq!(ctx.last_district.as_deref(), Some("ludhiana"));
    }

    #[test]
    fn test_first_turn_location_query_is_confident() {
        let facade = facade();
        let mut ctx = ConversationContext::new();
        let outcome = facade.process_turn("Show me Punjab data", &mut ctx);

        assert_eq!(outcome.intent, Intent::QueryLocation);
        assert!(outcome.confidence > 0.5, "got {}", outcome.confidence);
        assert!(!outcome.awaiting_clarification);
        assert!(!ctx.awaiting_clarification);
    }

    #[test]
    fn test_stateless_classification() {
        let facade = facade();
        let (result, location) = facade.classify_stateless("Show me Punjab data");
        assert_eq!(result.intent, Intent::QueryLocation);
        assert_eq!(location, Some(LocationReference::with_state("punjab")));

        let (result, location) = facade.classify_stateless("  ");
        assert!(result.is_error());
        assert!(location.is_none());
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ClassifierConfig {
            keyword_similarity: 1.5,
            ..Default::default()
        };
        assert!(matches!(
            ClassificationFacade::from_config(config),
            Err(AgentError::Config(_))
        ));
    }

    #[test]
    fn test_outcome_serializes_wire_tags() {
        let facade = facade();
        let mut ctx = ConversationContext::new();
        let outcome = facade.process_turn("Hello", &mut ctx);
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["intent"], "GREETING");
        assert!(json.get("location").is_none());
        assert!(json["processing_time_ms"].as_f64().unwrap() >= 0.0);
    }
}
