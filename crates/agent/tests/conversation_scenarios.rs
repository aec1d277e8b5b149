//! End-to-end conversation tests
//!
//! Each test drives the facade the way a session would: one context, several
//! turns, assertions on both the outcome and the context afterwards.

use std::io::Write;

use ingres_agent::{ClassificationFacade, ConversationContext};
use ingres_config::ClassifierConfig;
use ingres_core::{Intent, LocationReference};

fn facade() -> ClassificationFacade {
    ClassificationFacade::builtin().unwrap()
}

#[test]
fn test_greeting() {
    let facade = facade();
    let mut ctx = ConversationContext::new();

    let outcome = facade.process_turn("Hello", &mut ctx);
    assert_eq!(outcome.intent, Intent::Greeting);
    assert!(outcome.confidence >= 0.4, "got {}", outcome.confidence);
    assert!(outcome.location.is_none());
    assert_eq!(ctx.last_intent, Some(Intent::Greeting));
}

#[test]
fn test_location_query() {
    let facade = facade();
    let mut ctx = ConversationContext::new();

    let outcome = facade.process_turn("Show me Punjab data", &mut ctx);
    assert_eq!(outcome.intent, Intent::QueryLocation);
    assert!(outcome.confidence >= 0.7, "got {}", outcome.confidence);
    assert!(!outcome.awaiting_clarification);
    assert!(outcome.pending_question.is_none());
    assert_eq!(outcome.location, Some(LocationReference::with_state("punjab")));
    assert_eq!(ctx.last_location.as_deref(), Some("punjab"));
    assert_eq!(ctx.last_state.as_deref(), Some("punjab"));
}

#[test]
fn test_misspelled_state() {
    let facade = facade();
    let mut ctx = ConversationContext::new();

    let outcome = facade.process_turn("Panjab groundwater status", &mut ctx);
    assert_eq!(outcome.location, Some(LocationReference::with_state("punjab")));
    assert_eq!(ctx.last_location.as_deref(), Some("punjab"));
}

#[test]
fn test_gibberish_asks_for_clarification() {
    let facade = facade();
    let mut ctx = ConversationContext::new();

    let outcome = facade.process_turn("asdkjhasd", &mut ctx);
    assert_eq!(outcome.intent, Intent::Unknown);
    assert!(outcome.confidence < 0.3);
    assert!(outcome.awaiting_clarification);
    assert!(ctx.awaiting_clarification);
    assert!(ctx.pending_question.is_some());
    assert_eq!(ctx.query_count, 1);
}

#[test]
fn test_follow_up_uses_previous_location() {
    let facade = facade();

    let mut ctx = ConversationContext::new();
    let first = facade.process_turn("Compare Punjab vs Haryana", &mut ctx);
    assert_eq!(first.intent, Intent::CompareLocations);
    assert!(ctx.last_location.is_some());

    let with_context = facade.process_turn("tell me more about that", &mut ctx);
    assert_eq!(with_context.intent, Intent::FollowUpQuestion);

    let mut fresh = ConversationContext::new();
    let without_context = facade.process_turn("tell me more about that", &mut fresh);
    assert_eq!(without_context.intent, Intent::FollowUpQuestion);

    assert!(
        with_context.confidence > without_context.confidence,
        "{} should exceed {}",
        with_context.confidence,
        without_context.confidence
    );
    // The follow-up mentions no place, so the remembered one survives
    assert_eq!(ctx.last_location, Some("haryana".to_string()));
}

#[test]
fn test_blank_input_is_error_without_mutation() {
    let facade = facade();
    let mut ctx = ConversationContext::new();
    facade.process_turn("Hello", &mut ctx);

    let outcome = facade.process_turn("    ", &mut ctx);
    assert_eq!(outcome.intent, Intent::Error);
    assert_eq!(outcome.confidence, 0.0);
    assert_eq!(ctx.query_count, 1);
    assert_eq!(ctx.last_intent, Some(Intent::Greeting));
}

#[test]
fn test_history_keeps_last_ten_turns() {
    let facade = facade();
    let mut ctx = ConversationContext::new();

    for i in 0..11 {
        facade.process_turn(&format!("hello number {}", i), &mut ctx);
    }

    assert_eq!(ctx.history_len(), 10);
    assert_eq!(ctx.history().next(), Some("hello number 1"));
    assert_eq!(ctx.last_input(), Some("hello number 10"));
    assert_eq!(ctx.query_count, 11);
}

#[test]
fn test_confidence_bounded_across_conversation() {
    let facade = facade();
    let mut ctx = ConversationContext::new();
    let inputs = [
        "Hello",
        "Compare Punjab vs Haryana versus Gujarat difference between",
        "tell me more, elaborate, more about it, expand on further details",
        "!!!",
        "x",
        "what are the safe areas in Kerala",
    ];
    for input in inputs {
        let outcome = facade.process_turn(input, &mut ctx);
        assert!(
            (0.0..=1.0).contains(&outcome.confidence),
            "{} -> {}",
            input,
            outcome.confidence
        );
    }
}

#[test]
fn test_tables_from_files() {
    let dir = tempfile::tempdir().unwrap();

    let patterns_path = dir.path().join("patterns.yaml");
    let mut file = std::fs::File::create(&patterns_path).unwrap();
    writeln!(
        file,
        r#"version: 1
patterns:
  - intent: WATER_CRISIS
    keywords: [dry wells]
    examples: ["dry wells everywhere"]
"#
    )
    .unwrap();

    let gazetteer_path = dir.path().join("gazetteer.yaml");
    let mut file = std::fs::File::create(&gazetteer_path).unwrap();
    writeln!(file, "states: [atlantis]\ncities: [poseidonia]").unwrap();

    let config = ClassifierConfig {
        patterns_path: Some(patterns_path.to_string_lossy().to_string()),
        gazetteer_path: Some(gazetteer_path.to_string_lossy().to_string()),
        ..Default::default()
    };
    let facade = ClassificationFacade::from_config(config).unwrap();
    let mut ctx = ConversationContext::new();

    let outcome = facade.process_turn("Dry wells in Atlantis", &mut ctx);
    assert_eq!(outcome.intent, Intent::WaterCrisis);
    assert_eq!(outcome.confidence, 1.0);
    assert_eq!(outcome.location, Some(LocationReference::with_state("atlantis")));

    let outcome = facade.process_turn("Hello", &mut ctx);
    assert_eq!(outcome.intent, Intent::Unknown);
}

#[test]
fn test_reload_applies_to_next_turn() {
    let facade = facade();
    let mut ctx = ConversationContext::new();
    assert_eq!(facade.process_turn("Hello", &mut ctx).intent, Intent::Greeting);

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("patterns.yaml");
    std::fs::write(
        &path,
        "version: 2\npatterns:\n  - intent: GOODBYE\n    keywords: [hello]\n    examples: [hello]\n",
    )
    .unwrap();

    let loaded = facade.registry().reload_from(&path).unwrap();
    assert_eq!(loaded, 1);
    assert_eq!(facade.process_turn("Hello", &mut ctx).intent, Intent::Goodbye);
}
