//! Per-conversation state
//!
//! One `ConversationContext` belongs to exactly one conversation. It remembers
//! the last location and intent so follow-up questions can be scored against
//! them, plus a bounded history of raw inputs.

use chrono::{DateTime, Utc};
use serde::Serialize;
use std::collections::VecDeque;

use ingres_config::constants::context::HISTORY_CAPACITY;
use ingres_core::{Intent, LocationReference};

#[derive(Debug, Clone, Serialize)]
pub struct ConversationContext {
    /// Location string used to score context-dependent patterns
    pub last_location: Option<String>,
    pub last_state: Option<String>,
    pub last_district: Option<String>,
    pub last_intent: Option<Intent>,
    /// Oldest first
    history: VecDeque<String>,
    pub query_count: u64,
    pub awaiting_clarification: bool,
    pub pending_question: Option<String>,
    pub session_start: DateTime<Utc>,
}

impl Default for ConversationContext {
    fn default() -> Self {
        Self::new()
    }
}

impl ConversationContext {
    pub fn new() -> Self {
        Self {
            last_location: None,
            last_state: None,
            last_district: None,
            last_intent: None,
            history: VecDeque::with_capacity(HISTORY_CAPACITY),
            query_count: 0,
            awaiting_clarification: false,
            pending_question: None,
            session_start: Utc::now(),
        }
    }

    /// Record a classified turn
    ///
    /// `location` replaces the remembered location only when it is non-empty.
    pub fn update(&mut self, raw_input: &str, intent: Intent, location: Option<&str>) {
        self.last_intent = Some(intent);
        self.query_count += 1;

        if let Some(location) = location.filter(|l| !l.is_empty()) {
            self.last_location = Some(location.to_string());
        }

        self.push_history(raw_input);
    }

    /// Record a classified turn along with the full extracted reference
    ///
    /// The state wins over the district as the remembered location string.
    pub fn update_with_reference(
        &mut self,
        raw_input: &str,
        intent: Intent,
        location: &LocationReference,
    ) {
        let primary = location.state.as_deref().or(location.district.as_deref());
        self.update(raw_input, intent, primary);

        if !location.is_empty() {
            self.last_state = location.state.clone();
            self.last_district = location.district.clone();
        }
    }

    fn push_history(&mut self, raw_input: &str) {
        if self.history.len() == HISTORY_CAPACITY {
            self.history.pop_front();
        }
        self.history.push_back(raw_input.to_string());
    }

    pub fn set_clarification(&mut self, prompt: impl Into<String>) {
        self.awaiting_clarification = true;
        self.pending_question = Some(prompt.into());
    }

    pub fn clear_clarification(&mut self) {
        self.awaiting_clarification = false;
        self.pending_question = None;
    }

    /// Reset to a fresh context, keeping nothing from earlier turns
    pub fn clear(&mut self) {
        *self = Self::new();
    }

    pub fn history(&self) -> impl Iterator<Item = &str> {
        self.history.iter().map(String::as_str)
    }

    pub fn history_len(&self) -> usize {
        self.history.len()
    }

    pub fn last_input(&self) -> Option<&str> {
        self.history.back().map(String::as_str)
    }
}
