//! Conversational layer for the INGRES classifier
//!
//! Features:
//! - Per-conversation context (last location, last intent, bounded history)
//! - Turn processing that feeds the context back into classification
//! - Clarification prompting for low-confidence turns

pub mod context;
pub mod facade;

pub use context::ConversationContext;
pub use facade::{ClassificationFacade, TurnOutcome};

use thiserror::Error;

/// Agent errors
#[derive(Error, Debug)]
pub enum AgentError {
    #[error("Configuration error: {0}")]
    Config(#[from] ingres_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, AgentError>;
