//! Configuration management for the INGRES classifier
//!
//! Supports loading configuration from:
//! - YAML files (config/default.yaml, config/{env}.yaml)
//! - Environment variables (INGRES__ prefix)
//!
//! Domain tables (intent patterns, gazetteer) live under `domain` and are
//! validated when loaded.

pub mod classifier;
pub mod constants;
pub mod domain;
pub mod settings;

pub use classifier::ClassifierConfig;
pub use domain::{Gazetteer, IntentPattern, PatternRegistry, SharedPatternRegistry};
pub use settings::{
    load_settings, AuthConfig, ObservabilityConfig, RuntimeEnvironment, ServerConfig, Settings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<serde_yaml::Error> for ConfigError {
    fn from(err: serde_yaml::Error) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}
