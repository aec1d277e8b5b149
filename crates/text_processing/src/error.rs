//! Text processing errors

use thiserror::Error;

#[derive(Error, Debug)]
pub enum TextProcessingError {
    #[error("Configuration error: {0}")]
    Config(#[from] ingres_config::ConfigError),
}

pub type Result<T> = std::result::Result<T, TextProcessingError>;
