//! Core error types

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("Unknown intent tag: {0}")]
    UnknownIntent(String),
}

pub type Result<T> = std::result::Result<T, Error>;
