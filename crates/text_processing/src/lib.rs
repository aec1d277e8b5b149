//! Text processing for INGRES groundwater queries
//!
//! This crate turns a raw user query into structured signals:
//! - **Similarity**: character-level Levenshtein similarity
//! - **Intent classification**: weighted keyword/synonym scoring over the pattern registry
//! - **Location extraction**: exact and fuzzy gazetteer lookup
//!
//! # Example
//!
//! ```ignore
//! use ingres_text_processing::{IntentClassifier, LocationExtractor};
//!
//! let classifier = IntentClassifier::builtin()?;
//! let result = classifier.classify("Show me Punjab data", None);
//!
//! let extractor = LocationExtractor::builtin()?;
//! let location = extractor.extract("Show me Punjab data");
//! ```

pub mod intent;
pub mod location;
pub mod similarity;

mod error;

pub use error::{Result, TextProcessingError};

pub use intent::{ClassificationContext, IntentClassifier, PatternScore};
pub use location::{LocationExtractor, LocationMatch};
pub use similarity::{capped, is_similar, levenshtein_distance, similarity};
