//! Core types for the INGRES query classifier
//!
//! Shared by every other crate in the workspace:
//! - The intent taxonomy
//! - Classification results
//! - Location references
//! - Error types

pub mod classification;
pub mod error;
pub mod intent;
pub mod location;

pub use classification::{clamp_unit, ClassificationResult, IntentCandidate};
pub use error::{Error, Result};
pub use intent::{Intent, IntentCategory};
pub use location::LocationReference;
