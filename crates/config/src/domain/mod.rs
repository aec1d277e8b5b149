//! Domain data
//!
//! YAML-driven tables consumed by the classifier:
//! - patterns.yaml - intent scoring rules
//! - gazetteer.yaml - recognized place names
//!
//! Both ship compiled into the binary and can be overridden from disk.

mod gazetteer;
mod patterns;

pub use gazetteer::Gazetteer;
pub use patterns::{IntentPattern, PatternRegistry, SharedPatternRegistry};
