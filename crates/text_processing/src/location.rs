//! Location extraction
//!
//! Finds gazetteer places in a query. An exact pass looks for any state and
//! any city as a whole word or phrase; when it finds nothing, a fuzzy pass
//! compares each word against the state list to tolerate typos such as
//! "panjab".

use serde::Serialize;
use std::sync::Arc;

use ingres_config::constants::thresholds;
use ingres_config::Gazetteer;
use ingres_core::LocationReference;

use crate::similarity::{capped, similarity};
use crate::Result;

/// Extracted location and the number of populated fields
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LocationMatch {
    pub location: LocationReference,
    pub match_count: usize,
}

impl LocationMatch {
    pub fn is_empty(&self) -> bool {
        self.match_count == 0
    }

    pub fn into_option(self) -> Option<LocationReference> {
        if self.is_empty() {
            None
        } else {
            Some(self.location)
        }
    }
}

pub struct LocationExtractor {
    gazetteer: Arc<Gazetteer>,
    /// Fuzzy matches must exceed this
    fuzzy_threshold: f32,
}

impl LocationExtractor {
    pub fn new(gazetteer: Arc<Gazetteer>, fuzzy_threshold: f32) -> Self {
        Self {
            gazetteer,
            fuzzy_threshold,
        }
    }

    /// Extractor over the compiled-in gazetteer with the default threshold
    pub fn builtin() -> Result<Self> {
        let gazetteer = Gazetteer::builtin()?;
        Ok(Self::new(Arc::new(gazetteer), thresholds::LOCATION_SIMILARITY))
    }

    pub fn gazetteer(&self) -> &Gazetteer {
        &self.gazetteer
    }

    pub fn extract(&self, text: &str) -> LocationMatch {
        let normalized = text.trim().to_lowercase();
        if normalized.is_empty() {
            return LocationMatch::default();
        }

        let mut location = LocationReference {
            state: first_contained(&normalized, self.gazetteer.states()),
            district: first_contained(&normalized, self.gazetteer.cities()),
            block: None,
        };

        if location.is_empty() {
            location.state = self.fuzzy_state(&normalized);
        }

        let match_count = location.field_count();
        if match_count > 0 {
            tracing::debug!(
                state = ?location.state,
                district = ?location.district,
                "Extracted location"
            );
        }

        LocationMatch {
            location,
            match_count,
        }
    }

    fn fuzzy_state(&self, normalized: &str) -> Option<String> {
        normalized
            .split_whitespace()
            .map(|token| capped(token.trim_matches(|c: char| c.is_ascii_punctuation())))
            .filter(|token| !token.is_empty())
            .find_map(|token| {
                self.gazetteer
                    .states()
                    .iter()
                    .find(|state| similarity(token, state) > self.fuzzy_threshold)
                    .cloned()
            })
    }
}

fn first_contained(text: &str, names: &[String]) -> Option<String> {
    names.iter().find(|name| contains_word(text, name)).cloned()
}

/// `name` occurs in `text` with no letter or digit on either side
fn contains_word(text: &str, name: &str) -> bool {
    text.match_indices(name).any(|(start, _)| {
        let before = text[..start].chars().next_back();
        let after = text[start + name.len()..].chars().next();
        !before.is_some_and(char::is_alphanumeric) && !after.is_some_and(char::is_alphanumeric)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn extractor() -> LocationExtractor {
        LocationExtractor::builtin().unwrap()
    }

    #[test]
    fn test_exact_state() {
        let result = extractor().extract("Show me Punjab data");
        assert_eq!(result.location, LocationReference::with_state("punjab"));
        assert_eq!(result.match_count, 1);
    }

    #[test]
    fn test_state_and_city() {
        let result = extractor().extract("groundwater in Ludhiana, Punjab");
        assert_eq!(result.location.state.as_deref(), Some("punjab"));
        assert_eq!(result.location.district.as_deref(), Some("ludhiana"));
        assert_eq!(result.match_count, 2);
    }

    #[test]
    fn test_city_only() {
        let result = extractor().extract("water levels around pune");
        assert_eq!(result.location, LocationReference::with_district("pune"));
        assert_eq!(result.match_count, 1);
    }

    #[test]
    fn test_gazetteer_order_wins() {
        // haryana is listed before punjab
        let result = extractor().extract("Compare Punjab vs Haryana");
        assert_eq!(result.location.state.as_deref(), Some("haryana"));
    }

    #[test]
    fn test_fuzzy_state() {
        let result = extractor().extract("Panjab groundwater status");
        assert_eq!(result.location, LocationReference::with_state("punjab"));
        assert_eq!(result.match_count, 1);

        let result = extractor().extract("what about keralla?");
        assert_eq!(result.location.state.as_deref(), Some("kerala"));
    }

    #[test]
    fn test_fuzzy_skipped_after_exact_hit() {
        // "mumbai" hits exactly, so "panjab" is never fuzzed
        let result = extractor().extract("panjab and mumbai");
        assert_eq!(result.location.state, None);
        assert_eq!(result.location.district.as_deref(), Some("mumbai"));
    }

    #[test]
    fn test_names_inside_words_ignored() {
        // "goal" holds goa, "diagram" holds agra
        let result = extractor().extract("show me a diagram of the goal");
        assert!(result.is_empty(), "got {:?}", result.location);

        let result = extractor().extract("Goa, then agra.");
        assert_eq!(result.location.state.as_deref(), Some("goa"));
        assert_eq!(result.location.district.as_deref(), Some("agra"));
    }

    #[test]
    fn test_contains_word() {
        assert!(contains_word("tamil nadu aquifers", "tamil nadu"));
        assert!(contains_word("(punjab)", "punjab"));
        assert!(!contains_word("goals", "goa"));
        // a later occurrence can still stand alone
        assert!(contains_word("goal or goa", "goa"));
    }

    #[test]
    fn test_no_location() {
        let result = extractor().extract("asdkjhasd");
        assert!(result.is_empty());
        assert!(result.into_option().is_none());
        assert!(extractor().extract("   ").is_empty());
    }
}
