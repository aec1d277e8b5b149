//! Location references extracted from user input

use serde::{Deserialize, Serialize};

/// A place mentioned in a query. Every level is optional.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LocationReference {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub state: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub district: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub block: Option<String>,
}

impl LocationReference {
    pub fn with_state(state: impl Into<String>) -> Self {
        Self {
            state: Some(state.into()),
            ..Default::default()
        }
    }

    pub fn with_district(district: impl Into<String>) -> Self {
        Self {
            district: Some(district.into()),
            ..Default::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.field_count() == 0
    }

    /// Number of populated levels
    pub fn field_count(&self) -> usize {
        [&self.state, &self.district, &self.block]
            .iter()
            .filter(|field| field.is_some())
            .count()
    }

    /// Most general populated level: state, then district, then block
    pub fn primary(&self) -> Option<&str> {
        self.state
            .as_deref()
            .or(self.district.as_deref())
            .or(self.block.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_primary_prefers_state() {
        let location = LocationReference {
            state: Some("punjab".to_string()),
            district: Some("amritsar".to_string()),
            block: None,
        };
        assert_eq!(location.primary(), Some("punjab"));
        assert_eq!(location.field_count(), 2);

        let district_only = LocationReference::with_district("pune");
        assert_eq!(district_only.primary(), Some("pune"));
    }

    #[test]
    fn test_empty_serializes_to_empty_object() {
        let location = LocationReference::default();
        assert!(location.is_empty());
        assert_eq!(serde_json::to_string(&location).unwrap(), "{}");
    }
}
