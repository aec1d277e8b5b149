//! Gazetteer
//!
//! Recognized place names: administrative regions (states and union
//! territories) and major cities. List order decides which entry wins when a
//! query names several places.

use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::ConfigError;

const BUILTIN_GAZETTEER: &str = include_str!("../../../../config/gazetteer.yaml");

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Gazetteer {
    states: Vec<String>,
    #[serde(default)]
    cities: Vec<String>,
}

impl Gazetteer {
    pub fn new(states: Vec<String>, cities: Vec<String>) -> Result<Self, ConfigError> {
        let gazetteer = Self {
            states: normalize(states),
            cities: normalize(cities),
        };
        gazetteer.validate()?;
        Ok(gazetteer)
    }

    pub fn from_yaml(content: &str) -> Result<Self, ConfigError> {
        let raw: Gazetteer = serde_yaml::from_str(content)?;
        Self::new(raw.states, raw.cities)
    }

    /// Load from a YAML file
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path.as_ref()).map_err(|e| {
            ConfigError::FileNotFound(format!("{}: {}", path.as_ref().display(), e))
        })?;
        Self::from_yaml(&content)
    }

    /// The lists compiled into the binary
    pub fn builtin() -> Result<Self, ConfigError> {
        Self::from_yaml(BUILTIN_GAZETTEER)
    }

    pub fn states(&self) -> &[String] {
        &self.states
    }

    pub fn cities(&self) -> &[String] {
        &self.cities
    }

    pub fn is_state(&self, name: &str) -> bool {
        let name = name.trim().to_lowercase();
        self.states.iter().any(|s| *s == name)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if self.states.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "gazetteer.states".to_string(),
                message: "At least one state is required".to_string(),
            });
        }
        if self.states.iter().chain(&self.cities).any(|n| n.is_empty()) {
            return Err(ConfigError::InvalidValue {
                field: "gazetteer".to_string(),
                message: "Place names must not be empty".to_string(),
            });
        }
        Ok(())
    }
}

fn normalize(names: Vec<String>) -> Vec<String> {
    names.into_iter().map(|n| n.trim().to_lowercase()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_gazetteer() {
        let gazetteer = Gazetteer::builtin().unwrap();
        assert_eq!(gazetteer.states().len(), 31);
        assert_eq!(gazetteer.cities().len(), 50);
        assert!(gazetteer.is_state("Punjab"));
        assert!(!gazetteer.is_state("amritsar"));
    }

    #[test]
    fn test_order_preserved() {
        let gazetteer = Gazetteer::builtin().unwrap();
        let haryana = gazetteer.states().iter().position(|s| s == "haryana");
        let punjab = gazetteer.states().iter().position(|s| s == "punjab");
        assert!(haryana < punjab);
    }

    #[test]
    fn test_names_normalized() {
        let gazetteer =
            Gazetteer::from_yaml("states: [' Tamil Nadu ', KERALA]\ncities: [Chennai]").unwrap();
        assert_eq!(gazetteer.states(), &["tamil nadu", "kerala"]);
        assert_eq!(gazetteer.cities(), &["chennai"]);
    }

    #[test]
    fn test_empty_states_rejected() {
        assert!(Gazetteer::from_yaml("states: []").is_err());
        assert!(Gazetteer::new(vec!["goa".into()], vec!["".into()]).is_err());
    }
}
