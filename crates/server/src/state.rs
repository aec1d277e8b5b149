//! Application State
//!
//! Shared state across all handlers.

use parking_lot::RwLock;
use std::sync::Arc;

use ingres_agent::ClassificationFacade;
use ingres_config::{load_settings, Gazetteer, SharedPatternRegistry, Settings};

use crate::session::SessionManager;
use crate::ServerError;

/// Application state
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RwLock<Settings>>,
    /// Same handle the facade classifies with; reloads go through here
    pub registry: SharedPatternRegistry,
    pub gazetteer: Arc<Gazetteer>,
    pub facade: Arc<ClassificationFacade>,
    pub sessions: Arc<SessionManager>,
    /// Environment name for config reload
    env: Option<String>,
}

impl AppState {
    /// Build state from loaded settings
    ///
    /// Fails when the pattern table or gazetteer cannot be loaded.
    pub fn new(config: Settings) -> Result<Self, ServerError> {
        Self::with_env(config, None)
    }

    pub fn with_env(config: Settings, env: Option<String>) -> Result<Self, ServerError> {
        let classifier = config.classifier.clone();
        classifier.validate()?;

        let registry = SharedPatternRegistry::from(classifier.load_registry()?);
        let gazetteer = Arc::new(classifier.load_gazetteer()?);
        let facade = ClassificationFacade::new(registry.clone(), Arc::clone(&gazetteer), classifier);
        let sessions = SessionManager::from_config(&config.server);

        Ok(Self {
            config: Arc::new(RwLock::new(config)),
            registry,
            gazetteer,
            facade: Arc::new(facade),
            sessions: Arc::new(sessions),
            env,
        })
    }

    /// Re-read the pattern file named by `classifier.patterns_path`
    ///
    /// A file that fails to parse or validate leaves the current table in
    /// place.
    pub fn reload_patterns(&self) -> Result<usize, ServerError> {
        let path = {
            let config = self.config.read();
            config.classifier.patterns_path.clone()
        };

        let path = path.ok_or_else(|| {
            ServerError::InvalidRequest(
                "classifier.patterns_path is not set; the built-in table cannot be reloaded"
                    .to_string(),
            )
        })?;

        match self.registry.reload_from(&path) {
            Ok(count) => Ok(count),
            Err(e) => {
                tracing::warn!(path = %path, error = %e, "Rejected pattern reload");
                Err(e.into())
            }
        }
    }

    /// Reload settings from disk
    ///
    /// Server and classifier thresholds apply at startup; this refreshes the
    /// stored copy, including the pattern path used by `reload_patterns`.
    pub fn reload_config(&self) -> Result<(), ServerError> {
        let new_config = load_settings(self.env.as_deref())?;
        *self.config.write() = new_config;
        tracing::info!("Configuration reloaded");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_shares_registry_with_facade() {
        let state = AppState::new(Settings::default()).unwrap();
        assert_eq!(
            state.registry.snapshot().len(),
            state.facade.registry().snapshot().len()
        );
        assert_eq!(state.gazetteer.states().len(), 31);
    }

    #[test]
    fn test_reload_without_path_is_rejected() {
        let state = AppState::new(Settings::default()).unwrap();
        assert!(matches!(
            state.reload_patterns(),
            Err(ServerError::InvalidRequest(_))
        ));
    }

    #[test]
    fn test_reload_from_configured_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("patterns.yaml");
        std::fs::write(
            &path,
            "version: 1\npatterns:\n  - intent: HELP\n    keywords: [help]\n    examples: [help]\n",
        )
        .unwrap();

        let mut settings = Settings::default();
        settings.classifier.patterns_path = Some(path.to_string_lossy().to_string());
        let state = AppState::new(settings).unwrap();
        assert_eq!(state.registry.snapshot().len(), 1);

        std::fs::write(
            &path,
            "version: 2\npatterns:\n  - intent: HELP\n    keywords: [help]\n    examples: [help]\n  - intent: GOODBYE\n    keywords: [bye]\n    examples: [bye]\n",
        )
        .unwrap();
        assert_eq!(state.reload_patterns().unwrap(), 2);
        assert_eq!(state.facade.registry().snapshot().version(), 2);

        std::fs::write(&path, "version: 3\npatterns: []\n").unwrap();
        assert!(state.reload_patterns().is_err());
        assert_eq!(state.registry.snapshot().version(), 2);
    }
}
