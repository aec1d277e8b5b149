//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};

use crate::constants::sessions;
use crate::{ClassifierConfig, ConfigError};

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,

    /// Classifier thresholds and data sources
    #[serde(default)]
    pub classifier: ClassifierConfig,
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_server()?;
        self.classifier.validate()?;
        Ok(())
    }

    fn validate_server(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.port".to_string(),
                message: "Port must be non-zero".to_string(),
            });
        }

        if self.server.max_sessions == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.max_sessions".to_string(),
                message: "At least one session must be allowed".to_string(),
            });
        }

        if self.server.cleanup_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "server.cleanup_interval_secs".to_string(),
                message: "Cleanup interval must be non-zero".to_string(),
            });
        }

        if self.server.auth.enabled
            && self.server.auth.api_key.as_deref().map_or(true, str::is_empty)
        {
            return Err(ConfigError::InvalidValue {
                field: "server.auth.api_key".to_string(),
                message: "An API key is required when auth is enabled".to_string(),
            });
        }

        if self.environment.is_production() && !self.server.auth.enabled {
            return Err(ConfigError::InvalidValue {
                field: "server.auth.enabled".to_string(),
                message: "Admin routes must be authenticated in production".to_string(),
            });
        }

        if self.environment.is_production() && !self.server.cors_enabled {
            return Err(ConfigError::InvalidValue {
                field: "server.cors_enabled".to_string(),
                message: "CORS cannot be disabled in production".to_string(),
            });
        }

        Ok(())
    }
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Maximum concurrent conversations
    #[serde(default = "default_max_sessions")]
    pub max_sessions: usize,

    /// Idle time before a session is discarded
    #[serde(default = "default_session_timeout")]
    pub session_timeout_secs: u64,

    #[serde(default = "default_cleanup_interval")]
    pub cleanup_interval_secs: u64,

    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Guards the `/admin` routes
    #[serde(default)]
    pub auth: AuthConfig,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    8080
}
fn default_max_sessions() -> usize {
    sessions::MAX_SESSIONS
}
fn default_session_timeout() -> u64 {
    sessions::TIMEOUT_SECS
}
fn default_cleanup_interval() -> u64 {
    sessions::CLEANUP_INTERVAL_SECS
}
fn default_true() -> bool {
    true
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            max_sessions: default_max_sessions(),
            session_timeout_secs: default_session_timeout(),
            cleanup_interval_secs: default_cleanup_interval(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            auth: AuthConfig::default(),
        }
    }
}

/// Admin authentication
///
/// When enabled, admin requests must send `Authorization: Bearer <api_key>`
/// or `X-API-Key: <api_key>`. Set the key with `INGRES__SERVER__AUTH__API_KEY`.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct AuthConfig {
    /// Disabled by default for development
    #[serde(default)]
    pub enabled: bool,

    #[serde(default)]
    pub api_key: Option<String>,
}

impl AuthConfig {
    /// The configured key when authentication is on
    pub fn required_key(&self) -> Option<&str> {
        if self.enabled {
            self.api_key.as_deref()
        } else {
            None
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Emit logs as JSON lines
    #[serde(default)]
    pub log_json: bool,

    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

/// Load settings from files and environment
///
/// Priority: env vars > config/{env}.yaml > config/default.yaml > defaults
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Same as `load_settings` with an explicit config directory
pub fn load_settings_from(dir: &str, env: Option<&str>) -> Result<Settings, ConfigError> {
    let mut builder = Config::builder();

    builder = builder.add_source(File::with_name(&format!("{}/default", dir)).required(false));

    if let Some(env_name) = env {
        builder =
            builder.add_source(File::with_name(&format!("{}/{}", dir, env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("INGRES")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 8080);
        assert_eq!(settings.server.max_sessions, 1000);
        assert!(settings.observability.metrics_enabled);
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_settings_validation() {
        let mut settings = Settings::default();
        settings.server.max_sessions = 0;
        assert!(settings.validate().is_err());

        settings.server.max_sessions = 10;
        settings.classifier.acceptance_floor = 2.0;
        assert!(settings.validate().is_err());

        settings.classifier.acceptance_floor = 0.3;
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_production_requires_cors() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        settings.server.auth.enabled = true;
        settings.server.auth.api_key = Some("secret".to_string());
        assert!(settings.validate().is_ok());

        settings.server.cors_enabled = false;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_auth_requires_key() {
        let mut settings = Settings::default();
        assert_eq!(settings.server.auth.required_key(), None);

        settings.server.auth.enabled = true;
        assert!(settings.validate().is_err());
        settings.server.auth.api_key = Some(String::new());
        assert!(settings.validate().is_err());

        settings.server.auth.api_key = Some("secret".to_string());
        assert!(settings.validate().is_ok());
        assert_eq!(settings.server.auth.required_key(), Some("secret"));

        // Production refuses unauthenticated admin routes
        settings.server.auth.enabled = false;
        settings.environment = RuntimeEnvironment::Production;
        assert!(settings.validate().is_err());
    }

    #[test]
    fn test_load_from_directory() {
        let dir = tempfile::tempdir().unwrap();
        let mut default = std::fs::File::create(dir.path().join("default.yaml")).unwrap();
        writeln!(default, "server:\n  port: 9000\nclassifier:\n  acceptance_floor: 0.35").unwrap();
        let mut staging = std::fs::File::create(dir.path().join("staging.yaml")).unwrap();
        writeln!(staging, "environment: staging\nserver:\n  max_sessions: 5").unwrap();

        let path = dir.path().to_string_lossy().to_string();
        let settings = load_settings_from(&path, Some("staging")).unwrap();
        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.server.max_sessions, 5);
        assert_eq!(settings.environment, RuntimeEnvironment::Staging);
        assert_eq!(settings.classifier.acceptance_floor, 0.35);
        assert_eq!(settings.classifier.context_similarity, 0.9);
    }

    #[test]
    fn test_missing_directory_uses_defaults() {
        let settings = load_settings_from("/nonexistent/ingres-config", None).unwrap();
        assert_eq!(settings.server.port, 8080);
    }
}
