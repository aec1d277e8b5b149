//! Centralized constants for the classifier
//!
//! Scoring weights, similarity thresholds and context limits used across the
//! workspace. Threshold values here are the defaults for `ClassifierConfig`;
//! deployments override them through settings.

/// Signal weights used when scoring a pattern
pub mod weights {
    /// Weight of a matched keyword
    pub const KEYWORD: f32 = 2.0;

    /// Weight of a matched synonym
    pub const SYNONYM: f32 = 1.5;

    /// Weight of a context keyword matching the last location
    pub const CONTEXT: f32 = 1.0;

    /// Priority boost is `1 + priority / PRIORITY_DIVISOR`
    pub const PRIORITY_DIVISOR: f32 = 20.0;

    /// Multiplier applied when a `require_all` pattern misses a keyword
    pub const REQUIRE_ALL_PENALTY: f32 = 0.5;
}

/// Default similarity and acceptance thresholds
pub mod thresholds {
    /// Keyword or synonym vs. the whole input
    pub const KEYWORD_SIMILARITY: f32 = 0.8;

    /// Context keyword vs. the last recognized location
    pub const CONTEXT_SIMILARITY: f32 = 0.9;

    /// Input token vs. a state name (must be exceeded, not met)
    pub const LOCATION_SIMILARITY: f32 = 0.8;

    /// Best score must exceed this to be reported as a real intent
    pub const ACCEPTANCE_FLOOR: f32 = 0.3;

    /// Below this confidence the session asks for clarification
    pub const CLARIFICATION: f32 = 0.5;

    /// Default per-pattern confidence floor
    pub const PATTERN_MIN_CONFIDENCE: f32 = 0.3;
}

/// Conversation context limits
pub mod context {
    /// Raw inputs kept per session
    pub const HISTORY_CAPACITY: usize = 10;

    pub const CLARIFICATION_PROMPT: &str = "I'm not sure I understood. Could you mention a \
        state or district, or tell me which groundwater topic you are interested in?";
}

/// Text handling limits
pub mod text {
    /// Longest token fed to the edit-distance engine, in characters
    pub const MAX_TOKEN_CHARS: usize = 64;

    /// Runner-up intents reported alongside the winner
    pub const MAX_ALTERNATIVES: usize = 3;
}

pub mod locale {
    pub const DEFAULT: &str = "en";
}

/// Session manager defaults
pub mod sessions {
    pub const MAX_SESSIONS: usize = 1000;

    /// Idle time before a session expires
    pub const TIMEOUT_SECS: u64 = 3600;

    pub const CLEANUP_INTERVAL_SECS: u64 = 300;
}
