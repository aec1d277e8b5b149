//! Session Management
//!
//! Each session owns one conversation context behind its own lock. The
//! manager keeps the sessions in memory only; nothing survives a restart.

use chrono::{DateTime, Utc};
use parking_lot::{Mutex, RwLock};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::watch;

use ingres_agent::{ClassificationFacade, ConversationContext, TurnOutcome};
use ingres_config::ServerConfig;
use ingres_core::Intent;

use crate::metrics::{record_active_sessions, record_session_created};
use crate::ServerError;

/// Read-only view of a session for the API
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub session_id: String,
    pub active: bool,
    pub query_count: u64,
    pub last_intent: Option<Intent>,
    pub last_location: Option<String>,
    pub last_state: Option<String>,
    pub last_district: Option<String>,
    pub history: Vec<String>,
    pub awaiting_clarification: bool,
    pub pending_question: Option<String>,
    pub session_start: DateTime<Utc>,
    pub idle_secs: u64,
}

/// One conversation
pub struct Session {
    pub id: String,
    context: Mutex<ConversationContext>,
    pub created_at: Instant,
    last_activity: RwLock<Instant>,
    active: RwLock<bool>,
}

impl Session {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            context: Mutex::new(ConversationContext::new()),
            created_at: Instant::now(),
            last_activity: RwLock::new(Instant::now()),
            active: RwLock::new(true),
        }
    }

    /// Run one turn against this session's context
    ///
    /// Turns on the same session are serialized by the context lock.
    pub fn process_turn(&self, facade: &ClassificationFacade, text: &str) -> TurnOutcome {
        self.touch();
        let mut context = self.context.lock();
        facade.process_turn(text, &mut context)
    }

    pub fn summary(&self) -> SessionSummary {
        let context = self.context.lock();
        SessionSummary {
            session_id: self.id.clone(),
            active: self.is_active(),
            query_count: context.query_count,
            last_intent: context.last_intent,
            last_location: context.last_location.clone(),
            last_state: context.last_state.clone(),
            last_district: context.last_district.clone(),
            history: context.history().map(str::to_string).collect(),
            awaiting_clarification: context.awaiting_clarification,
            pending_question: context.pending_question.clone(),
            session_start: context.session_start,
            idle_secs: self.last_activity.read().elapsed().as_secs(),
        }
    }

    /// Update last activity
    pub fn touch(&self) {
        *self.last_activity.write() = Instant::now();
    }

    pub fn is_expired(&self, timeout: Duration) -> bool {
        self.last_activity.read().elapsed() > timeout
    }

    /// Close the session and drop everything its context holds
    pub fn close(&self) {
        *self.active.write() = false;
        self.context.lock().clear();
    }

    pub fn is_active(&self) -> bool {
        *self.active.read()
    }
}

/// Session manager
pub struct SessionManager {
    sessions: RwLock<HashMap<String, Arc<Session>>>,
    max_sessions: usize,
    session_timeout: Duration,
    cleanup_interval: Duration,
}

impl SessionManager {
    pub fn new(max_sessions: usize) -> Self {
        let defaults = ServerConfig::default();
        Self::with_config(
            max_sessions,
            Duration::from_secs(defaults.session_timeout_secs),
            Duration::from_secs(defaults.cleanup_interval_secs),
        )
    }

    pub fn with_config(
        max_sessions: usize,
        session_timeout: Duration,
        cleanup_interval: Duration,
    ) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_sessions,
            session_timeout,
            cleanup_interval,
        }
    }

    pub fn from_config(config: &ServerConfig) -> Self {
        Self::with_config(
            config.max_sessions,
            Duration::from_secs(config.session_timeout_secs),
            Duration::from_secs(config.cleanup_interval_secs),
        )
    }

    /// Spawn the periodic expiry sweep
    ///
    /// Send `true` on the returned channel to stop it.
    pub fn start_cleanup_task(self: &Arc<Self>) -> watch::Sender<bool> {
        let (shutdown_tx, mut shutdown_rx) = watch::channel(false);
        let manager = Arc::clone(self);
        let interval = manager.cleanup_interval;

        tokio::spawn(async move {
            let mut interval_timer = tokio::time::interval(interval);
            interval_timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = interval_timer.tick() => {
                        let removed = manager.cleanup_expired();
                        if removed > 0 {
                            tracing::info!(
                                removed,
                                remaining = manager.count(),
                                "Session cleanup removed expired sessions"
                            );
                        }
                    }
                    _ = shutdown_rx.changed() => {
                        if *shutdown_rx.borrow() {
                            tracing::info!("Session cleanup task shutting down");
                            break;
                        }
                    }
                }
            }
        });

        shutdown_tx
    }

    /// Create a session with a fresh context
    pub fn create(&self) -> Result<Arc<Session>, ServerError> {
        let mut sessions = self.sessions.write();

        if sessions.len() >= self.max_sessions {
            self.cleanup_expired_internal(&mut sessions);

            if sessions.len() >= self.max_sessions {
                tracing::warn!(max_sessions = self.max_sessions, "Session limit reached");
                return Err(ServerError::SessionLimit(self.max_sessions));
            }
        }

        let id = uuid::Uuid::new_v4().to_string();
        let session = Arc::new(Session::new(&id));
        sessions.insert(id.clone(), Arc::clone(&session));

        record_session_created();
        record_active_sessions(sessions.len());
        tracing::info!(session_id = %id, active = sessions.len(), "Created session");

        Ok(session)
    }

    pub fn get(&self, id: &str) -> Option<Arc<Session>> {
        self.sessions.read().get(id).cloned()
    }

    /// Remove a session, returning whether it existed
    pub fn remove(&self, id: &str) -> bool {
        let mut sessions = self.sessions.write();
        match sessions.remove(id) {
            Some(session) => {
                session.close();
                record_active_sessions(sessions.len());
                tracing::info!(session_id = %id, "Removed session");
                true
            }
            None => false,
        }
    }

    pub fn count(&self) -> usize {
        self.sessions.read().len()
    }

    /// Drop sessions idle for longer than the timeout, returning how many went
    pub fn cleanup_expired(&self) -> usize {
        let mut sessions = self.sessions.write();
        self.cleanup_expired_internal(&mut sessions)
    }

    fn cleanup_expired_internal(&self, sessions: &mut HashMap<String, Arc<Session>>) -> usize {
        let timeout = self.session_timeout;
        let expired: Vec<String> = sessions
            .iter()
            .filter(|(_, s)| s.is_expired(timeout))
            .map(|(id, _)| id.clone())
            .collect();

        for id in &expired {
            if let Some(session) = sessions.remove(id) {
                session.close();
                tracing::info!(session_id = %id, "Expired session");
            }
        }

        if !expired.is_empty() {
            record_active_sessions(sessions.len());
        }
        expired.len()
    }

    pub fn list(&self) -> Vec<String> {
        self.sessions.read().keys().cloned().collect()
    }
}
