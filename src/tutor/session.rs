//! Study-session lifecycle
//!
//! Owns the explicit nullable current session. At most one session is open
//! at a time; closing a session appends it to the history, clears the slot,
//! and folds the counters into the cumulative analytics. The close performs
//! three independent writes with no cross-key atomicity.

use crate::error::Result;
use crate::store::{Store, StudySession};
use crate::tutor::analytics;
use chrono::Utc;
use std::sync::Arc;

/// Manages the active study session
pub struct SessionManager {
    store: Arc<Store>,
    current: Option<StudySession>,
}

impl SessionManager {
    /// Creates a manager with no session loaded
    pub fn new(store: Arc<Store>) -> Self {
        Self {
            store,
            current: None,
        }
    }

    /// The active session, if one has been loaded or started
    pub fn current(&self) -> Option<&StudySession> {
        self.current.as_ref()
    }

    /// Loads the persisted session slot or starts a new session
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Storage` if a freshly started session cannot
    /// be persisted; proceeding would leave the session untracked
    pub fn ensure_session(&mut self) -> Result<&StudySession> {
        let session = match self.current.take() {
            Some(session) => session,
            None => match self.store.current_session() {
                Some(session) => {
                    tracing::debug!(session_id = %session.id, "Resuming study session");
                    session
                }
                None => {
                    let session = StudySession::start();
                    tracing::info!(session_id = %session.id, "Starting study session");
                    self.store.set_current_session(&session)?;
                    session
                }
            },
        };

        Ok(self.current.insert(session))
    }

    /// Records one user/assistant exchange against the active session
    ///
    /// Adds two to the message count and appends the topic if it is new.
    /// A no-op when no session is active.
    pub fn record_exchange(&mut self, topic: &str) {
        let Some(session) = self.current.as_mut() else {
            return;
        };

        session.message_count += 2;
        if !session.topics.iter().any(|t| t == topic) {
            session.topics.push(topic.to_string());
        }

        if let Err(e) = self.store.set_current_session(session) {
            tracing::warn!("Failed to persist session progress: {}", e);
        }
    }

    /// Closes the active session and folds it into the analytics
    ///
    /// Stamps the end time, appends the session to the history, clears the
    /// slot, and updates the cumulative counters. A no-op when no session
    /// is active (neither loaded nor persisted).
    pub fn end_session(&mut self) {
        let session = self.current.take().or_else(|| self.store.current_session());
        let Some(mut session) = session else {
            return;
        };

        let now = Utc::now();
        session.end_time = Some(now);

        self.store.append_session(&session);
        self.store.clear_current_session();

        let mut stats = self.store.analytics();
        analytics::fold_session(&mut stats, &session, now);
        self.store.save_analytics(&stats);

        tracing::info!(
            session_id = %session.id,
            messages = session.message_count,
            topics = session.topics.len(),
            "Closed study session"
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn create_manager() -> (SessionManager, tempfile::TempDir) {
        let dir = tempdir().expect("tempdir");
        let store = Store::open_at(dir.path().join("records.db")).expect("open store");
        (SessionManager::new(Arc::new(store)), dir)
    }

    #[test]
    fn test_ensure_session_starts_and_persists() {
        let (mut manager, _dir) = create_manager();
        assert!(manager.current().is_none());

        let id = manager.ensure_session().expect("ensure").id.clone();
        assert_eq!(manager.store.current_session().unwrap().id, id);

        // Repeated calls keep the same session
        assert_eq!(manager.ensure_session().unwrap().id, id);
    }

    #[test]
    fn test_ensure_session_resumes_persisted_slot() {
        let (mut manager, dir) = create_manager();
        let id = manager.ensure_session().unwrap().id.clone();
        drop(manager);

        let store = Store::open_at(dir.path().join("records.db")).expect("reopen");
        let mut manager = SessionManager::new(Arc::new(store));
        assert_eq!(manager.ensure_session().unwrap().id, id);
    }

    #[test]
    fn test_record_exchange_counts_and_dedups_topics() {
        let (mut manager, _dir) = create_manager();
        manager.ensure_session().unwrap();

        manager.record_exchange("binary trees");
        manager.record_exchange("binary trees");
        manager.record_exchange("recursion");

        let session = manager.current().unwrap();
        assert_eq!(session.message_count, 6);
        assert_eq!(session.topics, vec!["binary trees", "recursion"]);

        // Progress is persisted to the slot
        let persisted = manager.store.current_session().unwrap();
        assert_eq!(persisted.message_count, 6);
    }

    #[test]
    fn test_record_exchange_without_session_is_noop() {
        let (mut manager, _dir) = create_manager();
        manager.record_exchange("anything");
        assert!(manager.current().is_none());
    }

    #[test]
    fn test_end_session_folds_and_clears() {
        let (mut manager, _dir) = create_manager();
        manager.ensure_session().unwrap();
        manager.record_exchange("algebra");
        manager.record_exchange("algebra");

        manager.end_session();

        assert!(manager.current().is_none());
        assert!(manager.store.current_session().is_none());

        let sessions = manager.store.sessions();
        assert_eq!(sessions.len(), 1);
        assert_eq!(sessions[0].message_count, 4);
        assert!(sessions[0].end_time.is_some());

        let stats = manager.store.analytics();
        assert_eq!(stats.total_sessions, 1);
        assert_eq!(stats.total_messages, 4);
        assert_eq!(stats.topic_frequency.get("algebra"), Some(&1));
        assert_eq!(stats.streak_days, 1);
    }

    #[test]
    fn test_end_session_without_session_is_noop() {
        let (mut manager, _dir) = create_manager();
        manager.end_session();
        assert!(manager.store.sessions().is_empty());
        assert_eq!(manager.store.analytics().total_sessions, 0);
    }

    #[test]
    fn test_end_then_ensure_opens_fresh_session() {
        let (mut manager, _dir) = create_manager();
        let first = manager.ensure_session().unwrap().id.clone();
        manager.end_session();
        let second = manager.ensure_session().unwrap().id.clone();
        assert_ne!(first, second);
    }
}
