//! Local record store for chat, notes, sessions, and analytics
//!
//! A flat key-value store over an embedded `sled` database: one logical key
//! per record, JSON-serialized values. Record accessors are best-effort by
//! contract: a failed read logs and returns the default value, a failed
//! write logs and drops the value. There is no transactional guarantee
//! across keys; ending a session performs three independent writes.

use crate::config::StorageConfig;
use crate::error::{MentoraError, Result};
use anyhow::Context;
use directories::ProjectDirs;
use serde::de::DeserializeOwned;
use serde::Serialize;
use sled::Db;
use std::path::PathBuf;

pub mod types;
pub use types::{
    date_key, Analytics, ChatMessage, MemoryTurn, Note, NoteSource, Role, StudySession,
};

/// Logical record keys
mod keys {
    pub const MESSAGES: &str = "messages";
    pub const NOTES: &str = "notes";
    pub const SESSIONS: &str = "sessions";
    pub const ANALYTICS: &str = "analytics";
    pub const CURRENT_SESSION: &str = "current_session";
    pub const API_KEY: &str = "api_key";
    pub const CONVERSATION_MEMORY: &str = "conversation_memory";
}

/// Record store backed by an embedded key-value database
pub struct Store {
    db: Db,
}

impl Store {
    /// Open the store in the configured (or platform default) data directory
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Storage` if the data directory cannot be
    /// resolved or the database cannot be opened
    pub fn open(config: &StorageConfig) -> Result<Self> {
        let data_dir = match &config.data_dir {
            Some(dir) => dir.clone(),
            None => default_data_dir()?,
        };

        std::fs::create_dir_all(&data_dir)
            .context("Failed to create data directory")
            .map_err(|e| MentoraError::Storage(e.to_string()))?;

        Self::open_at(data_dir.join("records.db"))
    }

    /// Open the store at an explicit database path
    ///
    /// This is primarily useful for tests where the default application data
    /// directory is not desirable (for example, using a temporary directory).
    pub fn open_at(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)
                .context("Failed to create parent directory for database")
                .map_err(|e| MentoraError::Storage(e.to_string()))?;
        }

        let db = sled::open(&path)
            .map_err(|e| MentoraError::Storage(format!("Failed to open database: {}", e)))?;
        Ok(Self { db })
    }

    fn read_record<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>> {
        match self
            .db
            .get(key.as_bytes())
            .map_err(|e| MentoraError::Storage(format!("Get failed: {}", e)))?
        {
            Some(bytes) => {
                let value = serde_json::from_slice(&bytes)
                    .map_err(|e| MentoraError::Storage(format!("Deserialization failed: {}", e)))?;
                Ok(Some(value))
            }
            None => Ok(None),
        }
    }

    fn write_record<T: Serialize>(&self, key: &str, value: &T) -> Result<()> {
        let bytes = serde_json::to_vec(value)
            .map_err(|e| MentoraError::Storage(format!("Serialization failed: {}", e)))?;

        self.db
            .insert(key.as_bytes(), bytes)
            .map_err(|e| MentoraError::Storage(format!("Insert failed: {}", e)))?;

        self.db
            .flush()
            .map_err(|e| MentoraError::Storage(format!("Flush failed: {}", e)))?;

        Ok(())
    }

    fn remove_record(&self, key: &str) -> Result<()> {
        self.db
            .remove(key.as_bytes())
            .map_err(|e| MentoraError::Storage(format!("Remove failed: {}", e)))?;
        self.db
            .flush()
            .map_err(|e| MentoraError::Storage(format!("Flush failed: {}", e)))?;
        Ok(())
    }

    /// Best-effort read: default value on failure, logged
    fn read_or_default<T: DeserializeOwned + Default>(&self, key: &str) -> T {
        match self.read_record(key) {
            Ok(Some(value)) => value,
            Ok(None) => T::default(),
            Err(e) => {
                tracing::warn!("Failed to read record '{}': {}", key, e);
                T::default()
            }
        }
    }

    /// Best-effort write: logged and dropped on failure
    fn write_or_log<T: Serialize>(&self, key: &str, value: &T) {
        if let Err(e) = self.write_record(key, value) {
            tracing::warn!("Failed to write record '{}': {}", key, e);
        }
    }

    // --- Messages ---

    /// Full chat message thread, oldest first
    pub fn messages(&self) -> Vec<ChatMessage> {
        self.read_or_default(keys::MESSAGES)
    }

    /// Persist the full chat message thread
    pub fn save_messages(&self, messages: &[ChatMessage]) {
        self.write_or_log(keys::MESSAGES, &messages);
    }

    // --- Notes ---

    /// All stored notes
    pub fn notes(&self) -> Vec<Note> {
        self.read_or_default(keys::NOTES)
    }

    /// Persist the full notes list
    pub fn save_notes(&self, notes: &[Note]) {
        self.write_or_log(keys::NOTES, &notes);
    }

    /// Append one note
    pub fn add_note(&self, note: Note) {
        let mut notes = self.notes();
        notes.push(note);
        self.save_notes(&notes);
    }

    /// Update a note's content and/or topic in place
    ///
    /// A missing id is a no-op. Other notes are left untouched.
    pub fn update_note(&self, note_id: &str, content: Option<&str>, topic: Option<&str>) {
        let mut notes = self.notes();
        if let Some(note) = notes.iter_mut().find(|n| n.id == note_id) {
            if let Some(content) = content {
                note.content = content.to_string();
            }
            if let Some(topic) = topic {
                note.topic = topic.to_string();
            }
            self.save_notes(&notes);
        }
    }

    /// Remove exactly the note with the given id
    pub fn delete_note(&self, note_id: &str) {
        let mut notes = self.notes();
        notes.retain(|n| n.id != note_id);
        self.save_notes(&notes);
    }

    // --- Analytics ---

    /// Cumulative analytics record, defaults on first access
    pub fn analytics(&self) -> Analytics {
        self.read_or_default(keys::ANALYTICS)
    }

    /// Persist the cumulative analytics record
    pub fn save_analytics(&self, analytics: &Analytics) {
        self.write_or_log(keys::ANALYTICS, analytics);
    }

    // --- Sessions ---

    /// Closed-session history, oldest first
    pub fn sessions(&self) -> Vec<StudySession> {
        self.read_or_default(keys::SESSIONS)
    }

    /// Append a closed session to the history
    pub fn append_session(&self, session: &StudySession) {
        let mut sessions = self.sessions();
        sessions.push(session.clone());
        self.write_or_log(keys::SESSIONS, &sessions);
    }

    /// The active session slot, if one exists
    pub fn current_session(&self) -> Option<StudySession> {
        match self.read_record(keys::CURRENT_SESSION) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read current session: {}", e);
                None
            }
        }
    }

    /// Write the active session slot
    ///
    /// Unlike the best-effort accessors, starting a session surfaces the
    /// failure so the caller does not proceed with an untracked session.
    pub fn set_current_session(&self, session: &StudySession) -> Result<()> {
        self.write_record(keys::CURRENT_SESSION, session)
    }

    /// Clear the active session slot
    pub fn clear_current_session(&self) {
        if let Err(e) = self.remove_record(keys::CURRENT_SESSION) {
            tracing::warn!("Failed to clear current session: {}", e);
        }
    }

    // --- API key ---

    /// Stored API key, if configured
    pub fn api_key(&self) -> Option<String> {
        match self.read_record(keys::API_KEY) {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!("Failed to read API key: {}", e);
                None
            }
        }
    }

    /// Store the API key
    ///
    /// Failures surface to the caller so a silently dropped key does not
    /// masquerade as configured.
    pub fn set_api_key(&self, api_key: &str) -> Result<()> {
        self.write_record(keys::API_KEY, &api_key.to_string())
    }

    /// Remove the stored API key
    pub fn clear_api_key(&self) {
        if let Err(e) = self.remove_record(keys::API_KEY) {
            tracing::warn!("Failed to clear API key: {}", e);
        }
    }

    // --- Conversation memory ---

    /// The bounded recent-turn window used to seed prompts
    pub fn conversation_memory(&self) -> Vec<MemoryTurn> {
        self.read_or_default(keys::CONVERSATION_MEMORY)
    }

    /// Replace the conversation memory, keeping only the last `window` turns
    pub fn update_conversation_memory(&self, turns: &[MemoryTurn], window: usize) {
        let start = turns.len().saturating_sub(window);
        let recent = &turns[start..];
        self.write_or_log(keys::CONVERSATION_MEMORY, &recent);
    }

    /// Clear the conversation memory
    pub fn clear_conversation_memory(&self) {
        if let Err(e) = self.remove_record(keys::CONVERSATION_MEMORY) {
            tracing::warn!("Failed to clear conversation memory: {}", e);
        }
    }
}

fn default_data_dir() -> Result<PathBuf> {
    let proj_dirs = ProjectDirs::from("app", "mentora", "mentora")
        .ok_or_else(|| MentoraError::Storage("Could not determine data directory".into()))?;
    Ok(proj_dirs.data_dir().to_path_buf())
}
