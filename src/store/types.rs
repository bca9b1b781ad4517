//! Record types persisted by the store
//!
//! These are the JSON-serialized records held under fixed logical keys:
//! chat messages, notes, study sessions, cumulative analytics, and the
//! bounded conversation-memory window.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use ulid::Ulid;

/// Role of a chat message sender
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl std::fmt::Display for Role {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::User => write!(f, "user"),
            Self::Assistant => write!(f, "assistant"),
        }
    }
}

/// A single chat message in the full persisted thread
///
/// Immutable once stored, except that the assistant placeholder is filled
/// in while a reply streams and finalized with any extracted notes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    /// Unique message identifier (ULID)
    pub id: String,

    /// Message text
    pub content: String,

    /// Sender role
    pub role: Role,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Key points extracted from an assistant reply, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub extracted_notes: Option<Vec<String>>,
}

impl ChatMessage {
    /// Creates a new user message with a fresh id and timestamp
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(content, Role::User)
    }

    /// Creates a new assistant message with a fresh id and timestamp
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(content, Role::Assistant)
    }

    fn new(content: impl Into<String>, role: Role) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            role,
            timestamp: Utc::now(),
            extracted_notes: None,
        }
    }
}

/// Where a note came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NoteSource {
    /// Created automatically from an assistant reply's key points
    Auto,
    /// Created by the user
    Manual,
}

/// A study note
///
/// Content and topic are editable; notes are deletable individually.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    /// Unique note identifier (ULID)
    pub id: String,

    /// Note text
    pub content: String,

    /// Topic label used for grouping
    pub topic: String,

    /// Creation time
    pub timestamp: DateTime<Utc>,

    /// Origin of the note
    pub source: NoteSource,

    /// Back-reference to the chat message this note came from, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub chat_message_id: Option<String>,
}

impl Note {
    /// Creates a note with a fresh id and timestamp
    pub fn new(
        content: impl Into<String>,
        topic: impl Into<String>,
        source: NoteSource,
        chat_message_id: Option<String>,
    ) -> Self {
        Self {
            id: Ulid::new().to_string(),
            content: content.into(),
            topic: topic.into(),
            timestamp: Utc::now(),
            source,
            chat_message_id,
        }
    }
}

/// One study session
///
/// Exactly one open session exists at a time (the `current_session` slot);
/// closed sessions are appended to the session history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudySession {
    /// Unique session identifier (ULID)
    pub id: String,

    /// When the session was opened
    pub start_time: DateTime<Utc>,

    /// When the session was closed, None while active
    #[serde(skip_serializing_if = "Option::is_none")]
    pub end_time: Option<DateTime<Utc>>,

    /// Messages exchanged during the session (user + assistant)
    pub message_count: u32,

    /// Deduplicated topic labels touched during the session
    pub topics: Vec<String>,
}

impl StudySession {
    /// Starts a new session
    pub fn start() -> Self {
        Self {
            id: Ulid::new().to_string(),
            start_time: Utc::now(),
            end_time: None,
            message_count: 0,
            topics: Vec::new(),
        }
    }
}

/// Cumulative study analytics
///
/// A single record recomputed incrementally on every session close.
/// `daily_activity` and `topic_frequency` are append-only counters.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Analytics {
    /// Total closed sessions
    pub total_sessions: u64,

    /// Total messages across closed sessions
    pub total_messages: u64,

    /// Consecutive study days ending today
    pub streak_days: u32,

    /// Time of the most recent session close
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_study_date: Option<DateTime<Utc>>,

    /// Sessions per topic label
    #[serde(default)]
    pub topic_frequency: HashMap<String, u32>,

    /// Sessions per calendar day, keyed by `YYYY-MM-DD`
    #[serde(default)]
    pub daily_activity: HashMap<String, u32>,
}

/// One turn in the bounded conversation-memory window
///
/// Persisted independently of the full message history and used only to
/// seed future prompts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryTurn {
    /// "user" or "assistant"
    pub role: String,
    /// Turn text
    pub content: String,
}

impl MemoryTurn {
    /// Creates a memory turn
    pub fn new(role: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: role.into(),
            content: content.into(),
        }
    }
}

/// Formats a date as the `YYYY-MM-DD` key used by `daily_activity`
pub fn date_key(date: &DateTime<Utc>) -> String {
    date.format("%Y-%m-%d").to_string()
}
