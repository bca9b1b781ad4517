//! Chat-turn orchestration
//!
//! [`Tutor`] ties the pieces together: the persisted message thread, the
//! response service, key-point extraction, auto-captured notes, and the
//! study session. A chat turn is a fixed sequence of awaits; there is a
//! single consumer and no locking.

mod service;
mod session;

pub mod analytics;
pub mod notes;

pub use notes::NotesManager;
pub use service::{TutorService, ERROR_REPLY, INVALID_KEY_REPLY, NO_KEY_REPLY};
pub use session::SessionManager;

use crate::config::Config;
use crate::error::Result;
use crate::extract::{self, Extractor};
use crate::prompts::QuickAction;
use crate::providers::{create_provider, Provider};
use crate::store::{ChatMessage, Note, NoteSource, Store, StudySession};
use futures::StreamExt;
use std::sync::Arc;

/// The tutoring conversation surface
pub struct Tutor {
    store: Arc<Store>,
    service: TutorService,
    extractor: Box<dyn Extractor>,
    sessions: SessionManager,
    notes: NotesManager,
    messages: Vec<ChatMessage>,
    history_window: usize,
}

impl Tutor {
    /// Creates a tutor, resolving the provider from the stored API key
    ///
    /// A missing or blank key means the tutor runs without a provider and
    /// answers with the instructional reply.
    ///
    /// # Errors
    ///
    /// Returns an error if the provider or extractor cannot be constructed
    pub fn new(config: &Config, store: Arc<Store>) -> Result<Self> {
        let provider = match store.api_key() {
            Some(key) if !key.trim().is_empty() => {
                Some(create_provider(&config.provider, key)?)
            }
            _ => None,
        };
        Self::with_provider(config, store, provider)
    }

    /// Creates a tutor with an explicit provider handle
    pub fn with_provider(
        config: &Config,
        store: Arc<Store>,
        provider: Option<Arc<dyn Provider>>,
    ) -> Result<Self> {
        let extractor = extract::select_extractor(provider.clone())?;
        let messages = store.messages();

        Ok(Self {
            service: TutorService::new(store.clone(), provider, config.chat.clone()),
            extractor,
            sessions: SessionManager::new(store.clone()),
            notes: NotesManager::new(store.clone()),
            store,
            messages,
            history_window: config.chat.history_window,
        })
    }

    /// The persisted message thread, oldest first
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Whether a provider is available for this run
    pub fn has_provider(&self) -> bool {
        self.service.has_provider()
    }

    /// The active study session, if any
    pub fn current_session(&self) -> Option<&StudySession> {
        self.sessions.current()
    }

    /// Loads or starts the study session
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Storage` if a fresh session cannot be persisted
    pub fn ensure_session(&mut self) -> Result<()> {
        self.sessions.ensure_session()?;
        Ok(())
    }

    /// Runs one chat turn
    ///
    /// Persists the user message, streams the reply (forwarding growing
    /// prefixes to `on_chunk`), extracts key points, auto-saves them as
    /// notes topic-labeled from the user's text, persists the finalized
    /// thread, and records the exchange on the session.
    ///
    /// Blank input is rejected as a no-op and returns `None`; otherwise the
    /// finalized assistant message is returned.
    ///
    /// # Errors
    ///
    /// Returns an error only when the session cannot be started; provider
    /// and extraction failures degrade to fixed replies and skipped notes
    pub async fn send_message<F>(
        &mut self,
        content: &str,
        quick_action: Option<QuickAction>,
        mut on_chunk: F,
    ) -> Result<Option<ChatMessage>>
    where
        F: FnMut(&str),
    {
        let content = content.trim();
        if content.is_empty() {
            return Ok(None);
        }

        self.sessions.ensure_session()?;

        self.messages.push(ChatMessage::user(content));
        self.store.save_messages(&self.messages);

        let start = self.messages.len().saturating_sub(self.history_window);
        let mut stream = self
            .service
            .respond(&self.messages[start..], quick_action)
            .await;

        let mut reply = String::new();
        while let Some(item) = stream.next().await {
            match item {
                Ok(prefix) => {
                    on_chunk(&prefix);
                    reply = prefix;
                }
                Err(e) => {
                    tracing::error!("Reply stream yielded an error: {}", e);
                    reply = ERROR_REPLY.to_string();
                    on_chunk(&reply);
                    break;
                }
            }
        }

        let mut assistant = ChatMessage::assistant(reply.clone());
        let topic = extract::extract_topic(content);

        // Fixed degraded replies are not study content; extracting from
        // them would file the error text as notes.
        if !service::is_fixed_reply(&reply) {
            match self.extractor.key_points(&reply).await {
                Ok(points) if !points.is_empty() => {
                    for point in &points {
                        self.store.add_note(Note::new(
                            point,
                            &topic,
                            NoteSource::Auto,
                            Some(assistant.id.clone()),
                        ));
                    }
                    assistant.extracted_notes = Some(points);
                }
                Ok(_) => {}
                Err(e) => {
                    tracing::warn!(extractor = self.extractor.name(), error = %e, "Extraction failed");
                }
            }
        }

        self.messages.push(assistant.clone());
        self.store.save_messages(&self.messages);

        self.service.remember_exchange(content, &reply);
        self.sessions.record_exchange(&topic);

        Ok(Some(assistant))
    }

    /// Saves the message with the given id as a manual note
    ///
    /// Returns `None` when the id does not exist in the thread.
    pub fn save_message_as_note(&self, message_id: &str) -> Option<Note> {
        let message = self.messages.iter().find(|m| m.id == message_id)?;
        Some(self.notes.save_message_as_note(message))
    }

    /// Ends the session and clears the thread and conversation memory
    ///
    /// A fresh session is started immediately so the next turn is tracked.
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Storage` if the fresh session cannot be
    /// persisted
    pub fn clear_chat(&mut self) -> Result<()> {
        self.sessions.end_session();
        self.messages.clear();
        self.store.save_messages(&self.messages);
        self.store.clear_conversation_memory();
        self.sessions.ensure_session()?;
        Ok(())
    }

    /// Ends the session and starts a new one, keeping the thread
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Storage` if the fresh session cannot be
    /// persisted
    pub fn new_session(&mut self) -> Result<()> {
        self.sessions.end_session();
        self.sessions.ensure_session()?;
        Ok(())
    }
}
