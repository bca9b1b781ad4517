//! Note management
//!
//! Listing, creating, editing, deleting, and topic-grouping of study notes.
//! Auto notes are created by the chat turn; everything here serves the
//! notes surface.

use crate::extract::extract_topic;
use crate::store::{ChatMessage, Note, NoteSource, Store};
use std::collections::BTreeMap;
use std::sync::Arc;

/// Group label for notes without a topic
pub const UNCATEGORIZED: &str = "Uncategorized";

/// Manages the stored notes list
pub struct NotesManager {
    store: Arc<Store>,
}

impl NotesManager {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    /// All notes, newest first
    pub fn list(&self) -> Vec<Note> {
        let mut notes = self.store.notes();
        notes.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        notes
    }

    /// Creates a manual note
    ///
    /// When no topic is given, one is derived from the note content.
    pub fn add_manual(&self, content: &str, topic: Option<&str>) -> Note {
        let topic = match topic {
            Some(topic) => topic.to_string(),
            None => extract_topic(content),
        };

        let note = Note::new(content, topic, NoteSource::Manual, None);
        self.store.add_note(note.clone());
        note
    }

    /// Saves a chat message as a manual note with a back-reference
    pub fn save_message_as_note(&self, message: &ChatMessage) -> Note {
        let note = Note::new(
            &message.content,
            extract_topic(&message.content),
            NoteSource::Manual,
            Some(message.id.clone()),
        );
        self.store.add_note(note.clone());
        note
    }

    /// Edits a note's content and/or topic; a missing id is a no-op
    pub fn update(&self, note_id: &str, content: Option<&str>, topic: Option<&str>) {
        self.store.update_note(note_id, content, topic);
    }

    /// Deletes exactly the note with the given id
    pub fn delete(&self, note_id: &str) {
        self.store.delete_note(note_id);
    }

    /// Groups notes by topic, newest first within each group
    ///
    /// Notes with a blank topic land under [`UNCATEGORIZED`].
    pub fn topic_groups(&self) -> BTreeMap<String, Vec<Note>> {
        let mut groups: BTreeMap<String, Vec<Note>> = BTreeMap::new();

        for note in self.list() {
            let topic = if note.topic.trim().is_empty() {
                UNCATEGORIZED.to_string()
            } else {
                note.topic.clone()
            };
            groups.entry(topic).or_default().push(note);
        }

        groups
    }
}
