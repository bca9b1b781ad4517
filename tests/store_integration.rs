//! Integration tests for the record store
//!
//! Exercises persistence across process-style reopen: every record written
//! through one handle must be visible through a fresh handle on the same
//! database.

use mentora::store::{
    Analytics, ChatMessage, MemoryTurn, Note, NoteSource, Role, Store, StudySession,
};
use tempfile::tempdir;

#[test]
fn test_records_survive_reopen() {
    let dir = tempdir().expect("tempdir");
    let db_path = dir.path().join("records.db");

    {
        let store = Store::open_at(&db_path).expect("open store");

        store.save_messages(&[
            ChatMessage::user("what is a closure"),
            ChatMessage::assistant("a function capturing its environment"),
        ]);
        store.add_note(Note::new(
            "closures capture their environment",
            "closures",
            NoteSource::Auto,
            None,
        ));
        store.set_api_key("sk-persisted").expect("set key");
        store.update_conversation_memory(
            &[
                MemoryTurn::new("user", "what is a closure"),
                MemoryTurn::new("assistant", "a function capturing its environment"),
            ],
            20,
        );

        let mut analytics = Analytics::default();
        analytics.total_sessions = 2;
        store.save_analytics(&analytics);

        let session = StudySession::start();
        store.set_current_session(&session).expect("set session");
    }

    let store = Store::open_at(&db_path).expect("reopen store");

    let messages = store.messages();
    assert_eq!(messages.len(), 2);
    assert_eq!(messages[0].role, Role::User);
    assert_eq!(messages[1].content, "a function capturing its environment");

    let notes = store.notes();
    assert_eq!(notes.len(), 1);
    assert_eq!(notes[0].topic, "closures");
    assert_eq!(notes[0].source, NoteSource::Auto);

    assert_eq!(store.api_key().as_deref(), Some("sk-persisted"));
    assert_eq!(store.conversation_memory().len(), 2);
    assert_eq!(store.analytics().total_sessions, 2);
    assert!(store.current_session().is_some());
}

#[test]
fn test_fresh_store_returns_defaults() {
    let dir = tempdir().expect("tempdir");
    let store = Store::open_at(dir.path().join("records.db")).expect("open store");

    assert!(store.messages().is_empty());
    assert!(store.notes().is_empty());
    assert!(store.sessions().is_empty());
    assert!(store.conversation_memory().is_empty());
    assert!(store.api_key().is_none());
    assert!(store.current_session().is_none());
    assert_eq!(store.analytics().total_sessions, 0);
}

#[test]
fn test_memory_window_enforced_on_every_write() {
    let dir = tempdir().expect("tempdir");
    let store = Store::open_at(dir.path().join("records.db")).expect("open store");

    let mut turns = Vec::new();
    for i in 0..12 {
        turns.push(MemoryTurn::new("user", format!("q{}", i)));
        turns.push(MemoryTurn::new("assistant", format!("a{}", i)));
        store.update_conversation_memory(&turns, 20);
        assert!(store.conversation_memory().len() <= 20);
    }

    let memory = store.conversation_memory();
    assert_eq!(memory.len(), 20);
    assert_eq!(memory.last().unwrap().content, "a11");
}

#[test]
fn test_clearing_messages_leaves_notes_intact() {
    let dir = tempdir().expect("tempdir");
    let store = Store::open_at(dir.path().join("records.db")).expect("open store");

    store.save_messages(&[ChatMessage::user("hi")]);
    store.add_note(Note::new("keep this", "misc", NoteSource::Manual, None));

    store.save_messages(&[]);

    assert!(store.messages().is_empty());
    assert_eq!(store.notes().len(), 1);
}
