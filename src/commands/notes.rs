//! Note management commands

use crate::cli::NoteCommand;
use crate::config::Config;
use crate::error::Result;
use crate::store::{Note, NoteSource};
use crate::tutor::NotesManager;
use colored::Colorize;
use prettytable::{format, row, Table};

/// Handle a `notes` subcommand
///
/// # Errors
///
/// Returns an error if the store cannot be opened
pub fn run(config: &Config, command: NoteCommand) -> Result<()> {
    let store = super::open_store(config)?;
    let notes = NotesManager::new(store);

    match command {
        NoteCommand::List { topic } => {
            let mut list = notes.list();
            if let Some(topic) = &topic {
                list.retain(|n| n.topic.eq_ignore_ascii_case(topic));
            }

            if list.is_empty() {
                println!("No notes yet.");
                return Ok(());
            }
            print_notes_table(&list);
        }
        NoteCommand::Add { content, topic } => {
            let note = notes.add_manual(&content, topic.as_deref());
            println!(
                "{}",
                format!("Added note {} under topic '{}'.", note.id, note.topic).green()
            );
        }
        NoteCommand::Edit { id, content, topic } => {
            if content.is_none() && topic.is_none() {
                println!("{}", "Nothing to change; pass --content and/or --topic.".yellow());
                return Ok(());
            }
            notes.update(&id, content.as_deref(), topic.as_deref());
            println!("{}", format!("Updated note {}.", id).green());
        }
        NoteCommand::Delete { id } => {
            notes.delete(&id);
            println!("{}", format!("Deleted note {}.", id).green());
        }
        NoteCommand::Topics => {
            let groups = notes.topic_groups();
            if groups.is_empty() {
                println!("No notes yet.");
                return Ok(());
            }

            for (topic, notes) in groups {
                println!("{} ({})", topic.bold(), notes.len());
                for note in notes {
                    println!("  - {}", summarize(&note.content, 70));
                }
                println!();
            }
        }
    }

    Ok(())
}

fn print_notes_table(notes: &[Note]) {
    let mut table = Table::new();
    table.set_format(*format::consts::FORMAT_BOX_CHARS);
    table.set_titles(row!["Id", "Topic", "Source", "Created", "Content"]);

    for note in notes {
        let source = match note.source {
            NoteSource::Auto => "auto",
            NoteSource::Manual => "manual",
        };
        table.add_row(row![
            note.id,
            note.topic,
            source,
            note.timestamp.format("%Y-%m-%d %H:%M"),
            summarize(&note.content, 50),
        ]);
    }

    table.printstd();
}

/// Truncates content to one display line
fn summarize(content: &str, max: usize) -> String {
    let line = content.lines().next().unwrap_or_default();
    if line.chars().count() <= max {
        line.to_string()
    } else {
        let cut: String = line.chars().take(max).collect();
        format!("{}...", cut)
    }
}
