//! Interactive tutoring chat
//!
//! Runs a readline loop over the tutor: regular input becomes a chat turn
//! with the reply streamed to the terminal; slash commands manage the
//! session and notes.

use crate::config::Config;
use crate::error::Result;
use crate::prompts::QuickAction;
use crate::store::Role;
use crate::tutor::Tutor;
use colored::Colorize;
use rustyline::error::ReadlineError;
use rustyline::DefaultEditor;
use std::io::Write;

/// Slash commands recognized inside the chat loop
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChatCommand {
    /// Show the command list
    Help,
    /// End the session and start a new one, keeping the thread
    NewSession,
    /// End the session and clear the thread and memory
    ClearChat,
    /// Save the last assistant reply as a note
    SaveNote,
    /// Leave the chat loop
    Quit,
    /// Not a command: send as a chat turn
    None,
}

/// Parses a line as a slash command, case-insensitive
pub fn parse_chat_command(input: &str) -> ChatCommand {
    if !input.starts_with('/') {
        return ChatCommand::None;
    }

    match input.to_lowercase().as_str() {
        "/help" => ChatCommand::Help,
        "/new" => ChatCommand::NewSession,
        "/clear" => ChatCommand::ClearChat,
        "/note" => ChatCommand::SaveNote,
        "/quit" | "/exit" => ChatCommand::Quit,
        _ => {
            println!(
                "{}",
                format!("Unknown command: {}. Type /help for commands.", input).yellow()
            );
            ChatCommand::Help
        }
    }
}

/// Start the interactive chat loop
///
/// # Arguments
///
/// * `config` - Global configuration (consumed)
/// * `action` - Optional quick action applied to every turn
///
/// # Errors
///
/// Returns an error if the store, tutor, or readline editor cannot be set up
pub async fn run_chat(config: Config, action: Option<QuickAction>) -> Result<()> {
    let store = super::open_store(&config)?;
    let mut tutor = Tutor::new(&config, store)?;
    tutor.ensure_session()?;

    print_welcome(&tutor, action);

    let mut rl = DefaultEditor::new()?;

    loop {
        match rl.readline(&"you> ".cyan().bold().to_string()) {
            Ok(line) => {
                let trimmed = line.trim();
                if trimmed.is_empty() {
                    continue;
                }

                rl.add_history_entry(trimmed)?;

                match parse_chat_command(trimmed) {
                    ChatCommand::Help => {
                        print_help();
                        continue;
                    }
                    ChatCommand::NewSession => {
                        tutor.new_session()?;
                        println!("{}", "Started a new study session.".green());
                        continue;
                    }
                    ChatCommand::ClearChat => {
                        tutor.clear_chat()?;
                        println!("{}", "Chat cleared and session closed.".green());
                        continue;
                    }
                    ChatCommand::SaveNote => {
                        save_last_reply(&tutor);
                        continue;
                    }
                    ChatCommand::Quit => break,
                    ChatCommand::None => {}
                }

                print!("{} ", "tutor>".magenta().bold());
                let _ = std::io::stdout().flush();
                let mut printed = String::new();
                let result = tutor
                    .send_message(trimmed, action, |prefix| {
                        match unprinted_tail(&printed, prefix) {
                            Some(tail) => print!("{}", tail),
                            None => {
                                // The reply was replaced mid-stream
                                println!();
                                print!("{}", prefix);
                            }
                        }
                        printed = prefix.to_string();
                        let _ = std::io::stdout().flush();
                    })
                    .await?;
                println!();

                if let Some(assistant) = result {
                    if let Some(points) = &assistant.extracted_notes {
                        println!(
                            "{}",
                            format!("Saved {} key point(s) to your notes.", points.len()).dimmed()
                        );
                    }
                }
                println!();
            }
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => break,
            Err(e) => return Err(e.into()),
        }
    }

    println!("{}", "Good luck with your studies!".green());
    Ok(())
}

/// The not-yet-printed tail of a streamed prefix
///
/// Returns `Some` while each prefix extends what is already on screen.
/// `None` means the reply was replaced mid-stream (for example by a fixed
/// apology) and must be reprinted whole rather than sliced by length.
fn unprinted_tail<'a>(printed: &str, prefix: &'a str) -> Option<&'a str> {
    prefix.strip_prefix(printed)
}

fn save_last_reply(tutor: &Tutor) {
    let last_reply = tutor
        .messages()
        .iter()
        .rev()
        .find(|m| m.role == Role::Assistant)
        .map(|m| m.id.clone());

    match last_reply.and_then(|id| tutor.save_message_as_note(&id)) {
        Some(note) => println!(
            "{}",
            format!("Saved note under topic '{}'.", note.topic).green()
        ),
        None => println!("{}", "No assistant reply to save yet.".yellow()),
    }
}

fn print_welcome(tutor: &Tutor, action: Option<QuickAction>) {
    println!("{}", "Mentora - your AI study tutor".bold());
    if let Some(action) = action {
        println!("Quick action applied to every turn: {}", action);
    }
    if !tutor.has_provider() {
        println!(
            "{}",
            "No API key configured; run `mentora key set <key>` to enable the model.".yellow()
        );
    }
    if !tutor.messages().is_empty() {
        println!("Loaded {} earlier message(s).", tutor.messages().len());
    }
    println!("Type /help for commands.\n");
}

fn print_help() {
    println!("Available commands:");
    println!("  /help   Show this help");
    println!("  /new    Start a new study session (keeps the chat)");
    println!("  /clear  Clear the chat and close the session");
    println!("  /note   Save the last reply as a note");
    println!("  /quit   Leave the chat");
    println!();
}
