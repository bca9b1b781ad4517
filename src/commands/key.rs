//! API key management commands

use crate::cli::KeyCommand;
use crate::config::Config;
use crate::error::{MentoraError, Result};
use colored::Colorize;

/// Handle a `key` subcommand
///
/// # Errors
///
/// Returns an error if the store cannot be opened, the key is blank, or
/// storing the key fails
pub fn run(config: &Config, command: KeyCommand) -> Result<()> {
    let store = super::open_store(config)?;

    match command {
        KeyCommand::Set { key } => {
            let key = key.trim();
            if key.is_empty() {
                return Err(
                    MentoraError::MissingCredentials("API key must not be blank".to_string())
                        .into(),
                );
            }
            store.set_api_key(key)?;
            println!("{}", "API key stored.".green());
        }
        KeyCommand::Show => match store.api_key() {
            Some(key) => println!("API key configured: {}", mask(&key)),
            None => println!("{}", "No API key configured.".yellow()),
        },
        KeyCommand::Clear => {
            store.clear_api_key();
            println!("{}", "API key removed.".green());
        }
    }

    Ok(())
}

/// Masks a key for display, keeping only a short prefix
fn mask(key: &str) -> String {
    let prefix: String = key.chars().take(4).collect();
    format!("{}{}", prefix, "*".repeat(key.chars().count().saturating_sub(4)))
}
