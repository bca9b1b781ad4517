/*!
Command handlers for the CLI

This module provides command handlers invoked by the CLI entrypoint.

- `chat`     — Interactive tutoring chat loop
- `notes`    — Note listing, editing, and topic grouping
- `stats`    — Study analytics dashboard
- `key`      — API key management
- `sessions` — Closed-session history

These handlers are intentionally small and use the library components:
the store, the tutor, and the analytics report functions.
*/

pub mod chat;
pub mod key;
pub mod notes;
pub mod sessions;
pub mod stats;

use crate::config::Config;
use crate::error::Result;
use crate::store::Store;
use std::sync::Arc;

/// Opens the record store for a command handler
pub(crate) fn open_store(config: &Config) -> Result<Arc<Store>> {
    Ok(Arc::new(Store::open(&config.storage)?))
}
