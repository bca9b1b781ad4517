//! Mentora - AI study tutor library
//!
//! This library provides the core functionality for the Mentora study
//! tutor: local persistence, the tutoring response pipeline, note capture,
//! and study analytics.
//!
//! # Architecture
//!
//! The library is organized into the following modules:
//!
//! - `store`: Embedded record store for messages, notes, sessions, and analytics
//! - `providers`: Generative-model provider abstraction and the Gemini client
//! - `tutor`: Chat-turn orchestration, sessions, notes, and analytics reports
//! - `extract`: Key-point and topic extraction strategies
//! - `prompts`: System-prompt assembly and quick actions
//! - `config`: Configuration management and validation
//! - `error`: Error types and result aliases
//! - `cli`: Command-line interface definition
//!
//! # Example
//!
//! ```no_run
//! use mentora::config::Config;
//! use mentora::store::Store;
//! use mentora::tutor::Tutor;
//! use std::sync::Arc;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let config = Config::default();
//!     let store = Arc::new(Store::open(&config.storage)?);
//!     let mut tutor = Tutor::new(&config, store)?;
//!
//!     let reply = tutor
//!         .send_message("Explain binary search trees", None, |_| {})
//!         .await?;
//!     if let Some(reply) = reply {
//!         println!("{}", reply.content);
//!     }
//!     Ok(())
//! }
//! ```

pub mod cli;
pub mod commands;
pub mod config;
pub mod error;
pub mod extract;
pub mod prompts;
pub mod providers;
pub mod store;
pub mod tutor;

// Re-export commonly used types
pub use config::Config;
pub use error::{MentoraError, Result};
pub use prompts::QuickAction;
pub use store::Store;
pub use tutor::Tutor;
