//! Provider abstraction for generative-language models
//!
//! This module defines the `Provider` trait implemented by concrete model
//! backends, along with the message type exchanged with them and the reply
//! stream contract used for incremental output.

use crate::error::Result;
use async_trait::async_trait;
use futures::Stream;
use serde::{Deserialize, Serialize};
use std::pin::Pin;
use std::sync::Arc;

mod gemini;
pub use gemini::GeminiProvider;

/// Message structure for a model conversation
///
/// Represents one turn sent to the provider: a system instruction, a user
/// message, or a prior assistant reply.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// Role of the message sender (user, assistant, system)
    pub role: String,
    /// Content of the message
    pub content: String,
}

impl Message {
    /// Creates a new user message
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new assistant message
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }

    /// Creates a new system message
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }
}

/// Incremental reply stream
///
/// A finite, single-consumer sequence of *growing prefixes* of the reply
/// text. The last successful item is the complete reply. The stream is not
/// restartable; dropping it discards any late chunks.
pub type ReplyStream = Pin<Box<dyn Stream<Item = Result<String>> + Send>>;

/// Provider trait for generative-language backends
///
/// Concrete providers translate the neutral [`Message`] list into their
/// wire format and return either a complete reply or an incremental
/// [`ReplyStream`].
#[async_trait]
pub trait Provider: Send + Sync {
    /// Short provider name for logging and error messages
    fn name(&self) -> &str;

    /// Completes a conversation and returns the full reply text
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Authentication` for an invalid API key and
    /// `MentoraError::Provider` for other API failures
    async fn complete(&self, messages: &[Message]) -> Result<String>;

    /// Streams a reply as growing prefixes of the final text
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::StreamingNotSupported` unless overridden
    async fn stream(&self, _messages: &[Message]) -> Result<ReplyStream> {
        Err(crate::error::MentoraError::StreamingNotSupported.into())
    }

    /// Whether this provider implements [`Provider::stream`]
    fn supports_streaming(&self) -> bool {
        false
    }
}

/// Create the configured provider with the given API key
///
/// # Errors
///
/// Returns `MentoraError::Config` if the provider cannot be constructed
pub fn create_provider(
    config: &crate::config::ProviderConfig,
    api_key: String,
) -> Result<Arc<dyn Provider>> {
    Ok(Arc::new(GeminiProvider::new(config.clone(), api_key)?))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let msg = Message::user("Hello");
        assert_eq!(msg.role, "user");
        assert_eq!(msg.content, "Hello");

        let msg = Message::assistant("Hi there");
        assert_eq!(msg.role, "assistant");

        let msg = Message::system("Be helpful");
        assert_eq!(msg.role, "system");
    }

    #[test]
    fn test_message_serialization() {
        let msg = Message::user("Test");
        let json = serde_json::to_string(&msg).unwrap();
        assert!(json.contains("\"role\":\"user\""));
        assert!(json.contains("\"content\":\"Test\""));
    }

    #[tokio::test]
    async fn test_default_stream_not_supported() {
        struct NoStream;

        #[async_trait]
        impl Provider for NoStream {
            fn name(&self) -> &str {
                "no-stream"
            }

            async fn complete(&self, _messages: &[Message]) -> Result<String> {
                Ok("reply".to_string())
            }
        }

        let provider = NoStream;
        assert!(!provider.supports_streaming());
        assert!(provider.stream(&[]).await.is_err());
    }

    #[test]
    fn test_create_provider_returns_gemini() {
        let config = crate::config::ProviderConfig::default();
        let provider = create_provider(&config, "key".to_string()).expect("create failed");
        assert_eq!(provider.name(), "gemini");
    }
}
