//! Tutor response service
//!
//! Turns a chat history into a reply stream. Provider availability is
//! decided up front: no API key means no provider handle and a fixed
//! instructional reply. Provider failures never surface as errors to the
//! chat turn; they are logged and replaced with a fixed apology so the
//! conversation always gets a reply.

use crate::config::ChatConfig;
use crate::error::MentoraError;
use crate::prompts::{self, QuickAction};
use crate::providers::{Message, Provider, ReplyStream};
use crate::store::{ChatMessage, MemoryTurn, Role, Store};
use futures::StreamExt;
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

/// Reply shown when no API key is configured
pub const NO_KEY_REPLY: &str = "I can't reach the tutoring model yet because no API key is \
configured. Run `mentora key set <your-key>` and ask me again.";

/// Reply shown when the provider call fails
pub const ERROR_REPLY: &str = "Sorry, I encountered an error. Please try again.";

/// Reply shown when the provider rejects the API key
pub const INVALID_KEY_REPLY: &str = "Sorry, your API key appears to be invalid. Please update \
it with `mentora key set <your-key>` and try again.";

/// Produces tutor replies and maintains the conversation memory
pub struct TutorService {
    store: Arc<Store>,
    provider: Option<Arc<dyn Provider>>,
    chat: ChatConfig,
}

impl TutorService {
    pub fn new(store: Arc<Store>, provider: Option<Arc<dyn Provider>>, chat: ChatConfig) -> Self {
        Self {
            store,
            provider,
            chat,
        }
    }

    /// Whether a provider handle is available for this run
    pub fn has_provider(&self) -> bool {
        self.provider.is_some()
    }

    /// Produces the reply stream for one chat turn
    ///
    /// The returned stream yields growing prefixes of the reply text; the
    /// last item is the complete reply. Every turn yields a reply: missing
    /// credentials and provider failures map to fixed reply texts, logged
    /// but never returned as errors.
    pub async fn respond(
        &self,
        history: &[ChatMessage],
        quick_action: Option<QuickAction>,
    ) -> ReplyStream {
        let memory = self.store.conversation_memory();
        let system = prompts::build_system_prompt(quick_action, &memory);

        let mut messages = vec![Message::system(system)];
        messages.extend(history.iter().map(|m| match m.role {
            Role::User => Message::user(&m.content),
            Role::Assistant => Message::assistant(&m.content),
        }));

        let Some(provider) = &self.provider else {
            tracing::info!("No API key configured, returning instructional reply");
            return self.reveal(NO_KEY_REPLY.to_string());
        };

        if provider.supports_streaming() {
            match provider.stream(&messages).await {
                Ok(stream) => return guard_stream(stream),
                Err(e) => {
                    tracing::error!(provider = provider.name(), error = %e, "Stream request failed");
                    return self.reveal(apology_for(&e).to_string());
                }
            }
        }

        match provider.complete(&messages).await {
            Ok(reply) => self.reveal(reply),
            Err(e) => {
                tracing::error!(provider = provider.name(), error = %e, "Completion failed");
                self.reveal(apology_for(&e).to_string())
            }
        }
    }

    /// Appends one exchange to the bounded conversation memory
    pub fn remember_exchange(&self, user_content: &str, assistant_content: &str) {
        let mut memory = self.store.conversation_memory();
        memory.push(MemoryTurn::new("user", user_content));
        memory.push(MemoryTurn::new("assistant", assistant_content));
        self.store
            .update_conversation_memory(&memory, self.chat.memory_window);
    }

    /// Streams fixed or non-streamed text as a word-by-word reveal
    ///
    /// Splits on whitespace boundaries so concatenation reconstructs the
    /// text exactly; the last prefix is the complete reply.
    fn reveal(&self, text: String) -> ReplyStream {
        let delay = Duration::from_millis(self.chat.reveal_delay_ms);
        let (tx, rx) = mpsc::channel(16);

        tokio::spawn(async move {
            let mut shown = String::with_capacity(text.len());
            for piece in text.split_inclusive(char::is_whitespace) {
                shown.push_str(piece);
                if tx.send(Ok(shown.clone())).await.is_err() {
                    return;
                }
                if !delay.is_zero() {
                    tokio::time::sleep(delay).await;
                }
            }
        });

        Box::pin(ReceiverStream::new(rx))
    }
}

/// Wraps a provider stream so mid-stream failures end with an apology item
/// instead of an error
fn guard_stream(mut inner: ReplyStream) -> ReplyStream {
    let (tx, rx) = mpsc::channel(16);

    tokio::spawn(async move {
        while let Some(item) = inner.next().await {
            match item {
                Ok(prefix) => {
                    if tx.send(Ok(prefix)).await.is_err() {
                        return;
                    }
                }
                Err(e) => {
                    tracing::error!(error = %e, "Model stream failed mid-reply");
                    let _ = tx.send(Ok(apology_for(&e).to_string())).await;
                    return;
                }
            }
        }
    });

    Box::pin(ReceiverStream::new(rx))
}

fn apology_for(e: &anyhow::Error) -> &'static str {
    match e.downcast_ref::<MentoraError>() {
        Some(MentoraError::Authentication(_)) => INVALID_KEY_REPLY,
        _ => ERROR_REPLY,
    }
}

/// Whether a reply is one of the fixed degraded-turn texts
///
/// Degraded replies carry no study content and must not feed the
/// key-point extractor.
pub(crate) fn is_fixed_reply(reply: &str) -> bool {
    reply == NO_KEY_REPLY || reply == ERROR_REPLY || reply == INVALID_KEY_REPLY
}
