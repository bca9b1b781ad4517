//! Gemini provider implementation for Mentora
//!
//! This module implements the Provider trait against the Google
//! generative-language REST API, supporting both one-shot completion and
//! server-sent-event streaming delivered as growing reply prefixes.

use crate::config::ProviderConfig;
use crate::error::{MentoraError, Result};
use crate::providers::{Message, Provider, ReplyStream};

use async_trait::async_trait;
use futures::StreamExt;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tokio::sync::mpsc;
use tokio_stream::wrappers::ReceiverStream;

const DEFAULT_API_BASE: &str = "https://generativelanguage.googleapis.com";

/// Gemini API provider
///
/// Holds the HTTP client, the model configuration, and the user-supplied
/// API key. The key is only ever sent to the configured API base.
pub struct GeminiProvider {
    client: Client,
    config: ProviderConfig,
    api_key: String,
}

/// Request structure for the generateContent endpoints
#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<RequestContent>,
    #[serde(rename = "systemInstruction", skip_serializing_if = "Option::is_none")]
    system_instruction: Option<SystemInstruction>,
}

#[derive(Debug, Serialize)]
struct RequestContent {
    role: String,
    parts: Vec<Part>,
}

#[derive(Debug, Serialize)]
struct SystemInstruction {
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(default)]
    text: String,
}

/// Response structure shared by generateContent and each SSE event
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    #[serde(default)]
    content: Option<ResponseContent>,
}

#[derive(Debug, Deserialize)]
struct ResponseContent {
    #[serde(default)]
    parts: Vec<Part>,
}

impl GeminiProvider {
    /// Create a new Gemini provider
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Config` if the HTTP client cannot be built
    pub fn new(config: ProviderConfig, api_key: String) -> Result<Self> {
        let client = Client::builder()
            .build()
            .map_err(|e| MentoraError::Config(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            client,
            config,
            api_key,
        })
    }

    fn endpoint(&self, method: &str, extra_query: &str) -> String {
        let base = self
            .config
            .api_base
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE)
            .trim_end_matches('/');
        format!(
            "{}/v1beta/models/{}:{}?key={}{}",
            base, self.config.model, method, self.api_key, extra_query
        )
    }

    fn build_request(messages: &[Message]) -> GenerateRequest {
        let mut system_parts = Vec::new();
        let mut contents = Vec::new();

        for message in messages {
            match message.role.as_str() {
                "system" => system_parts.push(Part {
                    text: message.content.clone(),
                }),
                role => contents.push(RequestContent {
                    // The API names the assistant role "model"
                    role: if role == "assistant" {
                        "model".to_string()
                    } else {
                        "user".to_string()
                    },
                    parts: vec![Part {
                        text: message.content.clone(),
                    }],
                }),
            }
        }

        GenerateRequest {
            contents,
            system_instruction: if system_parts.is_empty() {
                None
            } else {
                Some(SystemInstruction {
                    parts: system_parts,
                })
            },
        }
    }

    async fn error_for_status(response: reqwest::Response) -> anyhow::Error {
        let status = response.status();
        let body = response.text().await.unwrap_or_default();

        let invalid_key = status == reqwest::StatusCode::UNAUTHORIZED
            || status == reqwest::StatusCode::FORBIDDEN
            || (status == reqwest::StatusCode::BAD_REQUEST && body.contains("API key"));

        if invalid_key {
            MentoraError::Authentication(format!("API rejected the key ({}): {}", status, body))
                .into()
        } else {
            MentoraError::Provider(format!("API request failed ({}): {}", status, body)).into()
        }
    }
}

#[async_trait]
impl Provider for GeminiProvider {
    fn name(&self) -> &str {
        "gemini"
    }

    async fn complete(&self, messages: &[Message]) -> Result<String> {
        let request = Self::build_request(messages);
        let url = self.endpoint("generateContent", "");

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let parsed: GenerateResponse = response.json().await?;
        let text = extract_text(&parsed);

        if text.is_empty() {
            return Err(
                MentoraError::Provider("API returned an empty candidate".to_string()).into(),
            );
        }

        Ok(text)
    }

    async fn stream(&self, messages: &[Message]) -> Result<ReplyStream> {
        let request = Self::build_request(messages);
        let url = self.endpoint("streamGenerateContent", "&alt=sse");

        let response = self.client.post(&url).json(&request).send().await?;
        if !response.status().is_success() {
            return Err(Self::error_for_status(response).await);
        }

        let (tx, rx) = mpsc::channel::<Result<String>>(16);

        tokio::spawn(async move {
            let mut body = response.bytes_stream();
            let mut pending = String::new();
            let mut accumulated = String::new();

            while let Some(chunk) = body.next().await {
                let chunk = match chunk {
                    Ok(bytes) => bytes,
                    Err(e) => {
                        let _ = tx
                            .send(Err(MentoraError::Provider(format!(
                                "Stream read failed: {}",
                                e
                            ))
                            .into()))
                            .await;
                        return;
                    }
                };

                pending.push_str(&String::from_utf8_lossy(&chunk));

                while let Some(pos) = pending.find('\n') {
                    let line = pending[..pos].trim_end_matches('\r').to_string();
                    pending.drain(..=pos);

                    if let Some(delta) = parse_sse_line(&line) {
                        if delta.is_empty() {
                            continue;
                        }
                        accumulated.push_str(&delta);
                        // Receiver dropped means the consumer went away;
                        // stop reading rather than buffer forever.
                        if tx.send(Ok(accumulated.clone())).await.is_err() {
                            return;
                        }
                    }
                }
            }

            // A final event may arrive without a trailing newline
            if let Some(delta) = parse_sse_line(pending.trim_end()) {
                if !delta.is_empty() {
                    accumulated.push_str(&delta);
                    let _ = tx.send(Ok(accumulated)).await;
                }
            }
        });

        Ok(Box::pin(ReceiverStream::new(rx)))
    }

    fn supports_streaming(&self) -> bool {
        true
    }
}

/// Joins candidate part texts from a parsed response
fn extract_text(response: &GenerateResponse) -> String {
    response
        .candidates
        .first()
        .and_then(|c| c.content.as_ref())
        .map(|content| {
            content
                .parts
                .iter()
                .map(|p| p.text.as_str())
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

/// Extracts the text delta from one SSE line, if it carries an event
fn parse_sse_line(line: &str) -> Option<String> {
    let payload = line.strip_prefix("data:")?.trim();
    if payload.is_empty() || payload == "[DONE]" {
        return None;
    }

    match serde_json::from_str::<GenerateResponse>(payload) {
        Ok(event) => Some(extract_text(&event)),
        Err(e) => {
            tracing::debug!("Skipping unparseable SSE event: {}", e);
            None
        }
    }
}
