//! Model-backed key-point extraction
//!
//! Makes a second model call with an extraction-specific prompt and parses
//! the line-item reply. Any failure or unusable reply falls back to the
//! heuristic extractor with a logged warning, never silently.

use crate::error::Result;
use crate::extract::{dedup_and_cap, Extractor, HeuristicExtractor, MIN_POINT_LEN};
use crate::prompts;
use crate::providers::{Message, Provider};
use async_trait::async_trait;
use std::sync::Arc;

/// Extractor that asks the model for key points
pub struct ModelExtractor {
    provider: Arc<dyn Provider>,
    fallback: HeuristicExtractor,
}

impl ModelExtractor {
    /// Creates the extractor with its heuristic fallback
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Extraction` if the fallback patterns fail to
    /// compile
    pub fn new(provider: Arc<dyn Provider>) -> Result<Self> {
        Ok(Self {
            provider,
            fallback: HeuristicExtractor::new()?,
        })
    }
}

#[async_trait]
impl Extractor for ModelExtractor {
    fn name(&self) -> &str {
        "model"
    }

    async fn key_points(&self, content: &str) -> Result<Vec<String>> {
        let request = [Message::user(prompts::extraction_prompt(content))];

        match self.provider.complete(&request).await {
            Ok(reply) => {
                let points = parse_line_items(&reply);
                if points.is_empty() {
                    tracing::warn!(
                        provider = self.provider.name(),
                        "Extraction reply had no usable points, using heuristic"
                    );
                    self.fallback.key_points(content).await
                } else {
                    Ok(points)
                }
            }
            Err(e) => {
                tracing::warn!(
                    provider = self.provider.name(),
                    error = %e,
                    "Extraction call failed, using heuristic"
                );
                self.fallback.key_points(content).await
            }
        }
    }
}

/// Parses a line-item reply, tolerating bullets and numbering the model
/// adds despite instructions
fn parse_line_items(reply: &str) -> Vec<String> {
    let points = reply
        .lines()
        .map(|line| {
            line.trim()
                .trim_start_matches(['-', '*', '+', '#'])
                .trim_start_matches(|c: char| c.is_ascii_digit())
                .trim_start_matches(['.', ')'])
                .trim()
                .to_string()
        })
        .filter(|line| line.len() >= MIN_POINT_LEN)
        .collect();

    dedup_and_cap(points)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::MentoraError;

    struct CannedProvider {
        reply: std::result::Result<String, ()>,
    }

    #[async_trait]
    impl Provider for CannedProvider {
        fn name(&self) -> &str {
            "canned"
        }

        async fn complete(&self, _messages: &[Message]) -> Result<String> {
            match &self.reply {
                Ok(text) => Ok(text.clone()),
                Err(()) => Err(MentoraError::Provider("down".to_string()).into()),
            }
        }
    }

    #[test]
    fn test_parse_line_items_strips_bullets_and_numbers() {
        let reply = "- First extracted point\n2. Second extracted point\n* Third extracted point";
        let points = parse_line_items(reply);
        assert_eq!(
            points,
            vec![
                "First extracted point",
                "Second extracted point",
                "Third extracted point"
            ]
        );
    }

    #[test]
    fn test_parse_line_items_drops_short_lines() {
        let points = parse_line_items("ok\nA sufficiently long point here");
        assert_eq!(points, vec!["A sufficiently long point here"]);
    }

    #[tokio::test]
    async fn test_uses_model_reply_when_parseable() {
        let extractor = ModelExtractor::new(Arc::new(CannedProvider {
            reply: Ok("- Practice retrieval daily\n- Space out your reviews".to_string()),
        }))
        .unwrap();

        let points = extractor.key_points("ignored").await.unwrap();
        assert_eq!(points.len(), 2);
        assert_eq!(points[0], "Practice retrieval daily");
    }

    #[tokio::test]
    async fn test_falls_back_on_provider_error() {
        let extractor = ModelExtractor::new(Arc::new(CannedProvider { reply: Err(()) })).unwrap();

        let points = extractor
            .key_points("- A structural point from the source text")
            .await
            .unwrap();
        assert_eq!(points, vec!["A structural point from the source text"]);
    }

    #[tokio::test]
    async fn test_falls_back_on_empty_reply() {
        let extractor = ModelExtractor::new(Arc::new(CannedProvider {
            reply: Ok("\n\n".to_string()),
        }))
        .unwrap();

        let points = extractor
            .key_points("**bolded key fragment** in otherwise plain text")
            .await
            .unwrap();
        assert_eq!(points, vec!["bolded key fragment"]);
    }
}
