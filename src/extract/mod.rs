//! Key-point and topic extraction
//!
//! Two extraction strategies implement the [`Extractor`] trait: a
//! deterministic heuristic over markdown structure and keywords, and a
//! model-backed extractor that falls back to the heuristic on failure. The
//! strategy is selected by provider availability, never by catching errors
//! mid-flight.

mod heuristic;
mod model;

pub use heuristic::HeuristicExtractor;
pub use model::ModelExtractor;

use crate::error::Result;
use crate::providers::Provider;
use async_trait::async_trait;
use std::sync::Arc;

/// Maximum key points returned by any extractor
pub const MAX_KEY_POINTS: usize = 5;

/// Minimum length of a usable key point
pub const MIN_POINT_LEN: usize = 10;

const STOP_WORDS: &[&str] = &[
    "the", "is", "at", "which", "on", "a", "an", "and", "or", "but",
];

/// Extracts key points from an assistant reply
#[async_trait]
pub trait Extractor: Send + Sync {
    /// Short strategy name for logging
    fn name(&self) -> &str;

    /// Extracts at most [`MAX_KEY_POINTS`] deduplicated key points
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Extraction` if the strategy cannot run at all
    async fn key_points(&self, content: &str) -> Result<Vec<String>>;
}

/// Selects the extraction strategy for the current provider availability
///
/// A provider handle means the model-backed extractor (which itself falls
/// back to the heuristic on failure); no provider means the heuristic alone.
///
/// # Errors
///
/// Returns `MentoraError::Extraction` if the heuristic patterns fail to
/// compile
pub fn select_extractor(provider: Option<Arc<dyn Provider>>) -> Result<Box<dyn Extractor>> {
    match provider {
        Some(provider) => Ok(Box::new(ModelExtractor::new(provider)?)),
        None => Ok(Box::new(HeuristicExtractor::new()?)),
    }
}

/// Derives a short topic label from message text
///
/// Pure function: lowercases, drops stop words and short tokens, ranks the
/// remaining tokens by in-message frequency (ties keep first-seen order),
/// and joins the top three with spaces. Text with no qualifying tokens maps
/// to `"general discussion"`.
///
/// # Examples
///
/// ```
/// use mentora::extract::extract_topic;
///
/// let topic = extract_topic("The mitochondria is the powerhouse of the cell");
/// assert_eq!(topic, "mitochondria powerhouse cell");
/// ```
pub fn extract_topic(content: &str) -> String {
    let mut order: Vec<String> = Vec::new();
    let mut counts: std::collections::HashMap<String, u32> = std::collections::HashMap::new();

    for raw in content.to_lowercase().split_whitespace() {
        let token = raw.trim_matches(|c: char| !c.is_alphanumeric());
        if token.len() <= 3 || STOP_WORDS.contains(&token) {
            continue;
        }
        let entry = counts.entry(token.to_string()).or_insert(0);
        if *entry == 0 {
            order.push(token.to_string());
        }
        *entry += 1;
    }

    if order.is_empty() {
        return "general discussion".to_string();
    }

    // Stable sort keeps first-seen order among equal frequencies
    let mut ranked = order;
    ranked.sort_by(|a, b| counts[b].cmp(&counts[a]));
    ranked.truncate(3);
    ranked.join(" ")
}

/// Deduplicates points preserving first occurrence, capped at the maximum
pub(crate) fn dedup_and_cap(points: Vec<String>) -> Vec<String> {
    let mut seen = std::collections::HashSet::new();
    points
        .into_iter()
        .filter(|p| seen.insert(p.clone()))
        .take(MAX_KEY_POINTS)
        .collect()
}
