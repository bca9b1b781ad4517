//! Deterministic key-point extraction
//!
//! Two-stage heuristic: a structural pass over markdown (headers, list
//! items, bold spans, blockquotes, fenced code blocks), then a keyword pass
//! over plain sentences when the reply carries no structure.

use crate::error::{MentoraError, Result};
use crate::extract::{dedup_and_cap, Extractor, MIN_POINT_LEN};
use async_trait::async_trait;
use regex::Regex;

const KEYWORD_INDICATORS: &[&str] = &["key", "important", "remember", "concept", "note that"];

const LONG_SENTENCE_LEN: usize = 50;

/// Markdown-structure and keyword-sentence extractor
pub struct HeuristicExtractor {
    header: Regex,
    list_item: Regex,
    blockquote: Regex,
    bold: Regex,
}

impl HeuristicExtractor {
    /// Compiles the structural patterns
    ///
    /// # Errors
    ///
    /// Returns `MentoraError::Extraction` if a pattern fails to compile
    pub fn new() -> Result<Self> {
        Ok(Self {
            header: compile(r"^#{1,6}\s+(.+)$")?,
            list_item: compile(r"^\s*(?:[-*+]|\d+[.)])\s+(.+)$")?,
            blockquote: compile(r"^>\s*(.+)$")?,
            bold: compile(r"\*\*([^*]+)\*\*")?,
        })
    }

    fn structural_points(&self, content: &str) -> Vec<String> {
        let mut points = Vec::new();
        let mut in_fence = false;
        let mut fence_lines: Vec<&str> = Vec::new();

        for line in content.lines() {
            if line.trim_start().starts_with("```") {
                if in_fence {
                    let block = fence_lines.join("\n");
                    if !block.trim().is_empty() {
                        points.push(block.trim().to_string());
                    }
                    fence_lines.clear();
                }
                in_fence = !in_fence;
                continue;
            }

            if in_fence {
                fence_lines.push(line);
                continue;
            }

            for pattern in [&self.header, &self.list_item, &self.blockquote] {
                if let Some(captures) = pattern.captures(line) {
                    points.push(clean_fragment(&captures[1]));
                }
            }

            for captures in self.bold.captures_iter(line) {
                points.push(clean_fragment(&captures[1]));
            }
        }

        points
    }

    fn keyword_points(content: &str) -> Vec<String> {
        content
            .split(['.', '!', '?'])
            .map(str::trim)
            .filter(|sentence| {
                let lower = sentence.to_lowercase();
                KEYWORD_INDICATORS.iter().any(|kw| lower.contains(kw))
                    || sentence.len() > LONG_SENTENCE_LEN
            })
            .map(String::from)
            .collect()
    }
}

#[async_trait]
impl Extractor for HeuristicExtractor {
    fn name(&self) -> &str {
        "heuristic"
    }

    async fn key_points(&self, content: &str) -> Result<Vec<String>> {
        let mut points = self.structural_points(content);
        if points.is_empty() {
            points = Self::keyword_points(content);
        }

        points.retain(|p| p.len() >= MIN_POINT_LEN);
        Ok(dedup_and_cap(points))
    }
}

fn compile(pattern: &str) -> Result<Regex> {
    Regex::new(pattern)
        .map_err(|e| MentoraError::Extraction(format!("Invalid pattern {}: {}", pattern, e)).into())
}

/// Strips residual emphasis markers from a captured fragment
fn clean_fragment(fragment: &str) -> String {
    fragment
        .trim()
        .trim_matches(|c| c == '*' || c == '_' || c == '`')
        .trim()
        .to_string()
}
