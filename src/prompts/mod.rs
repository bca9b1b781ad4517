//! System prompts for the tutoring conversation
//!
//! This module assembles the system instruction sent with every model call:
//! the tutoring persona, an optional quick-action directive, and a context
//! block built from the persisted conversation memory.

use crate::store::MemoryTurn;
use clap::ValueEnum;

/// Base persona for every tutoring reply
pub const TUTOR_PERSONA: &str = "You are a helpful AI tutor. Provide clear, \
educational responses that help students learn effectively.";

/// A user-selected modifier applied to a single chat turn
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum QuickAction {
    /// Explain the concept in simple terms
    ExplainSimply,
    /// Illustrate the concept with practical examples
    GiveExamples,
    /// Turn the topic into a quiz question
    QuizMe,
}

impl QuickAction {
    /// The directive appended to the persona for this action
    pub fn directive(&self) -> &'static str {
        match self {
            Self::ExplainSimply => {
                " Please explain this concept in simple terms that are easy to understand."
            }
            Self::GiveExamples => {
                " Please provide practical examples to illustrate this concept."
            }
            Self::QuizMe => {
                " Please create a quiz question or practice problem based on this topic."
            }
        }
    }
}

impl std::fmt::Display for QuickAction {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::ExplainSimply => write!(f, "explain-simply"),
            Self::GiveExamples => write!(f, "give-examples"),
            Self::QuizMe => write!(f, "quiz-me"),
        }
    }
}

impl std::str::FromStr for QuickAction {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "explain-simply" => Ok(Self::ExplainSimply),
            "give-examples" => Ok(Self::GiveExamples),
            "quiz-me" => Ok(Self::QuizMe),
            other => Err(format!("Unknown quick action: {}", other)),
        }
    }
}

/// Builds the system prompt for one chat turn
///
/// The persona always leads. A quick-action directive is appended when one
/// was selected, and the conversation-memory turns are folded into a context
/// block so the model keeps continuity beyond the raw history window.
///
/// # Arguments
///
/// * `quick_action` - Optional per-turn modifier
/// * `memory` - Persisted conversation-memory turns, oldest first
///
/// # Returns
///
/// The complete system instruction text
pub fn build_system_prompt(quick_action: Option<QuickAction>, memory: &[MemoryTurn]) -> String {
    let mut prompt = String::from(TUTOR_PERSONA);

    if let Some(action) = quick_action {
        prompt.push_str(action.directive());
    }

    if !memory.is_empty() {
        prompt.push_str("\n\nEarlier conversation context:\n");
        for turn in memory {
            prompt.push_str(&format!("{}: {}\n", turn.role, turn.content));
        }
    }

    prompt
}

/// Builds the prompt for the model-based key-point extraction call
///
/// Asks for plain line-item output so the reply can be split without any
/// structured-output support from the provider.
pub fn extraction_prompt(content: &str) -> String {
    format!(
        "Extract the most important key points from the following tutoring \
response. Return at most 5 points, one per line, with no numbering, bullets, \
or commentary. Each point must be a short standalone statement.\n\n{}",
        content
    )
}
