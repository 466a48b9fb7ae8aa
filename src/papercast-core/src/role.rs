//! Agent role definitions.
//!
//! The three roles act both as language-model personas during dialogue
//! generation and as voice-selection keys during audio synthesis.

use serde::{Deserialize, Serialize};

/// One of the three fixed agent identities in the generated dialogue.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Role {
    /// Summarizes the key points of the paper.
    Summarizer,
    /// Explains the core concepts with examples and analogies.
    Explainer,
    /// Answers anticipated questions about the paper.
    QuestionAnswerer,
}

impl Role {
    /// All roles, in pipeline order.
    pub const ALL: [Role; 3] = [Role::Summarizer, Role::Explainer, Role::QuestionAnswerer];

    /// The speaker name this role uses in transcript lines.
    pub fn speaker_name(&self) -> &'static str {
        match self {
            Role::Summarizer => "Research Summarizer",
            Role::Explainer => "Concept Explainer",
            Role::QuestionAnswerer => "Question Answering Agent",
        }
    }

    /// File-name stem for this role's audio clips.
    pub fn slug(&self) -> &'static str {
        match self {
            Role::Summarizer => "research_summarizer",
            Role::Explainer => "concept_explainer",
            Role::QuestionAnswerer => "question_answering_agent",
        }
    }

    /// Resolve a transcript speaker name to a role.
    ///
    /// Exact match only. Returns `None` for any speaker outside the
    /// three recognized roles; callers decide how to skip those.
    pub fn from_speaker(speaker: &str) -> Option<Role> {
        Role::ALL.into_iter().find(|r| r.speaker_name() == speaker)
    }
}
