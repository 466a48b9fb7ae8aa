//! Configuration module for loading TOML config files.

use serde::Deserialize;
use std::fs;
use std::path::Path;

use crate::error::PipelineError;
use crate::role::Role;

/// Root configuration structure.
#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub voices: VoicesConfig,
    #[serde(default)]
    pub tts: TtsConfig,
    #[serde(default)]
    pub prompts: PromptsConfig,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            voices: VoicesConfig::default(),
            tts: TtsConfig::default(),
            prompts: PromptsConfig::default(),
        }
    }
}

/// Voice identifiers for the three dialogue roles.
#[derive(Debug, Clone, Deserialize)]
pub struct VoicesConfig {
    pub summarizer: String,
    pub explainer: String,
    pub question_answerer: String,
}

impl Default for VoicesConfig {
    fn default() -> Self {
        Self {
            summarizer: "Dan Dan".to_string(),
            explainer: "Ava - conversational".to_string(),
            question_answerer: "David - professional".to_string(),
        }
    }
}

impl VoicesConfig {
    /// Voice identifier for a role.
    pub fn voice_for_role(&self, role: Role) -> &str {
        match role {
            Role::Summarizer => &self.summarizer,
            Role::Explainer => &self.explainer,
            Role::QuestionAnswerer => &self.question_answerer,
        }
    }
}

/// Speech-synthesis service settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TtsConfig {
    /// TTS model identifier sent with every synthesis request.
    pub model_id: String,
    /// Base URL of the synthesis API.
    pub api_base: String,
}

impl Default for TtsConfig {
    fn default() -> Self {
        Self {
            model_id: "eleven_multilingual_v2".to_string(),
            api_base: "https://api.elevenlabs.io".to_string(),
        }
    }
}

/// System prompts for the three generation stages.
///
/// Templates use `{paper}` for the extracted paper text (stage 1) and
/// `{input}` for the previous stage's output (stages 2 and 3).
#[derive(Debug, Clone, Deserialize)]
pub struct PromptsConfig {
    pub summarizer: String,
    pub explainer: String,
    pub question_answerer: String,
}

impl Default for PromptsConfig {
    fn default() -> Self {
        Self {
            summarizer: DEFAULT_SUMMARIZER_PROMPT.to_string(),
            explainer: DEFAULT_EXPLAINER_PROMPT.to_string(),
            question_answerer: DEFAULT_QUESTION_ANSWERER_PROMPT.to_string(),
        }
    }
}

impl PromptsConfig {
    /// System prompt template for a role.
    pub fn prompt_for_role(&self, role: Role) -> &str {
        match role {
            Role::Summarizer => &self.summarizer,
            Role::Explainer => &self.explainer,
            Role::QuestionAnswerer => &self.question_answerer,
        }
    }
}

impl Config {
    /// Load configuration from a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, PipelineError> {
        let content = fs::read_to_string(path.as_ref())
            .map_err(|e| PipelineError::ConfigError(format!("Failed to read config: {}", e)))?;

        Self::from_toml(&content)
    }

    /// Load configuration from string content.
    pub fn from_toml(content: &str) -> Result<Self, PipelineError> {
        toml::from_str(content)
            .map_err(|e| PipelineError::ConfigError(format!("Failed to parse config: {}", e)))
    }
}

const DEFAULT_SUMMARIZER_PROMPT: &str = r#"You are the Research Summarizer, an experienced research analyst known for quickly identifying and articulating the core findings and implications of complex research papers.

Provide a concise summary of the key points, insights, and important details from the following research paper. Highlight the main objectives, methodology, findings, and implications.

Write your answer as spoken dialogue lines, one per line, in exactly this form:
Research Summarizer: "one or two sentences"

Do not add headings, markdown, or narration outside the dialogue lines.

Research paper:
{paper}
"#;

const DEFAULT_EXPLAINER_PROMPT: &str = r#"You are the Concept Explainer, an expert educator with a talent for breaking down complex ideas and presenting them in a way that is easy for students to understand. Your explanations are grounded in real-world examples and analogies.

Using the summary below, explain the core concepts from the research paper in a clear and accessible manner. Provide relatable examples and analogies to help the audience understand the ideas.

Write your answer as spoken dialogue lines, one per line, in exactly this form:
Concept Explainer: "one or two sentences"

Do not add headings, markdown, or narration outside the dialogue lines.

Summary:
{input}
"#;

const DEFAULT_QUESTION_ANSWERER_PROMPT: &str = r#"You are the Question Answering Agent, a knowledgeable subject matter expert skilled at communicating complex information in a clear and engaging manner, adept at anticipating and addressing common questions or areas of confusion.

Based on the explanation below, engage in a dialogue that answers questions and provides additional clarification about the research paper. Anticipate common questions or areas of confusion and address them clearly.

Write your answer as spoken dialogue lines, one per line, in exactly this form:
Question Answering Agent: "one or two sentences"

Do not add headings, markdown, or narration outside the dialogue lines.

Explanation:
{input}
"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config_has_three_voices() {
        let config = Config::default();
        assert_eq!(config.voices.voice_for_role(Role::Summarizer), "Dan Dan");
        assert_eq!(
            config.voices.voice_for_role(Role::Explainer),
            "Ava - conversational"
        );
        assert_eq!(
            config.voices.voice_for_role(Role::QuestionAnswerer),
            "David - professional"
        );
    }

    #[test]
    fn test_default_prompts_mention_line_format() {
        let config = Config::default();
        for role in Role::ALL {
            let prompt = config.prompts.prompt_for_role(role);
            assert!(prompt.contains(role.speaker_name()));
        }
    }

    #[test]
    fn test_from_toml_overrides() {
        let config = Config::from_toml(
            r#"
            [voices]
            summarizer = "voice-a"
            explainer = "voice-b"
            question_answerer = "voice-c"

            [tts]
            model_id = "eleven_turbo_v2"
            api_base = "https://tts.example.com"
            "#,
        )
        .unwrap();

        assert_eq!(config.voices.voice_for_role(Role::Summarizer), "voice-a");
        assert_eq!(config.tts.model_id, "eleven_turbo_v2");
        // Unspecified sections fall back to defaults.
        assert!(config.prompts.summarizer.contains("Research Summarizer"));
    }

    #[test]
    fn test_from_toml_rejects_garbage() {
        assert!(Config::from_toml("not [valid toml").is_err());
    }
}
