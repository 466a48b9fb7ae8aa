//! Dialogue generation.
//!
//! Runs the three-stage language-model pipeline (summarize, explain,
//! answer questions) and assembles the stage outputs into one
//! transcript for downstream parsing.

use async_openai::Client;
use async_openai::config::OpenAIConfig;
use async_openai::types::chat::{
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessage,
    ChatCompletionRequestUserMessage, CreateChatCompletionRequestArgs,
};

use crate::config::PromptsConfig;
use crate::error::PipelineError;
use crate::role::Role;

/// Configuration for the language-model pipeline.
#[derive(Debug, Clone)]
pub struct GeneratorConfig {
    /// OpenAI-compatible API base URL.
    pub api_base: String,
    /// API key for authentication.
    pub api_key: String,
    /// Model name used for all three stages.
    pub model: String,
}

impl GeneratorConfig {
    pub fn new(
        api_base: impl Into<String>,
        api_key: impl Into<String>,
        model: impl Into<String>,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            api_key: api_key.into(),
            model: model.into(),
        }
    }
}

/// Callback for pipeline progress events.
pub type EventCallback = Box<dyn Fn(PipelineEvent) + Send + Sync>;

/// Events emitted while generating the dialogue.
#[derive(Debug, Clone)]
pub enum PipelineEvent {
    /// A generation stage is about to run.
    StageStart { role: Role },
    /// A generation stage finished with this output.
    StageComplete { role: Role, content: String },
}

/// Generates the dialogue transcript from extracted paper text.
pub struct DialogueGenerator {
    config: GeneratorConfig,
    prompts: PromptsConfig,
    callback: Option<EventCallback>,
}

impl DialogueGenerator {
    pub fn new(config: GeneratorConfig, prompts: PromptsConfig) -> Self {
        Self {
            config,
            prompts,
            callback: None,
        }
    }

    /// Set a callback for progress events.
    pub fn with_callback(mut self, callback: EventCallback) -> Self {
        self.callback = Some(callback);
        self
    }

    /// Run all three stages and return the combined transcript.
    ///
    /// Stages run sequentially: the summarizer sees the paper text, and
    /// each later stage sees the previous stage's output. Any API
    /// failure propagates; there is no retry.
    pub async fn generate(&self, paper_text: &str) -> Result<String, PipelineError> {
        let mut stage_outputs: Vec<String> = Vec::with_capacity(Role::ALL.len());
        let mut previous = paper_text.to_string();

        for role in Role::ALL {
            self.emit(PipelineEvent::StageStart { role });

            let system_prompt = render_prompt(self.prompts.prompt_for_role(role), &previous);
            let response = self.get_completion(&system_prompt).await?;
            let output = sanitize_output(&response);

            self.emit(PipelineEvent::StageComplete {
                role,
                content: output.clone(),
            });

            previous = output.clone();
            stage_outputs.push(output);
        }

        Ok(stage_outputs.join("\n\n"))
    }

    /// Get a single chat completion for one stage.
    async fn get_completion(&self, system_prompt: &str) -> Result<String, PipelineError> {
        let http_client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PipelineError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        let config = OpenAIConfig::new()
            .with_api_key(&self.config.api_key)
            .with_api_base(&self.config.api_base);

        let client = Client::with_config(config).with_http_client(http_client);

        let messages = vec![
            ChatCompletionRequestMessage::System(ChatCompletionRequestSystemMessage {
                content: system_prompt.to_string().into(),
                name: None,
            }),
            ChatCompletionRequestMessage::User(ChatCompletionRequestUserMessage {
                content: "Produce the dialogue lines now.".to_string().into(),
                name: None,
            }),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.config.model)
            .messages(messages)
            .build()?;

        let response = client.chat().create(request).await?;
        let content = response
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default();
        Ok(content)
    }

    fn emit(&self, event: PipelineEvent) {
        if let Some(ref callback) = self.callback {
            callback(event);
        }
    }
}

/// Substitute the stage input into a prompt template.
///
/// `{paper}` and `{input}` both receive the stage input; stage 1's
/// input is the paper text and later stages get the previous output.
fn render_prompt(template: &str, input: &str) -> String {
    template.replace("{paper}", input).replace("{input}", input)
}

/// Sanitize model output by stripping reasoning tags and markdown noise.
///
/// Unlike a plain-prose cleaner, this keeps newlines intact: line
/// boundaries are utterance boundaries for the transcript parser.
pub fn sanitize_output(response: &str) -> String {
    let tags_to_strip = [
        "thinking",
        "think",
        "reflection",
        "reasoning",
        "internal",
        "scratchpad",
        "analysis",
        "plan",
    ];

    let mut result = response.to_string();

    for tag in &tags_to_strip {
        let pattern = format!(r"(?is)<{tag}[^>]*>.*?</{tag}>", tag = tag);
        if let Ok(re) = regex::Regex::new(&pattern) {
            result = re.replace_all(&result, "").to_string();
        }
    }

    // Orphaned opening/closing tags.
    if let Ok(orphan_re) = regex::Regex::new(r"</?[\w]+[^>]*>") {
        result = orphan_re.replace_all(&result, "").to_string();
    }

    // Markdown emphasis markers confuse the TTS voices.
    result = result.replace('*', "");

    // Collapse runs of spaces/tabs but keep line structure.
    if let Ok(ws_re) = regex::Regex::new(r"[ \t]+") {
        result = ws_re.replace_all(&result, " ").to_string();
    }

    result
        .lines()
        .map(str::trim)
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sanitize_strips_thinking_tags() {
        let input = "<thinking>Let me think...</thinking>Research Summarizer: \"X.\"";
        assert_eq!(sanitize_output(input), "Research Summarizer: \"X.\"");
    }

    #[test]
    fn test_sanitize_preserves_line_boundaries() {
        let input = "A: \"one\"\nB: \"two\"";
        assert_eq!(sanitize_output(input), "A: \"one\"\nB: \"two\"");
    }

    #[test]
    fn test_sanitize_strips_asterisks_and_extra_spaces() {
        let input = "A:  \"some  **bold**   text\"";
        assert_eq!(sanitize_output(input), "A: \"some bold text\"");
    }

    #[test]
    fn test_sanitize_multiline_tag_spans_lines() {
        let input = "<plan>\nstep one\nstep two\n</plan>\nA: \"answer\"";
        assert_eq!(sanitize_output(input), "A: \"answer\"");
    }

    #[test]
    fn test_render_prompt_substitutes_both_placeholders() {
        assert_eq!(render_prompt("see {paper}", "P"), "see P");
        assert_eq!(render_prompt("see {input}", "S"), "see S");
    }
}
