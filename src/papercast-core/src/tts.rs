//! Speech synthesis.
//!
//! Maps each parsed utterance to a voice by role and calls the hosted
//! ElevenLabs text-to-speech endpoint, writing one WAV clip per
//! recognized utterance. Synthesis is per-item best-effort: a failed
//! clip is recorded and the batch continues.

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde_json::json;

use crate::config::{TtsConfig, VoicesConfig};
use crate::error::PipelineError;
use crate::role::Role;
use crate::transcript::Utterance;

/// PCM format requested from the synthesis service.
const PCM_SAMPLE_RATE: u32 = 24_000;

/// A speech-synthesis backend.
///
/// Returns raw PCM16LE mono samples at [`PCM_SAMPLE_RATE`]. The trait
/// seam lets tests substitute a mock backend for the hosted service.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, PipelineError>;
}

/// Client for the ElevenLabs text-to-speech API.
pub struct ElevenLabsTts {
    client: reqwest::Client,
    api_base: String,
    api_key: String,
    model_id: String,
}

impl ElevenLabsTts {
    /// Build a client from explicit credentials and TTS settings.
    pub fn new(api_key: impl Into<String>, config: &TtsConfig) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .connect_timeout(std::time::Duration::from_secs(30))
            .build()
            .map_err(|e| {
                PipelineError::ConfigError(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self {
            client,
            api_base: config.api_base.trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            model_id: config.model_id.clone(),
        })
    }
}

#[async_trait]
impl SpeechSynthesizer for ElevenLabsTts {
    async fn synthesize(&self, text: &str, voice_id: &str) -> Result<Vec<u8>, PipelineError> {
        let url = format!(
            "{}/v1/text-to-speech/{}?output_format=pcm_24000",
            self.api_base, voice_id
        );

        let response = self
            .client
            .post(&url)
            .header("xi-api-key", &self.api_key)
            .json(&json!({
                "text": text,
                "model_id": self.model_id,
            }))
            .send()
            .await
            .map_err(|e| PipelineError::TtsError(format!("request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::TtsError(format!(
                "service returned {}: {}",
                status, body
            )));
        }

        let bytes = response
            .bytes()
            .await
            .map_err(|e| PipelineError::TtsError(format!("failed to read audio: {}", e)))?;
        Ok(bytes.to_vec())
    }
}

/// Outcome of synthesizing one utterance.
#[derive(Debug)]
pub struct ClipOutcome {
    /// 0-based position of the utterance in the parsed sequence.
    pub index: usize,
    /// Speaker name as it appeared in the transcript.
    pub speaker: String,
    pub status: ClipStatus,
}

/// Per-clip status: explicit success or failure, never a silent skip.
#[derive(Debug)]
pub enum ClipStatus {
    /// Clip written to this path.
    Saved(PathBuf),
    /// Synthesis or file write failed; the batch continued.
    Failed(String),
    /// Speaker is not one of the three recognized roles.
    UnrecognizedSpeaker,
}

/// Synthesize every utterance in order, one at a time.
///
/// Clips are named `<role-slug>_<index>.wav` in `out_dir`. No failure
/// aborts the batch; every utterance gets a [`ClipOutcome`].
pub async fn synthesize_dialogue(
    synth: &dyn SpeechSynthesizer,
    voices: &VoicesConfig,
    utterances: &[Utterance],
    out_dir: &Path,
) -> Vec<ClipOutcome> {
    let mut outcomes = Vec::with_capacity(utterances.len());

    for (index, utterance) in utterances.iter().enumerate() {
        let status = match Role::from_speaker(&utterance.speaker) {
            Some(role) => {
                let voice_id = voices.voice_for_role(role);
                let path = out_dir.join(format!("{}_{}.wav", role.slug(), index));
                match synthesize_clip(synth, &utterance.text, voice_id, &path).await {
                    Ok(()) => ClipStatus::Saved(path),
                    Err(e) => ClipStatus::Failed(e.to_string()),
                }
            }
            None => ClipStatus::UnrecognizedSpeaker,
        };

        outcomes.push(ClipOutcome {
            index,
            speaker: utterance.speaker.clone(),
            status,
        });
    }

    outcomes
}

async fn synthesize_clip(
    synth: &dyn SpeechSynthesizer,
    text: &str,
    voice_id: &str,
    path: &Path,
) -> Result<(), PipelineError> {
    let pcm = synth.synthesize(text, voice_id).await?;
    write_wav(path, &pcm)
}

/// Ordered list of successfully written clip paths.
pub fn saved_paths(outcomes: &[ClipOutcome]) -> Vec<PathBuf> {
    outcomes
        .iter()
        .filter_map(|o| match &o.status {
            ClipStatus::Saved(path) => Some(path.clone()),
            _ => None,
        })
        .collect()
}

/// Wrap raw PCM16LE mono samples in a WAV container.
fn write_wav(path: &Path, pcm: &[u8]) -> Result<(), PipelineError> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: PCM_SAMPLE_RATE,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)
        .map_err(|e| PipelineError::TtsError(format!("failed to create {:?}: {}", path, e)))?;

    for sample in pcm.chunks_exact(2) {
        let value = i16::from_le_bytes([sample[0], sample[1]]);
        writer
            .write_sample(value)
            .map_err(|e| PipelineError::TtsError(format!("failed to write {:?}: {}", path, e)))?;
    }

    writer
        .finalize()
        .map_err(|e| PipelineError::TtsError(format!("failed to finalize {:?}: {}", path, e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Mock backend: returns a short PCM buffer, or fails for any text
    /// containing "FAIL".
    struct MockSynth;

    #[async_trait]
    impl SpeechSynthesizer for MockSynth {
        async fn synthesize(&self, text: &str, _voice_id: &str) -> Result<Vec<u8>, PipelineError> {
            if text.contains("FAIL") {
                return Err(PipelineError::TtsError("mock outage".to_string()));
            }
            Ok(vec![0u8; 480])
        }
    }

    fn utterance(speaker: &str, text: &str) -> Utterance {
        Utterance {
            speaker: speaker.to_string(),
            text: text.to_string(),
        }
    }

    #[tokio::test]
    async fn test_unknown_speaker_is_skipped_without_error() {
        let dir = tempfile::tempdir().unwrap();
        let voices = VoicesConfig::default();
        let utterances = vec![
            utterance("Research Summarizer", "first"),
            utterance("Concept Explainer", "second"),
            utterance("Unknown Role", "third"),
        ];

        let outcomes =
            synthesize_dialogue(&MockSynth, &voices, &utterances, dir.path()).await;

        assert_eq!(outcomes.len(), 3);
        assert!(matches!(outcomes[2].status, ClipStatus::UnrecognizedSpeaker));
        let paths = saved_paths(&outcomes);
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("research_summarizer_0.wav"));
        assert!(paths[1].ends_with("concept_explainer_1.wav"));
    }

    #[tokio::test]
    async fn test_one_failure_does_not_abort_the_batch() {
        let dir = tempfile::tempdir().unwrap();
        let voices = VoicesConfig::default();
        let utterances = vec![
            utterance("Research Summarizer", "first"),
            utterance("Concept Explainer", "FAIL here"),
            utterance("Question Answering Agent", "third"),
        ];

        let outcomes =
            synthesize_dialogue(&MockSynth, &voices, &utterances, dir.path()).await;

        assert!(matches!(outcomes[1].status, ClipStatus::Failed(_)));
        let paths = saved_paths(&outcomes);
        assert_eq!(paths.len(), 2);
        assert!(paths[0].ends_with("research_summarizer_0.wav"));
        assert!(paths[1].ends_with("question_answering_agent_2.wav"));
    }

    #[tokio::test]
    async fn test_clip_index_follows_utterance_position() {
        let dir = tempfile::tempdir().unwrap();
        let voices = VoicesConfig::default();
        let utterances = vec![
            utterance("Narrator", "dropped"),
            utterance("Research Summarizer", "kept"),
        ];

        let outcomes =
            synthesize_dialogue(&MockSynth, &voices, &utterances, dir.path()).await;

        // Index 0 was the unrecognized speaker, so the clip keeps index 1.
        let paths = saved_paths(&outcomes);
        assert_eq!(paths.len(), 1);
        assert!(paths[0].ends_with("research_summarizer_1.wav"));
    }

    #[tokio::test]
    async fn test_saved_clip_is_a_readable_wav() {
        let dir = tempfile::tempdir().unwrap();
        let voices = VoicesConfig::default();
        let utterances = vec![utterance("Research Summarizer", "hello")];

        let outcomes =
            synthesize_dialogue(&MockSynth, &voices, &utterances, dir.path()).await;
        let paths = saved_paths(&outcomes);
        assert_eq!(paths.len(), 1);

        let reader = hound::WavReader::open(&paths[0]).unwrap();
        let spec = reader.spec();
        assert_eq!(spec.channels, 1);
        assert_eq!(spec.sample_rate, PCM_SAMPLE_RATE);
        assert_eq!(spec.bits_per_sample, 16);
        assert_eq!(reader.len(), 240); // 480 bytes of PCM16
    }
}
