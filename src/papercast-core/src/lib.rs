//! Papercast Core Library
//!
//! Turns a PDF research paper into a spoken dialogue: text extraction,
//! three-stage dialogue generation, transcript parsing, and per-line
//! speech synthesis.

pub mod config;
pub mod error;
pub mod extract;
pub mod generator;
pub mod role;
pub mod transcript;
pub mod tts;

pub use config::{Config, PromptsConfig, TtsConfig, VoicesConfig};
pub use error::PipelineError;
pub use generator::{DialogueGenerator, GeneratorConfig, PipelineEvent};
pub use role::Role;
pub use transcript::{ParsedTranscript, SkippedLine, Utterance, parse_transcript};
pub use tts::{ClipOutcome, ClipStatus, ElevenLabsTts, SpeechSynthesizer, synthesize_dialogue};
