//! Papercast CLI - Research Paper Audio Conversation
//!
//! A command-line tool that turns a PDF research paper into a scripted
//! dialogue with one synthesized audio clip per line.

use clap::Parser;
use colored::Colorize;
use papercast_core::{
    Config, DialogueGenerator, ElevenLabsTts, GeneratorConfig, PipelineEvent, extract,
    parse_transcript, synthesize_dialogue, tts,
};
use std::env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "papercast",
    version,
    about = "Turn a research paper PDF into an audio conversation",
    long_about = "Extracts the text of a PDF, generates a three-part dialogue \
                  (summary, explanation, Q&A) with a language model, and synthesizes \
                  one audio clip per dialogue line."
)]
struct Cli {
    /// Path to the research paper PDF
    #[arg(value_name = "PDF")]
    pdf: PathBuf,

    /// LLM model used for all three generation stages
    #[arg(short, long, default_value = "gpt-4o-mini", value_name = "MODEL")]
    model: String,

    /// Directory to write audio clips into
    #[arg(short, long, default_value = ".", value_name = "DIR")]
    output_dir: PathBuf,

    /// Optional TOML config file (voices, prompts, TTS settings)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write the raw transcript to this file as well
    #[arg(long, value_name = "FILE")]
    save_transcript: Option<PathBuf>,

    /// Generate and print the transcript without synthesizing audio
    #[arg(long)]
    skip_audio: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load environment variables from .env file if present
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Config::load(path)?,
        None => Config::default(),
    };

    let api_base = env::var("OPENAI_API_BASE")
        .or_else(|_| env::var("OPENAI_BASE_URL"))
        .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());

    let api_key = env::var("OPENAI_API_KEY").unwrap_or_else(|_| {
        eprintln!(
            "{}",
            "Warning: OPENAI_API_KEY not set. API calls may fail.".yellow()
        );
        String::new()
    });

    println!();
    println!("{}", "═".repeat(70).bright_blue());
    println!(
        "{}",
        format!("  {} - Research Paper Audio Conversation", "Papercast".bold())
            .bright_blue()
            .bold()
    );
    println!("{}", "═".repeat(70).bright_blue());
    println!();
    println!("{} {}", "Paper:".bold(), cli.pdf.display().to_string().bright_white());
    println!("{} {}", "Model:".bold(), cli.model.dimmed());
    println!();

    // Stage 1: PDF text extraction.
    println!("{}", "Extracting text from PDF...".bright_cyan());
    let paper_text = extract::extract_text(&cli.pdf)?;
    println!(
        "  {} {} characters extracted",
        "✓".bright_green(),
        paper_text.len()
    );
    println!();

    // Stage 2: dialogue generation, with progress via the event callback.
    let generator_config = GeneratorConfig::new(api_base, api_key, cli.model.clone());
    let generator = DialogueGenerator::new(generator_config, config.prompts.clone())
        .with_callback(create_console_callback());

    let transcript = generator.generate(&paper_text).await?;

    if let Some(path) = &cli.save_transcript {
        std::fs::write(path, &transcript)?;
        println!(
            "{} {}",
            "Transcript written to".bold(),
            path.display().to_string().bright_white()
        );
        println!();
    }

    // Stage 3: parse into utterances.
    let parsed = parse_transcript(&transcript);
    for skipped in &parsed.skipped {
        eprintln!(
            "{} {}",
            "Skipping line:".yellow(),
            skipped.line.dimmed()
        );
    }
    println!(
        "{} {} dialogue lines ({} skipped)",
        "Parsed:".bold(),
        parsed.utterances.len(),
        parsed.skipped.len()
    );
    println!();

    // Stage 4: synthesis. Per-clip failures are reported but never
    // abort the run; whatever was produced is still listed.
    if !cli.skip_audio {
        let eleven_key = match env::var("ELEVENLABS_API_KEY") {
            Ok(key) => key,
            Err(_) => {
                eprintln!(
                    "{}",
                    "Error: ELEVENLABS_API_KEY not set; cannot synthesize audio.".red()
                );
                print_transcript(&transcript);
                std::process::exit(1);
            }
        };

        println!("{}", "Synthesizing audio clips...".bright_cyan());
        let synth = match ElevenLabsTts::new(eleven_key, &config.tts) {
            Ok(synth) => synth,
            Err(e) => {
                eprintln!("{} {}", "Error generating audio:".red(), e);
                print_transcript(&transcript);
                std::process::exit(1);
            }
        };
        let outcomes =
            synthesize_dialogue(&synth, &config.voices, &parsed.utterances, &cli.output_dir)
                .await;

        for outcome in &outcomes {
            match &outcome.status {
                tts::ClipStatus::Saved(path) => {
                    println!(
                        "  {} [{}] {} -> {}",
                        "✓".bright_green(),
                        outcome.index,
                        outcome.speaker.bright_cyan(),
                        path.display()
                    );
                }
                tts::ClipStatus::Failed(reason) => {
                    eprintln!(
                        "  {} [{}] {}: {}",
                        "✗".red(),
                        outcome.index,
                        outcome.speaker.bright_cyan(),
                        reason.dimmed()
                    );
                }
                tts::ClipStatus::UnrecognizedSpeaker => {
                    eprintln!(
                        "  {} [{}] {}",
                        "-".yellow(),
                        outcome.index,
                        format!("Skipping unknown speaker: {}", outcome.speaker).dimmed()
                    );
                }
            }
        }

        let paths = tts::saved_paths(&outcomes);
        println!();
        println!(
            "{} {} of {} clips saved to {}",
            "Audio:".bold(),
            paths.len(),
            parsed.utterances.len(),
            cli.output_dir.display().to_string().bright_white()
        );
    }

    print_transcript(&transcript);

    println!("{}", "═".repeat(70).bright_blue());
    println!("{}", "  Done.".bright_green().bold());
    println!("{}", "═".repeat(70).bright_blue());
    println!();

    Ok(())
}

/// Create a callback that prints generation progress to the console.
fn create_console_callback() -> Box<dyn Fn(PipelineEvent) + Send + Sync> {
    Box::new(move |event| match event {
        PipelineEvent::StageStart { role } => {
            println!(
                "{} {}",
                "▶".bright_cyan(),
                role.speaker_name().bright_cyan().bold()
            );
        }
        PipelineEvent::StageComplete { role: _, content } => {
            println!("  {} {} characters generated", "✓".bright_green(), content.len());
        }
    })
}

/// Print the full transcript under a header.
fn print_transcript(transcript: &str) {
    println!();
    println!("{}", "─".repeat(70).dimmed());
    println!("{}", "Conversation Transcript".bold());
    println!("{}", "─".repeat(70).dimmed());
    for line in transcript.lines() {
        println!("  {}", line);
    }
    println!();
}
