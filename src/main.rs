use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use narrative_core::profile::{answers_from_wire, profile_fields, sections_from_wire};
use narrative_core::{
    FieldNarrativeGenerator, NarrativeConfig, ParagraphComposer, ReportInput, ReportSynthesizer,
    config_from_env_values,
};
use narrative_wire::{AnswerSet, Profile, ReportRequest, Sections, WireFormat};

#[derive(Parser)]
#[command(name = "narrate")]
#[command(about = "Deterministic narrative synthesis for structured imaging reports")]
struct Cli {
    /// Output format
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Text)]
    format: OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Text,
    Json,
    Yaml,
}

#[derive(Subcommand)]
enum Commands {
    /// Render findings, impression and limitations from a profile and its answers
    Generate {
        /// Profile document (.json or YAML)
        profile: PathBuf,
        /// Answer set document (.json or YAML)
        answers: PathBuf,
    },
    /// Compose organ paragraphs from titled sections
    Compose {
        /// Section list document (.json or YAML)
        sections: PathBuf,
    },
    /// Run the generator and composer on a combined report request
    Report {
        /// Report request document with fields, answers and sections
        request: PathBuf,
    },
}

/// Entry point for the `narrate` CLI.
///
/// # Environment Variables
/// - `NARRATIVE_FALLBACK_TEMPLATE`: sentence template for fields without one
/// - `NARRATIVE_JOIN_LABEL`: separator for checklist labels (default: ", ")
/// - `NARRATIVE_MAX_NEGATIVES`: negatives kept per organ paragraph (default: 3)
/// - `NARRATIVE_MAX_SENTENCES`: sentences per organ paragraph (default: 2)
/// - `RUST_LOG`: tracing filter (default directive: `narrative=info`)
fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("narrative=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    // Resolve configuration once at startup
    let config = config_from_env_values(
        std::env::var("NARRATIVE_FALLBACK_TEMPLATE").ok(),
        std::env::var("NARRATIVE_JOIN_LABEL").ok(),
        std::env::var("NARRATIVE_MAX_NEGATIVES").ok(),
        std::env::var("NARRATIVE_MAX_SENTENCES").ok(),
    )
    .context("invalid narrative configuration")?;

    let rendered = run(cli.command, cli.format, config)?;
    println!("{rendered}");
    Ok(())
}

fn run(command: Commands, format: OutputFormat, config: NarrativeConfig) -> anyhow::Result<String> {
    match command {
        Commands::Generate { profile, answers } => {
            let (text, wire_format) = read_document(&profile)?;
            let fields = profile_fields(&Profile::parse(&text, wire_format)?)?;

            let (text, wire_format) = read_document(&answers)?;
            let answers = answers_from_wire(&fields, &AnswerSet::parse(&text, wire_format)?);

            tracing::info!("generating narrative for {} fields", fields.len());
            let output = FieldNarrativeGenerator::new(config).generate(&fields, &answers);
            render(&output, format, |o| {
                text_blocks(&[
                    ("Findings", &o.findings_text),
                    ("Impression", &o.impression_text),
                    ("Limitations", &o.limitations_text),
                ])
            })
        }
        Commands::Compose { sections } => {
            let (text, wire_format) = read_document(&sections)?;
            let sections = sections_from_wire(&Sections::parse(&text, wire_format)?);

            tracing::info!("composing {} sections", sections.len());
            let composed = ParagraphComposer::new(config).compose(&sections);
            render(&composed, format, |c| c.narrative_text.clone())
        }
        Commands::Report { request } => {
            let (text, wire_format) = read_document(&request)?;
            let input = ReportInput::from_wire(&ReportRequest::parse(&text, wire_format)?)?;

            tracing::info!(
                "synthesizing report from {} fields and {} extra sections",
                input.fields.len(),
                input.sections.len()
            );
            let report = ReportSynthesizer::new(config).synthesize_input(&input);
            render(&report, format, |r| {
                text_blocks(&[
                    ("Findings", &r.findings_text),
                    ("Impression", &r.impression_text),
                    ("Limitations", &r.limitations_text),
                    ("Narrative", &r.narrative_text),
                ])
            })
        }
    }
}

fn read_document(path: &Path) -> anyhow::Result<(String, WireFormat)> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    Ok((text, WireFormat::from_path(path)))
}

fn render<T: Serialize>(
    value: &T,
    format: OutputFormat,
    as_text: impl FnOnce(&T) -> String,
) -> anyhow::Result<String> {
    Ok(match format {
        OutputFormat::Text => as_text(value),
        OutputFormat::Json => serde_json::to_string_pretty(value)?,
        OutputFormat::Yaml => serde_yaml::to_string(value)?,
    })
}

/// Headed blocks separated by blank lines. Empty blocks are left out.
fn text_blocks(blocks: &[(&str, &String)]) -> String {
    blocks
        .iter()
        .filter(|(_, body)| !body.is_empty())
        .map(|(heading, body)| format!("{heading}:\n{body}"))
        .collect::<Vec<_>>()
        .join("\n\n")
}
