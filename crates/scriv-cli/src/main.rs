//! Command-line entry point.
//!
//! Wires configuration, the Ollama client, and vault scanning into four
//! subcommands: `tags`, `correct`, `summarize`, and `models`. Results go
//! to stdout; logs go to stderr.

mod vault;

use std::fs;
use std::io::{self, Read};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use tracing::debug;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use scriv_core::{defaults, insert_section, NoteAssistant, SuggestedTag, TagIndex};
use scriv_inference::{LlmConfig, OllamaClient};

// =============================================================================
// CLI
// =============================================================================

#[derive(Parser)]
#[command(
    name = "scriv",
    version,
    about = "LLM-assisted tagging, correction, and meeting summaries for markdown notes"
)]
struct Cli {
    /// Config file path (default: ~/.config/scriv/config.toml).
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Ollama server URL.
    #[arg(long, global = true, value_name = "URL")]
    url: Option<String>,

    /// Model name.
    #[arg(long, global = true, value_name = "NAME")]
    model: Option<String>,

    /// Sampling temperature (0.0 to 1.0).
    #[arg(long, global = true, value_name = "T")]
    temperature: Option<f32>,

    /// Increase log verbosity (-v debug, -vv trace).
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Suggest tags for a note.
    Tags {
        /// Note to analyze.
        file: PathBuf,

        /// Vault root to scan for existing tag usage.
        #[arg(long, value_name = "DIR")]
        vault: Option<PathBuf>,

        /// Output format.
        #[arg(long, value_enum, default_value_t = OutputFormat::Table)]
        format: OutputFormat,
    },

    /// Correct spelling and grammar in a note.
    Correct {
        /// Note to correct; omit or pass "-" to read stdin.
        file: Option<PathBuf>,

        /// Write the corrected text back to the file.
        #[arg(long)]
        write: bool,
    },

    /// Generate a meeting minutes summary for a note.
    Summarize {
        /// Note to summarize.
        file: PathBuf,

        /// Splice the summary into the note below its frontmatter.
        #[arg(long)]
        insert: bool,
    },

    /// List models available on the Ollama server.
    Models,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
enum OutputFormat {
    Table,
    Json,
}

// =============================================================================
// SETUP
// =============================================================================

fn init_tracing(verbosity: u8) {
    let default_filter = match verbosity {
        0 => "scriv=info,scriv_core=info,scriv_inference=info",
        1 => "scriv=debug,scriv_core=debug,scriv_inference=debug",
        _ => "trace",
    };
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| default_filter.into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}

/// Load configuration and apply command-line overrides on top.
fn resolve_config(cli: &Cli) -> anyhow::Result<LlmConfig> {
    let mut config = match &cli.config {
        Some(path) => LlmConfig::from_file(path)
            .with_context(|| format!("failed to load config from {}", path.display()))?,
        None => LlmConfig::load().context("failed to load configuration")?,
    };

    if let Some(url) = &cli.url {
        config.base_url = url.clone();
    }
    if let Some(model) = &cli.model {
        config.model = model.clone();
    }
    if let Some(temperature) = cli.temperature {
        config.temperature = temperature;
    }

    Ok(config)
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let config = resolve_config(&cli)?;
    debug!(base_url = %config.base_url, model = %config.model, "configuration resolved");
    let client = OllamaClient::with_config(&config).context("invalid configuration")?;

    let output = match &cli.command {
        Command::Tags {
            file,
            vault,
            format,
        } => run_tags(&client, file, vault.as_deref(), *format).await?,
        Command::Correct { file, write } => run_correct(&client, file.as_deref(), *write).await?,
        Command::Summarize { file, insert } => run_summarize(&client, file, *insert).await?,
        Command::Models => run_models(&client).await,
    };

    println!("{output}");
    Ok(())
}

// =============================================================================
// COMMANDS
// =============================================================================

async fn run_tags(
    assistant: &impl NoteAssistant,
    file: &Path,
    vault_dir: Option<&Path>,
    format: OutputFormat,
) -> anyhow::Result<String> {
    let content =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;

    let existing_tags = match vault_dir {
        Some(dir) => vault::scan_vault(dir)
            .with_context(|| format!("failed to scan vault {}", dir.display()))?,
        None => TagIndex::new(),
    };

    let tags = assistant
        .generate_tags(&content, &existing_tags, None)
        .await?;
    render_tags(&tags, &existing_tags, format)
}

fn render_tags(
    tags: &[SuggestedTag],
    existing_tags: &TagIndex,
    format: OutputFormat,
) -> anyhow::Result<String> {
    match format {
        OutputFormat::Json => Ok(serde_json::to_string_pretty(tags)?),
        OutputFormat::Table => {
            if tags.is_empty() {
                return Ok("No tags suggested.".to_string());
            }
            let mut out = format!("{:<24} {:<10} {:<9} JUSTIFICATION", "TAG", "TYPE", "IN VAULT");
            for tag in tags {
                let in_vault = if existing_tags.contains_key(&format!("#{}", tag.tag)) {
                    "yes"
                } else {
                    "no"
                };
                out.push('\n');
                out.push_str(&format!(
                    "{:<24} {:<10} {:<9} {}",
                    tag.tag,
                    tag.kind.as_str(),
                    in_vault,
                    tag.justification
                ));
            }
            Ok(out)
        }
    }
}

async fn run_correct(
    assistant: &impl NoteAssistant,
    file: Option<&Path>,
    write: bool,
) -> anyhow::Result<String> {
    let target = file.filter(|path| path.as_os_str() != "-");
    if write && target.is_none() {
        bail!("--write requires a file argument");
    }

    let content = match target {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("failed to read stdin")?;
            buffer
        }
    };

    let corrected = assistant.correct_text(&content, None).await?;

    match (write, target) {
        (true, Some(path)) => {
            fs::write(path, &corrected)
                .with_context(|| format!("failed to write {}", path.display()))?;
            Ok(format!("Corrected {}", path.display()))
        }
        _ => Ok(corrected),
    }
}

async fn run_summarize(
    assistant: &impl NoteAssistant,
    file: &Path,
    insert: bool,
) -> anyhow::Result<String> {
    let content =
        fs::read_to_string(file).with_context(|| format!("failed to read {}", file.display()))?;

    let summary = assistant.generate_summary(&content, None).await?;

    if !insert {
        return Ok(summary);
    }
    if summary.is_empty() {
        bail!("model returned an empty summary, nothing to insert");
    }

    let updated = insert_section(&content, &summary, defaults::SUMMARY_HEADING);
    fs::write(file, updated).with_context(|| format!("failed to write {}", file.display()))?;
    Ok(format!("Inserted summary into {}", file.display()))
}

async fn run_models(assistant: &impl NoteAssistant) -> String {
    let models = assistant.list_models().await;
    if models.is_empty() {
        return "No models found. Is the Ollama server running?".to_string();
    }
    models.join("\n")
}
