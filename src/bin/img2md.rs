//! CLI binary: transcribe a directory of images into one Markdown document.
//!
//! A thin shim over the library crate that maps CLI flags to
//! `MarkdownConfig` and prints the result.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_doctools::cli::{bold, dim, green, init_tracing, log_level, CliProgress};
use edgequake_doctools::config::{DEFAULT_MODEL, DEFAULT_PROVIDER};
use edgequake_doctools::{transcribe_directory, MarkdownConfig, VisionTranscriber};
use std::io::{self, Write};
use std::path::PathBuf;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Print Markdown for every page image in scans/
  img2md scans/

  # Save to a file with a different model
  img2md scans/ -o scans.md --model gemini-2.5-pro

  # Use OpenAI instead of Gemini
  img2md scans/ --provider openai --model gpt-4.1-mini

SUPPORTED IMAGES:
  png, jpg, jpeg, tiff, bmp (case-insensitive), processed in file-name order

ENVIRONMENT VARIABLES:
  GEMINI_API_KEY          Google Gemini API key (default provider)
  OPENAI_API_KEY          OpenAI API key
  ANTHROPIC_API_KEY       Anthropic API key
  EDGEQUAKE_LLM_PROVIDER  Provider override (gemini, openai, anthropic, ollama, …)
  EDGEQUAKE_MODEL         Model override

  Variables may also be placed in a .env file in the working directory.
"#;

/// Convert images to Markdown using a Vision LLM.
#[derive(Parser, Debug)]
#[command(
    name = "img2md",
    version,
    about = "Convert a directory of images to Markdown using a Vision LLM",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Directory containing the images to convert.
    image_dir: PathBuf,

    /// Write the Markdown to this file (otherwise it is printed to stdout).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// LLM model ID.
    #[arg(long, env = "EDGEQUAKE_MODEL", default_value = DEFAULT_MODEL)]
    model: String,

    /// LLM provider: gemini, openai, anthropic, ollama, azure, …
    #[arg(long, env = "EDGEQUAKE_LLM_PROVIDER", default_value = DEFAULT_PROVIDER)]
    provider: String,

    /// Max LLM output tokens per image.
    #[arg(long, default_value_t = 4096)]
    max_tokens: usize,

    /// Print per-image results and token counts as JSON instead of Markdown.
    #[arg(long)]
    json: bool,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    let show_progress = !cli.quiet && !cli.json;
    init_tracing(log_level(cli.verbose, cli.quiet, show_progress && !cli.verbose));

    let mut builder = MarkdownConfig::builder()
        .model(&cli.model)
        .provider_name(&cli.provider)
        .max_tokens(cli.max_tokens);
    if show_progress {
        builder = builder.progress_callback(CliProgress::new("images").into_callback());
    }
    let config = builder.build().context("Invalid configuration")?;

    // Scan first so an empty directory is reported before any provider setup.
    edgequake_doctools::convert::list_images(&cli.image_dir)
        .context("Nothing to convert")?;

    let transcriber =
        VisionTranscriber::from_config(&config).context("Failed to set up the LLM provider")?;
    let output = transcribe_directory(&cli.image_dir, cli.output.as_deref(), &transcriber, &config)
        .await
        .context("Conversion failed")?;

    if cli.json {
        let json = serde_json::to_string_pretty(&output).context("Failed to serialise output")?;
        println!("{json}");
    } else if cli.output.is_none() {
        let stdout = io::stdout();
        let mut handle = stdout.lock();
        handle
            .write_all(output.markdown.as_bytes())
            .context("Failed to write to stdout")?;
        if !output.markdown.ends_with('\n') {
            handle.write_all(b"\n").ok();
        }
    }

    if !cli.quiet {
        if let Some(ref path) = cli.output {
            eprintln!(
                "{} Markdown saved to {}",
                green("✔"),
                bold(&path.display().to_string())
            );
        }
        eprintln!(
            "   {} tokens in  /  {} tokens out  —  {}ms total",
            dim(&output.stats.total_input_tokens.to_string()),
            dim(&output.stats.total_output_tokens.to_string()),
            output.stats.total_duration_ms,
        );
    }

    Ok(())
}
