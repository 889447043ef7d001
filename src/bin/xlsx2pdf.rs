//! CLI binary: convert spreadsheets to PDF with LibreOffice in a container.
//!
//! Builds the container image from `./Dockerfile` on every start (the engine
//! reuses cached layers), then converts one file or a whole directory.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_doctools::cli::{bold, green, init_tracing, log_level, red, CliProgress};
use edgequake_doctools::config::{DEFAULT_ENGINE, DEFAULT_IMAGE_NAME};
use edgequake_doctools::{SpreadsheetConfig, SpreadsheetConverter};
use std::path::PathBuf;
use std::process::ExitCode;

const AFTER_HELP: &str = r#"EXAMPLES:
  # report.xlsx → report.pdf (next to the input)
  xlsx2pdf report.xlsx

  # Explicit output name
  xlsx2pdf report.xlsx -o out/q3.pdf

  # Every .xlsx/.xls/.xlsm in sheets/ → pdfs/
  xlsx2pdf sheets/ -o pdfs/

  # Use docker and a custom image tag
  xlsx2pdf sheets/ --engine docker -i my-libreoffice

The Dockerfile in the current directory must produce an image whose
entrypoint is `soffice --headless --convert-to pdf`.
"#;

/// Convert Excel spreadsheets to PDF.
#[derive(Parser, Debug)]
#[command(
    name = "xlsx2pdf",
    version,
    about = "Convert Excel spreadsheets to PDF using LibreOffice in a container",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Spreadsheet file or directory of spreadsheets.
    input: PathBuf,

    /// Output PDF file (single mode) or directory (batch mode).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Container image name.
    #[arg(short = 'i', long, default_value = DEFAULT_IMAGE_NAME)]
    image_name: String,

    /// Batch mode (implied when the input is a directory).
    #[arg(short, long)]
    batch: bool,

    /// Container engine binary.
    #[arg(long, env = "XLSX2PDF_ENGINE", default_value = DEFAULT_ENGINE)]
    engine: String,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();
    let batch = cli.batch || cli.input.is_dir();
    init_tracing(log_level(cli.verbose, cli.quiet, batch && !cli.quiet && !cli.verbose));

    match run(&cli, batch).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {:#}", red("error:"), e);
            ExitCode::from(1)
        }
    }
}

async fn run(cli: &Cli, batch: bool) -> Result<()> {
    let mut builder = SpreadsheetConfig::builder()
        .image_name(&cli.image_name)
        .engine(&cli.engine);
    if batch && !cli.quiet {
        builder = builder.progress_callback(CliProgress::new("files").into_callback());
    }
    let config = builder.build().context("Invalid configuration")?;

    let converter = SpreadsheetConverter::new(&config)
        .await
        .context("Failed to build the converter image")?;

    if batch {
        let converted = converter
            .batch_convert(&cli.input, cli.output.as_deref(), None)
            .await
            .context("Batch conversion failed")?;
        if !cli.quiet {
            eprintln!("{} Converted {} files", green("✔"), bold(&converted.len().to_string()));
        }
    } else {
        let pdf = converter
            .convert_file(&cli.input, cli.output.as_deref())
            .await
            .context("Conversion failed")?;
        if !cli.quiet {
            eprintln!("{} {}", green("✔"), bold(&pdf.display().to_string()));
        }
    }

    Ok(())
}
