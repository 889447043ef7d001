//! CLI binary: rasterise every page of a PDF into image files.
//!
//! A thin shim over the library crate that maps CLI flags to `RasterConfig`.

use anyhow::{Context, Result};
use clap::Parser;
use edgequake_doctools::cli::{bold, green, init_tracing, log_level, red, CliProgress};
use edgequake_doctools::{convert_pdf_to_images, PageImageFormat, RasterConfig};
use std::path::PathBuf;
use std::process::ExitCode;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Pages of report.pdf → ./report/page_001.png …
  pdf2img report.pdf

  # 150 DPI JPEGs into a chosen directory
  pdf2img report.pdf -o out/report -d 150 -f jpg

ENVIRONMENT VARIABLES:
  PDFIUM_LIB_PATH   Path to libpdfium (otherwise ./ and the system library path are searched)
  RUST_LOG          Override the log filter (e.g. debug)
"#;

/// Render each page of a PDF to an image file.
#[derive(Parser, Debug)]
#[command(
    name = "pdf2img",
    version,
    about = "Render each page of a PDF to an image file",
    arg_required_else_help = true,
    color = clap::ColorChoice::Auto,
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// PDF file to convert.
    pdf_path: PathBuf,

    /// Output directory (default: a directory named after the PDF).
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Output resolution in DPI.
    #[arg(short, long, default_value_t = 300,
          value_parser = clap::value_parser!(u32).range(1..=2400))]
    dpi: u32,

    /// Output image format.
    #[arg(short, long, value_enum, default_value = "png")]
    format: FormatArg,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long)]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long)]
    quiet: bool,
}

#[derive(clap::ValueEnum, Clone, Copy, Debug)]
enum FormatArg {
    Png,
    Jpg,
    Jpeg,
    Tiff,
}

impl From<FormatArg> for PageImageFormat {
    fn from(v: FormatArg) -> Self {
        match v {
            FormatArg::Png => PageImageFormat::Png,
            FormatArg::Jpg => PageImageFormat::Jpg,
            FormatArg::Jpeg => PageImageFormat::Jpeg,
            FormatArg::Tiff => PageImageFormat::Tiff,
        }
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<ExitCode> {
    let cli = Cli::parse();

    let show_progress = !cli.quiet;
    init_tracing(log_level(cli.verbose, cli.quiet, show_progress && !cli.verbose));

    if !cli.pdf_path.exists() {
        eprintln!(
            "{} PDF file '{}' not found",
            red("error:"),
            cli.pdf_path.display()
        );
        return Ok(ExitCode::from(1));
    }

    let mut builder = RasterConfig::builder()
        .dpi(cli.dpi)
        .format(cli.format.into());
    if let Some(ref dir) = cli.output {
        builder = builder.output_dir(dir);
    }
    if show_progress {
        builder = builder.progress_callback(CliProgress::new("pages").into_callback());
    }
    let config = builder.build().context("Invalid configuration")?;

    // Conversion failures are logged by the library and do not change the exit code.
    let result = convert_pdf_to_images(&cli.pdf_path, &config).await;
    drop(config);
    match result {
        Some(dir) if !cli.quiet => {
            eprintln!("{} Images saved to {}", green("✔"), bold(&dir.display().to_string()));
        }
        Some(_) => {}
        None if !cli.quiet => {
            eprintln!("{} Conversion failed; see the log above", red("✘"));
        }
        None => {}
    }

    Ok(ExitCode::SUCCESS)
}
