//! # edgequake-doctools
//!
//! Three small document-conversion tools, each a thin pipeline around one
//! external collaborator:
//!
//! | Binary | Does | Collaborator |
//! |--------|------|--------------|
//! | `pdf2img`  | PDF → one image per page (PNG/JPEG/TIFF) | pdfium |
//! | `img2md`   | directory of images → one Markdown document | Vision LLM |
//! | `xlsx2pdf` | spreadsheet(s) → PDF | LibreOffice in podman/docker |
//!
//! The tools share no data; they share error handling, configuration style
//! and progress reporting.
//!
//! ## Pipeline Overview
//!
//! ```text
//! pdf2img   PDF ─▶ render (pdfium, dpi/72 scale) ─▶ page_001.png …
//! img2md    dir ─▶ sorted images ─▶ ≤2000 px JPEG q85 ─▶ VLM ─▶ "---"-joined Markdown
//! xlsx2pdf  file/dir ─▶ build image once ─▶ run per file ─▶ rename to requested .pdf
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use edgequake_doctools::{convert_images_to_markdown, MarkdownConfig};
//! use std::path::Path;
//!
//! #[tokio::main(flavor = "current_thread")]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     // Credentials come from GEMINI_API_KEY (or the chosen provider's key).
//!     let config = MarkdownConfig::default();
//!     let markdown =
//!         convert_images_to_markdown("scans/", Some(Path::new("scans.md")), &config).await?;
//!     println!("{markdown}");
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli`   | on      | Enables the three binaries (clap + anyhow + tracing-subscriber + indicatif + dotenvy) |

// ── Modules ──────────────────────────────────────────────────────────────

#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod convert;
pub mod error;
pub mod output;
pub mod pipeline;
pub mod progress;
pub mod prompts;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use config::{
    MarkdownConfig, MarkdownConfigBuilder, PageImageFormat, RasterConfig, RasterConfigBuilder,
    SpreadsheetConfig, SpreadsheetConfigBuilder,
};
pub use convert::{
    convert_image_to_markdown, convert_images_to_markdown, convert_pdf_to_images,
    transcribe_directory, try_convert_pdf_to_images, SpreadsheetConverter,
};
pub use error::DocToolsError;
pub use output::{ImageResult, MarkdownOutput, MarkdownStats, RasterOutput};
pub use pipeline::container::{BuildSpec, ContainerRuntime, EngineCli, Mount, RunSpec};
pub use pipeline::llm::{Transcriber, Transcription, VisionTranscriber};
pub use progress::{ConversionProgressCallback, NoopProgressCallback, ProgressCallback};
