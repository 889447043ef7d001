//! PDF → page images.

use crate::config::RasterConfig;
use crate::error::DocToolsError;
use crate::output::RasterOutput;
use crate::pipeline::render;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{error, info};

/// Directory used when no output directory is configured: the PDF's file
/// stem, relative to the current working directory.
pub fn default_output_dir(pdf_path: &Path) -> PathBuf {
    pdf_path
        .file_stem()
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("pages"))
}

/// Rasterise every page of a PDF, returning the error on failure.
///
/// The output directory is created recursively if missing; existing page
/// files with the same names are overwritten.
pub async fn try_convert_pdf_to_images(
    pdf_path: impl AsRef<Path>,
    config: &RasterConfig,
) -> Result<RasterOutput, DocToolsError> {
    let start = Instant::now();
    let pdf_path = pdf_path.as_ref();
    if !pdf_path.is_file() {
        return Err(DocToolsError::FileNotFound {
            path: pdf_path.to_path_buf(),
        });
    }

    let output_dir = config
        .output_dir
        .clone()
        .unwrap_or_else(|| default_output_dir(pdf_path));
    tokio::fs::create_dir_all(&output_dir)
        .await
        .map_err(|e| DocToolsError::io(&output_dir, e))?;

    info!(
        "Rasterising {} at {} DPI as {} → {}",
        pdf_path.display(),
        config.dpi,
        config.format,
        output_dir.display()
    );

    let pages = render::render_to_files(
        pdf_path,
        &output_dir,
        config.dpi,
        config.format,
        config.progress_callback.clone(),
    )
    .await?;

    info!(
        "Converted {} pages into {} in {}ms",
        pages.len(),
        output_dir.display(),
        start.elapsed().as_millis()
    );

    Ok(RasterOutput { output_dir, pages })
}

/// Rasterise every page of a PDF.
///
/// Returns the output directory, or `None` if anything went wrong. The
/// error is logged, not returned; use [`try_convert_pdf_to_images`] to get it.
pub async fn convert_pdf_to_images(
    pdf_path: impl AsRef<Path>,
    config: &RasterConfig,
) -> Option<PathBuf> {
    match try_convert_pdf_to_images(pdf_path, config).await {
        Ok(output) => Some(output.output_dir),
        Err(e) => {
            error!("PDF conversion failed: {}", e);
            None
        }
    }
}
