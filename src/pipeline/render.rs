//! PDF rasterisation: render every page to an image file via pdfium.
//!
//! ## Why spawn_blocking?
//!
//! `pdfium-render` wraps the pdfium C++ library, which is blocking and keeps
//! thread-local state. The async wrapper moves the whole document onto the
//! blocking pool and awaits it, so the caller still sees one page at a time
//! and nothing else runs concurrently.
//!
//! ## Resolution
//!
//! PDF user space is 72 points per inch, so a page rendered at `dpi` is
//! scaled by `dpi / 72`.

use crate::config::PageImageFormat;
use crate::error::DocToolsError;
use crate::progress::ProgressCallback;
use image::DynamicImage;
use pdfium_render::prelude::*;
use std::path::{Path, PathBuf};
use tracing::{debug, info};

/// Points per inch in PDF user space.
const POINTS_PER_INCH: f32 = 72.0;

/// File name of the 1-based `page_num` written in `format`, e.g. `page_007.png`.
pub fn page_file_name(page_num: usize, format: PageImageFormat) -> String {
    format!("page_{:03}.{}", page_num, format.extension())
}

/// Scale factor pdfium applies to reach `dpi`.
pub fn scale_for_dpi(dpi: u32) -> f32 {
    dpi as f32 / POINTS_PER_INCH
}

/// Explicit library files to try, in order, before the system search path.
///
/// `PDFIUM_LIB_PATH` (when set and non-empty) comes first, then the platform
/// library name in the current directory.
pub fn library_candidates(env_path: Option<&str>) -> Vec<PathBuf> {
    let mut candidates = Vec::with_capacity(2);
    if let Some(path) = env_path.filter(|p| !p.is_empty()) {
        candidates.push(PathBuf::from(path));
    }
    candidates.push(Pdfium::pdfium_platform_library_name_at_path("./"));
    candidates
}

/// Bind to a pdfium shared library.
///
/// Tries each of [`library_candidates`] and then the system library search
/// path. A bad `PDFIUM_LIB_PATH` falls through to the next option.
pub fn bind_pdfium() -> Result<Pdfium, DocToolsError> {
    let env_path = std::env::var("PDFIUM_LIB_PATH").ok();
    bind_first(&library_candidates(env_path.as_deref())).map(Pdfium::new)
}

fn bind_first(candidates: &[PathBuf]) -> Result<Box<dyn PdfiumLibraryBindings>, DocToolsError> {
    let mut attempts = Vec::with_capacity(candidates.len() + 1);
    for path in candidates {
        match Pdfium::bind_to_library(path) {
            Ok(bindings) => {
                debug!("Bound pdfium from {}", path.display());
                return Ok(bindings);
            }
            Err(e) => {
                debug!("pdfium not loadable from {}: {:?}", path.display(), e);
                attempts.push(format!("{}: {:?}", path.display(), e));
            }
        }
    }

    Pdfium::bind_to_system_library().map_err(|e| {
        attempts.push(format!("system library: {:?}", e));
        DocToolsError::PdfiumBindingFailed(attempts.join("; "))
    })
}

/// Rasterise every page of `pdf_path` into `output_dir`.
///
/// Runs the blocking work inside `spawn_blocking`. Returns the written page
/// paths in page order.
pub async fn render_to_files(
    pdf_path: &Path,
    output_dir: &Path,
    dpi: u32,
    format: PageImageFormat,
    progress: Option<ProgressCallback>,
) -> Result<Vec<PathBuf>, DocToolsError> {
    let pdf = pdf_path.to_path_buf();
    let out = output_dir.to_path_buf();

    tokio::task::spawn_blocking(move || {
        render_to_files_blocking(&pdf, &out, dpi, format, progress.as_ref())
    })
    .await
    .map_err(|e| DocToolsError::Internal(format!("Render task panicked: {}", e)))?
}

/// Blocking implementation of page rendering.
fn render_to_files_blocking(
    pdf_path: &Path,
    output_dir: &Path,
    dpi: u32,
    format: PageImageFormat,
    progress: Option<&ProgressCallback>,
) -> Result<Vec<PathBuf>, DocToolsError> {
    let pdfium = bind_pdfium()?;

    let document = pdfium
        .load_pdf_from_file(pdf_path, None)
        .map_err(|e| DocToolsError::CorruptPdf {
            path: pdf_path.to_path_buf(),
            detail: format!("{:?}", e),
        })?;

    let pages = document.pages();
    let total = pages.len() as usize;
    info!("PDF loaded: {} pages", total);
    if let Some(cb) = progress {
        cb.on_conversion_start(total);
    }

    let render_config = PdfRenderConfig::new()
        .scale_page_by_factor(scale_for_dpi(dpi))
        .render_form_data(true);

    let mut written = Vec::with_capacity(total);

    for (idx, page) in pages.iter().enumerate() {
        let page_num = idx + 1;
        let target = output_dir.join(page_file_name(page_num, format));
        if let Some(cb) = progress {
            cb.on_item_start(page_num, total, pdf_path);
        }

        let bitmap = page.render_with_config(&render_config).map_err(|e| {
            DocToolsError::RasterisationFailed {
                page: page_num,
                detail: format!("{:?}", e),
            }
        })?;
        let image = bitmap.as_image();
        debug!(
            "Rendered page {} → {}x{} px",
            page_num,
            image.width(),
            image.height()
        );

        save_page(&image, &target, format)?;
        info!("Saved page {}/{}: {}", page_num, total, target.display());
        if let Some(cb) = progress {
            cb.on_item_complete(page_num, total, &target);
        }

        written.push(target);
    }

    if let Some(cb) = progress {
        cb.on_conversion_complete(total, written.len());
    }
    Ok(written)
}

/// Write one rendered page, dropping the alpha channel for JPEG.
pub fn save_page(
    image: &DynamicImage,
    target: &Path,
    format: PageImageFormat,
) -> Result<(), DocToolsError> {
    let encoded = match format.image_format() {
        image::ImageFormat::Jpeg => DynamicImage::ImageRgb8(image.to_rgb8())
            .save_with_format(target, image::ImageFormat::Jpeg),
        other => image.save_with_format(target, other),
    };

    encoded.map_err(|e| DocToolsError::ImageEncode {
        detail: format!("{}: {}", target.display(), e),
    })
}
