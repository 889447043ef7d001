//! Error types for the edgequake-doctools library.
//!
//! A single error enum serves all three tools because each tool is a short
//! pipeline whose failures map onto the same handful of external causes:
//! a missing input, a filesystem error, or one of the external collaborators
//! (pdfium, the image codec, the VLM provider, the container engine) giving up.
//!
//! How an error is *surfaced* differs per tool and lives in [`crate::convert`]:
//!
//! * PDF → images swallows every error into a `None` result after logging it.
//! * Images → Markdown propagates the first error and aborts the batch.
//! * Spreadsheet → PDF propagates single-file errors but isolates them per
//!   file in batch mode.

use std::path::PathBuf;
use thiserror::Error;

/// All errors returned by the edgequake-doctools library.
#[derive(Debug, Error)]
pub enum DocToolsError {
    // ── Input errors ──────────────────────────────────────────────────────
    /// Input file or directory was not found at the given path.
    #[error("Input not found: '{path}'\nCheck the path exists and is readable.")]
    FileNotFound { path: PathBuf },

    /// A directory was expected but the path is something else.
    #[error("Not a directory: '{path}'")]
    NotADirectory { path: PathBuf },

    /// A directory scan for images yielded zero candidates.
    #[error("No image files found in '{dir}'\nSupported extensions: png, jpg, jpeg, tiff, bmp")]
    NoImagesFound { dir: PathBuf },

    // ── I/O errors ────────────────────────────────────────────────────────
    /// Creating, reading, writing or renaming a file or directory failed.
    #[error("I/O error on '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    // ── Image errors ──────────────────────────────────────────────────────
    /// The image codec could not open or decode the file.
    #[error("Failed to decode image '{path}': {source}")]
    ImageDecode {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },

    /// Re-encoding an image (JPEG payload or page file) failed.
    #[error("Image encoding failed: {detail}")]
    ImageEncode { detail: String },

    // ── PDF errors ────────────────────────────────────────────────────────
    /// pdfium could not load the document.
    #[error("PDF '{path}' could not be opened: {detail}")]
    CorruptPdf { path: PathBuf, detail: String },

    /// pdfium returned an error for a specific page.
    #[error("Rasterisation failed for page {page}: {detail}")]
    RasterisationFailed { page: usize, detail: String },

    /// Could not bind to a pdfium library.
    #[error(
        "Failed to bind to pdfium library: {0}\n\n\
PDF rasterisation needs the pdfium shared library on this host.\n\
  • Set PDFIUM_LIB_PATH=/path/to/libpdfium to use an existing copy.\n\
  • Or place libpdfium next to the working directory / on the library path.\n\
Prebuilt binaries: https://github.com/bblanchon/pdfium-binaries\n"
    )]
    PdfiumBindingFailed(String),

    // ── LLM errors ────────────────────────────────────────────────────────
    /// The configured provider could not be created (missing API key etc.).
    #[error("LLM provider '{provider}' is not configured.\n{hint}")]
    ProviderNotConfigured { provider: String, hint: String },

    /// The model call failed (network, auth, rate limit, …).
    #[error("LLM API error: {message}")]
    LlmApiError { message: String },

    // ── Container errors ──────────────────────────────────────────────────
    /// The container engine binary could not be spawned.
    #[error("Container engine '{program}' could not be started: {source}\nIs it installed and on PATH?")]
    ContainerEngineUnavailable {
        program: String,
        #[source]
        source: std::io::Error,
    },

    /// The container engine ran but exited unsuccessfully.
    #[error("Container command failed ({status}): {command}")]
    ContainerCommandFailed { command: String, status: String },

    /// The conversion run exited cleanly but left no PDF behind.
    #[error("Converting '{input}' produced no output at '{expected}'\nLibreOffice could not load the file.")]
    ConversionProducedNoOutput { input: PathBuf, expected: PathBuf },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed.
    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    // ── Catch-all ─────────────────────────────────────────────────────────
    /// Unexpected internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl DocToolsError {
    /// Wrap an I/O error together with the path it happened on.
    pub(crate) fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        DocToolsError::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_images_display_mentions_dir() {
        let e = DocToolsError::NoImagesFound {
            dir: PathBuf::from("scans"),
        };
        let msg = e.to_string();
        assert!(msg.contains("scans"), "got: {msg}");
        assert!(msg.contains("bmp"), "got: {msg}");
    }

    #[test]
    fn container_failure_display() {
        let e = DocToolsError::ContainerCommandFailed {
            command: "podman build -t excel-to-pdf".into(),
            status: "exit status: 125".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("podman build"));
        assert!(msg.contains("125"));
    }

    #[test]
    fn io_helper_keeps_source() {
        use std::error::Error as _;
        let e = DocToolsError::io(
            "out/page_001.png",
            std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
        );
        assert!(e.to_string().contains("page_001.png"));
        assert!(e.source().is_some());
    }

    #[test]
    fn missing_output_names_both_paths() {
        let e = DocToolsError::ConversionProducedNoOutput {
            input: PathBuf::from("/in/q3.xlsx"),
            expected: PathBuf::from("/out/q3.pdf"),
        };
        let msg = e.to_string();
        assert!(msg.contains("/in/q3.xlsx") && msg.contains("/out/q3.pdf"), "got: {msg}");
    }

    #[test]
    fn rasterisation_display() {
        let e = DocToolsError::RasterisationFailed {
            page: 4,
            detail: "bitmap alloc".into(),
        };
        assert!(e.to_string().contains("page 4"));
    }
}
