//! Pipeline stages shared by the conversion tools.
//!
//! Each submodule wraps exactly one external collaborator, so the tool
//! contracts in [`crate::convert`] read as a flat sequence of stages.
//!
//! ## Data Flow
//!
//! ```text
//! pdf2img   : render ─────────────────────────────▶ page files
//! img2md    : discover ──▶ encode ──▶ llm ────────▶ Markdown
//! xlsx2pdf  : discover ──▶ container (build, run) ▶ PDF files
//! ```
//!
//! 1. [`discover`]  — extension-filtered, sorted directory listing
//! 2. [`render`]    — pdfium binding and page rasterisation; runs in
//!    `spawn_blocking` because pdfium is a blocking C library
//! 3. [`encode`]    — bound the image to 2000 px, JPEG-encode, base64-wrap
//! 4. [`llm`]       — one non-streaming VLM call per image
//! 5. [`container`] — `podman`/`docker` build and run

pub mod container;
pub mod discover;
pub mod encode;
pub mod llm;
pub mod render;
