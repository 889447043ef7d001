//! Result records returned by the conversion entry points.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Outcome of rasterising one PDF.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RasterOutput {
    /// Directory holding the page images.
    pub output_dir: PathBuf,
    /// Written page files, in page order.
    pub pages: Vec<PathBuf>,
}

/// Transcription of a single image.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImageResult {
    /// 1-based position in the batch.
    pub index: usize,
    /// Source image.
    pub path: PathBuf,
    /// Markdown returned by the model, without the batch separator.
    pub markdown: String,
    pub input_tokens: usize,
    pub output_tokens: usize,
    pub duration_ms: u64,
}

/// Aggregate numbers for a Markdown batch.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MarkdownStats {
    pub total_images: usize,
    pub total_input_tokens: u64,
    pub total_output_tokens: u64,
    pub total_duration_ms: u64,
}

/// Full result of [`crate::convert::transcribe_directory`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarkdownOutput {
    /// The assembled document: every image's Markdown, separated by `---`.
    pub markdown: String,
    /// Per-image results in processing order.
    pub images: Vec<ImageResult>,
    pub stats: MarkdownStats,
}
