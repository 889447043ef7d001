//! Images → Markdown.
//!
//! Every image in a directory is encoded and sent to the VLM one at a time,
//! in ascending path order. Results are joined with a horizontal rule. There
//! is no partial-results checkpoint: the first failing image aborts the batch
//! and nothing is written.

use crate::config::{MarkdownConfig, IMAGE_EXTENSIONS};
use crate::error::DocToolsError;
use crate::output::{ImageResult, MarkdownOutput, MarkdownStats};
use crate::pipeline::discover::list_files_with_extensions;
use crate::pipeline::encode::encode_image_file;
use crate::pipeline::llm::{Transcriber, Transcription, VisionTranscriber};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, info};

/// Appended after every image's Markdown except the last.
pub const IMAGE_SEPARATOR: &str = "\n\n---\n\n";

/// List the supported images in `dir`, sorted by path.
///
/// Fails with [`DocToolsError::NoImagesFound`] when there are none.
pub fn list_images(dir: &Path) -> Result<Vec<PathBuf>, DocToolsError> {
    let files = list_files_with_extensions(dir, IMAGE_EXTENSIONS)?;
    if files.is_empty() {
        return Err(DocToolsError::NoImagesFound {
            dir: dir.to_path_buf(),
        });
    }
    Ok(files)
}

/// Join per-image Markdown, putting [`IMAGE_SEPARATOR`] between neighbours.
pub fn assemble_markdown<S: AsRef<str>>(parts: &[S]) -> String {
    let mut out = String::new();
    for (i, part) in parts.iter().enumerate() {
        out.push_str(part.as_ref());
        if i + 1 < parts.len() {
            out.push_str(IMAGE_SEPARATOR);
        }
    }
    out
}

/// Encode one image and transcribe it with `transcriber`.
pub async fn transcribe_image(
    image_path: &Path,
    transcriber: &dyn Transcriber,
    config: &MarkdownConfig,
) -> Result<Transcription, DocToolsError> {
    let payload = encode_image_file(image_path, config.max_edge, config.jpeg_quality)?;
    transcriber.transcribe(payload).await
}

/// Convert a single image to Markdown using the provider and model in `config`.
pub async fn convert_image_to_markdown(
    image_path: impl AsRef<Path>,
    config: &MarkdownConfig,
) -> Result<String, DocToolsError> {
    let transcriber = VisionTranscriber::from_config(config)?;
    let transcription = transcribe_image(image_path.as_ref(), &transcriber, config).await?;
    Ok(transcription.markdown)
}

/// Convert every supported image in `image_dir` to one Markdown document.
///
/// Writes the document to `output_file` when given (UTF-8, overwriting) and
/// always returns it.
pub async fn convert_images_to_markdown(
    image_dir: impl AsRef<Path>,
    output_file: Option<&Path>,
    config: &MarkdownConfig,
) -> Result<String, DocToolsError> {
    let files = list_images(image_dir.as_ref())?;
    let transcriber = VisionTranscriber::from_config(config)?;
    let output = transcribe_files(&files, output_file, &transcriber, config).await?;
    Ok(output.markdown)
}

/// Like [`convert_images_to_markdown`] with an explicit transcriber, returning
/// per-image results and token statistics as well.
pub async fn transcribe_directory(
    image_dir: impl AsRef<Path>,
    output_file: Option<&Path>,
    transcriber: &dyn Transcriber,
    config: &MarkdownConfig,
) -> Result<MarkdownOutput, DocToolsError> {
    let files = list_images(image_dir.as_ref())?;
    transcribe_files(&files, output_file, transcriber, config).await
}

async fn transcribe_files(
    files: &[PathBuf],
    output_file: Option<&Path>,
    transcriber: &dyn Transcriber,
    config: &MarkdownConfig,
) -> Result<MarkdownOutput, DocToolsError> {
    let total_start = Instant::now();
    let total = files.len();
    info!("Found {} image files", total);

    let progress = config.progress_callback.as_ref();
    if let Some(cb) = progress {
        cb.on_conversion_start(total);
    }

    let mut images = Vec::with_capacity(total);
    for (i, path) in files.iter().enumerate() {
        let index = i + 1;
        info!("Processing {}/{}: {}", index, total, path.display());
        if let Some(cb) = progress {
            cb.on_item_start(index, total, path);
        }

        let start = Instant::now();
        let transcription = match transcribe_image(path, transcriber, config).await {
            Ok(t) => t,
            Err(e) => {
                if let Some(cb) = progress {
                    cb.on_item_error(index, total, &e.to_string());
                }
                return Err(e);
            }
        };
        debug!(
            "{}: {} chars of Markdown",
            path.display(),
            transcription.markdown.len()
        );
        if let Some(cb) = progress {
            cb.on_item_complete(index, total, path);
        }

        images.push(ImageResult {
            index,
            path: path.clone(),
            markdown: transcription.markdown,
            input_tokens: transcription.input_tokens,
            output_tokens: transcription.output_tokens,
            duration_ms: start.elapsed().as_millis() as u64,
        });
    }

    let parts: Vec<&str> = images.iter().map(|r| r.markdown.as_str()).collect();
    let markdown = assemble_markdown(&parts);

    if let Some(path) = output_file {
        write_markdown(path, &markdown).await?;
        info!("Saved Markdown to {}", path.display());
    }

    if let Some(cb) = progress {
        cb.on_conversion_complete(total, images.len());
    }

    let stats = MarkdownStats {
        total_images: images.len(),
        total_input_tokens: images.iter().map(|r| r.input_tokens as u64).sum(),
        total_output_tokens: images.iter().map(|r| r.output_tokens as u64).sum(),
        total_duration_ms: total_start.elapsed().as_millis() as u64,
    };

    Ok(MarkdownOutput {
        markdown,
        images,
        stats,
    })
}

async fn write_markdown(path: &Path, markdown: &str) -> Result<(), DocToolsError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|e| DocToolsError::io(parent, e))?;
    }
    tokio::fs::write(path, markdown)
        .await
        .map_err(|e| DocToolsError::io(path, e))
}
