//! Integration tests for the image → Markdown batch, driven by a fake
//! transcriber so no network or API key is needed.

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use edgequake_doctools::{
    transcribe_directory, ConversionProgressCallback, DocToolsError, MarkdownConfig, Transcriber,
    Transcription,
};
use edgequake_llm::ImageData;
use image::{Rgb, RgbImage};
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Reports the width of every image it receives as its Markdown.
#[derive(Default)]
struct WidthTranscriber {
    calls: AtomicUsize,
    fail_on_call: Option<usize>,
    seen: Mutex<Vec<(u32, u32)>>,
}

#[async_trait]
impl Transcriber for WidthTranscriber {
    async fn transcribe(&self, image: ImageData) -> Result<Transcription, DocToolsError> {
        let call = self.calls.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_on_call == Some(call) {
            return Err(DocToolsError::LlmApiError {
                message: "429 Too Many Requests".into(),
            });
        }

        assert_eq!(image.mime_type, "image/jpeg");
        let bytes = STANDARD.decode(&image.data).expect("payload is base64");
        let decoded = image::load_from_memory(&bytes).expect("payload is an image");
        self.seen
            .lock()
            .unwrap()
            .push((decoded.width(), decoded.height()));

        Ok(Transcription {
            markdown: format!("# Image {}px", decoded.width()),
            input_tokens: 100,
            output_tokens: 10,
        })
    }
}

fn write_image(dir: &Path, name: &str, width: u32, height: u32) {
    RgbImage::from_pixel(width, height, Rgb([200, 200, 200]))
        .save(dir.join(name))
        .unwrap();
}

/// `a.png`, `b.jpg`, `c.bmp` plus files that must be ignored.
fn mixed_dir() -> tempfile::TempDir {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "c.bmp", 30, 5);
    write_image(dir.path(), "a.png", 10, 5);
    write_image(dir.path(), "b.jpg", 20, 5);
    std::fs::write(dir.path().join("notes.txt"), "ignore me").unwrap();
    std::fs::write(dir.path().join("d.gif"), b"GIF89a").unwrap();
    dir
}

#[tokio::test]
async fn processes_supported_images_in_order_with_two_separators() {
    let dir = mixed_dir();
    let transcriber = WidthTranscriber::default();
    let config = MarkdownConfig::default();

    let output = transcribe_directory(dir.path(), None, &transcriber, &config)
        .await
        .expect("batch should succeed");

    assert_eq!(transcriber.calls.load(Ordering::SeqCst), 3);
    assert_eq!(
        output.markdown,
        "# Image 10px\n\n---\n\n# Image 20px\n\n---\n\n# Image 30px"
    );
    assert_eq!(output.markdown.matches("---").count(), 2);

    let names: Vec<_> = output
        .images
        .iter()
        .map(|r| r.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, ["a.png", "b.jpg", "c.bmp"]);
    assert_eq!(output.stats.total_images, 3);
    assert_eq!(output.stats.total_input_tokens, 300);
    assert_eq!(output.stats.total_output_tokens, 30);
}

#[tokio::test]
async fn writes_output_file_and_overwrites() {
    let dir = mixed_dir();
    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join("nested/result.md");
    std::fs::create_dir_all(out.parent().unwrap()).unwrap();
    std::fs::write(&out, "stale content that is much longer than the new one").unwrap();

    let transcriber = WidthTranscriber::default();
    let output = transcribe_directory(dir.path(), Some(&out), &transcriber, &MarkdownConfig::default())
        .await
        .unwrap();

    let written = std::fs::read_to_string(&out).unwrap();
    assert_eq!(written, output.markdown);
}

#[tokio::test]
async fn large_images_are_downscaled_before_sending() {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "scan.png", 500, 250);

    let transcriber = WidthTranscriber::default();
    let config = MarkdownConfig::builder().max_edge(100).build().unwrap();
    transcribe_directory(dir.path(), None, &transcriber, &config)
        .await
        .unwrap();

    assert_eq!(transcriber.seen.lock().unwrap().as_slice(), [(100, 50)]);
}

#[tokio::test]
async fn empty_directory_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    std::fs::write(dir.path().join("readme.md"), "# not an image").unwrap();

    let transcriber = WidthTranscriber::default();
    let err = transcribe_directory(dir.path(), None, &transcriber, &MarkdownConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DocToolsError::NoImagesFound { .. }));
    assert_eq!(transcriber.calls.load(Ordering::SeqCst), 0);
}

#[derive(Default)]
struct Events {
    completed: AtomicUsize,
    errors: AtomicUsize,
    finished: AtomicUsize,
}

impl ConversionProgressCallback for Events {
    fn on_item_complete(&self, _index: usize, _total: usize, _output: &Path) {
        self.completed.fetch_add(1, Ordering::SeqCst);
    }

    fn on_item_error(&self, _index: usize, _total: usize, _error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
    }

    fn on_conversion_complete(&self, _total: usize, _success_count: usize) {
        self.finished.fetch_add(1, Ordering::SeqCst);
    }
}

#[tokio::test]
async fn model_failure_aborts_batch_without_writing() {
    let dir = mixed_dir();
    let out_dir = tempfile::tempdir().unwrap();
    let out = out_dir.path().join("result.md");

    let events = Arc::new(Events::default());
    let config = MarkdownConfig::builder()
        .progress_callback(events.clone())
        .build()
        .unwrap();
    let transcriber = WidthTranscriber {
        fail_on_call: Some(2),
        ..Default::default()
    };

    let err = transcribe_directory(dir.path(), Some(&out), &transcriber, &config)
        .await
        .unwrap_err();

    assert!(matches!(err, DocToolsError::LlmApiError { .. }));
    assert_eq!(transcriber.calls.load(Ordering::SeqCst), 2, "third image never sent");
    assert!(!out.exists(), "no partial output is written");
    assert_eq!(events.completed.load(Ordering::SeqCst), 1);
    assert_eq!(events.errors.load(Ordering::SeqCst), 1);
    assert_eq!(events.finished.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn undecodable_image_aborts_batch() {
    let dir = tempfile::tempdir().unwrap();
    write_image(dir.path(), "a.png", 10, 10);
    std::fs::write(dir.path().join("b.png"), b"definitely not png").unwrap();

    let transcriber = WidthTranscriber::default();
    let err = transcribe_directory(dir.path(), None, &transcriber, &MarkdownConfig::default())
        .await
        .unwrap_err();

    assert!(matches!(err, DocToolsError::ImageDecode { .. }));
    assert_eq!(transcriber.calls.load(Ordering::SeqCst), 1);
}
