//! Progress-callback trait for per-item conversion events.
//!
//! Every tool processes a sequence of items (PDF pages, image files,
//! spreadsheets) strictly one after the other. Inject an
//! [`Arc<dyn ConversionProgressCallback>`] through the tool's config to
//! receive an event as each item starts and finishes; the library itself
//! only logs through `tracing` and never prints.
//!
//! # Example
//!
//! ```rust
//! use edgequake_doctools::{ConversionProgressCallback, RasterConfig};
//! use std::path::Path;
//! use std::sync::{Arc, atomic::{AtomicUsize, Ordering}};
//!
//! struct CountingCallback {
//!     saved: AtomicUsize,
//! }
//!
//! impl ConversionProgressCallback for CountingCallback {
//!     fn on_item_complete(&self, index: usize, total: usize, output: &Path) {
//!         self.saved.fetch_add(1, Ordering::SeqCst);
//!         eprintln!("{index}/{total} → {}", output.display());
//!     }
//! }
//!
//! let config = RasterConfig::builder()
//!     .progress_callback(Arc::new(CountingCallback { saved: AtomicUsize::new(0) }))
//!     .build()
//!     .unwrap();
//! ```

use std::path::Path;
use std::sync::Arc;

/// Called by the conversion pipelines as they process each item.
///
/// All methods have default no-op implementations so callers only override
/// what they care about. Indices are 1-based.
pub trait ConversionProgressCallback: Send + Sync {
    /// Called once before the first item, with the number of items.
    fn on_conversion_start(&self, total: usize) {
        let _ = total;
    }

    /// Called just before an item is handed to the external collaborator.
    fn on_item_start(&self, index: usize, total: usize, input: &Path) {
        let _ = (index, total, input);
    }

    /// Called when an item produced its output.
    ///
    /// `output` is the written file, or the source image for Markdown
    /// transcription (which produces a string rather than a file).
    fn on_item_complete(&self, index: usize, total: usize, output: &Path) {
        let _ = (index, total, output);
    }

    /// Called when an item failed.
    fn on_item_error(&self, index: usize, total: usize, error: &str) {
        let _ = (index, total, error);
    }

    /// Called once after all items have been attempted.
    fn on_conversion_complete(&self, total: usize, success_count: usize) {
        let _ = (total, success_count);
    }
}

/// A no-op implementation for callers that don't need progress events.
pub struct NoopProgressCallback;

impl ConversionProgressCallback for NoopProgressCallback {}

/// Convenience alias matching the type stored in the config structs.
pub type ProgressCallback = Arc<dyn ConversionProgressCallback>;

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct TrackingCallback {
        started_total: AtomicUsize,
        starts: AtomicUsize,
        completes: AtomicUsize,
        errors: Mutex<Vec<String>>,
        success: AtomicUsize,
    }

    impl ConversionProgressCallback for TrackingCallback {
        fn on_conversion_start(&self, total: usize) {
            self.started_total.store(total, Ordering::SeqCst);
        }

        fn on_item_start(&self, _index: usize, _total: usize, _input: &Path) {
            self.starts.fetch_add(1, Ordering::SeqCst);
        }

        fn on_item_complete(&self, _index: usize, _total: usize, _output: &Path) {
            self.completes.fetch_add(1, Ordering::SeqCst);
        }

        fn on_item_error(&self, _index: usize, _total: usize, error: &str) {
            self.errors.lock().unwrap().push(error.to_string());
        }

        fn on_conversion_complete(&self, _total: usize, success_count: usize) {
            self.success.store(success_count, Ordering::SeqCst);
        }
    }

    #[test]
    fn noop_callback_does_not_panic() {
        let cb = NoopProgressCallback;
        cb.on_conversion_start(2);
        cb.on_item_start(1, 2, Path::new("a.xlsx"));
        cb.on_item_complete(1, 2, Path::new("a.pdf"));
        cb.on_item_error(2, 2, "boom");
        cb.on_conversion_complete(2, 1);
    }

    #[test]
    fn tracking_callback_receives_events() {
        let tracker = TrackingCallback::default();

        tracker.on_conversion_start(3);
        tracker.on_item_start(1, 3, Path::new("a.png"));
        tracker.on_item_complete(1, 3, Path::new("a.png"));
        tracker.on_item_start(2, 3, Path::new("b.png"));
        tracker.on_item_error(2, 3, "rate limited");
        tracker.on_conversion_complete(3, 1);

        assert_eq!(tracker.started_total.load(Ordering::SeqCst), 3);
        assert_eq!(tracker.starts.load(Ordering::SeqCst), 2);
        assert_eq!(tracker.completes.load(Ordering::SeqCst), 1);
        assert_eq!(tracker.errors.lock().unwrap().as_slice(), ["rate limited"]);
        assert_eq!(tracker.success.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn arc_dyn_callback_works() {
        let cb: ProgressCallback = Arc::new(NoopProgressCallback);
        cb.on_conversion_start(1);
        cb.on_item_complete(1, 1, Path::new("page_001.png"));
    }
}
