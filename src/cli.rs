//! Terminal helpers shared by the `pdf2img`, `img2md` and `xlsx2pdf` binaries.
//!
//! Only compiled with the `cli` feature.

use crate::progress::{ConversionProgressCallback, ProgressCallback};
use indicatif::{ProgressBar, ProgressStyle};
use std::io;
use std::path::Path;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

// ── ANSI colour helpers ──────────────────────────────────────────────────

pub fn green(s: &str) -> String {
    format!("\x1b[32m{s}\x1b[0m")
}
pub fn red(s: &str) -> String {
    format!("\x1b[31m{s}\x1b[0m")
}
pub fn dim(s: &str) -> String {
    format!("\x1b[2m{s}\x1b[0m")
}
pub fn bold(s: &str) -> String {
    format!("\x1b[1m{s}\x1b[0m")
}
pub fn cyan(s: &str) -> String {
    format!("\x1b[36m{s}\x1b[0m")
}

const TICKS: &[&str] = &["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏", "⠿"];

/// Pick the default log level from the verbosity flags.
///
/// Library INFO logs are suppressed while a progress bar is drawn; the bar
/// gives the same feedback without tearing.
pub fn log_level(verbose: bool, quiet: bool, progress_bar: bool) -> &'static str {
    if verbose {
        "debug"
    } else if quiet || progress_bar {
        "error"
    } else {
        "info"
    }
}

/// Install the stderr `tracing` subscriber. `RUST_LOG` overrides `level`.
pub fn init_tracing(level: &str) {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)),
        )
        .with_writer(io::stderr)
        .init();
}

/// Terminal progress callback: a bar anchored at the bottom of the terminal
/// plus one line per finished item.
pub struct CliProgress {
    bar: ProgressBar,
    noun: &'static str,
    errors: AtomicUsize,
}

impl CliProgress {
    /// `noun` names the items in messages, e.g. `"pages"` or `"images"`.
    pub fn new(noun: &'static str) -> Arc<Self> {
        let bar = ProgressBar::new(0);
        let spinner_style = ProgressStyle::with_template("{spinner:.cyan} {prefix:.bold}  {msg}")
            .unwrap_or_else(|_| ProgressStyle::default_spinner())
            .tick_strings(TICKS);
        bar.set_style(spinner_style);
        bar.set_prefix("Preparing");
        bar.enable_steady_tick(Duration::from_millis(80));

        Arc::new(Self {
            bar,
            noun,
            errors: AtomicUsize::new(0),
        })
    }

    pub fn into_callback(self: Arc<Self>) -> ProgressCallback {
        self
    }

    pub fn errors(&self) -> usize {
        self.errors.load(Ordering::SeqCst)
    }
}

// Clears a bar left spinning when a run fails before `on_conversion_complete`.
impl Drop for CliProgress {
    fn drop(&mut self) {
        if !self.bar.is_finished() {
            self.bar.finish_and_clear();
        }
    }
}

impl ConversionProgressCallback for CliProgress {
    fn on_conversion_start(&self, total: usize) {
        let style = ProgressStyle::with_template(
            "{spinner:.cyan} {prefix:.bold}  \
             [{bar:42.green/238}] {pos:>3}/{len}  ⏱ {elapsed_precise}",
        )
        .unwrap_or_else(|_| ProgressStyle::default_bar())
        .progress_chars("█▉▊▋▌▍▎▏  ")
        .tick_strings(TICKS);

        self.bar.set_length(total as u64);
        self.bar.set_style(style);
        self.bar.set_prefix("Converting");
        self.bar.println(format!(
            "{} {}",
            cyan("◆"),
            bold(&format!("{} {} found", total, self.noun))
        ));
    }

    fn on_item_start(&self, index: usize, total: usize, input: &Path) {
        let name = input
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.bar.set_message(format!("{index}/{total} {name}"));
    }

    fn on_item_complete(&self, index: usize, total: usize, output: &Path) {
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}",
            green("✓"),
            index,
            total,
            dim(&output.display().to_string()),
        ));
        self.bar.inc(1);
    }

    fn on_item_error(&self, index: usize, total: usize, error: &str) {
        self.errors.fetch_add(1, Ordering::SeqCst);
        let msg = match error.char_indices().nth(100) {
            Some((cut, _)) => format!("{}\u{2026}", &error[..cut]),
            None => error.to_string(),
        };
        self.bar.println(format!(
            "  {} {:>3}/{:<3}  {}",
            red("✗"),
            index,
            total,
            red(&msg),
        ));
        self.bar.inc(1);
    }

    fn on_conversion_complete(&self, total: usize, success_count: usize) {
        self.bar.finish_and_clear();
        let failed = total.saturating_sub(success_count);
        if failed == 0 {
            eprintln!(
                "{} {} {} converted",
                green("✔"),
                bold(&success_count.to_string()),
                self.noun
            );
        } else {
            eprintln!(
                "{} {}/{} {} converted  ({} failed)",
                if success_count == 0 { red("✘") } else { cyan("⚠") },
                bold(&success_count.to_string()),
                total,
                self.noun,
                red(&failed.to_string()),
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verbose_beats_quiet_and_bar() {
        assert_eq!(log_level(true, true, true), "debug");
        assert_eq!(log_level(false, true, false), "error");
        assert_eq!(log_level(false, false, true), "error");
        assert_eq!(log_level(false, false, false), "info");
    }

    #[test]
    fn error_counter_tracks_failures() {
        let progress = CliProgress::new("files");
        progress.on_conversion_start(2);
        progress.on_item_error(1, 2, "exit status: 1");
        progress.on_item_complete(2, 2, Path::new("/out/b.pdf"));
        progress.on_conversion_complete(2, 1);
        assert_eq!(progress.errors(), 1);
    }

    #[test]
    fn dropping_unfinished_progress_clears_bar() {
        let progress = CliProgress::new("pages");
        let bar = progress.bar.clone();
        progress.on_conversion_start(3);
        progress.on_item_error(1, 3, "pdfium: bad xref");
        assert!(!bar.is_finished());

        drop(progress);
        assert!(bar.is_finished());
    }
}
