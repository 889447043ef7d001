//! Configuration types for the three conversion tools.
//!
//! Each tool gets one config struct with well-documented defaults and a
//! builder that validates ranges on [`build`](RasterConfigBuilder::build).
//! The CLI binaries map their flags onto these builders; library callers can
//! use `Default::default()` and override single fields.

use crate::error::DocToolsError;
use crate::progress::ProgressCallback;
use edgequake_llm::LLMProvider;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;

/// Default rasterisation resolution in dots per inch.
pub const DEFAULT_DPI: u32 = 300;

/// Default vision model for image transcription.
pub const DEFAULT_MODEL: &str = "gemini-2.0-flash";

/// Default LLM provider (matches [`DEFAULT_MODEL`]).
pub const DEFAULT_PROVIDER: &str = "gemini";

/// Longest edge, in pixels, an image may have before it is downscaled for the VLM.
pub const DEFAULT_MAX_EDGE: u32 = 2000;

/// JPEG quality used for the inline image payload.
pub const DEFAULT_JPEG_QUALITY: u8 = 85;

/// Default container image tag for the spreadsheet converter.
pub const DEFAULT_IMAGE_NAME: &str = "excel-to-pdf";

/// Default container engine binary.
pub const DEFAULT_ENGINE: &str = "podman";

/// Image extensions accepted by the Markdown batch (compared case-insensitively).
pub const IMAGE_EXTENSIONS: &[&str] = &["png", "jpg", "jpeg", "tiff", "bmp"];

/// Spreadsheet extensions accepted by the batch converter by default.
pub const DEFAULT_SPREADSHEET_EXTENSIONS: &[&str] = &[".xlsx", ".xls", ".xlsm"];

// ── PDF → images ─────────────────────────────────────────────────────────

/// Output format for rasterised PDF pages.
///
/// `Jpg` and `Jpeg` encode identically; they differ only in the file
/// extension written, which is the name the user chose.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageImageFormat {
    #[default]
    Png,
    Jpg,
    Jpeg,
    Tiff,
}

impl PageImageFormat {
    /// File extension (without the dot) for pages written in this format.
    pub fn extension(self) -> &'static str {
        match self {
            PageImageFormat::Png => "png",
            PageImageFormat::Jpg => "jpg",
            PageImageFormat::Jpeg => "jpeg",
            PageImageFormat::Tiff => "tiff",
        }
    }

    /// The `image` crate encoder to use.
    pub fn image_format(self) -> image::ImageFormat {
        match self {
            PageImageFormat::Png => image::ImageFormat::Png,
            PageImageFormat::Jpg | PageImageFormat::Jpeg => image::ImageFormat::Jpeg,
            PageImageFormat::Tiff => image::ImageFormat::Tiff,
        }
    }
}

impl fmt::Display for PageImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

impl FromStr for PageImageFormat {
    type Err = DocToolsError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "png" => Ok(PageImageFormat::Png),
            "jpg" => Ok(PageImageFormat::Jpg),
            "jpeg" => Ok(PageImageFormat::Jpeg),
            "tiff" => Ok(PageImageFormat::Tiff),
            other => Err(DocToolsError::InvalidConfig(format!(
                "unsupported image format '{other}' (expected png, jpg, jpeg or tiff)"
            ))),
        }
    }
}

/// Configuration for PDF-to-images rasterisation.
#[derive(Clone)]
pub struct RasterConfig {
    /// Directory that receives the page images.
    ///
    /// `None` means a directory named after the PDF's file stem, relative to
    /// the current working directory.
    pub output_dir: Option<PathBuf>,

    /// Rendering resolution. Range: 1–2400. Default: 300.
    pub dpi: u32,

    /// Page image format. Default: PNG.
    pub format: PageImageFormat,

    /// Per-page progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for RasterConfig {
    fn default() -> Self {
        Self {
            output_dir: None,
            dpi: DEFAULT_DPI,
            format: PageImageFormat::default(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for RasterConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RasterConfig")
            .field("output_dir", &self.output_dir)
            .field("dpi", &self.dpi)
            .field("format", &self.format)
            .field(
                "progress_callback",
                &self.progress_callback.as_ref().map(|_| "<dyn ConversionProgressCallback>"),
            )
            .finish()
    }
}

impl RasterConfig {
    /// Create a new builder for `RasterConfig`.
    pub fn builder() -> RasterConfigBuilder {
        RasterConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RasterConfig`].
pub struct RasterConfigBuilder {
    config: RasterConfig,
}

impl RasterConfigBuilder {
    pub fn output_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.output_dir = Some(dir.into());
        self
    }

    pub fn dpi(mut self, dpi: u32) -> Self {
        self.config.dpi = dpi;
        self
    }

    pub fn format(mut self, format: PageImageFormat) -> Self {
        self.config.format = format;
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RasterConfig, DocToolsError> {
        if !(1..=2400).contains(&self.config.dpi) {
            return Err(DocToolsError::InvalidConfig(format!(
                "DPI must be 1–2400, got {}",
                self.config.dpi
            )));
        }
        Ok(self.config)
    }
}

// ── Images → Markdown ────────────────────────────────────────────────────

/// Configuration for image-to-Markdown transcription.
#[derive(Clone)]
pub struct MarkdownConfig {
    /// Vision model identifier. Default: `gemini-2.0-flash`.
    pub model: String,

    /// LLM provider name (e.g. "gemini", "openai"). If `None`, the
    /// `EDGEQUAKE_LLM_PROVIDER` env var is consulted, then [`DEFAULT_PROVIDER`].
    pub provider_name: Option<String>,

    /// Pre-constructed provider. Takes precedence over `provider_name`.
    pub provider: Option<Arc<dyn LLMProvider>>,

    /// Sampling temperature. Default: 0.0.
    pub temperature: f32,

    /// Maximum tokens the model may generate per image. Default: 4096.
    pub max_tokens: usize,

    /// Longest edge in pixels before an image is downscaled. Default: 2000.
    pub max_edge: u32,

    /// JPEG quality of the inline payload (1–100). Default: 85.
    pub jpeg_quality: u8,

    /// Custom system prompt. If `None`, uses [`crate::prompts::MARKDOWN_SYSTEM_PROMPT`].
    pub system_prompt: Option<String>,

    /// Per-image progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for MarkdownConfig {
    fn default() -> Self {
        Self {
            model: DEFAULT_MODEL.to_string(),
            provider_name: None,
            provider: None,
            temperature: 0.0,
            max_tokens: 4096,
            max_edge: DEFAULT_MAX_EDGE,
            jpeg_quality: DEFAULT_JPEG_QUALITY,
            system_prompt: None,
            progress_callback: None,
        }
    }
}

impl fmt::Debug for MarkdownConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MarkdownConfig")
            .field("model", &self.model)
            .field("provider_name", &self.provider_name)
            .field("provider", &self.provider.as_ref().map(|_| "<dyn LLMProvider>"))
            .field("temperature", &self.temperature)
            .field("max_tokens", &self.max_tokens)
            .field("max_edge", &self.max_edge)
            .field("jpeg_quality", &self.jpeg_quality)
            .field("system_prompt", &self.system_prompt.as_ref().map(|p| p.len()))
            .finish()
    }
}

impl MarkdownConfig {
    /// Create a new builder for `MarkdownConfig`.
    pub fn builder() -> MarkdownConfigBuilder {
        MarkdownConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`MarkdownConfig`].
pub struct MarkdownConfigBuilder {
    config: MarkdownConfig,
}

impl MarkdownConfigBuilder {
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    pub fn provider_name(mut self, name: impl Into<String>) -> Self {
        self.config.provider_name = Some(name.into());
        self
    }

    pub fn provider(mut self, provider: Arc<dyn LLMProvider>) -> Self {
        self.config.provider = Some(provider);
        self
    }

    pub fn temperature(mut self, t: f32) -> Self {
        self.config.temperature = t;
        self
    }

    pub fn max_tokens(mut self, n: usize) -> Self {
        self.config.max_tokens = n;
        self
    }

    pub fn max_edge(mut self, px: u32) -> Self {
        self.config.max_edge = px;
        self
    }

    pub fn jpeg_quality(mut self, q: u8) -> Self {
        self.config.jpeg_quality = q;
        self
    }

    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<MarkdownConfig, DocToolsError> {
        let c = &self.config;
        if c.model.trim().is_empty() {
            return Err(DocToolsError::InvalidConfig("model must not be empty".into()));
        }
        if !(0.0..=2.0).contains(&c.temperature) {
            return Err(DocToolsError::InvalidConfig(format!(
                "temperature must be 0.0–2.0, got {}",
                c.temperature
            )));
        }
        if c.max_edge == 0 {
            return Err(DocToolsError::InvalidConfig("max_edge must be ≥ 1".into()));
        }
        if !(1..=100).contains(&c.jpeg_quality) {
            return Err(DocToolsError::InvalidConfig(format!(
                "JPEG quality must be 1–100, got {}",
                c.jpeg_quality
            )));
        }
        Ok(self.config)
    }
}

// ── Spreadsheet → PDF ────────────────────────────────────────────────────

/// Configuration for the containerised spreadsheet converter.
#[derive(Clone)]
pub struct SpreadsheetConfig {
    /// Tag of the container image to build and run. Default: `excel-to-pdf`.
    pub image_name: String,

    /// Container engine binary. Default: `podman`.
    pub engine: String,

    /// Build context directory. `None` means the current working directory.
    pub build_context: Option<PathBuf>,

    /// Dockerfile path. `None` means `<build context>/Dockerfile`.
    pub dockerfile: Option<PathBuf>,

    /// Extensions accepted in batch mode, with leading dot, compared
    /// case-insensitively. Default: `.xlsx`, `.xls`, `.xlsm`.
    pub extensions: Vec<String>,

    /// Per-file progress events.
    pub progress_callback: Option<ProgressCallback>,
}

impl Default for SpreadsheetConfig {
    fn default() -> Self {
        Self {
            image_name: DEFAULT_IMAGE_NAME.to_string(),
            engine: DEFAULT_ENGINE.to_string(),
            build_context: None,
            dockerfile: None,
            extensions: DEFAULT_SPREADSHEET_EXTENSIONS
                .iter()
                .map(|e| e.to_string())
                .collect(),
            progress_callback: None,
        }
    }
}

impl fmt::Debug for SpreadsheetConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SpreadsheetConfig")
            .field("image_name", &self.image_name)
            .field("engine", &self.engine)
            .field("build_context", &self.build_context)
            .field("dockerfile", &self.dockerfile)
            .field("extensions", &self.extensions)
            .finish()
    }
}

impl SpreadsheetConfig {
    /// Create a new builder for `SpreadsheetConfig`.
    pub fn builder() -> SpreadsheetConfigBuilder {
        SpreadsheetConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`SpreadsheetConfig`].
pub struct SpreadsheetConfigBuilder {
    config: SpreadsheetConfig,
}

impl SpreadsheetConfigBuilder {
    pub fn image_name(mut self, name: impl Into<String>) -> Self {
        self.config.image_name = name.into();
        self
    }

    pub fn engine(mut self, engine: impl Into<String>) -> Self {
        self.config.engine = engine.into();
        self
    }

    pub fn build_context(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.build_context = Some(dir.into());
        self
    }

    pub fn dockerfile(mut self, path: impl Into<PathBuf>) -> Self {
        self.config.dockerfile = Some(path.into());
        self
    }

    pub fn extensions<I, S>(mut self, exts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.config.extensions = exts.into_iter().map(Into::into).collect();
        self
    }

    pub fn progress_callback(mut self, cb: ProgressCallback) -> Self {
        self.config.progress_callback = Some(cb);
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<SpreadsheetConfig, DocToolsError> {
        let c = &self.config;
        if c.image_name.trim().is_empty() {
            return Err(DocToolsError::InvalidConfig(
                "container image name must not be empty".into(),
            ));
        }
        if c.engine.trim().is_empty() {
            return Err(DocToolsError::InvalidConfig(
                "container engine must not be empty".into(),
            ));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn raster_defaults() {
        let c = RasterConfig::default();
        assert_eq!(c.dpi, 300);
        assert_eq!(c.format, PageImageFormat::Png);
        assert!(c.output_dir.is_none());
    }

    #[test]
    fn raster_builder_rejects_zero_dpi() {
        let err = RasterConfig::builder().dpi(0).build().unwrap_err();
        assert!(matches!(err, DocToolsError::InvalidConfig(_)));
    }

    #[test]
    fn page_format_parses_case_insensitively() {
        assert_eq!("PNG".parse::<PageImageFormat>().unwrap(), PageImageFormat::Png);
        assert_eq!("jpg".parse::<PageImageFormat>().unwrap(), PageImageFormat::Jpg);
        assert_eq!(" Tiff ".parse::<PageImageFormat>().unwrap(), PageImageFormat::Tiff);
        assert!("gif".parse::<PageImageFormat>().is_err());
    }

    #[test]
    fn jpg_and_jpeg_share_an_encoder_but_not_an_extension() {
        assert_eq!(PageImageFormat::Jpg.image_format(), image::ImageFormat::Jpeg);
        assert_eq!(PageImageFormat::Jpeg.image_format(), image::ImageFormat::Jpeg);
        assert_eq!(PageImageFormat::Jpg.extension(), "jpg");
        assert_eq!(PageImageFormat::Jpeg.extension(), "jpeg");
    }

    #[test]
    fn markdown_defaults() {
        let c = MarkdownConfig::default();
        assert_eq!(c.model, "gemini-2.0-flash");
        assert_eq!(c.temperature, 0.0);
        assert_eq!(c.max_edge, 2000);
        assert_eq!(c.jpeg_quality, 85);
    }

    #[test]
    fn markdown_builder_validates_quality() {
        assert!(MarkdownConfig::builder().jpeg_quality(0).build().is_err());
        assert!(MarkdownConfig::builder().jpeg_quality(100).build().is_ok());
    }

    #[test]
    fn markdown_builder_rejects_empty_model() {
        assert!(MarkdownConfig::builder().model("  ").build().is_err());
    }

    #[test]
    fn spreadsheet_defaults() {
        let c = SpreadsheetConfig::default();
        assert_eq!(c.image_name, "excel-to-pdf");
        assert_eq!(c.engine, "podman");
        assert_eq!(c.extensions, vec![".xlsx", ".xls", ".xlsm"]);
    }

    #[test]
    fn spreadsheet_builder_overrides_extensions() {
        let c = SpreadsheetConfig::builder()
            .extensions([".ods"])
            .engine("docker")
            .build()
            .unwrap();
        assert_eq!(c.extensions, vec![".ods"]);
        assert_eq!(c.engine, "docker");
    }
}
