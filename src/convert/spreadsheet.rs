//! Spreadsheet → PDF via LibreOffice in a container.
//!
//! LibreOffice always names its output after the input's stem
//! (`report.xlsx` → `report.pdf`), so when the caller asks for a different
//! file name the converter renames the result afterwards.

use crate::config::SpreadsheetConfig;
use crate::error::DocToolsError;
use crate::pipeline::container::{
    BuildSpec, ContainerRuntime, EngineCli, Mount, RunSpec, INPUT_MOUNT, OUTPUT_MOUNT,
};
use crate::pipeline::discover::list_files_with_extensions;
use crate::progress::ProgressCallback;
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};

/// `<input without extension>.pdf`, alongside the input.
pub fn default_pdf_path(input: &Path) -> PathBuf {
    input.with_extension("pdf")
}

/// The file LibreOffice writes for `input` inside `output_dir`.
pub fn converter_output_path(input: &Path, output_dir: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default();
    let mut name = stem.to_os_string();
    name.push(".pdf");
    output_dir.join(name)
}

fn absolute(path: &Path) -> Result<PathBuf, DocToolsError> {
    std::path::absolute(path).map_err(|e| DocToolsError::io(path, e))
}

/// Converts spreadsheets to PDF by running a prebuilt container image.
pub struct SpreadsheetConverter<R: ContainerRuntime = EngineCli> {
    runtime: R,
    image_name: String,
    extensions: Vec<String>,
    progress: Option<ProgressCallback>,
}

impl SpreadsheetConverter<EngineCli> {
    /// Build the image with the engine named in `config` (default `podman`).
    pub async fn new(config: &SpreadsheetConfig) -> Result<Self, DocToolsError> {
        Self::with_runtime(EngineCli::new(config.engine.clone()), config).await
    }
}

impl<R: ContainerRuntime> SpreadsheetConverter<R> {
    /// Build the image with `runtime` and return a converter that uses it.
    ///
    /// The build context defaults to the current working directory and the
    /// Dockerfile to `<context>/Dockerfile`. Build failures propagate.
    pub async fn with_runtime(runtime: R, config: &SpreadsheetConfig) -> Result<Self, DocToolsError> {
        let context = match &config.build_context {
            Some(dir) => absolute(dir)?,
            None => std::env::current_dir().map_err(|e| DocToolsError::io(".", e))?,
        };
        let dockerfile = match &config.dockerfile {
            Some(path) => absolute(path)?,
            None => context.join("Dockerfile"),
        };

        let spec = BuildSpec {
            image: config.image_name.clone(),
            dockerfile,
            context,
        };
        if let Err(e) = runtime.build_image(&spec).await {
            error!("Image build failed: {}", e);
            return Err(e);
        }

        Ok(Self {
            runtime,
            image_name: config.image_name.clone(),
            extensions: config.extensions.clone(),
            progress: config.progress_callback.clone(),
        })
    }

    pub fn image_name(&self) -> &str {
        &self.image_name
    }

    pub fn runtime(&self) -> &R {
        &self.runtime
    }

    /// Convert one spreadsheet.
    ///
    /// `output` defaults to [`default_pdf_path`]. Both paths are made
    /// absolute; the final absolute output path is returned. An existing file
    /// at the output path is overwritten. A run that exits cleanly without
    /// writing a PDF is reported as
    /// [`DocToolsError::ConversionProducedNoOutput`].
    pub async fn convert_file(
        &self,
        input: impl AsRef<Path>,
        output: Option<&Path>,
    ) -> Result<PathBuf, DocToolsError> {
        let input_path = absolute(input.as_ref())?;
        let pdf_path = match output {
            Some(p) => absolute(p)?,
            None => default_pdf_path(&input_path),
        };

        let (Some(input_dir), Some(output_dir), Some(file_name)) = (
            input_path.parent(),
            pdf_path.parent(),
            input_path.file_name(),
        ) else {
            return Err(DocToolsError::FileNotFound {
                path: input_path.clone(),
            });
        };

        tokio::fs::create_dir_all(output_dir)
            .await
            .map_err(|e| DocToolsError::io(output_dir, e))?;

        let spec = RunSpec {
            image: self.image_name.clone(),
            mounts: vec![
                Mount {
                    host: input_dir.to_path_buf(),
                    container: INPUT_MOUNT.to_string(),
                },
                Mount {
                    host: output_dir.to_path_buf(),
                    container: OUTPUT_MOUNT.to_string(),
                },
            ],
            args: vec![
                "--outdir".to_string(),
                OUTPUT_MOUNT.to_string(),
                format!("{}/{}", INPUT_MOUNT, file_name.to_string_lossy()),
            ],
        };

        // Anything at LibreOffice's target after the run must come from this run.
        let produced = converter_output_path(&input_path, output_dir);
        if produced != input_path && produced.exists() {
            tokio::fs::remove_file(&produced)
                .await
                .map_err(|e| DocToolsError::io(&produced, e))?;
        }

        info!("Converting {} → {}", input_path.display(), pdf_path.display());
        if let Err(e) = self.runtime.run_container(&spec).await {
            error!("Conversion of {} failed: {}", input_path.display(), e);
            return Err(e);
        }

        // soffice exits 0 even when it cannot load the input.
        if !produced.exists() {
            error!("No PDF produced for {}", input_path.display());
            return Err(DocToolsError::ConversionProducedNoOutput {
                input: input_path,
                expected: produced,
            });
        }

        if produced != pdf_path {
            if pdf_path.exists() {
                warn!("Overwriting existing {}", pdf_path.display());
            }
            tokio::fs::rename(&produced, &pdf_path)
                .await
                .map_err(|e| DocToolsError::io(&produced, e))?;
        }

        info!("Converted: {}", pdf_path.display());
        Ok(pdf_path)
    }

    /// Convert every matching spreadsheet directly inside `input_dir`.
    ///
    /// `output_dir` defaults to `input_dir` and is created if missing.
    /// `extensions` defaults to the configured list. A failing file is logged
    /// and skipped; the returned list holds only the converted PDFs.
    pub async fn batch_convert(
        &self,
        input_dir: impl AsRef<Path>,
        output_dir: Option<&Path>,
        extensions: Option<&[String]>,
    ) -> Result<Vec<PathBuf>, DocToolsError> {
        let input_dir = absolute(input_dir.as_ref())?;
        let output_dir = match output_dir {
            Some(dir) => {
                let dir = absolute(dir)?;
                tokio::fs::create_dir_all(&dir)
                    .await
                    .map_err(|e| DocToolsError::io(&dir, e))?;
                dir
            }
            None => input_dir.clone(),
        };

        let extensions = extensions.unwrap_or(self.extensions.as_slice());
        let files = list_files_with_extensions(&input_dir, extensions)?;
        let total = files.len();
        info!("Found {} spreadsheets in {}", total, input_dir.display());

        let progress = self.progress.as_ref();
        if let Some(cb) = progress {
            cb.on_conversion_start(total);
        }

        let mut converted = Vec::with_capacity(total);
        for (i, file) in files.iter().enumerate() {
            let index = i + 1;
            if let Some(cb) = progress {
                cb.on_item_start(index, total, file);
            }

            let target = converter_output_path(file, &output_dir);
            match self.convert_file(file, Some(&target)).await {
                Ok(pdf) => {
                    if let Some(cb) = progress {
                        cb.on_item_complete(index, total, &pdf);
                    }
                    converted.push(pdf);
                }
                Err(e) => {
                    error!("Skipping {}: {}", file.display(), e);
                    if let Some(cb) = progress {
                        cb.on_item_error(index, total, &e.to_string());
                    }
                }
            }
        }

        if let Some(cb) = progress {
            cb.on_conversion_complete(total, converted.len());
        }
        Ok(converted)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_pdf_path_replaces_extension() {
        assert_eq!(
            default_pdf_path(Path::new("/data/q1.report.xlsx")),
            PathBuf::from("/data/q1.report.pdf")
        );
        assert_eq!(default_pdf_path(Path::new("/data/plain")), PathBuf::from("/data/plain.pdf"));
    }

    #[test]
    fn converter_output_uses_input_stem() {
        assert_eq!(
            converter_output_path(Path::new("/in/Budget.XLSM"), Path::new("/out")),
            PathBuf::from("/out/Budget.pdf")
        );
    }

    #[test]
    fn default_path_derivation_is_idempotent() {
        let input = absolute(Path::new("sheets/summary.xls")).unwrap();
        assert_eq!(default_pdf_path(&input), default_pdf_path(&input));
        assert!(default_pdf_path(&input).is_absolute());
    }
}
