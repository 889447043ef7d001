//! Container engine: build the LibreOffice image and run one conversion.
//!
//! The spreadsheet converter never talks to LibreOffice directly. It asks a
//! [`ContainerRuntime`] to build an image once and then to run it once per
//! file with two bind mounts. [`EngineCli`] drives the `podman` (or
//! `docker`) CLI with inherited stdio so the engine's own output stays
//! visible; tests substitute a fake runtime.

use crate::error::DocToolsError;
use async_trait::async_trait;
use std::path::PathBuf;
use tracing::{debug, info};

/// Mount point of the input directory inside the container.
pub const INPUT_MOUNT: &str = "/input";

/// Mount point of the output directory inside the container.
pub const OUTPUT_MOUNT: &str = "/output";

/// What to build: `<engine> build -t <image> -f <dockerfile> <context>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BuildSpec {
    pub image: String,
    pub dockerfile: PathBuf,
    pub context: PathBuf,
}

/// A host directory bound into the container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mount {
    pub host: PathBuf,
    pub container: String,
}

/// What to run: `<engine> run --rm -v host:container… <image> <args…>`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSpec {
    pub image: String,
    pub mounts: Vec<Mount>,
    pub args: Vec<String>,
}

/// Builds and runs container images.
#[async_trait]
pub trait ContainerRuntime: Send + Sync {
    /// Build (or rebuild from cache) the image described by `spec`.
    async fn build_image(&self, spec: &BuildSpec) -> Result<(), DocToolsError>;

    /// Run the image to completion and remove the container.
    async fn run_container(&self, spec: &RunSpec) -> Result<(), DocToolsError>;
}

/// [`ContainerRuntime`] that shells out to a container engine CLI.
#[derive(Debug, Clone)]
pub struct EngineCli {
    program: String,
}

impl EngineCli {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments (after the program name) for an image build.
    pub fn build_args(spec: &BuildSpec) -> Vec<String> {
        vec![
            "build".to_string(),
            "-t".to_string(),
            spec.image.clone(),
            "-f".to_string(),
            spec.dockerfile.display().to_string(),
            spec.context.display().to_string(),
        ]
    }

    /// Arguments (after the program name) for a one-shot container run.
    pub fn run_args(spec: &RunSpec) -> Vec<String> {
        let mut args = vec!["run".to_string(), "--rm".to_string()];
        for mount in &spec.mounts {
            args.push("-v".to_string());
            args.push(format!("{}:{}", mount.host.display(), mount.container));
        }
        args.push(spec.image.clone());
        args.extend(spec.args.iter().cloned());
        args
    }

    async fn execute(&self, args: Vec<String>) -> Result<(), DocToolsError> {
        let command = format!("{} {}", self.program, args.join(" "));
        debug!("Executing: {}", command);

        let status = tokio::process::Command::new(&self.program)
            .args(&args)
            .status()
            .await
            .map_err(|source| DocToolsError::ContainerEngineUnavailable {
                program: self.program.clone(),
                source,
            })?;

        if !status.success() {
            return Err(DocToolsError::ContainerCommandFailed {
                command,
                status: status.to_string(),
            });
        }
        Ok(())
    }
}

impl Default for EngineCli {
    fn default() -> Self {
        Self::new(crate::config::DEFAULT_ENGINE)
    }
}

#[async_trait]
impl ContainerRuntime for EngineCli {
    async fn build_image(&self, spec: &BuildSpec) -> Result<(), DocToolsError> {
        info!(engine = %self.program, image = %spec.image, "Building container image");
        self.execute(Self::build_args(spec)).await?;
        info!(image = %spec.image, "Container image built");
        Ok(())
    }

    async fn run_container(&self, spec: &RunSpec) -> Result<(), DocToolsError> {
        self.execute(Self::run_args(spec)).await
    }
}
