use std::ffi::OsString;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use conjure_checksum::OutputFile;
use conjure_core::ConjureDefinition;
use tempfile::TempDir;
use tokio::process::Command;

use crate::error::GeneratorError;

const STAGED_DIR: &str = "out";

/// Environment variable carrying the project's real output directory.
pub const OUTPUT_DIR_ENV: &str = "CONJURE_OUTPUT_DIR";

/// Where and what a generator should produce.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputConfiguration {
    /// Absolute output directory.
    pub output_dir: PathBuf,
    pub generate_server: bool,
}

/// Turns an IR definition into source files.
pub trait Generator: Send + Sync {
    /// Write the generated files under `config.output_dir`.
    fn generate(
        &self,
        definition: &ConjureDefinition,
        config: &OutputConfiguration,
    ) -> impl Future<Output = Result<(), GeneratorError>> + Send;

    /// The files [`Generator::generate`] would write, without touching
    /// `config.output_dir`.
    fn output_files(
        &self,
        definition: &ConjureDefinition,
        config: &OutputConfiguration,
    ) -> impl Future<Output = Result<Vec<OutputFile>, GeneratorError>> + Send;
}

/// Runs an external code generator as
/// `<command> [args..] [--server] <ir-file> <write-dir>`.
///
/// `<write-dir>` is where files go: the output directory itself when
/// generating, a scratch directory when only listing output files. Either
/// way [`OUTPUT_DIR_ENV`] names the real output directory, so content that
/// depends on the destination path renders the same in both modes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExternalGenerator {
    command: PathBuf,
    args: Vec<String>,
}

impl ExternalGenerator {
    #[must_use]
    pub fn new(command: impl Into<PathBuf>, args: Vec<String>) -> Self {
        Self {
            command: command.into(),
            args,
        }
    }

    #[must_use]
    pub fn command(&self) -> &Path {
        &self.command
    }

    async fn invoke(
        &self,
        definition: &ConjureDefinition,
        write_dir: &Path,
        config: &OutputConfiguration,
        scratch: &Path,
    ) -> Result<(), GeneratorError> {
        let ir_path = scratch.join("conjure-ir.json");
        tokio::fs::write(&ir_path, definition.to_ir_bytes()?)
            .await
            .map_err(GeneratorError::io(&ir_path))?;
        tokio::fs::create_dir_all(write_dir)
            .await
            .map_err(GeneratorError::io(write_dir))?;

        let mut args = self.args.iter().map(OsString::from).collect::<Vec<_>>();
        if config.generate_server {
            args.push("--server".into());
        }
        args.push(ir_path.into_os_string());
        args.push(write_dir.as_os_str().to_owned());

        let command_line = std::iter::once(self.command.as_os_str())
            .chain(args.iter().map(OsString::as_os_str))
            .map(|part| part.to_string_lossy())
            .collect::<Vec<_>>()
            .join(" ");
        tracing::debug!(
            command = %command_line,
            output_dir = %config.output_dir.display(),
            "running generator"
        );

        let output = Command::new(&self.command)
            .args(&args)
            .env(OUTPUT_DIR_ENV, &config.output_dir)
            .output()
            .await
            .map_err(|source| GeneratorError::Spawn {
                command: self.command.display().to_string(),
                source,
            })?;
        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(GeneratorError::Failed {
                command: command_line,
                output: combined,
            });
        }
        Ok(())
    }
}

impl Generator for ExternalGenerator {
    async fn generate(
        &self,
        definition: &ConjureDefinition,
        config: &OutputConfiguration,
    ) -> Result<(), GeneratorError> {
        let scratch = tempfile::tempdir().map_err(GeneratorError::io(std::env::temp_dir()))?;
        self.invoke(definition, &config.output_dir, config, scratch.path())
            .await
    }

    async fn output_files(
        &self,
        definition: &ConjureDefinition,
        config: &OutputConfiguration,
    ) -> Result<Vec<OutputFile>, GeneratorError> {
        // Shared by the render closures so the generated files outlive this call.
        let scratch = Arc::new(
            tempfile::tempdir().map_err(GeneratorError::io(std::env::temp_dir()))?,
        );
        let staged = scratch.path().join(STAGED_DIR);
        self.invoke(definition, &staged, config, scratch.path())
            .await?;

        let mut relative = Vec::new();
        list_files(&staged, Path::new(""), &mut relative)?;
        relative.sort();

        Ok(relative
            .into_iter()
            .map(|rel| staged_file(&scratch, &rel, &config.output_dir))
            .collect())
    }
}

fn staged_file(scratch: &Arc<TempDir>, rel: &Path, output_dir: &Path) -> OutputFile {
    let scratch = Arc::clone(scratch);
    let source = Path::new(STAGED_DIR).join(rel);
    OutputFile::new(output_dir.join(rel), move || {
        std::fs::read(scratch.path().join(&source)).map_err(Into::into)
    })
}

fn list_files(dir: &Path, prefix: &Path, out: &mut Vec<PathBuf>) -> Result<(), GeneratorError> {
    for entry in std::fs::read_dir(dir).map_err(GeneratorError::io(dir))? {
        let entry = entry.map_err(GeneratorError::io(dir))?;
        let path = entry.path();
        let rel = prefix.join(entry.file_name());
        if path.is_dir() {
            list_files(&path, &rel, out)?;
        } else {
            out.push(rel);
        }
    }
    Ok(())
}
