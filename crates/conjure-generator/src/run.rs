//! The run/verify sweep over configured projects.

use std::fmt;
use std::io::Write;
use std::path::Path;

use conjure_checksum::{ChecksumSet, ChecksumsDiff};
use conjure_core::ConjureDefinition;
use conjure_ir::{ProjectParam, ProjectParams};

use crate::error::RunError;
use crate::generator::{Generator, OutputConfiguration};

const INDENT: &str = "  ";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    /// Write generated files to each project's output directory.
    Generate,
    /// Compare what would be generated with what is on disk. Writes nothing.
    Verify,
}

/// A project whose generated output differs from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VerifyFailure {
    /// Position of the project in key order.
    pub index: usize,
    pub key: String,
    pub diff: ChecksumsDiff,
}

/// Projects that failed verification, in key order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct VerifyReport {
    failures: Vec<VerifyFailure>,
}

impl VerifyReport {
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.failures.is_empty()
    }

    #[must_use]
    pub fn failures(&self) -> &[VerifyFailure] {
        &self.failures
    }

    fn record(&mut self, index: usize, key: &str, diff: ChecksumsDiff) {
        self.failures.push(VerifyFailure {
            index,
            key: key.to_string(),
            diff,
        });
    }
}

impl fmt::Display for VerifyReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let indices = self
            .failures
            .iter()
            .map(|failure| failure.index.to_string())
            .collect::<Vec<_>>();
        writeln!(
            f,
            "Conjure output differs from what currently exists: [{}]",
            indices.join(" ")
        )?;
        for failure in &self.failures {
            writeln!(f, "{INDENT}{} {}:", failure.index, failure.key)?;
            for line in failure.diff.to_string().lines() {
                writeln!(f, "{INDENT}{INDENT}{line}")?;
            }
        }
        Ok(())
    }
}

/// Generate or verify every project in `params`, in key order.
///
/// In verify mode, projects with drift are collected rather than failing
/// immediately; when any are found the report is written to `out` and
/// [`RunError::VerifyFailed`] is returned.
///
/// # Errors
///
/// Any IR, generation, or checksum failure aborts the sweep at that project.
pub async fn run<G: Generator>(
    params: &ProjectParams,
    mode: RunMode,
    project_dir: &Path,
    generator: &G,
    out: &mut dyn Write,
) -> Result<(), RunError> {
    match mode {
        RunMode::Generate => {
            for (key, param) in params.ordered() {
                let definition = load_definition(key, param).await?;
                let config = output_configuration(project_dir, param);
                tracing::info!(project = key, output_dir = %config.output_dir.display(), "generating");
                generator
                    .generate(&definition, &config)
                    .await
                    .map_err(|source| RunError::Generate {
                        key: key.to_string(),
                        source,
                    })?;
            }
            Ok(())
        }
        RunMode::Verify => {
            let report = verify(params, project_dir, generator).await?;
            if report.is_empty() {
                return Ok(());
            }
            write!(out, "{report}").map_err(RunError::Report)?;
            Err(RunError::VerifyFailed)
        }
    }
}

/// Diff every project against disk and collect the ones with drift.
///
/// # Errors
///
/// Any IR, generation, or checksum failure aborts the sweep at that project.
pub async fn verify<G: Generator>(
    params: &ProjectParams,
    project_dir: &Path,
    generator: &G,
) -> Result<VerifyReport, RunError> {
    let mut report = VerifyReport::default();
    for (index, (key, param)) in params.ordered().enumerate() {
        let definition = load_definition(key, param).await?;
        let config = output_configuration(project_dir, param);
        let diff = diff_on_disk(key, &definition, project_dir, &config, generator).await?;
        if diff.is_empty() {
            tracing::debug!(project = key, "generated output matches disk");
        } else {
            tracing::info!(project = key, changes = diff.len(), "generated output differs from disk");
            report.record(index, key, diff);
        }
    }
    Ok(report)
}

/// Render the project's output in memory and diff it against disk, with
/// disk as the original and the rendering as the update.
async fn diff_on_disk<G: Generator>(
    key: &str,
    definition: &ConjureDefinition,
    project_dir: &Path,
    config: &OutputConfiguration,
    generator: &G,
) -> Result<ChecksumsDiff, RunError> {
    let files = generator
        .output_files(definition, config)
        .await
        .map_err(|source| RunError::Generate {
            key: key.to_string(),
            source,
        })?;
    let on_disk = ChecksumSet::from_disk(&files, project_dir).map_err(|source| {
        RunError::OnDiskChecksums {
            key: key.to_string(),
            source,
        }
    })?;
    let rendered = ChecksumSet::from_rendered(&files, project_dir).map_err(|source| {
        RunError::GeneratedChecksums {
            key: key.to_string(),
            source,
        }
    })?;
    Ok(on_disk.diff(&rendered))
}

async fn load_definition(key: &str, param: &ProjectParam) -> Result<ConjureDefinition, RunError> {
    tracing::debug!(project = key, provider = %param.ir_provider.kind(), locator = %param.ir_provider.locator(), "loading IR");
    let bytes = param
        .ir_provider
        .ir_bytes()
        .await
        .map_err(|source| RunError::Ir {
            key: key.to_string(),
            source,
        })?;
    ConjureDefinition::from_ir_bytes(&bytes).map_err(|source| RunError::Definition {
        key: key.to_string(),
        source,
    })
}

fn output_configuration(project_dir: &Path, param: &ProjectParam) -> OutputConfiguration {
    OutputConfiguration {
        output_dir: project_dir.join(&param.output_dir),
        generate_server: param.server,
    }
}
