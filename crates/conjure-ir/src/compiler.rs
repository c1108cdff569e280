//! Wrapper around the external `conjure` compiler CLI.
//!
//! The compiler is invoked as `conjure compile <input> <output>
//! [--extensions <json>]`. It is either a binary that already exists (or is
//! on `PATH`), or a versioned bundle that is unpacked into a cache directory
//! on first use:
//!
//! ```text
//! <cache_dir>/conjure-<version>/bin/conjure
//! ```

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use flate2::read::GzDecoder;
use serde_json::{Map, Value};
use tokio::process::Command;

use crate::error::IrError;
use crate::http;

const DEFAULT_EXECUTABLE: &str = "conjure";

/// Where the compiler executable comes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CompilerSource {
    /// An executable path, or a bare name resolved through `PATH`.
    Binary(PathBuf),
    /// A gzipped tarball containing `conjure-<version>/bin/conjure`.
    Bundle {
        version: String,
        /// `http(s)://` URL or local path of the archive.
        archive: String,
        cache_dir: PathBuf,
    },
}

/// Extra inputs passed to a compilation.
#[derive(Debug, Clone, PartialEq)]
pub enum CompilerParam {
    /// JSON object merged into the IR `extensions` block.
    Extensions(Map<String, Value>),
}

#[derive(Debug, Clone)]
pub struct Compiler {
    source: CompilerSource,
    client: reqwest::Client,
}

impl Compiler {
    #[must_use]
    pub const fn new(source: CompilerSource, client: reqwest::Client) -> Self {
        Self { source, client }
    }

    /// The `conjure` found on `PATH`.
    #[must_use]
    pub fn on_path(client: reqwest::Client) -> Self {
        Self::new(CompilerSource::Binary(PathBuf::from(DEFAULT_EXECUTABLE)), client)
    }

    #[must_use]
    pub const fn source(&self) -> &CompilerSource {
        &self.source
    }

    /// Resolve the executable, unpacking the bundle if it is not cached yet.
    ///
    /// # Errors
    ///
    /// Returns [`IrError`] if the bundle archive cannot be fetched or
    /// unpacked, or does not contain the executable.
    pub async fn executable(&self) -> Result<PathBuf, IrError> {
        match &self.source {
            CompilerSource::Binary(path) => Ok(path.clone()),
            CompilerSource::Bundle {
                version,
                archive,
                cache_dir,
            } => self.ensure_bundle(version, archive, cache_dir).await,
        }
    }

    /// Compile a YAML file or directory of YAML files to IR bytes.
    ///
    /// # Errors
    ///
    /// Returns [`IrError::Compile`] with the compiler's output when it exits
    /// unsuccessfully, and other [`IrError`] variants when it cannot be run
    /// or its output cannot be read.
    pub async fn input_path_to_ir(
        &self,
        input: &Path,
        params: &[CompilerParam],
    ) -> Result<Vec<u8>, IrError> {
        let executable = self.executable().await?;
        let scratch = tempfile::tempdir().map_err(IrError::io(std::env::temp_dir()))?;
        let output_path = scratch.path().join("conjure-ir.json");

        let mut args: Vec<OsString> = vec![
            "compile".into(),
            input.as_os_str().to_owned(),
            output_path.as_os_str().to_owned(),
        ];
        for param in params {
            match param {
                CompilerParam::Extensions(extensions) => {
                    args.push("--extensions".into());
                    args.push(serde_json::to_string(extensions)?.into());
                }
            }
        }
        let command_line = describe(&executable, &args);
        tracing::debug!(command = %command_line, "running conjure compiler");

        let output = Command::new(&executable)
            .args(&args)
            .output()
            .await
            .map_err(|e| IrError::CompilerUnavailable {
                path: executable.clone(),
                reason: e.to_string(),
            })?;
        if !output.status.success() {
            let mut combined = String::from_utf8_lossy(&output.stdout).into_owned();
            combined.push_str(&String::from_utf8_lossy(&output.stderr));
            return Err(IrError::Compile {
                command: command_line,
                output: combined,
            });
        }

        tokio::fs::read(&output_path)
            .await
            .map_err(IrError::io(&output_path))
    }

    /// Compile in-memory YAML to IR bytes.
    ///
    /// # Errors
    ///
    /// See [`Compiler::input_path_to_ir`].
    pub async fn yaml_to_ir(
        &self,
        yaml: &[u8],
        params: &[CompilerParam],
    ) -> Result<Vec<u8>, IrError> {
        let scratch = tempfile::tempdir().map_err(IrError::io(std::env::temp_dir()))?;
        let input = scratch.path().join("in.yml");
        tokio::fs::write(&input, yaml)
            .await
            .map_err(IrError::io(&input))?;
        self.input_path_to_ir(&input, params).await
    }

    async fn ensure_bundle(
        &self,
        version: &str,
        archive: &str,
        cache_dir: &Path,
    ) -> Result<PathBuf, IrError> {
        let bundle_dir = cache_dir.join(format!("conjure-{version}"));
        let executable = bundle_dir.join("bin").join(DEFAULT_EXECUTABLE);
        if is_usable(&executable).await {
            return Ok(executable);
        }

        tracing::info!(version, archive, cache_dir = %cache_dir.display(), "unpacking conjure compiler");
        if tokio::fs::try_exists(&bundle_dir).await.unwrap_or(false) {
            tokio::fs::remove_dir_all(&bundle_dir)
                .await
                .map_err(IrError::io(&bundle_dir))?;
        }
        tokio::fs::create_dir_all(cache_dir)
            .await
            .map_err(IrError::io(cache_dir))?;

        let bytes = if is_remote(archive) {
            http::fetch(&self.client, archive).await?
        } else {
            tokio::fs::read(archive).await.map_err(IrError::io(archive))?
        };

        let dest = cache_dir.to_path_buf();
        tokio::task::spawn_blocking(move || unpack(&bytes, &dest))
            .await
            .map_err(|e| IrError::CompilerUnavailable {
                path: executable.clone(),
                reason: format!("unpack task failed: {e}"),
            })?
            .map_err(IrError::io(cache_dir))?;

        if !is_usable(&executable).await {
            return Err(IrError::CompilerUnavailable {
                path: executable,
                reason: format!("archive {archive} did not provide the executable"),
            });
        }
        Ok(executable)
    }
}

fn unpack(bytes: &[u8], dest: &Path) -> std::io::Result<()> {
    tar::Archive::new(GzDecoder::new(bytes)).unpack(dest)
}

fn is_remote(location: &str) -> bool {
    reqwest::Url::parse(location).is_ok_and(|url| matches!(url.scheme(), "http" | "https"))
}

async fn is_usable(path: &Path) -> bool {
    tokio::fs::metadata(path)
        .await
        .is_ok_and(|meta| meta.is_file() && meta.len() > 0)
}

fn describe(executable: &Path, args: &[OsString]) -> String {
    std::iter::once(executable.as_os_str())
        .chain(args.iter().map(OsString::as_os_str))
        .map(|part| part.to_string_lossy())
        .collect::<Vec<_>>()
        .join(" ")
}
