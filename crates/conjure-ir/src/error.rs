//! IR acquisition error types.

use std::path::PathBuf;

use conjure_core::ProductDependencyError;
use thiserror::Error;

/// Errors raised while obtaining IR bytes from a provider or the compiler.
#[derive(Debug, Error)]
pub enum IrError {
    /// Filesystem failure on a named path.
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The YAML input path does not exist.
    #[error("path {} does not exist", path.display())]
    MissingInput { path: PathBuf },

    /// The shared HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(#[source] reqwest::Error),

    /// HTTP transport error.
    #[error("failed to fetch {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    /// The remote endpoint answered with a status other than 200.
    #[error("fetching {url} returned status {status}")]
    Status { url: String, status: u16 },

    /// The compiler ran and failed. `output` is its combined stdout and stderr.
    #[error("failed to compile IR: {command} failed with output:\n{output}")]
    Compile { command: String, output: String },

    /// The compiler executable could not be run or is missing after unpacking.
    #[error("conjure compiler unavailable at {}: {reason}", path.display())]
    CompilerUnavailable { path: PathBuf, reason: String },

    /// A recommended product dependency failed to render.
    #[error(transparent)]
    ProductDependency(#[from] ProductDependencyError),

    /// A blocking task on the runtime's worker pool panicked or was cancelled.
    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),

    /// Serializing compiler parameters failed.
    #[error("failed to serialize compiler extensions: {0}")]
    Json(#[from] serde_json::Error),
}

impl IrError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
