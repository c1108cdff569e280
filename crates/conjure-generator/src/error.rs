use std::path::PathBuf;

use conjure_checksum::ChecksumError;
use conjure_core::CoreError;
use conjure_ir::IrError;
use thiserror::Error;

/// Errors raised by a [`Generator`](crate::Generator).
#[derive(Debug, Error)]
pub enum GeneratorError {
    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The generator process could not be started.
    #[error("failed to run generator {command}: {source}")]
    Spawn {
        command: String,
        #[source]
        source: std::io::Error,
    },

    /// The generator exited unsuccessfully. `output` is its combined stdout
    /// and stderr.
    #[error("{command} failed with output:\n{output}")]
    Failed { command: String, output: String },

    #[error(transparent)]
    Definition(#[from] CoreError),
}

impl GeneratorError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}

/// Errors that abort a run or verify invocation.
#[derive(Debug, Error)]
pub enum RunError {
    #[error("failed to obtain IR for project {key}: {source}")]
    Ir {
        key: String,
        #[source]
        source: IrError,
    },

    #[error("invalid IR for project {key}: {source}")]
    Definition {
        key: String,
        #[source]
        source: CoreError,
    },

    #[error("conjure failed for project {key}: {source}")]
    Generate {
        key: String,
        #[source]
        source: GeneratorError,
    },

    #[error("failed to compute on-disk checksums for project {key}: {source}")]
    OnDiskChecksums {
        key: String,
        #[source]
        source: ChecksumError,
    },

    #[error("failed to compute generated checksums for project {key}: {source}")]
    GeneratedChecksums {
        key: String,
        #[source]
        source: ChecksumError,
    },

    #[error("failed to write verify report: {0}")]
    Report(#[source] std::io::Error),

    /// Generated output differs from disk. The details were written to the
    /// report output.
    #[error("conjure verify failed")]
    VerifyFailed,
}
