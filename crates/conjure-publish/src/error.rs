use std::path::PathBuf;

use conjure_ir::IrError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum PublishError {
    #[error("failed to determine project version: {0:#}")]
    Version(#[source] anyhow::Error),

    #[error("not a git repository: {}", .0.display())]
    NotGitRepo(PathBuf),

    #[error("git error: {0}")]
    Git(String),

    #[error("failed to obtain IR for project {key}: {source}")]
    Ir {
        key: String,
        #[source]
        source: IrError,
    },

    #[error("I/O error on {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("publish flag --{0} is required")]
    MissingFlag(&'static str),

    #[error("failed to upload to {url}: {source}")]
    Http {
        url: String,
        #[source]
        source: reqwest::Error,
    },

    #[error("uploading to {url} returned status {status}")]
    Status { url: String, status: u16 },

    #[error("failed to write publish output: {0}")]
    Output(#[source] std::io::Error),
}

impl PublishError {
    pub(crate) fn io(path: impl Into<PathBuf>) -> impl FnOnce(std::io::Error) -> Self {
        let path = path.into();
        move |source| Self::Io { path, source }
    }
}
