use std::path::PathBuf;

use thiserror::Error;

/// Error returned by an [`OutputFile`](crate::OutputFile) render closure.
pub type RenderError = Box<dyn std::error::Error + Send + Sync>;

#[derive(Debug, Error)]
pub enum ChecksumError {
    /// A file path does not live under the checksum root.
    #[error("{} is not under {}", path.display(), root.display())]
    OutsideRoot { path: PathBuf, root: PathBuf },

    /// Rendering the in-memory content of a file failed.
    #[error("failed to render {}: {source}", path.display())]
    Render {
        path: PathBuf,
        #[source]
        source: RenderError,
    },

    /// A file exists on disk but could not be read.
    #[error("failed to checksum on-disk content for {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}
