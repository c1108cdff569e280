use std::fmt;
use std::path::{Path, PathBuf};

use crate::error::RenderError;

type RenderFn = Box<dyn Fn() -> Result<Vec<u8>, RenderError> + Send + Sync>;

/// A file a generator would write, with its content produced on demand.
///
/// Rendering is not assumed to be cheap or idempotent; callers render each
/// file at most once per checksum pass.
pub struct OutputFile {
    path: PathBuf,
    render: RenderFn,
}

impl OutputFile {
    pub fn new<F>(path: impl Into<PathBuf>, render: F) -> Self
    where
        F: Fn() -> Result<Vec<u8>, RenderError> + Send + Sync + 'static,
    {
        Self {
            path: path.into(),
            render: Box::new(render),
        }
    }

    /// A file whose content is already known.
    pub fn from_bytes(path: impl Into<PathBuf>, content: impl Into<Vec<u8>>) -> Self {
        let content = content.into();
        Self::new(path, move || Ok(content.clone()))
    }

    /// Absolute path the file would be written to.
    #[must_use]
    pub fn abs_path(&self) -> &Path {
        &self.path
    }

    /// Produce the file content.
    ///
    /// # Errors
    ///
    /// Returns whatever the render closure fails with.
    pub fn render(&self) -> Result<Vec<u8>, RenderError> {
        (self.render)()
    }
}

impl fmt::Debug for OutputFile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OutputFile")
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}
