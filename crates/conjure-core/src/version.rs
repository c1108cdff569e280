//! Project-version seam.

/// Source of the enclosing project's release version.
///
/// Implemented by the git-backed version source in `conjure-publish` and by
/// [`StaticVersion`] for fixed versions. Closures returning
/// `anyhow::Result<String>` implement it too.
pub trait VersionProvider: Send + Sync {
    /// Return the current project version.
    ///
    /// # Errors
    ///
    /// Returns an error if the version cannot be determined (for example, the
    /// project is not a versioned checkout).
    fn project_version(&self) -> anyhow::Result<String>;
}

impl<F> VersionProvider for F
where
    F: Fn() -> anyhow::Result<String> + Send + Sync,
{
    fn project_version(&self) -> anyhow::Result<String> {
        self()
    }
}

/// A version known up front.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct StaticVersion(pub String);

impl VersionProvider for StaticVersion {
    fn project_version(&self) -> anyhow::Result<String> {
        Ok(self.0.clone())
    }
}
