//! Project version from git tags.

use std::path::{Path, PathBuf};
use std::process::Command;

use conjure_core::VersionProvider;

use crate::error::PublishError;

const DIRTY_SUFFIX: &str = ".dirty";

/// Derives the project version from `git describe`.
///
/// `v1.2.3` on a clean checkout yields `1.2.3`; two commits past the tag
/// yields `1.2.3-2-g<hash>`; uncommitted changes append `.dirty`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GitVersionSource {
    project_dir: PathBuf,
}

impl GitVersionSource {
    #[must_use]
    pub fn new(project_dir: impl Into<PathBuf>) -> Self {
        Self {
            project_dir: project_dir.into(),
        }
    }

    #[must_use]
    pub fn project_dir(&self) -> &Path {
        &self.project_dir
    }

    /// # Errors
    ///
    /// - [`PublishError::NotGitRepo`] if the directory is not inside a git checkout
    /// - [`PublishError::Git`] if `git` cannot be run or the repository has no tags
    pub fn version(&self) -> Result<String, PublishError> {
        gix::discover(&self.project_dir)
            .map_err(|_| PublishError::NotGitRepo(self.project_dir.clone()))?;

        let described = self.git(&["describe", "--tags", "--first-parent"])?;
        let described = described.trim();
        let mut version = described
            .strip_prefix('v')
            .unwrap_or(described)
            .to_string();

        if !self.git(&["status", "--porcelain"])?.trim().is_empty() {
            version.push_str(DIRTY_SUFFIX);
        }
        tracing::debug!(dir = %self.project_dir.display(), %version, "resolved project version");
        Ok(version)
    }

    fn git(&self, args: &[&str]) -> Result<String, PublishError> {
        let output = Command::new("git")
            .args(args)
            .current_dir(&self.project_dir)
            .output()
            .map_err(|e| PublishError::Git(format!("run git {}: {e}", args.join(" "))))?;
        if !output.status.success() {
            return Err(PublishError::Git(format!(
                "git {} failed: {}",
                args.join(" "),
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }
        Ok(String::from_utf8_lossy(&output.stdout).to_string())
    }
}

impl VersionProvider for GitVersionSource {
    fn project_version(&self) -> anyhow::Result<String> {
        Ok(self.version()?)
    }
}
