use std::path::{Path, PathBuf};

pub const DEFAULT_CONFIG_FILE: &str = "conjure-plugin.yml";

/// Global flags available before or after subcommands.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GlobalFlags {
    pub project_dir: PathBuf,
    pub config: Option<PathBuf>,
    pub quiet: bool,
    pub debug: bool,
}

impl GlobalFlags {
    /// The project configuration file. A relative `--config` is resolved
    /// against the project directory.
    #[must_use]
    pub fn config_path(&self, project_dir: &Path) -> PathBuf {
        self.config.as_ref().map_or_else(
            || project_dir.join(DEFAULT_CONFIG_FILE),
            |config| project_dir.join(config),
        )
    }
}
