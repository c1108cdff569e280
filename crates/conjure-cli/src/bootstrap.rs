use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use conjure_config::{ConjurePluginConfig, PluginSettings, ProviderContext};
use conjure_core::VersionProvider;
use conjure_ir::{Compiler, ProjectParams, build_client};
use conjure_publish::GitVersionSource;

use crate::cli::GlobalFlags;

/// Everything a command needs, resolved from flags, settings, and the
/// project configuration file.
pub struct Bootstrap {
    pub project_dir: PathBuf,
    pub settings: PluginSettings,
    pub client: reqwest::Client,
    pub versions: Arc<dyn VersionProvider>,
    pub params: ProjectParams,
}

pub fn load(flags: &GlobalFlags) -> anyhow::Result<Bootstrap> {
    let project_dir = resolve_project_dir(&flags.project_dir)?;
    let settings = PluginSettings::load_with_dotenv(&project_dir)
        .context("failed to load conjure-plugin settings")?;

    let client = build_client(&settings.http.options())?;
    let compiler = Compiler::new(settings.compiler_source()?, client.clone());
    let versions: Arc<dyn VersionProvider> = Arc::new(GitVersionSource::new(&project_dir));

    let config_path = flags.config_path(&project_dir);
    let config = ConjurePluginConfig::from_file(&config_path)?;
    let params = config.to_params(&ProviderContext {
        project_dir: project_dir.clone(),
        compiler: Arc::new(compiler),
        client: client.clone(),
        versions: Arc::clone(&versions),
    })?;
    tracing::debug!(
        config = %config_path.display(),
        projects = params.len(),
        "loaded project configuration"
    );

    Ok(Bootstrap {
        project_dir,
        settings,
        client,
        versions,
        params,
    })
}

fn resolve_project_dir(path: &Path) -> anyhow::Result<PathBuf> {
    if !path.is_dir() {
        anyhow::bail!(
            "invalid --project-dir '{}': directory does not exist",
            path.display()
        );
    }
    path.canonicalize()
        .with_context(|| format!("failed to resolve project directory {}", path.display()))
}
