//! The publish sweep over configured projects.

use std::io::Write;
use std::sync::Arc;

use conjure_core::VersionProvider;
use conjure_ir::ProjectParams;

use crate::error::PublishError;
use crate::publisher::{Artifact, Publisher, PublisherFlags, artifact_file_name};

/// Publish the IR of every project marked for publishing, in key order.
///
/// When no project is eligible this returns immediately, without resolving
/// a version. Otherwise one version is resolved for the whole invocation
/// and each IR is staged in a scratch directory that is removed on return.
///
/// # Errors
///
/// Version, IR, staging, or upload failures abort the sweep at that project.
pub async fn publish<P: Publisher>(
    params: &ProjectParams,
    versions: Arc<dyn VersionProvider>,
    publisher: &P,
    flags: &PublisherFlags,
    dry_run: bool,
    out: &mut (dyn Write + Send),
) -> Result<(), PublishError> {
    let eligible = params
        .ordered()
        .filter(|(_, param)| param.publish)
        .collect::<Vec<_>>();
    if eligible.is_empty() {
        tracing::info!("no projects to publish");
        return Ok(());
    }

    let version = tokio::task::spawn_blocking(move || versions.project_version())
        .await
        .map_err(|e| PublishError::Version(anyhow::Error::new(e)))?
        .map_err(PublishError::Version)?;

    let scratch = tempfile::tempdir().map_err(PublishError::io(std::env::temp_dir()))?;
    for (key, param) in eligible {
        let bytes = param
            .ir_provider
            .ir_bytes()
            .await
            .map_err(|source| PublishError::Ir {
                key: key.to_string(),
                source,
            })?;

        let dir = scratch.path().join(format!("conjure-{key}"));
        tokio::fs::create_dir_all(&dir)
            .await
            .map_err(PublishError::io(&dir))?;
        let path = dir.join(artifact_file_name(key, &version));
        tokio::fs::write(&path, &bytes)
            .await
            .map_err(PublishError::io(&path))?;

        tracing::info!(project = key, %version, dry_run, "publishing");
        let artifact = Artifact {
            key: key.to_string(),
            version: version.clone(),
            path,
        };
        publisher.publish(&artifact, flags, dry_run, out).await?;
    }
    Ok(())
}
