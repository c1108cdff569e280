use std::sync::Arc;

use conjure_publish::{ArtifactoryPublisher, PublisherFlags};

use crate::bootstrap;
use crate::cli::{GlobalFlags, PublishArgs};

/// Handle `conjure-plugin publish`.
pub async fn handle(args: &PublishArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ctx = bootstrap::load(flags)?;
    let publisher = ArtifactoryPublisher::new(ctx.client.clone());

    conjure_publish::publish(
        &ctx.params,
        Arc::clone(&ctx.versions),
        &publisher,
        &publisher_flags(args),
        args.dry_run,
        &mut std::io::stdout(),
    )
    .await?;
    Ok(())
}

fn publisher_flags(args: &PublishArgs) -> PublisherFlags {
    PublisherFlags {
        url: args.url.clone(),
        username: args.username.clone(),
        password: args.password.clone(),
        repository: args.repository.clone(),
        group_id: args.group_id.clone(),
        no_pom: args.no_pom,
    }
}
