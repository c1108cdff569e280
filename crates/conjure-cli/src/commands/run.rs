use conjure_generator::{ExternalGenerator, RunMode};

use crate::bootstrap;
use crate::cli::{GlobalFlags, RunArgs};

/// Handle `conjure-plugin run`.
pub async fn handle(args: &RunArgs, flags: &GlobalFlags) -> anyhow::Result<()> {
    let ctx = bootstrap::load(flags)?;
    let generator = ExternalGenerator::new(
        &ctx.settings.generator.command,
        ctx.settings.generator.args.clone(),
    );
    let mode = if args.verify {
        RunMode::Verify
    } else {
        RunMode::Generate
    };

    conjure_generator::run(
        &ctx.params,
        mode,
        &ctx.project_dir,
        &generator,
        &mut std::io::stdout(),
    )
    .await?;
    Ok(())
}
