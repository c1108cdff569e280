use clap::{Args, Subcommand};

#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Generate code for every configured project.
    Run(RunArgs),
    /// Upload the IR of publishable projects.
    Publish(PublishArgs),
}

/// Arguments for `conjure-plugin run`.
#[derive(Clone, Debug, Default, Args)]
pub struct RunArgs {
    /// Check that generated code matches what is on disk instead of writing it.
    #[arg(long)]
    pub verify: bool,
}

/// Arguments for `conjure-plugin publish`.
#[derive(Clone, Debug, Default, Args)]
pub struct PublishArgs {
    /// Print what would be uploaded without uploading.
    #[arg(long)]
    pub dry_run: bool,
    /// Artifactory base URL.
    #[arg(long)]
    pub url: Option<String>,
    #[arg(long)]
    pub username: Option<String>,
    #[arg(long)]
    pub password: Option<String>,
    /// Target repository.
    #[arg(long)]
    pub repository: Option<String>,
    /// Maven group ID, e.g. com.example.
    #[arg(long)]
    pub group_id: Option<String>,
    /// Skip POM generation and upload.
    #[arg(long)]
    pub no_pom: bool,
}
