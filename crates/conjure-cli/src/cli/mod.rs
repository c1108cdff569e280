use std::path::PathBuf;

use clap::Parser;

pub mod global;
pub mod root_commands;

pub use global::GlobalFlags;
pub use root_commands::{Commands, PublishArgs, RunArgs};

/// Top-level CLI parser for the `conjure-plugin` binary.
#[derive(Debug, Parser)]
#[command(
    name = "conjure-plugin",
    version,
    about = "Generate, verify, and publish Conjure projects"
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Project directory; locators and output directories are relative to it
    #[arg(long, global = true, default_value = ".")]
    pub project_dir: PathBuf,

    /// Project configuration file (defaults to <project-dir>/conjure-plugin.yml)
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Quiet mode (errors only)
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Debug logging
    #[arg(short, long, global = true, visible_alias = "verbose")]
    pub debug: bool,
}

impl Cli {
    #[must_use]
    pub fn global_flags(&self) -> GlobalFlags {
        GlobalFlags {
            project_dir: self.project_dir.clone(),
            config: self.config.clone(),
            quiet: self.quiet,
            debug: self.debug,
        }
    }
}
