//! # conjure-config
//!
//! Configuration for conjure-plugin, in two layers:
//!
//! - [`PluginSettings`]: tool settings (compiler, generator, HTTP, cache
//!   directory) layered with figment from defaults, user and project TOML
//!   files, and `CONJURE_PLUGIN_*` environment variables.
//! - [`ConjurePluginConfig`]: the per-repository YAML file listing projects,
//!   resolved into [`ProjectParams`](conjure_ir::ProjectParams) with
//!   [`ConjurePluginConfig::to_params`].

mod error;
mod project;
mod settings;

pub use error::ConfigError;
pub use project::{
    ConjurePluginConfig, IrLocatorConfig, LocatorType, ProductDependencyConfig, ProviderContext,
    SingleConjureConfig,
};
pub use settings::{
    CompilerSettings, ENV_PREFIX, GeneratorSettings, HttpSettings, PROJECT_SETTINGS_FILE,
    PluginSettings,
};
