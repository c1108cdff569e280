//! Tool settings: which compiler and generator to run, and how to reach the
//! network.
//!
//! Sources, highest priority first:
//! 1. Environment variables (`CONJURE_PLUGIN_*`, `__` separates sections)
//! 2. Project-level `<project>/.conjure-plugin.toml`
//! 3. User-level `~/.config/conjure-plugin/config.toml`
//! 4. Built-in defaults
//!
//! `CONJURE_PLUGIN_COMPILER__VERSION=4.9.0` maps to `compiler.version`,
//! `CONJURE_PLUGIN_HTTP__CONNECT_TIMEOUT_SECS=5` to
//! `http.connect_timeout_secs`.

use std::path::{Path, PathBuf};
use std::time::Duration;

use conjure_ir::{CompilerSource, DEFAULT_USER_AGENT, HttpOptions};
use figment::Figment;
use figment::providers::{Env, Format, Serialized, Toml};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

pub const ENV_PREFIX: &str = "CONJURE_PLUGIN_";
pub const PROJECT_SETTINGS_FILE: &str = ".conjure-plugin.toml";
const APP_DIR: &str = "conjure-plugin";
const VERSION_PLACEHOLDER: &str = "{version}";

const fn default_connect_timeout_secs() -> u64 {
    30
}

fn default_user_agent() -> String {
    DEFAULT_USER_AGENT.to_string()
}

fn default_generator_command() -> String {
    "conjure-go".to_string()
}

/// How to obtain the `conjure` compiler.
///
/// `path` wins when set. Otherwise a non-empty `version` selects a bundle
/// downloaded from `archive_url`, where `{version}` is substituted.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CompilerSettings {
    #[serde(default)]
    pub path: String,
    #[serde(default)]
    pub version: String,
    #[serde(default)]
    pub archive_url: String,
}

impl CompilerSettings {
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a bundle version is set
    /// without an archive URL.
    pub fn source(&self, cache_dir: &Path) -> Result<CompilerSource, ConfigError> {
        if !self.path.is_empty() {
            return Ok(CompilerSource::Binary(PathBuf::from(&self.path)));
        }
        if self.version.is_empty() {
            return Ok(CompilerSource::Binary(PathBuf::from("conjure")));
        }
        if self.archive_url.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "compiler.archive_url".to_string(),
                reason: format!("required when compiler.version ({}) is set", self.version),
            });
        }
        Ok(CompilerSource::Bundle {
            version: self.version.clone(),
            archive: self.archive_url.replace(VERSION_PLACEHOLDER, &self.version),
            cache_dir: cache_dir.to_path_buf(),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct GeneratorSettings {
    #[serde(default = "default_generator_command")]
    pub command: String,
    /// Arguments placed before `[--server] <ir-file> <write-dir>`.
    #[serde(default)]
    pub args: Vec<String>,
}

impl Default for GeneratorSettings {
    fn default() -> Self {
        Self {
            command: default_generator_command(),
            args: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct HttpSettings {
    #[serde(default = "default_connect_timeout_secs")]
    pub connect_timeout_secs: u64,
    #[serde(default = "default_user_agent")]
    pub user_agent: String,
}

impl Default for HttpSettings {
    fn default() -> Self {
        Self {
            connect_timeout_secs: default_connect_timeout_secs(),
            user_agent: default_user_agent(),
        }
    }
}

impl HttpSettings {
    #[must_use]
    pub fn options(&self) -> HttpOptions {
        HttpOptions {
            connect_timeout: Duration::from_secs(self.connect_timeout_secs),
            user_agent: self.user_agent.clone(),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct PluginSettings {
    #[serde(default)]
    pub compiler: CompilerSettings,
    #[serde(default)]
    pub generator: GeneratorSettings,
    #[serde(default)]
    pub http: HttpSettings,
    /// Where compiler bundles are unpacked. Empty means the platform cache
    /// directory.
    #[serde(default)]
    pub cache_dir: String,
}

impl PluginSettings {
    /// Load settings for `project_dir` from files and environment.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Figment`] if a source cannot be parsed or a
    /// value has the wrong type.
    pub fn load(project_dir: &Path) -> Result<Self, ConfigError> {
        Self::figment(project_dir).extract().map_err(ConfigError::from)
    }

    /// Like [`PluginSettings::load`], after loading `<project_dir>/.env`
    /// into the process environment if it exists.
    ///
    /// # Errors
    ///
    /// See [`PluginSettings::load`].
    pub fn load_with_dotenv(project_dir: &Path) -> Result<Self, ConfigError> {
        let env_path = project_dir.join(".env");
        if env_path.exists()
            && let Err(error) = dotenvy::from_path(&env_path)
        {
            tracing::warn!(path = %env_path.display(), %error, "ignoring unreadable .env file");
        }
        Self::load(project_dir)
    }

    /// The provider chain, exposed so tests can add providers on top.
    #[must_use]
    pub fn figment(project_dir: &Path) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(user_path) = Self::user_settings_path()
            && user_path.exists()
        {
            figment = figment.merge(Toml::file(user_path));
        }

        let project_path = project_dir.join(PROJECT_SETTINGS_FILE);
        if project_path.exists() {
            figment = figment.merge(Toml::file(project_path));
        }

        figment.merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    /// Resolved bundle cache directory.
    #[must_use]
    pub fn cache_dir(&self) -> PathBuf {
        if !self.cache_dir.is_empty() {
            return PathBuf::from(&self.cache_dir);
        }
        dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join(APP_DIR)
    }

    /// # Errors
    ///
    /// See [`CompilerSettings::source`].
    pub fn compiler_source(&self) -> Result<CompilerSource, ConfigError> {
        self.compiler.source(&self.cache_dir())
    }

    fn user_settings_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join(APP_DIR).join("config.toml"))
    }
}
