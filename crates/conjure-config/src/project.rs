//! The project configuration file (`conjure-plugin.yml`).
//!
//! ```yaml
//! projects:
//!   api:
//!     output-dir: internal/generated/conjure
//!     ir-locator: conjure/api.yml
//!   remote-api:
//!     output-dir: internal/generated/remote
//!     ir-locator:
//!       type: remote
//!       locator: https://example.com/api/ir.json
//!     server: true
//! ```
//!
//! Unknown keys are rejected. An `ir-locator` given as a plain string is a
//! locator with type `auto`.

use std::collections::{BTreeMap, HashMap};
use std::fmt;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use conjure_core::{ProductDependencies, ProductDependencyParam, VersionProvider};
use conjure_ir::{Compiler, IrProvider, ProjectParam, ProjectParams};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const SUPPORTED_VERSION: &str = "1";

#[derive(Debug, Clone, Default, PartialEq, Deserialize, Serialize)]
#[serde(deny_unknown_fields)]
pub struct ConjurePluginConfig {
    /// Schema version. Absent or `1`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub version: Option<serde_yaml::Value>,
    #[serde(default)]
    pub projects: BTreeMap<String, SingleConjureConfig>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct SingleConjureConfig {
    #[serde(default)]
    pub output_dir: String,
    #[serde(default)]
    pub ir_locator: IrLocatorConfig,
    /// Whether the project's IR is published. Absent means "only if the IR
    /// is generated from YAML".
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub publish: Option<bool>,
    #[serde(default)]
    pub server: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum LocatorType {
    #[default]
    Auto,
    Remote,
    Yaml,
    IrFile,
}

impl fmt::Display for LocatorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => f.write_str("auto"),
            Self::Remote => f.write_str("remote"),
            Self::Yaml => f.write_str("yaml"),
            Self::IrFile => f.write_str("ir-file"),
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(from = "IrLocatorInput")]
pub struct IrLocatorConfig {
    #[serde(rename = "type")]
    pub locator_type: LocatorType,
    pub locator: String,
    #[serde(rename = "product-dependencies", skip_serializing_if = "Vec::is_empty")]
    pub product_dependencies: Vec<ProductDependencyConfig>,
}

#[derive(Deserialize)]
#[serde(untagged)]
enum IrLocatorInput {
    Shorthand(String),
    Full(IrLocatorFields),
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
struct IrLocatorFields {
    #[serde(default, rename = "type")]
    locator_type: LocatorType,
    #[serde(default)]
    locator: String,
    #[serde(default)]
    product_dependencies: Vec<ProductDependencyConfig>,
}

impl From<IrLocatorInput> for IrLocatorConfig {
    fn from(input: IrLocatorInput) -> Self {
        match input {
            IrLocatorInput::Shorthand(locator) => Self {
                locator_type: LocatorType::Auto,
                locator,
                product_dependencies: Vec::new(),
            },
            IrLocatorInput::Full(fields) => Self {
                locator_type: fields.locator_type,
                locator: fields.locator,
                product_dependencies: fields.product_dependencies,
            },
        }
    }
}

/// A recommended product dependency whose versions are templates.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(deny_unknown_fields, rename_all = "kebab-case")]
pub struct ProductDependencyConfig {
    pub product_group: String,
    pub product_name: String,
    pub minimum_version: String,
    pub maximum_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub recommended_version: String,
}

impl ProductDependencyConfig {
    #[must_use]
    pub fn to_param(&self) -> ProductDependencyParam {
        ProductDependencyParam {
            product_group: self.product_group.clone(),
            product_name: self.product_name.clone(),
            minimum_version: self.minimum_version.clone(),
            maximum_version: self.maximum_version.clone(),
            recommended_version: self.recommended_version.clone(),
        }
    }
}

/// What providers need beyond the configuration itself.
#[derive(Clone)]
pub struct ProviderContext {
    /// Relative locators resolve against this directory.
    pub project_dir: PathBuf,
    pub compiler: Arc<Compiler>,
    pub client: reqwest::Client,
    /// Version source for product-dependency templates.
    pub versions: Arc<dyn VersionProvider>,
}

impl fmt::Debug for ProviderContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderContext")
            .field("project_dir", &self.project_dir)
            .field("compiler", &self.compiler)
            .finish_non_exhaustive()
    }
}

impl ConjurePluginConfig {
    /// Parse configuration YAML, rejecting unknown keys.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for malformed YAML or unknown keys and
    /// [`ConfigError::UnsupportedVersion`] for a version other than 1.
    pub fn from_yaml(bytes: &[u8]) -> Result<Self, ConfigError> {
        if bytes.iter().all(u8::is_ascii_whitespace) {
            return Ok(Self::default());
        }
        let config: Self = serde_yaml::from_slice(bytes)?;
        config.check_version()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::Read`] if the file cannot be read, otherwise
    /// see [`ConjurePluginConfig::from_yaml`].
    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        let bytes = std::fs::read(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_yaml(&bytes)
    }

    /// Resolve every project into [`ProjectParams`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLocator`] for a project without a locator.
    pub fn to_params(&self, ctx: &ProviderContext) -> Result<ProjectParams, ConfigError> {
        let mut params = HashMap::with_capacity(self.projects.len());
        for (key, project) in &self.projects {
            let ir_provider = project.ir_locator.to_provider(key, ctx)?;
            let publish = project
                .publish
                .unwrap_or_else(|| ir_provider.generated_from_yaml());
            tracing::debug!(project = %key, provider = %ir_provider.kind(), publish, "resolved project");
            params.insert(
                key.clone(),
                ProjectParam {
                    output_dir: PathBuf::from(&project.output_dir),
                    ir_provider,
                    publish,
                    server: project.server,
                },
            );
        }
        Ok(ProjectParams::new(params))
    }

    fn check_version(&self) -> Result<(), ConfigError> {
        let Some(version) = &self.version else {
            return Ok(());
        };
        let text = match version {
            serde_yaml::Value::Number(n) => n.to_string(),
            serde_yaml::Value::String(s) => s.clone(),
            other => format!("{other:?}"),
        };
        if text == SUPPORTED_VERSION {
            Ok(())
        } else {
            Err(ConfigError::UnsupportedVersion { version: text })
        }
    }
}

impl IrLocatorConfig {
    /// The concrete locator type, inferring it when the type is `auto`.
    ///
    /// Inference: a locator that parses as a URL with a scheme is remote; a
    /// `.yml`/`.yaml` suffix is YAML; a `.json` suffix is an IR file;
    /// anything else is YAML unless it names an existing regular file.
    #[must_use]
    pub fn resolved_type(&self, project_dir: &Path) -> LocatorType {
        if self.locator_type != LocatorType::Auto {
            return self.locator_type;
        }
        if reqwest::Url::parse(&self.locator).is_ok_and(|url| !url.scheme().is_empty()) {
            return LocatorType::Remote;
        }

        let lowercase = self.locator.to_lowercase();
        if lowercase.ends_with(".yml") || lowercase.ends_with(".yaml") {
            LocatorType::Yaml
        } else if lowercase.ends_with(".json") {
            LocatorType::IrFile
        } else if project_dir.join(&self.locator).is_file() {
            LocatorType::IrFile
        } else {
            LocatorType::Yaml
        }
    }

    /// # Errors
    ///
    /// Returns [`ConfigError::EmptyLocator`] if the locator is empty.
    pub fn to_provider(&self, project: &str, ctx: &ProviderContext) -> Result<IrProvider, ConfigError> {
        if self.locator.is_empty() {
            return Err(ConfigError::EmptyLocator {
                project: project.to_string(),
            });
        }

        let locator_type = self.resolved_type(&ctx.project_dir);
        if locator_type != LocatorType::Yaml && !self.product_dependencies.is_empty() {
            tracing::warn!(project, %locator_type, "product-dependencies only apply to YAML locators; ignoring");
        }

        Ok(match locator_type {
            LocatorType::Remote => IrProvider::Remote {
                url: self.locator.clone(),
                client: ctx.client.clone(),
            },
            LocatorType::IrFile => IrProvider::LocalFile {
                path: ctx.project_dir.join(&self.locator),
            },
            LocatorType::Yaml | LocatorType::Auto => IrProvider::LocalYaml {
                path: ctx.project_dir.join(&self.locator),
                compiler: Arc::clone(&ctx.compiler),
                product_dependencies: (!self.product_dependencies.is_empty()).then(|| {
                    ProductDependencies::new(
                        self.product_dependencies
                            .iter()
                            .map(ProductDependencyConfig::to_param)
                            .collect(),
                        Arc::clone(&ctx.versions),
                    )
                }),
            },
        })
    }
}
