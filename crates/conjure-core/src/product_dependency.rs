//! Recommended product dependencies.
//!
//! Each dependency carries three version templates. After rendering, the
//! minimum must be an SLS version, the maximum an SLS version matcher, and
//! the recommended version (when non-empty) an SLS version.

use std::fmt;
use std::sync::{Arc, OnceLock};

use serde::{Deserialize, Serialize};

use crate::errors::ProductDependencyError;
use crate::sls::SlsGrammar;
use crate::template::render_version_template;
use crate::version::VersionProvider;

/// Extension key under which rendered dependencies are attached to IR.
pub const RECOMMENDED_PRODUCT_DEPENDENCIES_KEY: &str = "recommended-product-dependencies";

/// A product dependency whose versions are still templates.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ProductDependencyParam {
    pub product_group: String,
    pub product_name: String,
    pub minimum_version: String,
    pub maximum_version: String,
    pub recommended_version: String,
}

/// A product dependency with concrete, validated versions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub struct RenderedProductDependency {
    pub product_group: String,
    pub product_name: String,
    pub minimum_version: String,
    pub maximum_version: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub recommended_version: String,
}

/// The version field a rendering error refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum VersionField {
    Minimum,
    Maximum,
    Recommended,
}

impl fmt::Display for VersionField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Minimum => f.write_str("minimum-version"),
            Self::Maximum => f.write_str("maximum-version"),
            Self::Recommended => f.write_str("recommended-version"),
        }
    }
}

impl ProductDependencyParam {
    /// `group:name` identifier used in error messages.
    #[must_use]
    pub fn product_id(&self) -> String {
        format!("{}:{}", self.product_group, self.product_name)
    }

    /// Render all three version templates and validate the results.
    ///
    /// # Errors
    ///
    /// Returns [`ProductDependencyError::Template`] when a template fails to
    /// execute and [`ProductDependencyError::Grammar`] when a rendered value
    /// does not satisfy the grammar required for its field.
    pub fn render(
        &self,
        versions: &dyn VersionProvider,
    ) -> Result<RenderedProductDependency, ProductDependencyError> {
        let minimum_version = self.render_field(
            VersionField::Minimum,
            &self.minimum_version,
            versions,
            Some(SlsGrammar::Version),
        )?;
        let maximum_version = self.render_field(
            VersionField::Maximum,
            &self.maximum_version,
            versions,
            Some(SlsGrammar::Matcher),
        )?;
        let recommended_version = self.render_field(
            VersionField::Recommended,
            &self.recommended_version,
            versions,
            None,
        )?;
        if !recommended_version.is_empty() {
            self.check_grammar(VersionField::Recommended, &recommended_version, SlsGrammar::Version)?;
        }

        Ok(RenderedProductDependency {
            product_group: self.product_group.clone(),
            product_name: self.product_name.clone(),
            minimum_version,
            maximum_version,
            recommended_version,
        })
    }

    fn render_field(
        &self,
        field: VersionField,
        template: &str,
        versions: &dyn VersionProvider,
        grammar: Option<SlsGrammar>,
    ) -> Result<String, ProductDependencyError> {
        let rendered = render_version_template(template, versions).map_err(|source| {
            ProductDependencyError::Template {
                product: self.product_id(),
                field,
                source,
            }
        })?;
        if let Some(grammar) = grammar {
            self.check_grammar(field, &rendered, grammar)?;
        }
        Ok(rendered)
    }

    fn check_grammar(
        &self,
        field: VersionField,
        value: &str,
        grammar: SlsGrammar,
    ) -> Result<(), ProductDependencyError> {
        if grammar.matches(value) {
            return Ok(());
        }
        Err(ProductDependencyError::Grammar {
            product: self.product_id(),
            field,
            value: value.to_string(),
            grammar,
        })
    }
}

/// A list of dependency templates bound to the version source they render
/// against.
#[derive(Clone)]
pub struct ProductDependencies {
    params: Vec<ProductDependencyParam>,
    versions: Arc<dyn VersionProvider>,
}

impl fmt::Debug for ProductDependencies {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProductDependencies")
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

impl ProductDependencies {
    #[must_use]
    pub fn new(params: Vec<ProductDependencyParam>, versions: Arc<dyn VersionProvider>) -> Self {
        Self { params, versions }
    }

    #[must_use]
    pub fn params(&self) -> &[ProductDependencyParam] {
        &self.params
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }

    /// Render every dependency in declaration order, stopping at the first
    /// failure. The project version is looked up at most once per call, and
    /// only if some template references it.
    ///
    /// # Errors
    ///
    /// Returns the first [`ProductDependencyError`] encountered.
    pub fn render_all(&self) -> Result<Vec<RenderedProductDependency>, ProductDependencyError> {
        let versions = ResolveOnce::new(self.versions.as_ref());
        self.params
            .iter()
            .map(|param| param.render(&versions))
            .collect()
    }
}

/// Looks the project version up on first use and replays the outcome after.
struct ResolveOnce<'a> {
    source: &'a dyn VersionProvider,
    resolved: OnceLock<Result<String, String>>,
}

impl<'a> ResolveOnce<'a> {
    fn new(source: &'a dyn VersionProvider) -> Self {
        Self {
            source,
            resolved: OnceLock::new(),
        }
    }
}

impl VersionProvider for ResolveOnce<'_> {
    fn project_version(&self) -> anyhow::Result<String> {
        self.resolved
            .get_or_init(|| {
                self.source
                    .project_version()
                    .map_err(|error| format!("{error:#}"))
            })
            .clone()
            .map_err(anyhow::Error::msg)
    }
}
