use std::fmt;
use std::path::PathBuf;
use std::sync::Arc;

use conjure_core::ProductDependencies;
use conjure_core::product_dependency::RECOMMENDED_PRODUCT_DEPENDENCIES_KEY;
use serde_json::{Map, Value};

use crate::compiler::{Compiler, CompilerParam};
use crate::error::IrError;
use crate::http;

/// Which kind of source an [`IrProvider`] reads from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProviderKind {
    Yaml,
    IrFile,
    Remote,
}

impl fmt::Display for ProviderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Yaml => f.write_str("yaml"),
            Self::IrFile => f.write_str("ir-file"),
            Self::Remote => f.write_str("remote"),
        }
    }
}

/// A source of IR bytes for one project.
#[derive(Debug, Clone)]
pub enum IrProvider {
    /// YAML file or directory compiled with the conjure compiler.
    LocalYaml {
        path: PathBuf,
        compiler: Arc<Compiler>,
        product_dependencies: Option<ProductDependencies>,
    },
    /// A pre-built IR JSON file.
    LocalFile { path: PathBuf },
    /// An IR document served over HTTP.
    Remote {
        url: String,
        client: reqwest::Client,
    },
}

impl IrProvider {
    /// Produce the IR bytes.
    ///
    /// # Errors
    ///
    /// - [`IrError::MissingInput`] if a YAML path does not exist
    /// - [`IrError::ProductDependency`] if a dependency template fails
    /// - [`IrError::Compile`] if the compiler rejects the YAML
    /// - [`IrError::Io`] if a local IR file cannot be read
    /// - [`IrError::Http`] / [`IrError::Status`] for remote failures
    pub async fn ir_bytes(&self) -> Result<Vec<u8>, IrError> {
        match self {
            Self::LocalYaml {
                path,
                compiler,
                product_dependencies,
            } => {
                if !tokio::fs::try_exists(path).await.unwrap_or(false) {
                    return Err(IrError::MissingInput { path: path.clone() });
                }
                let dependencies = product_dependencies.clone();
                let params =
                    tokio::task::spawn_blocking(move || compiler_params(dependencies.as_ref()))
                        .await??;
                compiler.input_path_to_ir(path, &params).await
            }
            Self::LocalFile { path } => tokio::fs::read(path).await.map_err(IrError::io(path)),
            Self::Remote { url, client } => http::fetch(client, url).await,
        }
    }

    /// Whether the IR is produced from YAML sources owned by the project.
    #[must_use]
    pub const fn generated_from_yaml(&self) -> bool {
        matches!(self, Self::LocalYaml { .. })
    }

    #[must_use]
    pub const fn kind(&self) -> ProviderKind {
        match self {
            Self::LocalYaml { .. } => ProviderKind::Yaml,
            Self::LocalFile { .. } => ProviderKind::IrFile,
            Self::Remote { .. } => ProviderKind::Remote,
        }
    }

    /// Path or URL the provider reads from.
    #[must_use]
    pub fn locator(&self) -> String {
        match self {
            Self::LocalYaml { path, .. } | Self::LocalFile { path } => {
                path.display().to_string()
            }
            Self::Remote { url, .. } => url.clone(),
        }
    }
}

fn compiler_params(
    product_dependencies: Option<&ProductDependencies>,
) -> Result<Vec<CompilerParam>, IrError> {
    let Some(dependencies) = product_dependencies else {
        return Ok(Vec::new());
    };
    let rendered = dependencies.render_all()?;
    if rendered.is_empty() {
        return Ok(Vec::new());
    }

    let mut extensions = Map::new();
    extensions.insert(
        RECOMMENDED_PRODUCT_DEPENDENCIES_KEY.to_string(),
        serde_json::to_value(rendered)?,
    );
    Ok(vec![CompilerParam::Extensions(extensions)])
}
