//! Error types for IR parsing and product-dependency rendering.
//!
//! Acquisition, generation, and publishing errors live in their own crates.
//! The CLI converges them through `anyhow`.

use thiserror::Error;

use crate::product_dependency::VersionField;
use crate::sls::SlsGrammar;

/// Errors raised while interpreting an IR document.
#[derive(Debug, Error)]
pub enum CoreError {
    /// The bytes are not a JSON IR document.
    #[error("failed to parse IR document: {0}")]
    InvalidIr(#[source] serde_json::Error),

    /// The IR document declares a version this plugin does not understand.
    #[error("unsupported IR version {found} (expected {expected})")]
    UnsupportedIrVersion { found: u64, expected: u64 },

    /// The IR could not be serialized back to bytes.
    #[error("failed to serialize IR document: {0}")]
    Serialize(#[source] serde_json::Error),
}

/// Errors raised while executing a version template.
#[derive(Debug, Error)]
pub enum TemplateError {
    /// An action opened with `{{` was never closed.
    #[error("unclosed action starting at byte {offset}")]
    Unclosed { offset: usize },

    /// `{{}}` with nothing inside.
    #[error("missing value for action at byte {offset}")]
    EmptyAction { offset: usize },

    /// The action named something other than `ProjectVersion`.
    #[error("function {name:?} not defined")]
    UnknownFunction { name: String },

    /// `ProjectVersion.<accessor>` with an accessor other than Major/Minor/Patch.
    #[error("can't evaluate field {accessor} of ProjectVersion")]
    UnknownAccessor { accessor: String },

    /// The version source failed.
    #[error("error calling ProjectVersion: {0}")]
    Version(String),

    /// A Major/Minor/Patch accessor was used on a version without those parts.
    #[error(
        "error calling {accessor}: version {version:?} did not match regular expression for an orderable version"
    )]
    NotOrderable { accessor: String, version: String },
}

/// Errors raised while rendering and validating a product dependency.
#[derive(Debug, Error)]
pub enum ProductDependencyError {
    /// The template for one of the version fields failed to execute.
    #[error("failed to render {field} of product dependency {product}: {source}")]
    Template {
        product: String,
        field: VersionField,
        #[source]
        source: TemplateError,
    },

    /// The rendered value does not satisfy the grammar required for its field.
    #[error("{field} of product dependency {product}: {value:?} is not a valid {grammar}")]
    Grammar {
        product: String,
        field: VersionField,
        value: String,
        grammar: SlsGrammar,
    },
}
