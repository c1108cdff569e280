//! # conjure-core
//!
//! Shared building blocks for conjure-plugin.
//!
//! - [`definition`]: the IR document model handed to generators
//! - [`sls`]: SLS version and version-matcher grammars
//! - [`template`]: `{{ProjectVersion}}` version templates
//! - [`product_dependency`]: recommended product dependencies attached to IR
//! - [`version`]: the project-version seam implemented by version sources
//! - [`errors`]: error types shared by the crates above

pub mod definition;
pub mod errors;
pub mod product_dependency;
pub mod sls;
pub mod template;
pub mod version;

pub use definition::ConjureDefinition;
pub use errors::{CoreError, ProductDependencyError, TemplateError};
pub use product_dependency::{
    ProductDependencies, ProductDependencyParam, RenderedProductDependency, VersionField,
};
pub use sls::SlsGrammar;
pub use version::{StaticVersion, VersionProvider};
