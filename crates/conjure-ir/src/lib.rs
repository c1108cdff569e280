//! # conjure-ir
//!
//! Obtaining IR documents for conjure-plugin projects.
//!
//! An [`IrProvider`] is one of:
//! - a local YAML file or directory, compiled by the external `conjure`
//!   [`Compiler`] with any recommended product dependencies attached as IR
//!   extensions
//! - a local, pre-built IR JSON file
//! - a remote IR endpoint fetched over HTTP(S)
//!
//! [`ProjectParams`] holds the provider and output settings for every
//! configured project, in the fixed order reports rely on.

mod compiler;
mod error;
mod http;
mod project;
mod provider;

pub use compiler::{Compiler, CompilerParam, CompilerSource};
pub use error::IrError;
pub use http::{DEFAULT_CONNECT_TIMEOUT, DEFAULT_USER_AGENT, HttpOptions, build_client};
pub use project::{ProjectParam, ProjectParams};
pub use provider::{IrProvider, ProviderKind};
