//! # conjure-generator
//!
//! Drives code generation for every configured project.
//!
//! [`run`] walks [`ProjectParams`](conjure_ir::ProjectParams) in key order.
//! In [`RunMode::Generate`] it writes output through a [`Generator`]; in
//! [`RunMode::Verify`] it compares checksums of what the generator would
//! write against what is on disk and reports every project with drift
//! before failing.
//!
//! [`ExternalGenerator`] is the production [`Generator`]: it hands the IR to
//! an external code generator process.

mod error;
mod generator;
mod run;

pub use error::{GeneratorError, RunError};
pub use generator::{ExternalGenerator, Generator, OUTPUT_DIR_ENV, OutputConfiguration};
pub use run::{RunMode, VerifyFailure, VerifyReport, run, verify};
