//! # conjure-publish
//!
//! Publishes generated IR as versioned artifacts.
//!
//! [`publish`] stages the IR of each eligible project as
//! `<key>-<version>.conjure.json` and hands it to a [`Publisher`].
//! [`ArtifactoryPublisher`] uploads to a Maven-layout Artifactory
//! repository; [`GitVersionSource`] derives the version from git tags.

mod error;
mod publish;
mod publisher;
mod version;

pub use error::PublishError;
pub use publish::publish;
pub use publisher::{Artifact, ArtifactoryPublisher, Publisher, PublisherFlags, artifact_file_name};
pub use version::GitVersionSource;
