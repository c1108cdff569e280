use std::future::Future;
use std::io::Write;
use std::path::PathBuf;

use conjure_checksum::sha256_hex;

use crate::error::PublishError;

const CHECKSUM_HEADER: &str = "X-Checksum-Sha256";
const DRY_RUN_PREFIX: &str = "[DRY RUN] ";

/// Publisher options supplied on the command line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PublisherFlags {
    pub url: Option<String>,
    pub username: Option<String>,
    pub password: Option<String>,
    pub repository: Option<String>,
    pub group_id: Option<String>,
    /// Skip the generated POM.
    pub no_pom: bool,
}

/// One IR file staged for upload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub key: String,
    pub version: String,
    /// Local path of the staged IR file.
    pub path: PathBuf,
}

impl Artifact {
    #[must_use]
    pub fn file_name(&self) -> String {
        artifact_file_name(&self.key, &self.version)
    }

    #[must_use]
    pub fn pom_file_name(&self) -> String {
        format!("{}-{}.pom", self.key, self.version)
    }
}

/// `<key>-<version>.conjure.json`
#[must_use]
pub fn artifact_file_name(key: &str, version: &str) -> String {
    format!("{key}-{version}.conjure.json")
}

/// Uploads a staged artifact somewhere.
pub trait Publisher: Send + Sync {
    /// Upload `artifact`. In dry-run mode, report what would be uploaded
    /// without touching the network.
    fn publish(
        &self,
        artifact: &Artifact,
        flags: &PublisherFlags,
        dry_run: bool,
        out: &mut (dyn Write + Send),
    ) -> impl Future<Output = Result<(), PublishError>> + Send;
}

/// Maven-layout uploads to an Artifactory repository.
#[derive(Debug, Clone)]
pub struct ArtifactoryPublisher {
    client: reqwest::Client,
}

struct Destination<'a> {
    url: &'a str,
    repository: &'a str,
    group_id: &'a str,
}

impl<'a> Destination<'a> {
    fn from_flags(flags: &'a PublisherFlags) -> Result<Self, PublishError> {
        let required = |value: &'a Option<String>, flag: &'static str| {
            value
                .as_deref()
                .filter(|v| !v.is_empty())
                .ok_or(PublishError::MissingFlag(flag))
        };
        Ok(Self {
            url: required(&flags.url, "url")?.trim_end_matches('/'),
            repository: required(&flags.repository, "repository")?,
            group_id: required(&flags.group_id, "group-id")?,
        })
    }

    /// `<url>/artifactory/<repository>/<group path>/<key>/<version>`
    fn artifact_dir(&self, artifact: &Artifact) -> String {
        format!(
            "{}/artifactory/{}/{}/{}/{}",
            self.url,
            self.repository,
            self.group_id.replace('.', "/"),
            artifact.key,
            artifact.version
        )
    }
}

impl ArtifactoryPublisher {
    #[must_use]
    pub const fn new(client: reqwest::Client) -> Self {
        Self { client }
    }

    async fn upload(
        &self,
        url: &str,
        body: Vec<u8>,
        flags: &PublisherFlags,
    ) -> Result<(), PublishError> {
        let http_error = |source| PublishError::Http {
            url: url.to_string(),
            source,
        };

        let mut request = self
            .client
            .put(url)
            .header(CHECKSUM_HEADER, sha256_hex(&body))
            .body(body);
        if let Some(username) = &flags.username {
            request = request.basic_auth(username, flags.password.as_deref());
        }

        let resp = request.send().await.map_err(http_error)?;
        if !resp.status().is_success() {
            return Err(PublishError::Status {
                url: url.to_string(),
                status: resp.status().as_u16(),
            });
        }
        tracing::debug!(url, status = resp.status().as_u16(), "uploaded");
        Ok(())
    }
}

fn pom(group_id: &str, artifact: &Artifact) -> String {
    format!(
        r#"<?xml version="1.0" encoding="UTF-8"?>
<project xmlns="http://maven.apache.org/POM/4.0.0" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance" xsi:schemaLocation="http://maven.apache.org/POM/4.0.0 http://maven.apache.org/xsd/maven-4.0.0.xsd">
<modelVersion>4.0.0</modelVersion>
<groupId>{group_id}</groupId>
<artifactId>{}</artifactId>
<version>{}</version>
<packaging>json</packaging>
</project>
"#,
        artifact.key, artifact.version
    )
}

impl Publisher for ArtifactoryPublisher {
    async fn publish(
        &self,
        artifact: &Artifact,
        flags: &PublisherFlags,
        dry_run: bool,
        out: &mut (dyn Write + Send),
    ) -> Result<(), PublishError> {
        let destination = Destination::from_flags(flags)?;
        let dir = destination.artifact_dir(artifact);
        let prefix = if dry_run { DRY_RUN_PREFIX } else { "" };

        let mut uploads = vec![(artifact.file_name(), None)];
        if !flags.no_pom {
            uploads.push((
                artifact.pom_file_name(),
                Some(pom(destination.group_id, artifact)),
            ));
        }

        for (file_name, generated) in uploads {
            let url = format!("{dir}/{file_name}");
            writeln!(out, "{prefix}Uploading {file_name} to {url}").map_err(PublishError::Output)?;
            if dry_run {
                continue;
            }
            let body = match generated {
                Some(text) => text.into_bytes(),
                None => tokio::fs::read(&artifact.path)
                    .await
                    .map_err(PublishError::io(&artifact.path))?,
            };
            self.upload(&url, body, flags).await?;
        }
        Ok(())
    }
}
