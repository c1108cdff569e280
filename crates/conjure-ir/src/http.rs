//! Shared HTTP client construction and download helper.

use std::time::Duration;

use crate::error::IrError;

pub const DEFAULT_USER_AGENT: &str = concat!("conjure-plugin/", env!("CARGO_PKG_VERSION"));
pub const DEFAULT_CONNECT_TIMEOUT: Duration = Duration::from_secs(30);

/// Options for the client used to fetch remote IR and compiler bundles.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpOptions {
    pub connect_timeout: Duration,
    pub user_agent: String,
}

impl Default for HttpOptions {
    fn default() -> Self {
        Self {
            connect_timeout: DEFAULT_CONNECT_TIMEOUT,
            user_agent: DEFAULT_USER_AGENT.to_string(),
        }
    }
}

/// Build a client that refuses anything below TLS 1.2.
///
/// # Errors
///
/// Returns [`IrError::Client`] if the TLS backend cannot be initialised.
pub fn build_client(options: &HttpOptions) -> Result<reqwest::Client, IrError> {
    reqwest::Client::builder()
        .user_agent(options.user_agent.clone())
        .connect_timeout(options.connect_timeout)
        .min_tls_version(reqwest::tls::Version::TLS_1_2)
        .build()
        .map_err(IrError::Client)
}

/// GET `url` and return the whole body. Anything but `200 OK` is an error.
pub(crate) async fn fetch(client: &reqwest::Client, url: &str) -> Result<Vec<u8>, IrError> {
    let http_error = |source| IrError::Http {
        url: url.to_string(),
        source,
    };

    tracing::debug!(url, "fetching");
    let resp = client.get(url).send().await.map_err(http_error)?;
    if resp.status() != reqwest::StatusCode::OK {
        return Err(IrError::Status {
            url: url.to_string(),
            status: resp.status().as_u16(),
        });
    }
    let body = resp.bytes().await.map_err(http_error)?;
    Ok(body.to_vec())
}
