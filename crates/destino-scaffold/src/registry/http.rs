//! Resolver that queries the npm registry over HTTP

use super::{parse_version, VersionResolver};
use crate::error::{Result, ScaffoldError};
use serde::Deserialize;
use std::time::Duration;
use url::Url;

/// Public npm registry
pub const DEFAULT_REGISTRY_URL: &str = "https://registry.npmjs.org";

/// Environment variable overriding the registry base URL
pub const REGISTRY_URL_ENV: &str = "DESTINO_REGISTRY_URL";

/// Upper bound for one registry request, connect through body
pub const REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// The part of `GET /<package>/latest` we care about
#[derive(Debug, Deserialize)]
struct LatestManifest {
    version: String,
}

/// Fetches `<registry>/<package>/latest` and reads its `version` field
pub struct RegistryVersionResolver {
    base_url: Url,
    client: reqwest::Client,
}

impl RegistryVersionResolver {
    /// Create a resolver with a custom user agent
    pub fn new(base_url: Url, user_agent: &str) -> Self {
        Self::with_timeout(base_url, user_agent, REQUEST_TIMEOUT)
    }

    pub fn with_timeout(base_url: Url, user_agent: &str, timeout: Duration) -> Self {
        Self {
            base_url,
            client: reqwest::Client::builder()
                .user_agent(user_agent)
                .timeout(timeout)
                .build()
                .unwrap_or_else(|_| reqwest::Client::new()),
        }
    }

    /// Create a resolver for the registry named by `DESTINO_REGISTRY_URL`, or the public one
    pub fn from_env(user_agent: &str) -> anyhow::Result<Self> {
        let url_str = std::env::var(REGISTRY_URL_ENV)
            .unwrap_or_else(|_| DEFAULT_REGISTRY_URL.to_string());
        let url = Url::parse(&url_str)
            .map_err(|e| anyhow::anyhow!("Invalid registry URL '{}': {}", url_str, e))?;
        Ok(Self::new(url, user_agent))
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Build `<base>/<package>/latest`, keeping scoped names as one segment
    fn latest_url(&self, package: &str) -> Result<Url> {
        let mut url = self.base_url.clone();
        url.path_segments_mut()
            .map_err(|_| {
                ScaffoldError::registry(
                    package,
                    format!("registry URL cannot have path segments: {}", self.base_url),
                )
            })?
            .pop_if_empty()
            .push(package)
            .push("latest");
        Ok(url)
    }
}

impl VersionResolver for RegistryVersionResolver {
    async fn latest_version(&self, package: &str) -> Result<String> {
        let url = self.latest_url(package)?;
        tracing::debug!(package, %url, "querying registry for latest version");

        let response = self
            .client
            .get(url.clone())
            .header(reqwest::header::ACCEPT, "application/json")
            .send()
            .await
            .map_err(|e| ScaffoldError::registry(package, format!("request to {} failed: {}", url, e)))?;

        if !response.status().is_success() {
            return Err(ScaffoldError::registry(
                package,
                format!("{} returned HTTP {}", url, response.status()),
            ));
        }

        let manifest: LatestManifest = response
            .json()
            .await
            .map_err(|e| ScaffoldError::registry(package, format!("malformed response: {}", e)))?;

        Ok(parse_version(package, &manifest.version)?.to_string())
    }
}
