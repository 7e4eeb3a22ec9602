//! Resolver backed by a fixed version table

use super::{parse_version, VersionResolver};
use crate::error::{Result, ScaffoldError};
use std::collections::BTreeMap;

/// Returns preconfigured versions without any network or process access
#[derive(Debug, Clone, Default)]
pub struct FixedVersionResolver {
    versions: BTreeMap<String, String>,
    fallback: Option<String>,
}

impl FixedVersionResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Resolve every package to the same version
    pub fn uniform(version: impl Into<String>) -> Self {
        Self {
            versions: BTreeMap::new(),
            fallback: Some(version.into()),
        }
    }

    pub fn with(mut self, package: impl Into<String>, version: impl Into<String>) -> Self {
        self.versions.insert(package.into(), version.into());
        self
    }
}

impl VersionResolver for FixedVersionResolver {
    async fn latest_version(&self, package: &str) -> Result<String> {
        let version = self
            .versions
            .get(package)
            .or(self.fallback.as_ref())
            .ok_or_else(|| ScaffoldError::registry(package, "no version configured"))?;
        Ok(parse_version(package, version)?.to_string())
    }
}
