//! Latest-version lookups for generated manifests
//!
//! Every dependency written to `package.json` is pinned to the version a
//! [`VersionResolver`] reports. Implementations:
//!
//! - [`RegistryVersionResolver`] - HTTP query against the npm registry
//! - [`NpmVersionResolver`] - `npm show <package> version`
//! - [`FixedVersionResolver`] - preconfigured versions, no external query

pub mod fixed;
pub mod http;
pub mod npm;

use crate::error::{Result, ScaffoldError};
use semver::Version;
use std::future::Future;

pub use fixed::FixedVersionResolver;
pub use http::{RegistryVersionResolver, DEFAULT_REGISTRY_URL, REGISTRY_URL_ENV};
pub use npm::NpmVersionResolver;

/// Resolves the latest published version of a package
///
/// Calls are not cached; each one performs a fresh lookup. A failed lookup is
/// a [`ScaffoldError::RegistryQuery`] and must never be replaced by a guess.
pub trait VersionResolver {
    fn latest_version(&self, package: &str) -> impl Future<Output = Result<String>>;
}

impl<R: VersionResolver> VersionResolver for &R {
    fn latest_version(&self, package: &str) -> impl Future<Output = Result<String>> {
        (**self).latest_version(package)
    }
}

/// Validate a version string reported for `package`, tolerating a leading `v`
pub fn parse_version(package: &str, raw: &str) -> Result<Version> {
    let trimmed = raw.trim();
    let cleaned = trimmed.strip_prefix('v').unwrap_or(trimmed);
    Version::parse(cleaned).map_err(|e| {
        ScaffoldError::registry(package, format!("invalid version '{}': {}", trimmed, e))
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_version() {
        let version = parse_version("express", "4.21.2\n").unwrap();
        assert_eq!(version, Version::new(4, 21, 2));
    }

    #[test]
    fn test_parse_prefixed_version() {
        assert_eq!(
            parse_version("express", "v5.0.1").unwrap(),
            Version::new(5, 0, 1)
        );
    }

    #[test]
    fn test_parse_prerelease() {
        let version = parse_version("typescript", "5.8.0-beta").unwrap();
        assert_eq!(version.to_string(), "5.8.0-beta");
    }

    #[test]
    fn test_malformed_output_is_registry_error() {
        let err = parse_version("express", "npm ERR! 404 Not Found").unwrap_err();
        assert!(matches!(err, ScaffoldError::RegistryQuery { ref package, .. } if package == "express"));
    }

    #[test]
    fn test_empty_output_is_registry_error() {
        assert!(parse_version("express", "").is_err());
    }
}
