//! Resolver that asks the npm CLI

use super::{parse_version, VersionResolver};
use crate::error::{Result, ScaffoldError};
use crate::runtime::{CommandRunner, CommandSpec, StdioMode};

/// Runs `npm show <package> version` through a [`CommandRunner`]
#[derive(Debug, Clone)]
pub struct NpmVersionResolver<R> {
    runner: R,
}

impl<R: CommandRunner> NpmVersionResolver<R> {
    pub fn new(runner: R) -> Self {
        Self { runner }
    }

    fn spec(package: &str) -> CommandSpec {
        CommandSpec::new(
            "npm",
            vec!["show".to_string(), package.to_string(), "version".to_string()],
        )
        .stdio(StdioMode::Quiet)
    }
}

impl<R: CommandRunner> VersionResolver for NpmVersionResolver<R> {
    async fn latest_version(&self, package: &str) -> Result<String> {
        let spec = Self::spec(package);
        tracing::debug!(package, command = %spec.display(), "querying npm for latest version");

        let output = self
            .runner
            .run(&spec)
            .await
            .map_err(|e| ScaffoldError::registry(package, format!("failed to run npm: {}", e)))?;

        if !output.success() {
            let reason = match output.stderr.trim() {
                "" => format!("npm exited with code {:?}", output.code),
                stderr => stderr.to_string(),
            };
            return Err(ScaffoldError::registry(package, reason));
        }

        Ok(parse_version(package, &output.stdout)?.to_string())
    }
}
