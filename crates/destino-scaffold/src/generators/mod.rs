//! Artifact generators
//!
//! Each generator renders exactly one file from a [`ProjectConfig`]. Rendering is
//! pure and deterministic; [`write_artifact`] performs the single write.

pub mod app_config;
pub mod build_config;
pub mod entry;
pub mod ignore;
pub mod manifest;
pub mod routes;

use crate::error::{Result, ScaffoldError};
use std::path::{Path, PathBuf};
use tokio::fs;

/// Directory holding the example route handlers
pub const ROUTES_DIR: &str = "routes";

/// A rendered file, relative to the project directory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Artifact {
    pub path: PathBuf,
    pub contents: String,
}

impl Artifact {
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            contents: contents.into(),
        }
    }
}

/// Write an artifact below `target_dir`, returning the absolute path written
pub async fn write_artifact(target_dir: &Path, artifact: &Artifact) -> Result<PathBuf> {
    let path = target_dir.join(&artifact.path);
    fs::write(&path, &artifact.contents)
        .await
        .map_err(|e| ScaffoldError::io(format!("Failed to write file: {}", path.display()), e))?;
    tracing::debug!(path = %path.display(), bytes = artifact.contents.len(), "wrote artifact");
    Ok(path)
}

/// Pretty-print JSON the way `package.json` files are conventionally laid out
pub(crate) fn to_pretty_json<T: serde::Serialize>(what: &str, value: &T) -> Result<String> {
    serde_json::to_string_pretty(value)
        .map_err(|e| ScaffoldError::io(format!("Failed to render {}", what), e.into()))
}
