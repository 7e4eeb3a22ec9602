//! Project name validation and target directory checks

use crate::error::{Result, ScaffoldError};
use std::path::{Path, PathBuf};

/// Name that scaffolds into the current working directory
pub const CURRENT_DIR: &str = ".";

/// Check a project name: non-empty, letters, digits, `-` and `_` only
pub fn is_valid_project_name(name: &str) -> bool {
    !name.is_empty()
        && name
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
}

pub fn validate_project_name(name: &str) -> Result<()> {
    if is_valid_project_name(name) {
        Ok(())
    } else {
        Err(ScaffoldError::InvalidName(name.to_string()))
    }
}

/// Where a project will be written
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectTarget {
    /// Package name written into the manifest
    pub name: String,
    /// Directory that receives the generated files
    pub dir: PathBuf,
    /// True when scaffolding into `cwd` itself
    pub in_place: bool,
}

impl ProjectTarget {
    /// Resolve `name` relative to `cwd` and verify the location is safe to use.
    ///
    /// `"."` targets `cwd`, which must be empty; its basename becomes the package
    /// name. Any other name must be valid and must not exist yet. Only reads the
    /// filesystem.
    pub fn resolve(cwd: &Path, name: &str) -> Result<Self> {
        if name == CURRENT_DIR {
            let package_name = cwd
                .file_name()
                .and_then(|n| n.to_str())
                .unwrap_or_default()
                .to_string();
            validate_project_name(&package_name)?;

            let count = std::fs::read_dir(cwd)
                .map_err(|e| {
                    ScaffoldError::io(format!("Failed to read {}", cwd.display()), e)
                })?
                .count();
            if count > 0 {
                return Err(ScaffoldError::DirectoryNotEmpty {
                    path: cwd.to_path_buf(),
                    count,
                });
            }

            return Ok(Self {
                name: package_name,
                dir: cwd.to_path_buf(),
                in_place: true,
            });
        }

        validate_project_name(name)?;

        let dir = cwd.join(name);
        if dir.exists() {
            return Err(ScaffoldError::DirectoryExists(dir));
        }

        Ok(Self {
            name: name.to_string(),
            dir,
            in_place: false,
        })
    }
}
