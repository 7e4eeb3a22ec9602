//! Error types for the scaffolding pipeline

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the library
pub type Result<T> = std::result::Result<T, ScaffoldError>;

/// Broad classes of failure, as reported to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    Conflict,
    Cancellation,
    RegistryQuery,
    Subprocess,
    Io,
}

#[derive(Debug, Error)]
pub enum ScaffoldError {
    #[error(
        "Invalid project name '{0}'. Only letters, numbers, hyphens, and underscores are allowed."
    )]
    InvalidName(String),

    #[error("Directory '{}' already exists. Please choose another name.", .0.display())]
    DirectoryExists(PathBuf),

    #[error("Directory '{}' is not empty ({count} existing items)", .path.display())]
    DirectoryNotEmpty { path: PathBuf, count: usize },

    #[error("Operation cancelled.")]
    Cancelled,

    #[error("Failed to resolve the latest version of '{package}': {reason}")]
    RegistryQuery { package: String, reason: String },

    #[error("`{command}` {}{}", exit_description(.code), stderr_suffix(.stderr))]
    Subprocess {
        command: String,
        code: Option<i32>,
        stderr: String,
    },

    #[error("{context}: {source}")]
    Io {
        context: String,
        #[source]
        source: io::Error,
    },

    #[error("Prompt failed: {0}")]
    Prompt(#[source] io::Error),

    #[error("Cannot {step} while the project is {actual}")]
    OutOfOrder {
        step: &'static str,
        actual: &'static str,
    },
}

fn exit_description(code: &Option<i32>) -> String {
    match code {
        Some(code) => format!("exited with code {}", code),
        None => "was terminated before completing".to_string(),
    }
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!("\n{}", trimmed)
    }
}

impl ScaffoldError {
    pub fn io(context: impl Into<String>, source: io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    pub fn registry(package: impl Into<String>, reason: impl ToString) -> Self {
        Self::RegistryQuery {
            package: package.into(),
            reason: reason.to_string(),
        }
    }

    /// Map a terminal prompt failure; an interrupted prompt means the user cancelled
    pub fn from_prompt(err: io::Error) -> Self {
        if err.kind() == io::ErrorKind::Interrupted {
            Self::Cancelled
        } else {
            Self::Prompt(err)
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidName(_) => ErrorKind::Validation,
            Self::DirectoryExists(_) | Self::DirectoryNotEmpty { .. } => ErrorKind::Conflict,
            Self::Cancelled => ErrorKind::Cancellation,
            Self::RegistryQuery { .. } => ErrorKind::RegistryQuery,
            Self::Subprocess { .. } => ErrorKind::Subprocess,
            Self::Io { .. } | Self::Prompt(_) | Self::OutOfOrder { .. } => ErrorKind::Io,
        }
    }

    /// Process exit code for this error. Every failure exits with 1.
    pub fn exit_code(&self) -> i32 {
        1
    }
}
