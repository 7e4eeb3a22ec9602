//! Package manager detection

use crate::config::PackageManager;
use std::process::Command;

/// Runtime detection result
#[derive(Debug, Clone)]
pub struct RuntimeInfo {
    pub name: &'static str,
    pub version: Option<String>,
    pub available: bool,
}

fn probe(name: &'static str, program: &str) -> RuntimeInfo {
    let output = if cfg!(windows) {
        Command::new("cmd").args(["/C", program, "--version"]).output()
    } else {
        Command::new(program).arg("--version").output()
    };

    match output {
        Ok(out) if out.status.success() => {
            let version = String::from_utf8_lossy(&out.stdout).trim().to_string();
            RuntimeInfo {
                name,
                version: Some(version),
                available: true,
            }
        }
        _ => RuntimeInfo {
            name,
            version: None,
            available: false,
        },
    }
}

/// Check if Node.js is available
pub fn check_node() -> RuntimeInfo {
    probe("Node.js", "node")
}

/// Check whether the chosen package manager is on PATH
pub fn check_package_manager(package_manager: PackageManager) -> RuntimeInfo {
    probe(package_manager.program(), package_manager.program())
}

impl RuntimeInfo {
    /// One-line summary such as `npm (10.8.2)` or `yarn (not installed)`
    pub fn summary(&self) -> String {
        if self.available {
            format!("{} ({})", self.name, self.version.as_deref().unwrap_or("unknown"))
        } else {
            format!("{} (not installed)", self.name)
        }
    }
}
