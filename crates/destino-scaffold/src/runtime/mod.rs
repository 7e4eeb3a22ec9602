//! Process execution and tool detection
//!
//! This module provides:
//! - The [`CommandRunner`] abstraction used for installs, dev server starts and registry lookups
//! - Package manager / Node.js availability probes

pub mod check;
pub mod command;

pub use check::{check_node, check_package_manager, RuntimeInfo};
pub use command::{CommandOutput, CommandRunner, CommandSpec, StdioMode, SystemCommandRunner};
