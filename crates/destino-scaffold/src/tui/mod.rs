//! CLI prompts using cliclack (Charm-style inline prompts)
//!
//! This module is optional and only available when the `tui` feature is enabled.

#[cfg(feature = "tui")]
mod clack;
#[cfg(feature = "tui")]
mod prompts;

#[cfg(feature = "tui")]
pub use clack::ClackPrompter;
#[cfg(feature = "tui")]
pub use prompts::{report_error, run, CreateArgs, ResolverKind};
