//! Destino Scaffold - library behind `create-destino`
//!
//! Turns a handful of answers into a ready-to-run Destino server project.
//!
//! # Architecture
//!
//! The pipeline is organized into layers:
//!
//! - **Layer 1: Model** - [`ProjectConfig`], name validation and [`ProjectTarget`] checks
//! - **Layer 2: Collaborators** - [`VersionResolver`] and [`CommandRunner`] traits with
//!   real and test implementations
//! - **Layer 3: Generation** - one generator per artifact and the [`ProjectBuilder`] state machine
//! - **Layer 4: CLI/TUI Interface** - [`ConfigCollector`] over a [`Prompter`], plus optional
//!   cliclack-based prompts (feature-gated)
//!
//! # Feature Flags
//!
//! - `tui` (default): Enables the cliclack-based prompts and the Ctrl+C handler
//!
//! # Example Usage (without TUI)
//!
//! ```ignore
//! use destino_scaffold::{ProjectBuilder, ProjectConfig, ProjectTarget};
//! use destino_scaffold::registry::FixedVersionResolver;
//! use destino_scaffold::runtime::SystemCommandRunner;
//!
//! let target = ProjectTarget::resolve(&cwd, "demo")?;
//! let mut builder = ProjectBuilder::new(config, target, FixedVersionResolver::uniform("1.0.0"), SystemCommandRunner);
//! builder.build().await?;
//! builder.install(false).await?;
//! ```

pub mod builder;
pub mod cancel;
pub mod collector;
pub mod config;
pub mod error;
pub mod generators;
pub mod registry;
pub mod runtime;
pub mod testing;
pub mod tui;

// Re-export main types for convenience
pub use builder::{BuildState, ProjectBuilder};
pub use cancel::{CancelToken, InterruptAction};
pub use collector::{ConfigCollector, Presets, Prompter};
pub use config::{
    ConfigurationMode, Language, PackageManager, ProjectConfig, ProjectTarget, StaticMount,
};
pub use error::{ErrorKind, Result, ScaffoldError};
pub use registry::VersionResolver;
pub use runtime::{CommandRunner, SystemCommandRunner};

#[cfg(feature = "tui")]
pub use tui::run;
