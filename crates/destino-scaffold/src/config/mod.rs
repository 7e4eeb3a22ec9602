//! Project configuration model, name validation, and target resolution

pub mod project;
pub mod target;

pub use project::{
    ConfigurationMode, Language, PackageManager, ProjectConfig, StaticMount, DEFAULT_PORT,
};
pub use target::{is_valid_project_name, validate_project_name, ProjectTarget, CURRENT_DIR};
