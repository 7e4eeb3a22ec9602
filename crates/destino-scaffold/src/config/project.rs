//! Project configuration collected from the user

use clap::ValueEnum;
use serde::Serialize;
use std::fmt;

/// Port used when the user does not pick one
pub const DEFAULT_PORT: u16 = 3344;

/// Source language of the generated project
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum Language {
    #[value(name = "javascript", alias = "js")]
    JavaScript,
    #[value(name = "typescript", alias = "ts")]
    TypeScript,
}

impl Language {
    pub fn display_name(&self) -> &'static str {
        match self {
            Language::JavaScript => "JavaScript",
            Language::TypeScript => "TypeScript",
        }
    }

    /// File extension for generated source files
    pub fn extension(&self) -> &'static str {
        match self {
            Language::JavaScript => "js",
            Language::TypeScript => "ts",
        }
    }

    pub fn is_typescript(&self) -> bool {
        matches!(self, Language::TypeScript)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.display_name())
    }
}

/// Whether the application config is the fixed default or built from user answers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ConfigurationMode {
    Default,
    Custom,
}

impl ConfigurationMode {
    pub fn display_name(&self) -> &'static str {
        match self {
            ConfigurationMode::Default => "default",
            ConfigurationMode::Custom => "custom",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, ValueEnum)]
pub enum PackageManager {
    Npm,
    Yarn,
    Pnpm,
}

impl PackageManager {
    pub fn program(&self) -> &'static str {
        match self {
            PackageManager::Npm => "npm",
            PackageManager::Yarn => "yarn",
            PackageManager::Pnpm => "pnpm",
        }
    }

    pub fn install_args(&self) -> Vec<String> {
        vec!["install".to_string()]
    }

    pub fn dev_args(&self) -> Vec<String> {
        vec!["run".to_string(), "dev".to_string()]
    }

    /// Human readable install command, e.g. `pnpm install`
    pub fn install_command(&self) -> String {
        format!("{} {}", self.program(), self.install_args().join(" "))
    }

    pub fn dev_command(&self) -> String {
        format!("{} {}", self.program(), self.dev_args().join(" "))
    }
}

impl fmt::Display for PackageManager {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.program())
    }
}

/// A folder served as static files, mounted at `route` ("" mounts at the root)
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StaticMount {
    pub folder: String,
    pub route: String,
}

/// Complete answers for one scaffolding run
///
/// The optional fields only matter when `mode` is [`ConfigurationMode::Custom`];
/// in default mode generation ignores them even if they are set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProjectConfig {
    pub name: String,
    pub language: Language,
    pub mode: ConfigurationMode,
    pub package_manager: PackageManager,
    pub port: Option<u16>,
    pub enable_json_parser: Option<bool>,
    pub enable_urlencoded: Option<bool>,
    /// `None` when static serving was declined, which is distinct from an empty list
    pub serve_static: Option<Vec<StaticMount>>,
    pub enable_rate_limit: Option<bool>,
}

impl ProjectConfig {
    /// Config with only the required answers; every custom field is unset
    pub fn new(
        name: impl Into<String>,
        language: Language,
        mode: ConfigurationMode,
        package_manager: PackageManager,
    ) -> Self {
        Self {
            name: name.into(),
            language,
            mode,
            package_manager,
            port: None,
            enable_json_parser: None,
            enable_urlencoded: None,
            serve_static: None,
            enable_rate_limit: None,
        }
    }

    pub fn is_custom(&self) -> bool {
        self.mode == ConfigurationMode::Custom
    }

    pub fn port_or_default(&self) -> u16 {
        self.port.unwrap_or(DEFAULT_PORT)
    }

    pub fn json_parser_or_default(&self) -> bool {
        self.enable_json_parser.unwrap_or(true)
    }

    pub fn urlencoded_or_default(&self) -> bool {
        self.enable_urlencoded.unwrap_or(true)
    }

    pub fn rate_limit_or_default(&self) -> bool {
        self.enable_rate_limit.unwrap_or(false)
    }
}
