//! Interactive configuration dialogue
//!
//! [`ConfigCollector`] asks the questions in a fixed order through a
//! [`Prompter`], so the dialogue can run against the terminal or a script.

use crate::cancel::CancelToken;
use crate::config::{
    validate_project_name, ConfigurationMode, Language, PackageManager, ProjectConfig,
    ProjectTarget, StaticMount, CURRENT_DIR, DEFAULT_PORT,
};
use crate::error::{Result, ScaffoldError};
use std::io;
use std::path::Path;

pub const PROJECT_NAME_PROMPT: &str = "Project name";
pub const LANGUAGE_PROMPT: &str = "Language";
pub const CONFIGURATION_PROMPT: &str = "Configuration";
pub const PACKAGE_MANAGER_PROMPT: &str = "Package manager";
pub const PORT_PROMPT: &str = "Port number";
pub const JSON_PARSER_PROMPT: &str = "Enable JSON parser?";
pub const URLENCODED_PROMPT: &str = "Enable URL encoding?";
pub const SERVE_STATIC_PROMPT: &str = "Do you want to serve static files?";
pub const STATIC_FOLDER_PROMPT: &str = "Static files folder";
pub const STATIC_ROUTE_PROMPT: &str = "Static files route (leave empty for root)";
pub const RATE_LIMIT_PROMPT: &str = "Enable rate limits?";

/// A source of answers: the terminal, or a script in tests
///
/// An `io::ErrorKind::Interrupted` error means the user cancelled.
pub trait Prompter {
    fn text(&mut self, message: &str, default: Option<&str>) -> io::Result<String>;

    fn select<T: Clone + Eq>(&mut self, message: &str, options: &[(T, &'static str)]) -> io::Result<T>;

    fn confirm(&mut self, message: &str, default: bool) -> io::Result<bool>;

    /// A port number in `1..=65535`
    fn number(&mut self, message: &str, default: u16) -> io::Result<u16>;
}

/// Answers supplied up front (from CLI flags) that skip their prompt
#[derive(Debug, Clone, Copy, Default)]
pub struct Presets {
    pub language: Option<Language>,
    pub mode: Option<ConfigurationMode>,
    pub package_manager: Option<PackageManager>,
}

pub struct ConfigCollector<'a, P> {
    prompter: &'a mut P,
    cancel: CancelToken,
    presets: Presets,
}

impl<'a, P: Prompter> ConfigCollector<'a, P> {
    pub fn new(prompter: &'a mut P, cancel: CancelToken) -> Self {
        Self {
            prompter,
            cancel,
            presets: Presets::default(),
        }
    }

    pub fn with_presets(mut self, presets: Presets) -> Self {
        self.presets = presets;
        self
    }

    /// Run the whole dialogue
    ///
    /// The name comes from `default_name` when non-empty, otherwise from a
    /// prompt. It is validated and checked against `cwd` before any further
    /// question is asked; there is no retry.
    pub fn collect(
        &mut self,
        default_name: Option<&str>,
        cwd: &Path,
    ) -> Result<(ProjectTarget, ProjectConfig)> {
        let name = self.project_name(default_name)?;
        let target = ProjectTarget::resolve(cwd, &name)?;
        let config = self.collect_options(target.name.clone())?;
        Ok((target, config))
    }

    /// Resolve the raw project name; `"."` is passed through for target resolution
    pub fn project_name(&mut self, default_name: Option<&str>) -> Result<String> {
        let name = match default_name.filter(|n| !n.is_empty()) {
            Some(name) => name.to_string(),
            None => {
                self.cancel.check()?;
                self.prompter
                    .text(PROJECT_NAME_PROMPT, None)
                    .map_err(ScaffoldError::from_prompt)?
            }
        };

        if name != CURRENT_DIR {
            validate_project_name(&name)?;
        }
        Ok(name)
    }

    /// Ask every remaining question for a project called `name`
    pub fn collect_options(&mut self, name: String) -> Result<ProjectConfig> {
        let language = match self.presets.language {
            Some(language) => language,
            None => self.select(
                LANGUAGE_PROMPT,
                &[
                    (Language::JavaScript, "JavaScript"),
                    (Language::TypeScript, "TypeScript"),
                ],
            )?,
        };

        let mode = match self.presets.mode {
            Some(mode) => mode,
            None => self.select(
                CONFIGURATION_PROMPT,
                &[
                    (ConfigurationMode::Default, "default"),
                    (ConfigurationMode::Custom, "custom"),
                ],
            )?,
        };

        let package_manager = match self.presets.package_manager {
            Some(package_manager) => package_manager,
            None => self.select(
                PACKAGE_MANAGER_PROMPT,
                &[
                    (PackageManager::Npm, "npm"),
                    (PackageManager::Yarn, "yarn"),
                    (PackageManager::Pnpm, "pnpm"),
                ],
            )?,
        };

        let mut config = ProjectConfig::new(name, language, mode, package_manager);

        if mode == ConfigurationMode::Custom {
            self.collect_custom(&mut config)?;
        }

        self.cancel.check()?;
        tracing::debug!(?config, "configuration collected");
        Ok(config)
    }

    fn collect_custom(&mut self, config: &mut ProjectConfig) -> Result<()> {
        self.cancel.check()?;
        config.port = Some(
            self.prompter
                .number(PORT_PROMPT, DEFAULT_PORT)
                .map_err(ScaffoldError::from_prompt)?,
        );
        config.enable_json_parser = Some(self.confirm(JSON_PARSER_PROMPT, true)?);
        config.enable_urlencoded = Some(self.confirm(URLENCODED_PROMPT, true)?);

        if self.confirm(SERVE_STATIC_PROMPT, false)? {
            let folder = self.text(STATIC_FOLDER_PROMPT, None)?;
            let route = self.text(STATIC_ROUTE_PROMPT, Some(""))?;
            config.serve_static = Some(vec![StaticMount { folder, route }]);
        }

        config.enable_rate_limit = Some(self.confirm(RATE_LIMIT_PROMPT, false)?);
        Ok(())
    }

    fn select<T: Clone + Eq>(&mut self, message: &str, options: &[(T, &'static str)]) -> Result<T> {
        self.cancel.check()?;
        self.prompter
            .select(message, options)
            .map_err(ScaffoldError::from_prompt)
    }

    fn confirm(&mut self, message: &str, default: bool) -> Result<bool> {
        self.cancel.check()?;
        self.prompter
            .confirm(message, default)
            .map_err(ScaffoldError::from_prompt)
    }

    fn text(&mut self, message: &str, default: Option<&str>) -> Result<String> {
        self.cancel.check()?;
        self.prompter
            .text(message, default)
            .map_err(ScaffoldError::from_prompt)
    }
}
