//! Project generation state machine
//!
//! ```text
//! Init -> DirectoryCreated -> Generated -> Installed | InstallSkipped
//!                                          Installed -> Started | StartSkipped
//!                                          any of the above -> Done
//! ```
//!
//! A failing step leaves the builder in its previous state. Files already
//! written are never removed.

use crate::cancel::CancelToken;
use crate::config::{ProjectConfig, ProjectTarget};
use crate::error::{Result, ScaffoldError};
use crate::generators::{
    self, app_config, build_config, entry, ignore, manifest, routes, Artifact, ROUTES_DIR,
};
use crate::registry::VersionResolver;
use crate::runtime::{CommandOutput, CommandRunner, CommandSpec, StdioMode};
use std::fmt;
use std::path::PathBuf;
use tokio::fs;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BuildState {
    Init,
    DirectoryCreated,
    Generated,
    Installed,
    InstallSkipped,
    Started,
    StartSkipped,
    Done,
}

impl BuildState {
    pub fn as_str(&self) -> &'static str {
        match self {
            BuildState::Init => "not started",
            BuildState::DirectoryCreated => "created",
            BuildState::Generated => "generated",
            BuildState::Installed => "installed",
            BuildState::InstallSkipped => "generated without install",
            BuildState::Started => "started",
            BuildState::StartSkipped => "installed without start",
            BuildState::Done => "done",
        }
    }
}

impl fmt::Display for BuildState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Creates the project directory, writes every artifact, then optionally
/// installs dependencies and starts the dev server
pub struct ProjectBuilder<R, C> {
    config: ProjectConfig,
    target: ProjectTarget,
    resolver: R,
    runner: C,
    cancel: CancelToken,
    state: BuildState,
    written: Vec<PathBuf>,
}

impl<R: VersionResolver, C: CommandRunner> ProjectBuilder<R, C> {
    pub fn new(config: ProjectConfig, target: ProjectTarget, resolver: R, runner: C) -> Self {
        Self {
            config,
            target,
            resolver,
            runner,
            cancel: CancelToken::new(),
            state: BuildState::Init,
            written: Vec::new(),
        }
    }

    /// Share the token the interrupt handler reports to
    pub fn with_cancel_token(mut self, cancel: CancelToken) -> Self {
        self.cancel = cancel;
        self
    }

    pub fn state(&self) -> BuildState {
        self.state
    }

    pub fn config(&self) -> &ProjectConfig {
        &self.config
    }

    pub fn target(&self) -> &ProjectTarget {
        &self.target
    }

    /// Absolute paths of every file written so far, in write order
    pub fn written(&self) -> &[PathBuf] {
        &self.written
    }

    fn expect_state(&self, step: &'static str, allowed: &[BuildState]) -> Result<()> {
        if allowed.contains(&self.state) {
            Ok(())
        } else {
            Err(ScaffoldError::OutOfOrder {
                step,
                actual: self.state.as_str(),
            })
        }
    }

    fn transition(&mut self, next: BuildState) {
        tracing::debug!(from = %self.state, to = %next, "build state changed");
        self.state = next;
    }

    /// Create the project directory and its `routes` subdirectory
    ///
    /// The target is claimed exclusively: a directory that appeared after the
    /// name was checked is a conflict, never reused. From here on an interrupt
    /// ends the process instead of cancelling a step.
    pub async fn create_directories(&mut self) -> Result<()> {
        self.expect_state("create the project directory", &[BuildState::Init])?;
        self.cancel.check()?;

        let dir = &self.target.dir;
        if self.target.in_place {
            let count = std::fs::read_dir(dir)
                .map_err(|e| ScaffoldError::io(format!("Failed to read {}", dir.display()), e))?
                .count();
            if count > 0 {
                return Err(ScaffoldError::DirectoryNotEmpty {
                    path: dir.clone(),
                    count,
                });
            }
        } else {
            fs::create_dir(dir).await.map_err(|e| match e.kind() {
                std::io::ErrorKind::AlreadyExists => ScaffoldError::DirectoryExists(dir.clone()),
                _ => ScaffoldError::io(format!("Failed to create directory: {}", dir.display()), e),
            })?;
        }
        self.cancel.disarm();

        let routes_dir = dir.join(ROUTES_DIR);
        fs::create_dir(&routes_dir).await.map_err(|e| {
            ScaffoldError::io(
                format!("Failed to create directory: {}", routes_dir.display()),
                e,
            )
        })?;

        self.transition(BuildState::DirectoryCreated);
        Ok(())
    }

    /// Render and write every artifact
    ///
    /// Dependency versions are resolved before the manifest is written; a failed
    /// lookup aborts generation.
    pub async fn generate(&mut self) -> Result<()> {
        self.expect_state("generate files", &[BuildState::DirectoryCreated])?;

        let package_json = manifest::render(&self.config, &self.resolver).await?;
        self.write(&package_json).await?;
        self.write(&app_config::render(&self.config)?).await?;
        self.write(&routes::render(&self.config)).await?;
        if let Some(tsconfig) = build_config::render(&self.config)? {
            self.write(&tsconfig).await?;
        }
        self.write(&entry::render(&self.config)).await?;
        self.write(&ignore::render()).await?;

        self.transition(BuildState::Generated);
        Ok(())
    }

    async fn write(&mut self, artifact: &Artifact) -> Result<()> {
        let path = generators::write_artifact(&self.target.dir, artifact).await?;
        self.written.push(path);
        Ok(())
    }

    /// Run `<package manager> install` inside the project when `accept` is true
    ///
    /// A failing install is fatal for this step only; generated files stay.
    pub async fn install(&mut self, accept: bool) -> Result<()> {
        self.expect_state("install dependencies", &[BuildState::Generated])?;

        if !accept {
            self.transition(BuildState::InstallSkipped);
            return Ok(());
        }

        let package_manager = self.config.package_manager;
        let spec = CommandSpec::new(package_manager.program(), package_manager.install_args())
            .current_dir(&self.target.dir)
            .stdio(StdioMode::Captured);

        let output = self.run(&spec).await?;
        if !output.success() {
            return Err(ScaffoldError::Subprocess {
                command: spec.display(),
                code: output.code,
                stderr: output.stderr,
            });
        }

        self.transition(BuildState::Installed);
        Ok(())
    }

    /// Run `<package manager> run dev` with the terminal attached when `accept` is true
    ///
    /// Blocks for as long as the dev server runs. Stopping it with Ctrl+C is a
    /// normal end of the run.
    pub async fn start(&mut self, accept: bool) -> Result<()> {
        self.expect_state("start the dev server", &[BuildState::Installed])?;

        if !accept {
            self.transition(BuildState::StartSkipped);
            return Ok(());
        }

        let package_manager = self.config.package_manager;
        let spec = CommandSpec::new(package_manager.program(), package_manager.dev_args())
            .current_dir(&self.target.dir)
            .stdio(StdioMode::Inherited);

        let output = {
            let _terminal = self.cancel.attach_child();
            self.run(&spec).await?
        };
        if !output.success() && !self.cancel.interrupted() {
            return Err(ScaffoldError::Subprocess {
                command: spec.display(),
                code: output.code,
                stderr: output.stderr,
            });
        }

        self.transition(BuildState::Started);
        Ok(())
    }

    pub fn finish(&mut self) -> Result<()> {
        self.expect_state(
            "finish",
            &[
                BuildState::Generated,
                BuildState::Installed,
                BuildState::InstallSkipped,
                BuildState::Started,
                BuildState::StartSkipped,
            ],
        )?;
        self.transition(BuildState::Done);
        Ok(())
    }

    /// Create directories and generate every file
    pub async fn build(&mut self) -> Result<()> {
        self.create_directories().await?;
        self.generate().await
    }

    async fn run(&self, spec: &CommandSpec) -> Result<CommandOutput> {
        self.runner
            .run(spec)
            .await
            .map_err(|e| ScaffoldError::Subprocess {
                command: spec.display(),
                code: None,
                stderr: e.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{ConfigurationMode, Language, PackageManager};
    use crate::error::ErrorKind;
    use crate::registry::FixedVersionResolver;
    use crate::testing::RecordingRunner;
    use tempfile::TempDir;

    fn builder<'a>(
        tmp: &TempDir,
        language: Language,
        runner: &'a RecordingRunner,
    ) -> ProjectBuilder<FixedVersionResolver, &'a RecordingRunner> {
        let target = ProjectTarget::resolve(tmp.path(), "demo").unwrap();
        let config = ProjectConfig::new(
            "demo",
            language,
            ConfigurationMode::Default,
            PackageManager::Npm,
        );
        ProjectBuilder::new(config, target, FixedVersionResolver::uniform("1.0.0"), runner)
    }

    #[tokio::test]
    async fn test_typescript_layout() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let mut builder = builder(&tmp, Language::TypeScript, &runner);

        builder.build().await.unwrap();
        assert_eq!(builder.state(), BuildState::Generated);

        let dir = tmp.path().join("demo");
        for file in [
            "package.json",
            "tsconfig.json",
            "destino.config.ts",
            "routes/hello.ts",
            "index.ts",
            ".gitignore",
        ] {
            assert!(dir.join(file).is_file(), "missing {}", file);
        }
        assert_eq!(builder.written().len(), 6);
        assert!(!tmp.path().join(".gitignore").exists());
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_javascript_layout_has_no_tsconfig() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let mut builder = builder(&tmp, Language::JavaScript, &runner);

        builder.build().await.unwrap();

        let dir = tmp.path().join("demo");
        assert!(dir.join("index.js").is_file());
        assert!(dir.join("routes/hello.js").is_file());
        assert!(dir.join("destino.config.js").is_file());
        assert!(!dir.join("tsconfig.json").exists());
        assert_eq!(builder.written().len(), 5);
    }

    #[tokio::test]
    async fn test_directory_created_after_check_is_a_conflict() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let mut builder = builder(&tmp, Language::TypeScript, &runner);

        let dir = tmp.path().join("demo");
        std::fs::create_dir(&dir).unwrap();
        std::fs::write(dir.join("package.json"), "USER DATA").unwrap();

        let err = builder.build().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(builder.state(), BuildState::Init);
        assert!(builder.written().is_empty());
        assert_eq!(std::fs::read_to_string(dir.join("package.json")).unwrap(), "USER DATA");
        assert!(!dir.join("routes").exists());
    }

    #[tokio::test]
    async fn test_current_dir_filled_after_check_is_a_conflict() {
        let tmp = TempDir::new().unwrap();
        let cwd = tmp.path().join("demo");
        std::fs::create_dir(&cwd).unwrap();
        let target = ProjectTarget::resolve(&cwd, ".").unwrap();
        std::fs::write(cwd.join("notes.md"), "mine").unwrap();

        let config = ProjectConfig::new(
            "demo",
            Language::JavaScript,
            ConfigurationMode::Default,
            PackageManager::Npm,
        );
        let runner = RecordingRunner::new();
        let mut builder =
            ProjectBuilder::new(config, target, FixedVersionResolver::uniform("1.0.0"), &runner);

        let err = builder.build().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Conflict);
        assert_eq!(std::fs::read_dir(&cwd).unwrap().count(), 1);
    }

    #[tokio::test]
    async fn test_registry_failure_writes_no_manifest() {
        let tmp = TempDir::new().unwrap();
        let target = ProjectTarget::resolve(tmp.path(), "demo").unwrap();
        let config = ProjectConfig::new(
            "demo",
            Language::JavaScript,
            ConfigurationMode::Default,
            PackageManager::Npm,
        );
        let resolver = FixedVersionResolver::new().with("express", "4.21.2");
        let mut builder = ProjectBuilder::new(config, target, resolver, RecordingRunner::new());

        let err = builder.build().await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::RegistryQuery);
        assert_eq!(builder.state(), BuildState::DirectoryCreated);
        assert!(!tmp.path().join("demo/package.json").exists());
    }

    #[tokio::test]
    async fn test_install_runs_in_project_directory() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let mut builder = builder(&tmp, Language::TypeScript, &runner);

        builder.build().await.unwrap();
        builder.install(true).await.unwrap();

        assert_eq!(builder.state(), BuildState::Installed);
        let calls = runner.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].display(), "npm install");
        assert_eq!(calls[0].cwd.as_deref(), Some(tmp.path().join("demo").as_path()));
        assert_eq!(calls[0].stdio, StdioMode::Captured);
    }

    #[tokio::test]
    async fn test_failed_install_keeps_files() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new().respond(CommandOutput {
            code: Some(1),
            stdout: String::new(),
            stderr: "ERR_PNPM_FETCH_404\n".to_string(),
        });
        let mut builder = builder(&tmp, Language::JavaScript, &runner);

        builder.build().await.unwrap();
        let err = builder.install(true).await.unwrap_err();

        assert_eq!(err.kind(), ErrorKind::Subprocess);
        assert!(err.to_string().contains("ERR_PNPM_FETCH_404"));
        assert_eq!(builder.state(), BuildState::Generated);
        assert!(tmp.path().join("demo/package.json").exists());
    }

    #[tokio::test]
    async fn test_missing_package_manager_is_subprocess_error() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new().fail_spawn();
        let mut builder = builder(&tmp, Language::JavaScript, &runner);

        builder.build().await.unwrap();
        let err = builder.install(true).await.unwrap_err();

        assert!(matches!(err, ScaffoldError::Subprocess { code: None, .. }));
    }

    #[tokio::test]
    async fn test_declined_install_skips_subprocess() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let mut builder = builder(&tmp, Language::JavaScript, &runner);

        builder.build().await.unwrap();
        builder.install(false).await.unwrap();
        builder.finish().unwrap();

        assert_eq!(builder.state(), BuildState::Done);
        assert!(runner.calls().is_empty());
    }

    #[tokio::test]
    async fn test_start_requires_install() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let mut builder = builder(&tmp, Language::JavaScript, &runner);

        builder.build().await.unwrap();
        builder.install(false).await.unwrap();

        let err = builder.start(true).await.unwrap_err();
        assert!(matches!(err, ScaffoldError::OutOfOrder { .. }));
    }

    #[tokio::test]
    async fn test_start_runs_dev_script_with_inherited_io() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let mut builder = builder(&tmp, Language::TypeScript, &runner);

        builder.build().await.unwrap();
        builder.install(true).await.unwrap();
        builder.start(true).await.unwrap();

        assert_eq!(builder.state(), BuildState::Started);
        let calls = runner.calls();
        assert_eq!(calls[1].display(), "npm run dev");
        assert_eq!(calls[1].stdio, StdioMode::Inherited);
    }

    #[tokio::test]
    async fn test_interrupted_dev_server_is_not_an_error() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new()
            .respond(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            })
            .respond(CommandOutput {
                code: None,
                ..CommandOutput::default()
            });
        let token = CancelToken::new();
        let mut builder = builder(&tmp, Language::JavaScript, &runner).with_cancel_token(token.clone());

        builder.build().await.unwrap();
        builder.install(true).await.unwrap();
        token.interrupt();
        builder.start(true).await.unwrap();

        assert_eq!(builder.state(), BuildState::Started);
    }

    /// Notes whether the terminal was handed to the child while it ran
    struct TerminalWatcher {
        token: CancelToken,
        attached: std::sync::Mutex<Vec<bool>>,
    }

    impl CommandRunner for TerminalWatcher {
        async fn run(&self, _spec: &CommandSpec) -> std::io::Result<CommandOutput> {
            self.attached.lock().unwrap().push(self.token.child_attached());
            Ok(CommandOutput {
                code: Some(0),
                ..CommandOutput::default()
            })
        }
    }

    #[tokio::test]
    async fn test_terminal_is_handed_to_dev_server_only() {
        let tmp = TempDir::new().unwrap();
        let token = CancelToken::new();
        let runner = TerminalWatcher {
            token: token.clone(),
            attached: std::sync::Mutex::new(Vec::new()),
        };
        let target = ProjectTarget::resolve(tmp.path(), "demo").unwrap();
        let config = ProjectConfig::new(
            "demo",
            Language::JavaScript,
            ConfigurationMode::Default,
            PackageManager::Npm,
        );
        let mut builder =
            ProjectBuilder::new(config, target, FixedVersionResolver::uniform("1.0.0"), &runner)
                .with_cancel_token(token.clone());

        builder.build().await.unwrap();
        builder.install(true).await.unwrap();
        builder.start(true).await.unwrap();

        assert_eq!(*runner.attached.lock().unwrap(), vec![false, true]);
        assert!(!token.child_attached());
    }

    #[tokio::test]
    async fn test_cancelled_before_writing_creates_nothing() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let token = CancelToken::new();
        token.interrupt();
        let mut builder = builder(&tmp, Language::JavaScript, &runner).with_cancel_token(token);

        let err = builder.build().await.unwrap_err();

        assert!(matches!(err, ScaffoldError::Cancelled));
        assert!(!tmp.path().join("demo").exists());
    }

    #[tokio::test]
    async fn test_steps_out_of_order_are_rejected() {
        let tmp = TempDir::new().unwrap();
        let runner = RecordingRunner::new();
        let mut builder = builder(&tmp, Language::JavaScript, &runner);

        assert!(builder.generate().await.is_err());
        assert!(builder.install(true).await.is_err());
        assert!(builder.finish().is_err());
        assert_eq!(builder.state(), BuildState::Init);
        assert!(!tmp.path().join("demo").exists());
    }
}
