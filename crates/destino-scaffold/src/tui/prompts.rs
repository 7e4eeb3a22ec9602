//! Charm-style CLI flow using cliclack

use super::clack::ClackPrompter;
use crate::builder::{BuildState, ProjectBuilder};
use crate::cancel::CancelToken;
use crate::collector::{ConfigCollector, Presets, Prompter};
use crate::config::{ConfigurationMode, Language, PackageManager, ProjectConfig, ProjectTarget};
use crate::error::ScaffoldError;
use crate::registry::{NpmVersionResolver, RegistryVersionResolver, VersionResolver};
use crate::runtime::{check, SystemCommandRunner};
use anyhow::Result;
use clap::ValueEnum;

const USER_AGENT: &str = concat!("create-destino/", env!("CARGO_PKG_VERSION"));

pub const INSTALL_PROMPT: &str = "Do you want to install dependencies?";
pub const START_PROMPT: &str = "Do you want to start the dev server now?";

/// Where dependency versions are looked up
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum ResolverKind {
    /// Query the npm registry over HTTP
    #[default]
    Registry,
    /// Ask the local npm CLI (`npm show <pkg> version`)
    Npm,
}

/// CLI arguments for the create flow
#[derive(Debug, Clone, Default)]
pub struct CreateArgs {
    /// Project name; prompted for when absent
    pub name: Option<String>,

    pub language: Option<Language>,

    pub package_manager: Option<PackageManager>,

    /// Default configuration, install dependencies, don't start the server
    pub yes: bool,

    pub skip_install: bool,

    pub resolver: ResolverKind,
}

/// Run the CLI with interactive prompts
pub async fn run(args: CreateArgs, cancel: CancelToken) -> Result<()> {
    cliclack::intro("create-destino")?;

    let cwd = std::env::current_dir()?;
    let mut prompter = ClackPrompter;

    // Step 1: Collect configuration (name is validated and checked first)
    let presets = Presets {
        language: args.language,
        mode: args.yes.then_some(ConfigurationMode::Default),
        package_manager: args.package_manager,
    };
    let (target, config) = ConfigCollector::new(&mut prompter, cancel.clone())
        .with_presets(presets)
        .collect(args.name.as_deref(), &cwd)?;

    // Step 2: Generate with the chosen resolver
    match args.resolver {
        ResolverKind::Registry => {
            let resolver = RegistryVersionResolver::from_env(USER_AGENT)?;
            cliclack::log::info(format!("Resolving versions from {}", resolver.base_url()))?;
            create_project(&mut prompter, config, target, resolver, &args, cancel).await
        }
        ResolverKind::Npm => {
            cliclack::log::info("Resolving versions with npm")?;
            let resolver = NpmVersionResolver::new(SystemCommandRunner);
            create_project(&mut prompter, config, target, resolver, &args, cancel).await
        }
    }
}

async fn create_project<P: Prompter, R: VersionResolver>(
    prompter: &mut P,
    config: ProjectConfig,
    target: ProjectTarget,
    resolver: R,
    args: &CreateArgs,
    cancel: CancelToken,
) -> Result<()> {
    let mut builder = ProjectBuilder::new(config, target, resolver, SystemCommandRunner)
        .with_cancel_token(cancel);

    // Step 3: Create directories and files
    let spinner = cliclack::spinner();
    spinner.start("Creating project...");
    if let Err(e) = builder.build().await {
        spinner.stop("Failed to create project");
        return Err(e.into());
    }
    spinner.stop(format!(
        "Project {} created in {}",
        builder.config().name,
        builder.target().dir.display()
    ));

    // Step 4: Install dependencies
    let package_manager = builder.config().package_manager;
    let install = if args.skip_install {
        false
    } else if args.yes {
        true
    } else {
        prompter
            .confirm(INSTALL_PROMPT, true)
            .map_err(ScaffoldError::from_prompt)?
    };

    if install {
        let info = check::check_package_manager(package_manager);
        if info.available {
            cliclack::log::info(format!(
                "Installing dependencies using {}...",
                info.summary()
            ))?;
        } else {
            cliclack::log::warning(format!("{} was not found on PATH", package_manager))?;
        }
    }

    builder.install(install).await?;

    if builder.state() == BuildState::Installed {
        cliclack::log::success("Dependencies installed successfully.")?;
    } else {
        cliclack::log::remark(format!(
            "You can always install dependencies later by running '{}'.",
            package_manager.install_command()
        ))?;
    }

    // Step 5: Optionally start the dev server
    let start = builder.state() == BuildState::Installed
        && !args.yes
        && prompter
            .confirm(START_PROMPT, false)
            .map_err(ScaffoldError::from_prompt)?;

    print_next_steps(builder.target(), package_manager, builder.state())?;

    if start {
        cliclack::outro(format!("Starting {}", package_manager.dev_command()))?;
        builder.start(true).await?;
    } else {
        if builder.state() == BuildState::Installed {
            builder.start(false).await?;
        }
        cliclack::outro("Done. Keep coding and fly on.")?;
    }

    builder.finish()?;
    Ok(())
}

/// Numbered follow-up commands for the user
pub fn next_steps(
    target: &ProjectTarget,
    package_manager: PackageManager,
    state: BuildState,
) -> Vec<String> {
    let mut steps = Vec::new();

    if !target.in_place {
        steps.push(format!("cd {}", target.name));
    }

    if state != BuildState::Installed {
        steps.push(package_manager.install_command());
    }

    steps.push(package_manager.dev_command());

    steps
}

fn print_next_steps(
    target: &ProjectTarget,
    package_manager: PackageManager,
    state: BuildState,
) -> Result<()> {
    if !check::check_node().available {
        cliclack::log::warning("Node.js was not found; install it from https://nodejs.org")?;
    }

    let steps = next_steps(target, package_manager, state);

    println!();
    println!("  Next steps");
    println!();

    for (i, step) in steps.iter().enumerate() {
        println!("  {}.  {}", i + 1, step);
    }

    println!();
    Ok(())
}

/// Report a failed run and return the process exit code
pub fn report_error(err: &anyhow::Error) -> i32 {
    match err.downcast_ref::<ScaffoldError>() {
        Some(ScaffoldError::Cancelled) => {
            let _ = cliclack::outro_cancel("Operation cancelled.");
            ScaffoldError::Cancelled.exit_code()
        }
        Some(scaffold_err) => {
            let _ = cliclack::log::error(scaffold_err.to_string());
            let _ = cliclack::outro_cancel("Project setup failed.");
            scaffold_err.exit_code()
        }
        None => {
            let _ = cliclack::log::error(format!("{:#}", err));
            let _ = cliclack::outro_cancel("Project setup failed.");
            1
        }
    }
}
