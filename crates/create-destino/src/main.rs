//! create-destino - scaffold a new Destino server project

use clap::{Parser, ValueEnum};
use destino_scaffold::config::{Language, PackageManager};
use destino_scaffold::tui::{CreateArgs, ResolverKind};
use destino_scaffold::CancelToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "create-destino")]
#[command(about = "CLI for scaffolding Destino server projects")]
#[command(version)]
pub struct Args {
    /// Project name (use "." to scaffold into the current, empty directory)
    pub name: Option<String>,

    /// Project language
    #[arg(short, long, value_enum)]
    pub language: Option<Language>,

    /// Package manager used to install and run the project
    #[arg(short, long, value_enum)]
    pub package_manager: Option<PackageManager>,

    /// Use the default configuration and install dependencies without asking
    #[arg(short, long)]
    pub yes: bool,

    /// Don't install dependencies
    #[arg(long)]
    pub skip_install: bool,

    /// Where to look up the latest dependency versions
    #[arg(long, value_enum, default_value_t = ResolverKind::Registry)]
    pub resolver: ResolverKind,

    /// Diagnostic log level (overridden by RUST_LOG)
    #[arg(long, value_enum, default_value_t = LogLevel::Warn)]
    pub log_level: LogLevel,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum LogLevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

impl LogLevel {
    fn to_filter_directive(self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

impl From<Args> for CreateArgs {
    fn from(args: Args) -> Self {
        CreateArgs {
            name: args.name,
            language: args.language,
            package_manager: args.package_manager,
            yes: args.yes,
            skip_install: args.skip_install,
            resolver: args.resolver,
        }
    }
}

/// Diagnostics go to stderr so they never mix with the prompts
fn initialize_tracing(log_level: LogLevel) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(log_level.to_filter_directive()));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() {
    // Ensure terminal cursor is restored on panic
    let default_panic = std::panic::take_hook();
    std::panic::set_hook(Box::new(move |info| {
        let _ = console::Term::stderr().show_cursor();
        default_panic(info);
    }));

    let args = Args::parse();
    initialize_tracing(args.log_level);

    // Ctrl+C cancels while prompting; afterwards it is only recorded
    let cancel = CancelToken::new();
    if let Err(e) = cancel.install_ctrlc_handler() {
        tracing::warn!("failed to install Ctrl+C handler: {}", e);
    }

    let result = destino_scaffold::run(args.into(), cancel).await;

    // Ensure cursor is visible on exit
    let _ = console::Term::stderr().show_cursor();

    if let Err(err) = result {
        let code = destino_scaffold::tui::report_error(&err);
        std::process::exit(code);
    }
}
