//! External command execution
//!
//! Package manager installs, dev server starts, and `npm show` lookups all go
//! through [`CommandRunner`] so the pipeline can be driven without spawning real
//! processes.

use colored::Colorize;
use std::future::Future;
use std::path::PathBuf;
use std::process::Stdio;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, BufReader};
use tokio::process::Command as TokioCommand;

/// How the child process's standard streams are connected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StdioMode {
    /// Capture stdout/stderr, echoing lines to the terminal as they arrive
    Captured,
    /// Captured without echo
    Quiet,
    /// Hand the terminal to the child
    Inherited,
}

/// A command to run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CommandSpec {
    pub program: String,
    pub args: Vec<String>,
    pub cwd: Option<PathBuf>,
    pub stdio: StdioMode,
}

impl CommandSpec {
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
            cwd: None,
            stdio: StdioMode::Captured,
        }
    }

    pub fn current_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cwd = Some(dir.into());
        self
    }

    pub fn stdio(mut self, stdio: StdioMode) -> Self {
        self.stdio = stdio;
        self
    }

    /// Command line as shown to the user
    pub fn display(&self) -> String {
        if self.args.is_empty() {
            self.program.clone()
        } else {
            format!("{} {}", self.program, self.args.join(" "))
        }
    }
}

/// Outcome of a finished command
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, `None` when the process was killed by a signal
    pub code: Option<i32>,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    pub fn success(&self) -> bool {
        self.code == Some(0)
    }
}

/// Runs external commands
///
/// Returns `Err` only when the process could not be spawned or awaited; a
/// non-zero exit is reported through [`CommandOutput::code`].
pub trait CommandRunner {
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = std::io::Result<CommandOutput>>;
}

impl<R: CommandRunner> CommandRunner for &R {
    fn run(&self, spec: &CommandSpec) -> impl Future<Output = std::io::Result<CommandOutput>> {
        (**self).run(spec)
    }
}

/// Runs commands as real child processes
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandRunner;

impl SystemCommandRunner {
    fn command(spec: &CommandSpec) -> TokioCommand {
        // npm/yarn/pnpm are .cmd shims on Windows and need the shell to resolve them
        let mut cmd = if cfg!(windows) {
            let mut cmd = TokioCommand::new("cmd");
            cmd.arg("/C").arg(&spec.program);
            cmd
        } else {
            TokioCommand::new(&spec.program)
        };
        cmd.args(&spec.args);
        if let Some(dir) = &spec.cwd {
            cmd.current_dir(dir);
        }
        cmd
    }

    async fn run_inherited(spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        let status = Self::command(spec)
            .stdin(Stdio::inherit())
            .stdout(Stdio::inherit())
            .stderr(Stdio::inherit())
            .status()
            .await?;

        Ok(CommandOutput {
            code: status.code(),
            ..CommandOutput::default()
        })
    }

    async fn run_captured(spec: &CommandSpec, echo: bool) -> std::io::Result<CommandOutput> {
        let mut child = Self::command(spec)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| std::io::Error::other("Failed to capture stdout"))?;
        let stderr = child
            .stderr
            .take()
            .ok_or_else(|| std::io::Error::other("Failed to capture stderr"))?;

        let mut stdout_reader = BufReader::new(stdout);
        let mut stderr_reader = BufReader::new(stderr);
        let mut stdout_buf = Vec::new();
        let mut stderr_buf = Vec::new();

        let mut output = CommandOutput::default();
        let mut stdout_open = true;
        let mut stderr_open = true;

        let pumped: std::io::Result<()> = async {
            while stdout_open || stderr_open {
                tokio::select! {
                    line = next_line(&mut stdout_reader, &mut stdout_buf), if stdout_open => {
                        match line? {
                            Some(line) => {
                                if echo {
                                    println!("  {}", line);
                                }
                                output.stdout.push_str(&line);
                                output.stdout.push('\n');
                            }
                            None => stdout_open = false,
                        }
                    }
                    line = next_line(&mut stderr_reader, &mut stderr_buf), if stderr_open => {
                        match line? {
                            Some(line) => {
                                if echo {
                                    eprintln!("  {}", line.yellow());
                                }
                                output.stderr.push_str(&line);
                                output.stderr.push('\n');
                            }
                            None => stderr_open = false,
                        }
                    }
                }
            }
            Ok(())
        }
        .await;

        if let Err(e) = pumped {
            tracing::warn!(command = %spec.display(), error = %e, "lost child output, killing process");
            let _ = child.kill().await;
            return Err(e);
        }

        let status = child.wait().await?;
        output.code = status.code();
        Ok(output)
    }
}

/// Next line without its terminator, decoded lossily
///
/// Partial reads stay in `buf` so a cancelled call resumes where it stopped.
async fn next_line<R: AsyncBufRead + Unpin>(
    reader: &mut R,
    buf: &mut Vec<u8>,
) -> std::io::Result<Option<String>> {
    if reader.read_until(b'\n', buf).await? == 0 && buf.is_empty() {
        return Ok(None);
    }

    let mut end = buf.len();
    if buf[..end].ends_with(b"\n") {
        end -= 1;
    }
    if buf[..end].ends_with(b"\r") {
        end -= 1;
    }
    let line = String::from_utf8_lossy(&buf[..end]).into_owned();
    buf.clear();
    Ok(Some(line))
}

impl CommandRunner for SystemCommandRunner {
    async fn run(&self, spec: &CommandSpec) -> std::io::Result<CommandOutput> {
        tracing::debug!(command = %spec.display(), cwd = ?spec.cwd, stdio = ?spec.stdio, "spawning command");

        let output = match spec.stdio {
            StdioMode::Inherited => Self::run_inherited(spec).await?,
            StdioMode::Captured => {
                println!();
                println!("{} {}", "Running:".dimmed(), spec.display().yellow());
                println!();
                let output = Self::run_captured(spec, true).await?;
                println!();
                output
            }
            StdioMode::Quiet => Self::run_captured(spec, false).await?,
        };

        tracing::debug!(command = %spec.display(), code = ?output.code, "command finished");
        Ok(output)
    }
}
