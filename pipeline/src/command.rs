//! External command building and invocation.
//!
//! Every tool the pipeline drives (download, archive, publish) goes through a
//! [`CommandInvoker`], which appends the run's pass-through arguments, echoes
//! the shell-escaped command line, and honours dry-run. Process spawning sits
//! behind the [`CommandExecutor`] trait so tests never start real tools.

use crate::output::write_line;
use log::{debug, warn};
use std::borrow::Cow;
use std::fmt;
use std::io::{self, Write};
use std::process::{Command, ExitStatus};

/// Abstraction for running external commands.
#[cfg_attr(test, mockall::automock)]
pub trait CommandExecutor {
    /// Runs `program` with `args`, inheriting stdio, and waits for it to exit.
    ///
    /// # Errors
    ///
    /// Returns any I/O error raised while spawning the process.
    fn run(&self, program: &str, args: &[String]) -> io::Result<ExitStatus>;
}

/// Executes commands on the host system.
///
/// # Examples
///
/// ```no_run
/// use artifacts_pipeline::command::{CommandExecutor, SystemCommandExecutor};
///
/// let status = SystemCommandExecutor.run("butler", &["--version".to_owned()])?;
/// assert!(status.success());
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemCommandExecutor;

impl CommandExecutor for SystemCommandExecutor {
    fn run(&self, program: &str, args: &[String]) -> io::Result<ExitStatus> {
        Command::new(program).args(args).status()
    }
}

/// A flat argument vector; the first token is the program.
///
/// Empty tokens are dropped as they are added, so optional pieces can be
/// appended unconditionally.
///
/// # Examples
///
/// ```
/// use artifacts_pipeline::command::CommandLine;
///
/// let command = CommandLine::new(["butler"])
///     .arg("validate")
///     .option("--platform", Some("linux"))
///     .option("--arch", None::<&str>)
///     .arg("build/artifacts/EkoScape-linux-x64/");
/// assert_eq!(
///     command.to_string(),
///     "butler validate --platform linux build/artifacts/EkoScape-linux-x64/"
/// );
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandLine {
    tokens: Vec<String>,
}

impl CommandLine {
    /// Start from a tool prefix such as `["gh", "run"]`.
    #[must_use]
    pub fn new<I, S>(prefix: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::default().args(prefix)
    }

    /// Append one token.
    #[must_use]
    pub fn arg(mut self, token: impl Into<String>) -> Self {
        let token = token.into();
        if !token.is_empty() {
            self.tokens.push(token);
        }
        self
    }

    /// Append several tokens in order.
    #[must_use]
    pub fn args<I, S>(self, tokens: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        tokens.into_iter().fold(self, Self::arg)
    }

    /// Append a token only when present.
    #[must_use]
    pub fn arg_opt(self, token: Option<impl Into<String>>) -> Self {
        self.args(token)
    }

    /// Append `flag value` only when the value is present.
    #[must_use]
    pub fn option(self, flag: &str, value: Option<impl Into<String>>) -> Self {
        let Some(value) = value else {
            return self;
        };
        self.arg(flag).arg(value)
    }

    /// Append `flag` only when `enabled`.
    #[must_use]
    pub fn flag_if(self, flag: &str, enabled: bool) -> Self {
        if enabled { self.arg(flag) } else { self }
    }

    /// The program, if any token was added.
    #[must_use]
    pub fn program(&self) -> Option<&str> {
        self.tokens.first().map(String::as_str)
    }

    /// Arguments after the program.
    #[must_use]
    pub fn arguments(&self) -> &[String] {
        self.tokens.get(1..).unwrap_or_default()
    }

    /// Every token, program first.
    #[must_use]
    pub fn tokens(&self) -> &[String] {
        &self.tokens
    }
}

impl fmt::Display for CommandLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let escaped: Vec<Cow<'_, str>> = self
            .tokens
            .iter()
            .map(|token| shlex::try_quote(token).unwrap_or(Cow::Borrowed(token.as_str())))
            .collect();
        f.write_str(&escaped.join(" "))
    }
}

/// Per-run settings every invocation shares.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InvocationContext {
    dry_run: bool,
    extra_args: Vec<String>,
}

impl InvocationContext {
    /// Build a context; `extra_args` are appended to every command.
    #[must_use]
    pub const fn new(dry_run: bool, extra_args: Vec<String>) -> Self {
        Self {
            dry_run,
            extra_args,
        }
    }

    /// Whether the run is a dry-run.
    #[must_use]
    pub const fn dry_run(&self) -> bool {
        self.dry_run
    }

    /// Pass-through arguments.
    #[must_use]
    pub fn extra_args(&self) -> &[String] {
        &self.extra_args
    }
}

/// Whether an invocation skips execution in dry-run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DryRun {
    /// Echo only when the run is a dry-run.
    Honour,
    /// Always execute; the tool receives its own preview flag instead.
    Ignore,
}

/// Echoes and runs commands under an [`InvocationContext`].
pub struct CommandInvoker<'a> {
    context: &'a InvocationContext,
    executor: &'a dyn CommandExecutor,
}

impl<'a> CommandInvoker<'a> {
    /// Create an invoker over `executor`.
    #[must_use]
    pub const fn new(context: &'a InvocationContext, executor: &'a dyn CommandExecutor) -> Self {
        Self { context, executor }
    }

    /// The context commands run under.
    #[must_use]
    pub const fn context(&self) -> &InvocationContext {
        self.context
    }

    /// Run `command`, honouring dry-run. Returns whether it succeeded.
    pub fn invoke(&self, command: CommandLine, out: &mut dyn Write) -> bool {
        self.invoke_with(command, DryRun::Honour, out)
    }

    /// Run `command` with an explicit dry-run policy.
    ///
    /// The extra arguments are appended and the escaped command line is
    /// echoed in every mode. Dry-run skips execution and reports success. A
    /// non-zero exit or a spawn error is a failure, never an error.
    pub fn invoke_with(&self, command: CommandLine, dry_run: DryRun, out: &mut dyn Write) -> bool {
        let command = command.args(self.context.extra_args().iter().cloned());
        write_line(out, &command);

        if dry_run == DryRun::Honour && self.context.dry_run() {
            debug!(target: "command", "dry-run; not executing {command}");
            return true;
        }

        let Some(program) = command.program() else {
            warn!(target: "command", "refusing to run an empty command line");
            return false;
        };

        match self.executor.run(program, command.arguments()) {
            Ok(status) if status.success() => true,
            Ok(status) => {
                let Some(code) = status.code() else {
                    warn!(target: "command", "{program} was terminated by a signal");
                    return false;
                };
                warn!(target: "command", "{program} exited with code {code}");
                false
            }
            Err(err) => {
                warn!(target: "command", "failed to run {program}: {err}");
                false
            }
        }
    }
}

#[cfg(test)]
#[path = "command_tests.rs"]
mod tests;
