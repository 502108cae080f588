//! Process invocation with dry-run support.
//!
//! Every command is echoed in shell-quoted form before it runs, so a
//! `--dry-run` pass prints exactly what a real pass would execute. In
//! dry-run mode nothing is spawned.

use crate::pipeline::error::{Error, Result};
use crate::util::shell::sh_quote;
use std::path::Path;
use std::process::{Command, Output};

/// Spawns external tools, or merely prints them in dry-run mode.
#[derive(Clone, Copy, Debug)]
pub struct Invoker {
    dry_run: bool,
}

impl Invoker {
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }

    /// Runs a command to completion with inherited stdio. A non-zero exit
    /// status is an error.
    pub fn run(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<()> {
        let rendered = render_command(program, args);
        log::info!("$ {rendered}");
        if self.dry_run {
            return Ok(());
        }
        let mut command = Command::new(program);
        command.args(args);
        if let Some(dir) = cwd {
            command.current_dir(dir);
        }
        let status = command.status().map_err(|error| Error::CommandFailed {
            command: rendered.clone(),
            error,
        })?;
        if !status.success() {
            return Err(Error::CommandExit {
                command: rendered,
                status,
            });
        }
        Ok(())
    }

    /// Like [`run`](Self::run), but a non-zero exit status is reported as
    /// `Ok(false)` instead of an error. Failing to spawn at all is still
    /// an error.
    pub fn run_ok(&self, program: &str, args: &[&str], cwd: Option<&Path>) -> Result<bool> {
        match self.run(program, args, cwd) {
            Ok(()) => Ok(true),
            Err(Error::CommandExit { .. }) => Ok(false),
            Err(e) => Err(e),
        }
    }

    /// Runs a command and captures its output. Returns `Ok(None)` in
    /// dry-run mode; callers must fabricate an answer themselves. The exit
    /// status is not checked here, since some tools (notably PlistBuddy)
    /// report routine conditions through stderr.
    pub fn capture(&self, program: &str, args: &[&str]) -> Result<Option<Output>> {
        let rendered = render_command(program, args);
        log::info!("$ {rendered}");
        if self.dry_run {
            return Ok(None);
        }
        let output = Command::new(program)
            .args(args)
            .output()
            .map_err(|error| Error::CommandFailed {
                command: rendered,
                error,
            })?;
        Ok(Some(output))
    }
}

/// Renders a command line the way a shell would need it typed.
pub fn render_command(program: &str, args: &[&str]) -> String {
    let mut rendered = sh_quote(program);
    for arg in args {
        rendered.push(' ');
        rendered.push_str(&sh_quote(arg));
    }
    rendered
}
