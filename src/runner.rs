//! # Command Runner
//!
//! Every external process this crate starts goes through the
//! [`CommandRunner`] trait. The trait takes a program and a typed argument
//! list, never a shell string, so tags and paths are passed to git verbatim.
//!
//! [`SystemRunner`] is the production implementation. Tests substitute a
//! scripted runner that records calls and replays canned output.

use std::path::{Path, PathBuf};
use std::process::Command;

use crate::error::{Error, Result};

/// Captured result of one process invocation.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommandOutput {
    /// Exit code, or `-1` when the process was killed by a signal.
    pub code: i32,
    pub stdout: String,
    pub stderr: String,
}

impl CommandOutput {
    /// A successful invocation with the given stdout.
    pub fn success(stdout: impl Into<String>) -> Self {
        Self {
            code: 0,
            stdout: stdout.into(),
            stderr: String::new(),
        }
    }

    /// A failed invocation.
    pub fn failure(code: i32, stdout: impl Into<String>, stderr: impl Into<String>) -> Self {
        Self {
            code,
            stdout: stdout.into(),
            stderr: stderr.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.code == 0
    }
}

/// Trait for process execution - allows scripting git in tests
pub trait CommandRunner: Send + Sync {
    /// Runs `program` with `args` to completion and captures its output.
    ///
    /// A non-zero exit status is not an error at this layer; callers decide
    /// how to classify it. `Err` is reserved for failing to start the
    /// process at all.
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput>;
}

/// Runs commands on the host inside a fixed working directory.
///
/// The locale is forced to `C` so that the markers git prints on conflicts
/// and no-op merges are stable regardless of the operator's environment.
#[derive(Debug, Clone)]
pub struct SystemRunner {
    workdir: PathBuf,
}

impl SystemRunner {
    pub fn new(workdir: impl Into<PathBuf>) -> Self {
        Self {
            workdir: workdir.into(),
        }
    }

    pub fn workdir(&self) -> &Path {
        &self.workdir
    }
}

impl CommandRunner for SystemRunner {
    fn run(&self, program: &str, args: &[String]) -> Result<CommandOutput> {
        let output = Command::new(program)
            .args(args)
            .current_dir(&self.workdir)
            .env("LC_ALL", "C")
            .env("LANG", "C")
            .output()
            .map_err(|e| Error::GitCommand {
                step: format!("{} {}", program, args.first().map(String::as_str).unwrap_or("")),
                code: -1,
                stdout: String::new(),
                stderr: e.to_string(),
            })?;

        Ok(CommandOutput {
            code: output.status.code().unwrap_or(-1),
            stdout: String::from_utf8_lossy(&output.stdout).into_owned(),
            stderr: String::from_utf8_lossy(&output.stderr).into_owned(),
        })
    }
}
