//! Shared test utilities for integration and E2E tests.
//!
//! This module provides a kernel-tree fixture, a scripted git runner for
//! driving the library without a real git, and helpers for building real
//! upstream repositories in the feature-gated end-to-end tests.
//!
//! ## Usage
//!
//! ```rust,ignore
//! mod common;
//! use common::prelude::*;
//!
//! #[test]
//! fn test_example() {
//!     let tree = KernelTree::new().with_populated("prima");
//!     tree.command().args(["check", "-W", "prima", "-I", "update"]).assert().success();
//! }
//! ```

use assert_fs::prelude::*;
use std::path::{Path, PathBuf};
use std::process::Command;
use std::sync::Mutex;

use wlancaf_merge::error::Result;
use wlancaf_merge::runner::{CommandOutput, CommandRunner};

/// Re-export commonly used test dependencies for convenience.
pub mod prelude {
    pub use assert_cmd::cargo::cargo_bin_cmd;
    pub use assert_fs::prelude::*;
    #[allow(unused_imports)]
    pub use assert_fs::TempDir;
    pub use predicates::prelude::*;

    #[allow(unused_imports)]
    pub use super::fixtures;
    #[allow(unused_imports)]
    pub use super::{git, git_commit_all, git_env, git_init, FakeGit, KernelTree};
}

/// Build-file contents of a minimal staging tree.
#[allow(dead_code)]
pub mod fixtures {
    pub const ROOT_MAKEFILE: &str = "VERSION = 4\nPATCHLEVEL = 19\n";

    pub const STAGING_KCONFIG: &str = r#"menuconfig STAGING
	bool "Staging drivers"

if STAGING

source "drivers/staging/android/Kconfig"

endif # STAGING
"#;

    pub const STAGING_MAKEFILE: &str = "# Makefile for staging directory\n\
obj-y\t\t\t\t+= media/\n\
obj-$(CONFIG_ANDROID)\t\t+= android/\n";

    pub const QCACLD_SOURCE: &str = r#"source "drivers/staging/qcacld-3.0/Kconfig""#;
    pub const PRIMA_SOURCE: &str = r#"source "drivers/staging/prima/Kconfig""#;
}

/// A temporary kernel source tree with a staging directory.
///
/// # Example
///
/// ```rust,ignore
/// let tree = KernelTree::new()
///     .with_populated("fw-api")
///     .with_empty("qcacld-3.0");
/// ```
pub struct KernelTree {
    temp_dir: assert_fs::TempDir,
}

#[allow(dead_code)]
impl KernelTree {
    /// Create a tree with a root `Makefile` and staging `Kconfig`/`Makefile`.
    pub fn new() -> Self {
        let tree = Self::bare();
        tree.with_file("Makefile", fixtures::ROOT_MAKEFILE)
            .with_file("drivers/staging/Kconfig", fixtures::STAGING_KCONFIG)
            .with_file("drivers/staging/Makefile", fixtures::STAGING_MAKEFILE)
    }

    /// Create an empty directory that is not a kernel tree.
    pub fn bare() -> Self {
        Self {
            temp_dir: assert_fs::TempDir::new().expect("Failed to create temp directory"),
        }
    }

    /// Add a file with the given path and content.
    pub fn with_file(self, path: &str, content: &str) -> Self {
        self.temp_dir
            .child(path)
            .write_str(content)
            .expect("Failed to write file");
        self
    }

    /// Create an empty staging destination.
    pub fn with_empty(self, name: &str) -> Self {
        self.temp_dir
            .child(format!("drivers/staging/{}", name))
            .create_dir_all()
            .expect("Failed to create directory");
        self
    }

    /// Create a staging destination holding one source file.
    pub fn with_populated(self, name: &str) -> Self {
        self.with_file(
            &format!("drivers/staging/{}/Kbuild", name),
            "obj-m += wlan.o\n",
        )
    }

    pub fn path(&self) -> &Path {
        self.temp_dir.path()
    }

    pub fn child(&self, path: &str) -> assert_fs::fixture::ChildPath {
        self.temp_dir.child(path)
    }

    /// Read a file relative to the tree root.
    pub fn read(&self, path: &str) -> String {
        std::fs::read_to_string(self.path().join(path)).expect("Failed to read file")
    }

    /// Create a command running in this tree.
    pub fn command(&self) -> assert_cmd::Command {
        let mut cmd = assert_cmd::cargo::cargo_bin_cmd!("wlancaf-merge");
        cmd.current_dir(self.path());
        cmd.env_remove("WLANCAF_REMOTE_BASE");
        cmd.env_remove("RUST_LOG");
        cmd.env("NO_COLOR", "1");
        cmd
    }
}

impl Default for KernelTree {
    fn default() -> Self {
        Self::new()
    }
}

type Responder = Box<dyn Fn(&[String]) -> Option<CommandOutput> + Send + Sync>;

/// A git stand-in that records every call and answers with canned output.
///
/// Unanswered calls succeed quietly; `--version`, `rev-parse` and `rev-list`
/// get plausible defaults. Commit messages are captured when `commit` runs.
pub struct FakeGit {
    responder: Responder,
    calls: Mutex<Vec<Vec<String>>>,
    messages: Mutex<Vec<(PathBuf, String)>>,
}

#[allow(dead_code)]
impl FakeGit {
    pub fn new() -> Self {
        Self::with_responder(|_| None)
    }

    pub fn with_responder(
        responder: impl Fn(&[String]) -> Option<CommandOutput> + Send + Sync + 'static,
    ) -> Self {
        Self {
            responder: Box::new(responder),
            calls: Mutex::new(Vec::new()),
            messages: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> Vec<Vec<String>> {
        self.calls.lock().unwrap().clone()
    }

    pub fn calls_to(&self, sub: &str) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter(|c| c.first().map(String::as_str) == Some(sub))
            .collect()
    }

    pub fn subcommands(&self) -> Vec<String> {
        self.calls().into_iter().map(|c| c[0].clone()).collect()
    }

    pub fn messages(&self) -> Vec<(PathBuf, String)> {
        self.messages.lock().unwrap().clone()
    }
}

impl CommandRunner for FakeGit {
    fn run(&self, _program: &str, args: &[String]) -> Result<CommandOutput> {
        self.calls.lock().unwrap().push(args.to_vec());

        if args.first().map(String::as_str) == Some("commit") {
            if let Some(pos) = args.iter().position(|a| a == "--file") {
                let path = PathBuf::from(&args[pos + 1]);
                let content = std::fs::read_to_string(&path)?;
                self.messages.lock().unwrap().push((path, content));
            }
        }

        if let Some(output) = (self.responder)(args) {
            return Ok(output);
        }
        Ok(match args.first().map(String::as_str) {
            Some("--version") => CommandOutput::success("git version 2.39.2\n"),
            Some("rev-parse") => CommandOutput::success("main\n"),
            Some("rev-list") => CommandOutput::success("0\n"),
            _ => CommandOutput::success(""),
        })
    }
}

/// Run real git in `dir` with a fixed identity, panicking on failure.
#[allow(dead_code)]
pub fn git(dir: &Path, args: &[&str]) -> String {
    let output = Command::new("git")
        .args(args)
        .current_dir(dir)
        .envs(git_env())
        .output()
        .expect("Failed to run git");
    assert!(
        output.status.success(),
        "git {:?} failed: {}",
        args,
        String::from_utf8_lossy(&output.stderr)
    );
    String::from_utf8_lossy(&output.stdout).into_owned()
}

/// Environment isolating real git from the user's configuration.
#[allow(dead_code)]
pub fn git_env() -> Vec<(&'static str, &'static str)> {
    vec![
        ("GIT_AUTHOR_NAME", "Test Author"),
        ("GIT_AUTHOR_EMAIL", "author@example.org"),
        ("GIT_COMMITTER_NAME", "Test Committer"),
        ("GIT_COMMITTER_EMAIL", "committer@example.org"),
        ("GIT_CONFIG_NOSYSTEM", "1"),
        ("GIT_CONFIG_GLOBAL", "/dev/null"),
        ("LC_ALL", "C"),
    ]
}

/// Initialize a repository on `main` in `dir`.
#[allow(dead_code)]
pub fn git_init(dir: &Path) {
    std::fs::create_dir_all(dir).expect("Failed to create repository directory");
    git(dir, &["init", "-q"]);
    git(dir, &["symbolic-ref", "HEAD", "refs/heads/main"]);
}

/// Stage and commit everything in `dir`.
#[allow(dead_code)]
pub fn git_commit_all(dir: &Path, subject: &str) {
    git(dir, &["add", "-A"]);
    git(dir, &["commit", "-q", "-m", subject]);
}
