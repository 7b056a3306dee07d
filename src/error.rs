//! # Error Handling
//!
//! This module defines the centralized error type for `wlancaf-merge`. It
//! uses `thiserror` to describe every failure mode of a merge run with
//! enough context for an operator to act on it.
//!
//! ## Taxonomy
//!
//! - **`Environment`**: the working directory does not look like a kernel
//!   tree (missing root `Makefile` or staging directory).
//! - **`Precondition`**: the on-disk staging state does not match the
//!   requested mode.
//! - **`Conflict`**: git stopped on overlapping changes. The tree is left
//!   mid-merge on purpose and the process exits with git's own code.
//! - **`GitCommand`**: any other git failure.
//! - **`GitVersion`**, **`InvalidTag`**, **`BuildConfig`**, **`ConfigParse`**:
//!   input and file-format problems.
//!
//! Variants that carry a `hint` render it on its own line as
//! `  hint: ...`, following the suggestion style used across the CLI.

use std::path::PathBuf;
use thiserror::Error;

fn render_hint(hint: &Option<String>) -> String {
    hint.as_ref()
        .map(|h| format!("\n  hint: {}", h))
        .unwrap_or_default()
}

/// Main error type for wlancaf-merge operations
#[derive(Error, Debug)]
pub enum Error {
    /// The destination tree is not a kernel source tree.
    #[error("Environment error: {message}{}", render_hint(hint))]
    Environment {
        message: String,
        hint: Option<String>,
    },

    /// The staging directories are inconsistent with the requested mode.
    #[error("Precondition mismatch: {message}{}", render_hint(hint))]
    Precondition {
        message: String,
        hint: Option<String>,
    },

    /// A git merge step reported unresolved conflicts.
    #[error(
        "Merge conflict during `{step}` (exit code {code})\nstdout: {stdout}\nstderr: {stderr}{}",
        render_hint(hint)
    )]
    Conflict {
        step: String,
        code: i32,
        stdout: String,
        stderr: String,
        hint: Option<String>,
    },

    /// A git command failed without a conflict marker.
    #[error("Git command failed: `{step}` (exit code {code})\nstdout: {stdout}\nstderr: {stderr}")]
    GitCommand {
        step: String,
        code: i32,
        stdout: String,
        stderr: String,
    },

    /// The output of `git --version` could not be understood.
    #[error("Unable to parse git version from {output:?}")]
    GitVersion { output: String },

    /// The tag supplied by the operator cannot be used as a git ref.
    #[error("Invalid tag '{tag}': {message}")]
    InvalidTag { tag: String, message: String },

    /// A build configuration file could not be patched.
    #[error("Build configuration error in {}: {message}", path.display())]
    BuildConfig { path: PathBuf, message: String },

    /// The settings file is malformed.
    #[error("Configuration parsing error: {message}{}", render_hint(hint))]
    ConfigParse {
        message: String,
        hint: Option<String>,
    },

    /// An I/O error, wrapped from `std::io::Error`.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A regular expression error, wrapped from `regex::Error`.
    #[error("Regex error: {0}")]
    Regex(#[from] regex::Error),

    /// A URL parsing error, wrapped from `url::ParseError`.
    #[error("URL parsing error: {0}")]
    UrlParse(#[from] url::ParseError),
}

impl Error {
    /// The process exit code this error should terminate the run with.
    ///
    /// Conflicts propagate git's own status so wrappers can tell them apart;
    /// everything else is a generic failure.
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::Conflict { code, .. } if *code > 0 => *code,
            _ => 1,
        }
    }

    /// Returns `true` when the tree was intentionally left mid-merge.
    pub fn is_conflict(&self) -> bool {
        matches!(self, Error::Conflict { .. })
    }
}

/// A convenient type alias for `Result<T, Error>`.
pub type Result<T> = std::result::Result<T, Error>;
