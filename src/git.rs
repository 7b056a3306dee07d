//! # Git Operations
//!
//! Typed wrappers around the git subcommands a merge run needs. Each method
//! builds an argument vector and hands it to a [`CommandRunner`]; nothing is
//! ever interpolated into a shell string.
//!
//! Failures are classified here. A non-zero exit whose stdout mentions
//! `CONFLICT` becomes [`Error::Conflict`] and is meant to stop the run with
//! the tree left for manual resolution; any other non-zero exit becomes
//! [`Error::GitCommand`].

use std::path::Path;

use log::debug;

use crate::error::{Error, Result};
use crate::runner::{CommandOutput, CommandRunner};
use crate::suggestions;

/// Marker git prints on stdout for each conflicting path.
pub const CONFLICT_MARKER: &str = "CONFLICT";

/// Messages git prints when a merge has nothing to do. Older releases
/// hyphenate the phrase.
pub const UP_TO_DATE_MARKERS: &[&str] = &["Already up to date.", "Already up-to-date."];

/// Outcome of a merge that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergeStatus {
    Merged,
    AlreadyUpToDate,
}

/// Which slice of upstream history a merge message covers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum HistoryRange {
    /// Everything after a previously imported tag.
    Between { previous: String, target: String },
    /// The newest `limit` commits reachable from the target tag.
    Recent { target: String, limit: usize },
}

impl HistoryRange {
    /// Revision arguments selecting this range, terminated with `--` so the
    /// tag can never be taken for a path.
    pub fn rev_args(&self) -> Vec<String> {
        match self {
            HistoryRange::Between { previous, target } => vec![
                format!("refs/tags/{}..refs/tags/{}", previous, target),
                "--".to_string(),
            ],
            HistoryRange::Recent { target, limit } => vec![
                format!("--max-count={}", limit),
                format!("refs/tags/{}", target),
                "--".to_string(),
            ],
        }
    }

    /// Whether older history was left out of the range.
    pub fn is_truncated(&self) -> bool {
        matches!(self, HistoryRange::Recent { .. })
    }
}

/// Options for the commit that records an import.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CommitOptions {
    /// Replace the merge commit git just created instead of adding one.
    pub amend: bool,
    pub gpg_sign: bool,
    pub signoff: bool,
}

/// Git client bound to a runner.
pub struct Git<'r> {
    runner: &'r dyn CommandRunner,
}

impl<'r> Git<'r> {
    pub fn new(runner: &'r dyn CommandRunner) -> Self {
        Self { runner }
    }

    /// Runs git and classifies a non-zero exit.
    fn exec(&self, args: Vec<String>) -> Result<CommandOutput> {
        debug!("git {}", args.join(" "));
        let output = self.runner.run("git", &args)?;
        if output.is_success() {
            return Ok(output);
        }

        let step = format!("git {}", args.first().map(String::as_str).unwrap_or_default());
        if output.stdout.contains(CONFLICT_MARKER) {
            Err(Error::Conflict {
                step,
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
                hint: Some(suggestions::resolve_conflict()),
            })
        } else {
            Err(Error::GitCommand {
                step,
                code: output.code,
                stdout: output.stdout,
                stderr: output.stderr,
            })
        }
    }

    /// Raw `git --version` output.
    pub fn version(&self) -> Result<String> {
        Ok(self.exec(vec!["--version".to_string()])?.stdout)
    }

    /// Name of the currently checked out branch.
    pub fn current_branch(&self) -> Result<String> {
        let output = self.exec(args(&["rev-parse", "--abbrev-ref", "HEAD"]))?;
        Ok(output.stdout.trim().to_string())
    }

    /// Fetches `tag` (and its tags) from `url` into `FETCH_HEAD`.
    pub fn fetch_tag(&self, url: &str, tag: &str) -> Result<()> {
        self.exec(args(&["fetch", "--tags", "-f", url, tag]))?;
        Ok(())
    }

    /// Records `FETCH_HEAD` as merged without taking any of its content.
    pub fn merge_ours(&self, allow_unrelated_histories: bool) -> Result<()> {
        let mut argv = args(&["merge", "-s", "ours", "--no-commit"]);
        if allow_unrelated_histories {
            argv.push("--allow-unrelated-histories".to_string());
        }
        argv.push("FETCH_HEAD".to_string());
        self.exec(argv)?;
        Ok(())
    }

    /// Reads `FETCH_HEAD` into the index and work tree under `prefix`.
    pub fn read_tree_prefix(&self, prefix: &str) -> Result<()> {
        self.exec(vec![
            "read-tree".to_string(),
            format!("--prefix={}/", prefix.trim_end_matches('/')),
            "-u".to_string(),
            "FETCH_HEAD".to_string(),
        ])?;
        Ok(())
    }

    /// Merges `FETCH_HEAD` into the subtree at `prefix`.
    pub fn subtree_merge(&self, prefix: &str) -> Result<MergeStatus> {
        let output = self.exec(vec![
            "merge".to_string(),
            "-X".to_string(),
            format!("subtree={}", prefix),
            "FETCH_HEAD".to_string(),
            "--no-edit".to_string(),
        ])?;
        if UP_TO_DATE_MARKERS
            .iter()
            .any(|marker| output.stdout.contains(marker))
        {
            Ok(MergeStatus::AlreadyUpToDate)
        } else {
            Ok(MergeStatus::Merged)
        }
    }

    /// Commits the index with the message stored in `message_file`.
    pub fn commit(&self, message_file: &Path, options: CommitOptions) -> Result<()> {
        let mut argv = vec!["commit".to_string()];
        if options.amend {
            argv.push("--amend".to_string());
        }
        argv.push("--file".to_string());
        argv.push(message_file.to_string_lossy().into_owned());
        argv.push("--no-edit".to_string());
        argv.push("--quiet".to_string());
        if options.gpg_sign {
            argv.push("--gpg-sign".to_string());
        }
        if options.signoff {
            argv.push("--signoff".to_string());
        }
        self.exec(argv)?;
        Ok(())
    }

    /// Stages `path`.
    pub fn add(&self, path: &str) -> Result<()> {
        self.exec(args(&["add", "--", path]))?;
        Ok(())
    }

    /// Commit subjects touching `path`, newest first.
    pub fn subjects_touching(&self, path: &str) -> Result<Vec<String>> {
        let output = self.exec(args(&["log", "--pretty=format:%s", "--", path]))?;
        Ok(lines(&output.stdout))
    }

    /// Number of commits in `range`.
    pub fn count_commits(&self, range: &HistoryRange) -> Result<usize> {
        let mut argv = args(&["rev-list", "--count"]);
        argv.extend(range.rev_args());
        let output = self.exec(argv)?;
        let trimmed = output.stdout.trim();
        trimmed.parse().map_err(|_| Error::GitCommand {
            step: "git rev-list".to_string(),
            code: 0,
            stdout: output.stdout.clone(),
            stderr: format!("expected a commit count, got {:?}", trimmed),
        })
    }

    /// Commit subjects in `range`, newest first.
    pub fn subjects_in(&self, range: &HistoryRange) -> Result<Vec<String>> {
        let mut argv = args(&["log", "--pretty=format:%s"]);
        argv.extend(range.rev_args());
        let output = self.exec(argv)?;
        Ok(lines(&output.stdout))
    }
}

fn args(parts: &[&str]) -> Vec<String> {
    parts.iter().map(|s| s.to_string()).collect()
}

fn lines(stdout: &str) -> Vec<String> {
    stdout
        .lines()
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect()
}
