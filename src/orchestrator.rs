//! # Merge Orchestrator
//!
//! Drives the git operations that import or update each sub-repository of a
//! family, strictly one after another and in catalog order.
//!
//! ## Initial import
//!
//! ```text
//! fetch tag -> compose message -> merge -s ours --no-commit
//!   -> read-tree --prefix=<dest>/ -> [register build unit] -> commit
//! ```
//!
//! ## Update
//!
//! ```text
//! fetch tag -> compose message -> merge -X subtree=<dest> -> commit --amend
//! ```
//!
//! An update that git reports as "Already up to date." skips the amend for
//! that sub-repository and the loop moves on.
//!
//! A conflict stops the run with [`Error::Conflict`](crate::error::Error)
//! and leaves the tree mid-merge for the operator. The commit message file
//! is owned by a [`MessageFile`] and disappears on every exit path.

use log::info;

use crate::catalog::SubRepo;
use crate::config::{Mode, RunConfig};
use crate::error::Result;
use crate::git::{CommitOptions, Git, MergeStatus};
use crate::message::{self, MessageFile};
use crate::registrar::{self, Registration};
use crate::version::GitCapabilities;

/// What happened to one sub-repository.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// Imported for the first time. Carries the build-file changes made for
    /// build-bearing repositories.
    Imported { registration: Option<Registration> },
    /// Merged and recorded by amending the merge commit.
    Updated,
    /// The tag was already merged; nothing was committed.
    UpToDate,
}

/// Result for one sub-repository.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubRepoReport {
    pub name: &'static str,
    pub outcome: Outcome,
}

/// Result of a complete run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunSummary {
    /// Branch the merges were recorded on.
    pub branch: String,
    pub reports: Vec<SubRepoReport>,
}

impl RunSummary {
    /// Number of sub-repositories that produced a commit.
    pub fn committed(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.outcome != Outcome::UpToDate)
            .count()
    }
}

/// Imports or updates every sub-repository of the configured family.
pub fn run(config: &RunConfig, git: &Git, capabilities: &GitCapabilities) -> Result<RunSummary> {
    let branch = git.current_branch()?;
    let mut reports = Vec::new();

    for repo in config.family.subrepos() {
        let outcome = merge_subrepo(config, git, capabilities, repo, &branch)?;
        reports.push(SubRepoReport {
            name: repo.name,
            outcome,
        });
    }

    Ok(RunSummary { branch, reports })
}

fn merge_subrepo(
    config: &RunConfig,
    git: &Git,
    capabilities: &GitCapabilities,
    repo: &SubRepo,
    branch: &str,
) -> Result<Outcome> {
    let url = repo.url(&config.remote_base)?;
    info!("Fetching '{}' with tag '{}'", repo.name, config.tag);
    git.fetch_tag(url.as_str(), config.tag.as_str())?;

    let message = message::synthesize(git, config, repo, branch)?.for_subrepo(repo.name);
    let message_file = MessageFile::create(config.scratch_dir.as_deref(), &message, &config.pending)?;
    let prefix = repo.prefix();

    let outcome = match config.mode {
        Mode::Initial => {
            info!("Merging '{}' into {}", repo.name, prefix);
            git.merge_ours(capabilities.allow_unrelated_histories)?;
            git.read_tree_prefix(&prefix)?;

            let registration = if repo.build_bearing {
                info!("Including '{}' into the kernel build", repo.name);
                Some(registrar::register(
                    git,
                    &config.root,
                    &config.family.build_unit(),
                )?)
            } else {
                None
            };

            info!("Committing '{}'", repo.name);
            git.commit(message_file.path(), commit_options(config, false))?;
            Outcome::Imported { registration }
        }
        Mode::Update => {
            info!("Merging '{}' into {}", repo.name, prefix);
            match git.subtree_merge(&prefix)? {
                MergeStatus::AlreadyUpToDate => {
                    info!("'{}' is already up to date", repo.name);
                    Outcome::UpToDate
                }
                MergeStatus::Merged => {
                    info!("Committing '{}'", repo.name);
                    git.commit(message_file.path(), commit_options(config, true))?;
                    Outcome::Updated
                }
            }
        }
    };

    message_file.remove()?;
    Ok(outcome)
}

fn commit_options(config: &RunConfig, amend: bool) -> CommitOptions {
    CommitOptions {
        amend,
        gpg_sign: config.gpg_sign,
        signoff: config.signoff,
    }
}
