//! # WLAN CAF Merge Library
//!
//! This library imports Qualcomm CAF WLAN driver repositories into a kernel
//! tree as git subtrees under `drivers/staging/`, and updates them to newer
//! upstream tags. It is designed to be used by the `wlancaf-merge`
//! command-line tool, but every step is exposed so that other tooling can
//! drive it.
//!
//! ## Quick Example
//!
//! ```
//! use wlancaf_merge::catalog::Family;
//! use wlancaf_merge::config::{Mode, RunConfig, Tag};
//!
//! let tag = Tag::new("LA.UM.8.1.r1-10100-sm8150.0").unwrap();
//! let config = RunConfig::new(Family::Qcacld, Mode::Initial, tag, "/src/kernel").unwrap();
//!
//! let names: Vec<_> = config.family.subrepos().iter().map(|r| r.name).collect();
//! assert_eq!(names, ["fw-api", "qca-wifi-host-cmn", "qcacld-3.0"]);
//! assert_eq!(config.tag.revision(), "LA.UM.8.1.r1");
//! ```
//!
//! ## Core Concepts
//!
//! - **Catalog (`catalog`)**: The driver families, their sub-repositories in
//!   import order, and the build unit each family registers.
//! - **Configuration (`config`)**: The validated run configuration and the
//!   optional `.wlancaf-merge.yaml` settings file.
//! - **Git (`git`, `runner`, `version`)**: Typed git invocations behind a
//!   [`CommandRunner`](runner::CommandRunner) seam, and the probe for the
//!   host git's capabilities.
//! - **Pre-checks (`precheck`)**: Verifies the kernel tree and that the
//!   staging destinations fit the requested mode.
//! - **Messages (`message`)**: Synthesizes the merge commit message from
//!   upstream history.
//! - **Registration (`registrar`)**: Wires a freshly imported driver into the
//!   staging Kconfig and Makefile.
//! - **Interrupts (`interrupt`)**: Removes live commit message files when the
//!   run is stopped by a signal.
//!
//! ## Execution Flow
//!
//! [`execute`] runs the whole pipeline:
//!
//! 1.  **Validation**: The root must be a kernel tree with a staging directory.
//! 2.  **Pre-check**: Every destination must fit the mode; nothing is touched
//!     otherwise.
//! 3.  **Probe**: The host git version decides whether the initial merge
//!     passes `--allow-unrelated-histories`.
//! 4.  **Merge**: Each sub-repository is fetched, merged and committed in
//!     catalog order by the `orchestrator`.

pub mod catalog;
pub mod config;
pub mod defaults;
pub mod error;
pub mod git;
pub mod interrupt;
pub mod message;
pub mod orchestrator;
pub mod output;
pub mod precheck;
pub mod registrar;
pub mod runner;
pub mod suggestions;
pub mod version;

use config::RunConfig;
use error::Result;
use git::Git;
use orchestrator::RunSummary;
use runner::CommandRunner;

/// Validates the tree, checks preconditions and runs every merge.
///
/// No git command is issued before both checks pass.
pub fn execute(config: &RunConfig, runner: &dyn CommandRunner) -> Result<RunSummary> {
    precheck::validate_tree(&config.root)?;
    precheck::check(config)?;

    let git = Git::new(runner);
    let capabilities = version::probe(&git)?;
    orchestrator::run(config, &git, &capabilities)
}
