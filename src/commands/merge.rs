//! # Merge Command Implementation
//!
//! This module implements the `merge` subcommand, which imports or updates
//! the sub-repositories of a WLAN driver family in the kernel tree.
//!
//! ## Configuration precedence
//!
//! 1. Command-line flags (`--remote-base`, `--no-gpg-sign`, `--no-signoff`)
//! 2. The `WLANCAF_REMOTE_BASE` environment variable
//! 3. `.wlancaf-merge.yaml` in the kernel root
//! 4. Built-in defaults
//!
//! A merge conflict is reported as an error and leaves the tree mid-merge;
//! the process then exits with git's status. SIGINT or SIGTERM removes the
//! pending commit message file and exits with 130.

use anyhow::{Context, Result};
use clap::Args;

use wlancaf_merge::config::{parse_remote_base, Settings, Tag};
use wlancaf_merge::interrupt;
use wlancaf_merge::output::{emoji, report_line, OutputConfig};
use wlancaf_merge::runner::SystemRunner;

use super::TargetArgs;

/// Import or update a WLAN driver family as git subtrees
#[derive(Args, Debug)]
pub struct MergeArgs {
    #[command(flatten)]
    pub target: TargetArgs,

    /// Upstream tag to merge
    #[arg(short = 'T', long, value_name = "TAG")]
    pub tag: String,

    /// Base URL of the upstream WLAN repositories
    ///
    /// Each sub-repository is fetched from `<URL>/<name>`.
    #[arg(long, value_name = "URL", env = "WLANCAF_REMOTE_BASE")]
    pub remote_base: Option<String>,

    /// Do not GPG-sign the merge commits
    #[arg(long)]
    pub no_gpg_sign: bool,

    /// Do not add a Signed-off-by trailer to the merge commits
    #[arg(long)]
    pub no_signoff: bool,
}

/// Execute the `merge` command.
pub fn execute(args: MergeArgs, output: &OutputConfig) -> Result<()> {
    let tag = Tag::new(args.tag.as_str())?;
    let settings = Settings::load(&args.target.root).with_context(|| {
        format!(
            "Failed to load settings from {}",
            args.target.root.display()
        )
    })?;

    let mut config = args.target.run_config(tag)?.apply_settings(&settings)?;
    if let Some(base) = &args.remote_base {
        config.remote_base = parse_remote_base(base)?;
    }
    if args.no_gpg_sign {
        config.gpg_sign = false;
    }
    if args.no_signoff {
        config.signoff = false;
    }

    println!(
        "{} Merging {} ({}) at tag '{}' from {}",
        emoji(output, "🔀", "[MERGE]"),
        config.family,
        config.mode,
        config.tag,
        config.remote_base
    );

    interrupt::install(config.pending.clone())
        .context("Failed to install the interrupt handler")?;

    let runner = SystemRunner::new(&config.root);
    let summary = wlancaf_merge::execute(&config, &runner)?;

    for report in &summary.reports {
        println!("   {}", report_line(output, report));
    }
    println!(
        "{} {} of {} sub-repositories committed on {}",
        emoji(output, "✅", "[OK]"),
        summary.committed(),
        summary.reports.len(),
        summary.branch
    );

    Ok(())
}
