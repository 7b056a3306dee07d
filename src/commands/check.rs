//! # Check Command Implementation
//!
//! This module implements the `check` subcommand, a read-only dry run of the
//! gatekeeping that `merge` performs. It reports the state of every staging
//! destination of the selected family and whether the requested mode could
//! run. No git command is executed and no file is modified.

use anyhow::Result;
use clap::Args;

use wlancaf_merge::catalog::Family;
use wlancaf_merge::config::Mode;
use wlancaf_merge::output::{emoji, OutputConfig};
use wlancaf_merge::precheck;

use super::TargetArgs;

/// Check whether a merge could run, without touching the tree
#[derive(Args, Debug)]
pub struct CheckArgs {
    #[command(flatten)]
    pub target: TargetArgs,
}

/// Execute the `check` command.
pub fn execute(args: CheckArgs, output: &OutputConfig) -> Result<()> {
    let family = Family::from(args.target.family);
    let mode = Mode::from(args.target.mode);
    let root = &args.target.root;

    println!(
        "{} Checking {} ({}) in {}",
        emoji(output, "🔍", "[SCAN]"),
        family,
        mode,
        root.display()
    );
    precheck::validate_tree(root)?;

    for repo in family.subrepos() {
        let state = precheck::inspect(&root.join(repo.destination()))?;
        let marker = if state.fits(mode) {
            emoji(output, "✅", "[OK]")
        } else {
            emoji(output, "❌", "[FAIL]")
        };
        println!("   {} {} {}", marker, repo.name, state);
    }

    precheck::check_family(root, family, mode)?;

    println!(
        "{} {} {} can run",
        emoji(output, "✅", "[OK]"),
        family,
        mode
    );
    Ok(())
}
